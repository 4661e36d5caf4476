/// Member database operations
use crate::error::{LibraryError, Result};
use crate::models::{Member, MemberCriterion, MemberQuery, NewMember};
use sqlx::SqlitePool;
use tracing::error;

/// Find member by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Member>> {
    let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(member)
}

/// Find a member using the first applicable criterion of the query, in
/// priority order (ID > email > mobile > name pair). Returns `Ok(None)`
/// when nothing matches or no criterion was supplied; a name search that
/// matches several members is refused rather than resolved arbitrarily.
pub async fn find_member(pool: &SqlitePool, query: &MemberQuery) -> Result<Option<Member>> {
    let Some(criterion) = query.criteria().into_iter().next() else {
        return Ok(None);
    };

    match criterion {
        MemberCriterion::Id(id) => find_by_id(pool, id).await,
        MemberCriterion::Email(email) => {
            let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE email = ?1")
                .bind(email)
                .fetch_optional(pool)
                .await?;
            Ok(member)
        }
        MemberCriterion::Mobile(mobile) => {
            let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE mobile = ?1")
                .bind(mobile)
                .fetch_optional(pool)
                .await?;
            Ok(member)
        }
        MemberCriterion::Name { first, last } => {
            let mut matches = sqlx::query_as::<_, Member>(
                "SELECT * FROM members WHERE first_name = ?1 AND last_name = ?2",
            )
            .bind(first)
            .bind(last)
            .fetch_all(pool)
            .await?;

            if matches.len() > 1 {
                return Err(LibraryError::AmbiguousMemberName {
                    matches: matches.len() as i64,
                });
            }
            Ok(matches.pop())
        }
    }
}

/// Insert a new member. Email/mobile uniqueness checks and the insert run
/// in one transaction.
pub async fn insert_member(pool: &SqlitePool, member: &NewMember) -> Result<Member> {
    let mut tx = pool.begin().await?;

    let email_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM members WHERE email = ?1)",
    )
    .bind(&member.email)
    .fetch_one(&mut *tx)
    .await?;

    if email_taken {
        tx.rollback().await?;
        return Err(LibraryError::DuplicateEmail);
    }

    let mobile_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM members WHERE mobile = ?1)",
    )
    .bind(&member.mobile)
    .fetch_one(&mut *tx)
    .await?;

    if mobile_taken {
        tx.rollback().await?;
        return Err(LibraryError::DuplicateMobile);
    }

    let stored = sqlx::query_as::<_, Member>(
        r#"
        INSERT INTO members (first_name, last_name, signup_date, address, mobile, email, social_media, preference, status)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        RETURNING *
        "#,
    )
    .bind(&member.first_name)
    .bind(&member.last_name)
    .bind(member.signup_date)
    .bind(&member.address)
    .bind(&member.mobile)
    .bind(&member.email)
    .bind(&member.social_media)
    .bind(member.preference)
    .bind(member.status)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(stored)
}

/// Overwrite all mutable fields of an existing member. Duplicate checks
/// exclude the member's own row.
pub async fn update_member(pool: &SqlitePool, id: i64, member: &NewMember) -> Result<Member> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM members WHERE id = ?1)")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    if !exists {
        tx.rollback().await?;
        return Err(LibraryError::MemberNotFound);
    }

    let email_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM members WHERE email = ?1 AND id != ?2)",
    )
    .bind(&member.email)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if email_taken {
        tx.rollback().await?;
        return Err(LibraryError::DuplicateEmail);
    }

    let mobile_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM members WHERE mobile = ?1 AND id != ?2)",
    )
    .bind(&member.mobile)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if mobile_taken {
        tx.rollback().await?;
        return Err(LibraryError::DuplicateMobile);
    }

    let stored = sqlx::query_as::<_, Member>(
        r#"
        UPDATE members
        SET first_name = ?2, last_name = ?3, signup_date = ?4, address = ?5,
            mobile = ?6, email = ?7, social_media = ?8, preference = ?9, status = ?10
        WHERE id = ?1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&member.first_name)
    .bind(&member.last_name)
    .bind(member.signup_date)
    .bind(&member.address)
    .bind(&member.mobile)
    .bind(&member.email)
    .bind(&member.social_media)
    .bind(member.preference)
    .bind(member.status)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        error!(member_id = %id, error = %e, "Failed to update member");
        LibraryError::from(e)
    })?;

    tx.commit().await?;

    Ok(stored)
}

/// Delete a member unless open loans still reference them
pub async fn delete_member(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM members WHERE id = ?1)")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    if !exists {
        tx.rollback().await?;
        return Err(LibraryError::MemberNotFound);
    }

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM loans WHERE member_id = ?1 AND return_date IS NULL",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if count > 0 {
        tx.rollback().await?;
        return Err(LibraryError::MemberHasActiveLoans { count });
    }

    sqlx::query("DELETE FROM members WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// List all members
pub async fn list_members(pool: &SqlitePool) -> Result<Vec<Member>> {
    let members = sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY last_name, first_name")
        .fetch_all(pool)
        .await?;

    Ok(members)
}
