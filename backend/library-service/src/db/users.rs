/// Staff account database operations
use crate::error::{LibraryError, Result};
use crate::models::{User, UserRole};
use sqlx::SqlitePool;

/// Find user by username
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Check if username exists
pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Create a new staff account. The uniqueness check and the insert run in
/// one transaction so two concurrent registrations cannot both succeed.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
    )
    .bind(username)
    .fetch_one(&mut *tx)
    .await?;

    if exists {
        tx.rollback().await?;
        return Err(LibraryError::DuplicateUsername);
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES (?1, ?2, ?3)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(user)
}

/// Replace a user's stored password hash
pub async fn update_password(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<()> {
    let result = sqlx::query("UPDATE users SET password_hash = ?1 WHERE username = ?2")
        .bind(password_hash)
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::UserNotFound);
    }

    Ok(())
}

/// Delete a staff account
pub async fn delete_user(pool: &SqlitePool, username: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE username = ?1")
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::UserNotFound);
    }

    Ok(())
}

/// List all staff accounts for the admin user table
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    Ok(users)
}
