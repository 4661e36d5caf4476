/// Loan database operations
use crate::error::{LibraryError, Result};
use crate::models::{Loan, LoanDetails};
use chrono::NaiveDate;
use sqlx::{Sqlite, SqlitePool, Transaction};

const DETAILS_SELECT: &str = r#"
    SELECT
        l.id AS loan_id,
        l.member_id,
        l.isbn,
        l.borrow_date,
        l.return_date,
        m.first_name AS member_first_name,
        m.last_name AS member_last_name,
        m.email AS member_email,
        b.title,
        b.author_first_name,
        b.author_last_name
    FROM loans AS l
    JOIN members AS m ON l.member_id = m.id
    JOIN books AS b ON l.isbn = b.isbn
"#;

async fn member_exists(tx: &mut Transaction<'_, Sqlite>, member_id: i64) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM members WHERE id = ?1)")
        .bind(member_id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(exists)
}

async fn book_exists(tx: &mut Transaction<'_, Sqlite>, isbn: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = ?1)")
        .bind(isbn)
        .fetch_one(&mut **tx)
        .await?;
    Ok(exists)
}

/// Open a new loan. Member/book existence and book availability are
/// checked in the same transaction as the insert, so two simultaneous
/// requests for one ISBN cannot both succeed.
pub async fn insert_loan(
    pool: &SqlitePool,
    member_id: i64,
    isbn: &str,
    borrow_date: NaiveDate,
) -> Result<Loan> {
    let mut tx = pool.begin().await?;

    if !member_exists(&mut tx, member_id).await? {
        tx.rollback().await?;
        return Err(LibraryError::MemberNotFound);
    }

    if !book_exists(&mut tx, isbn).await? {
        tx.rollback().await?;
        return Err(LibraryError::BookNotFound);
    }

    let open_loans = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM loans WHERE isbn = ?1 AND return_date IS NULL",
    )
    .bind(isbn)
    .fetch_one(&mut *tx)
    .await?;

    if open_loans > 0 {
        tx.rollback().await?;
        return Err(LibraryError::BookUnavailable);
    }

    let loan = sqlx::query_as::<_, Loan>(
        r#"
        INSERT INTO loans (member_id, isbn, borrow_date, return_date)
        VALUES (?1, ?2, ?3, NULL)
        RETURNING *
        "#,
    )
    .bind(member_id)
    .bind(isbn)
    .bind(borrow_date)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(loan)
}

/// Record a loan that was already returned (historical import). Only
/// member/book existence is enforced; a closed loan never holds a book.
pub async fn insert_closed_loan(
    pool: &SqlitePool,
    member_id: i64,
    isbn: &str,
    borrow_date: NaiveDate,
    return_date: NaiveDate,
) -> Result<Loan> {
    let mut tx = pool.begin().await?;

    if !member_exists(&mut tx, member_id).await? {
        tx.rollback().await?;
        return Err(LibraryError::MemberNotFound);
    }

    if !book_exists(&mut tx, isbn).await? {
        tx.rollback().await?;
        return Err(LibraryError::BookNotFound);
    }

    let loan = sqlx::query_as::<_, Loan>(
        r#"
        INSERT INTO loans (member_id, isbn, borrow_date, return_date)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING *
        "#,
    )
    .bind(member_id)
    .bind(isbn)
    .bind(borrow_date)
    .bind(return_date)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(loan)
}

/// Close a loan by setting its return date, putting the book back in the
/// available pool
pub async fn set_return_date(
    pool: &SqlitePool,
    loan_id: i64,
    return_date: NaiveDate,
) -> Result<()> {
    let result = sqlx::query("UPDATE loans SET return_date = ?1 WHERE id = ?2")
        .bind(return_date)
        .bind(loan_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::LoanNotFound);
    }

    Ok(())
}

/// Delete a loan record, open or closed
pub async fn delete_loan(pool: &SqlitePool, loan_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM loans WHERE id = ?1")
        .bind(loan_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::LoanNotFound);
    }

    Ok(())
}

/// Find loan by id
pub async fn find_by_id(pool: &SqlitePool, loan_id: i64) -> Result<Option<Loan>> {
    let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?1")
        .bind(loan_id)
        .fetch_optional(pool)
        .await?;

    Ok(loan)
}

/// List all loans
pub async fn list_loans(pool: &SqlitePool) -> Result<Vec<Loan>> {
    let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY borrow_date DESC, id DESC")
        .fetch_all(pool)
        .await?;

    Ok(loans)
}

/// Loan with member and book details for a single id
pub async fn get_loan_details(pool: &SqlitePool, loan_id: i64) -> Result<Option<LoanDetails>> {
    let sql = format!("{DETAILS_SELECT} WHERE l.id = ?1");
    let details = sqlx::query_as::<_, LoanDetails>(&sql)
        .bind(loan_id)
        .fetch_optional(pool)
        .await?;

    Ok(details)
}

/// All open loans with member and book details, newest first
pub async fn list_active_loan_details(pool: &SqlitePool) -> Result<Vec<LoanDetails>> {
    let sql = format!("{DETAILS_SELECT} WHERE l.return_date IS NULL ORDER BY l.borrow_date DESC");
    let details = sqlx::query_as::<_, LoanDetails>(&sql).fetch_all(pool).await?;

    Ok(details)
}

/// Every loan with member and book details
pub async fn list_loan_details(pool: &SqlitePool) -> Result<Vec<LoanDetails>> {
    let sql = format!("{DETAILS_SELECT} ORDER BY l.borrow_date DESC, l.id DESC");
    let details = sqlx::query_as::<_, LoanDetails>(&sql).fetch_all(pool).await?;

    Ok(details)
}
