//! Record-integrity store for members, books, and loans
//!
//! Every mutating operation validates its input before touching the
//! database; the repository layer then runs its existence/uniqueness
//! checks and the write inside one transaction.

use crate::db;
use crate::error::{LibraryError, Result};
use crate::models::{Book, Loan, LoanDetails, Member, MemberQuery, NewMember};
use crate::validators;
use chrono::NaiveDate;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct LibraryStore {
    pool: SqlitePool,
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_member(member: &NewMember) -> Result<()> {
    required("first name", &member.first_name)?;
    required("last name", &member.last_name)?;
    required("address", &member.address)?;
    required("mobile", &member.mobile)?;
    required("email", &member.email)?;

    if !validators::validate_email(&member.email) {
        return Err(LibraryError::Validation(format!(
            "'{}' is not a valid email address",
            member.email
        )));
    }
    if !validators::validate_mobile(&member.mobile) {
        return Err(LibraryError::Validation(format!(
            "'{}' is not a valid mobile number",
            member.mobile
        )));
    }

    Ok(())
}

fn validate_book(book: &Book) -> Result<()> {
    required("ISBN", &book.isbn)?;
    required("title", &book.title)?;
    required("author first name", &book.author_first_name)?;
    required("author last name", &book.author_last_name)?;
    required("publisher", &book.publisher)?;
    required("genre", &book.genre)?;

    if book.publication_year <= 0 {
        return Err(LibraryError::Validation(
            "publication year must be positive".to_string(),
        ));
    }

    Ok(())
}

impl LibraryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // --- Member operations ---

    /// Add a member; email and mobile must not be in use
    pub async fn add_member(&self, member: &NewMember) -> Result<Member> {
        validate_member(member)?;
        db::members::insert_member(&self.pool, member).await
    }

    /// Overwrite all mutable fields of a member
    pub async fn update_member(&self, id: i64, member: &NewMember) -> Result<Member> {
        validate_member(member)?;
        db::members::update_member(&self.pool, id, member).await
    }

    /// Delete a member; open loans block the delete
    pub async fn delete_member(&self, id: i64) -> Result<()> {
        db::members::delete_member(&self.pool, id).await
    }

    /// Find a single member by the first applicable criterion
    pub async fn find_member(&self, query: &MemberQuery) -> Result<Option<Member>> {
        db::members::find_member(&self.pool, query).await
    }

    pub async fn list_members(&self) -> Result<Vec<Member>> {
        db::members::list_members(&self.pool).await
    }

    // --- Book operations ---

    /// Add a catalog entry; the ISBN must be new
    pub async fn add_book(&self, book: &Book) -> Result<Book> {
        validate_book(book)?;
        db::books::insert_book(&self.pool, book).await
    }

    /// Overwrite all mutable fields of a catalog entry
    pub async fn update_book(&self, book: &Book) -> Result<Book> {
        validate_book(book)?;
        db::books::update_book(&self.pool, book).await
    }

    /// Delete a catalog entry; open loans block the delete
    pub async fn delete_book(&self, isbn: &str) -> Result<()> {
        db::books::delete_book(&self.pool, isbn).await
    }

    pub async fn find_book(&self, isbn: &str) -> Result<Option<Book>> {
        db::books::find_by_isbn(&self.pool, isbn).await
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        db::books::list_books(&self.pool).await
    }

    /// Partial-match search on title or author name
    pub async fn search_books(&self, term: &str) -> Result<Vec<Book>> {
        db::books::search_books(&self.pool, term).await
    }

    /// Every book with no currently-open loan
    pub async fn list_available_books(&self) -> Result<Vec<Book>> {
        db::books::list_available_books(&self.pool).await
    }

    // --- Loan operations ---

    /// Open a loan for an existing member on an available book
    pub async fn add_loan(&self, member_id: i64, isbn: &str, borrow_date: NaiveDate) -> Result<Loan> {
        required("ISBN", isbn)?;
        db::loans::insert_loan(&self.pool, member_id, isbn, borrow_date).await
    }

    /// Close a loan; the book returns to the available pool
    pub async fn return_loan(&self, loan_id: i64, return_date: NaiveDate) -> Result<()> {
        db::loans::set_return_date(&self.pool, loan_id, return_date).await
    }

    /// Delete a loan record unconditionally (no downstream dependents)
    pub async fn delete_loan(&self, loan_id: i64) -> Result<()> {
        db::loans::delete_loan(&self.pool, loan_id).await
    }

    pub async fn find_loan(&self, loan_id: i64) -> Result<Option<Loan>> {
        db::loans::find_by_id(&self.pool, loan_id).await
    }

    pub async fn list_loans(&self) -> Result<Vec<Loan>> {
        db::loans::list_loans(&self.pool).await
    }

    /// A single loan joined with member and book details
    pub async fn loan_details(&self, loan_id: i64) -> Result<Option<LoanDetails>> {
        db::loans::get_loan_details(&self.pool, loan_id).await
    }

    /// Open loans with member and book details, newest first
    pub async fn list_active_loan_details(&self) -> Result<Vec<LoanDetails>> {
        db::loans::list_active_loan_details(&self.pool).await
    }

    /// Every loan with member and book details
    pub async fn list_loan_details(&self) -> Result<Vec<LoanDetails>> {
        db::loans::list_loan_details(&self.pool).await
    }
}
