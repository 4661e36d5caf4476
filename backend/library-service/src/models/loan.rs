use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// Loan model - links a member to a borrowed book. A NULL return date
/// means the loan is open and the book is out.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Loan {
    pub id: i64,
    pub member_id: i64,
    pub isbn: String,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Loan row joined with member and book details for dashboard views
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LoanDetails {
    pub loan_id: i64,
    pub member_id: i64,
    pub isbn: String,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub member_first_name: String,
    pub member_last_name: String,
    pub member_email: String,
    pub title: String,
    pub author_first_name: String,
    pub author_last_name: String,
}
