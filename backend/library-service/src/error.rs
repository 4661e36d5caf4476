use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibraryError>;

/// Operation outcome taxonomy. `Display` strings double as the
/// human-readable messages surfaced on the dashboard.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("User not found")]
    UserNotFound,

    #[error("Member not found")]
    MemberNotFound,

    #[error("Book not found")]
    BookNotFound,

    #[error("Loan not found")]
    LoanNotFound,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Another member already uses this email")]
    DuplicateEmail,

    #[error("Another member already uses this mobile number")]
    DuplicateMobile,

    #[error("Book with this ISBN already exists")]
    DuplicateIsbn,

    #[error("Member has {count} active loan(s) and cannot be deleted")]
    MemberHasActiveLoans { count: i64 },

    #[error("Book has {count} active loan(s) and cannot be deleted")]
    BookHasActiveLoans { count: i64 },

    #[error("Book is currently not available for loan")]
    BookUnavailable,

    #[error("{matches} members match this name; refine the search")]
    AmbiguousMemberName { matches: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        LibraryError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for LibraryError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        LibraryError::Database(err.to_string())
    }
}
