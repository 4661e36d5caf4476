/// Library Service Library
///
/// Credential verification and record-integrity core for the library
/// staff dashboard. The UI layer calls into this crate with plain field
/// values; persistence is an injected SQLite pool.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: Database repositories (users, members, books, loans)
/// - `error`: Error types
/// - `models`: Data models
/// - `security`: Password hashing and verification
/// - `services`: Business logic (auth, library store, bulk import)
/// - `validators`: Input validation
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod security;
pub mod services;
pub mod validators;

// Re-export commonly used types
pub use error::{LibraryError, Result};
pub use services::{AuthService, CredentialCheck, LibraryStore};

/// Embedded schema migrations, applied by the process bootstrap
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
