/// Service layer for the library dashboard core
///
/// - `auth`: credential verification and staff account management
/// - `library`: member/book/loan record integrity
/// - `import`: declarative bulk import of uploaded records
pub mod auth;
pub mod import;
pub mod library;

pub use auth::{AuthService, CredentialCheck};
pub use import::{ImportOutcome, ImportRow};
pub use library::LibraryStore;
