/// Security module for dashboard authentication
///
/// Provides the password primitives for the library service:
/// - **password**: Argon2id password hashing and verification
pub mod password;

pub use password::{hash_password, verify_password};
