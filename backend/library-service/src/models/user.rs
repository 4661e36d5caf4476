use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, Type};

/// Staff role enum stored as text in the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Librarian,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Librarian => "librarian",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "librarian" => Some(UserRole::Librarian),
            _ => None,
        }
    }
}

/// Staff account - dashboard authentication entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: NaiveDateTime,
}
