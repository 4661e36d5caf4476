use serde::Serialize;
use sqlx::FromRow;

/// Book model - catalog entry keyed by ISBN
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub publisher: String,
    pub publication_year: i64,
    pub genre: String,
}
