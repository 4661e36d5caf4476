#![allow(dead_code)]

use chrono::NaiveDate;
use library_service::models::{Book, ContactPreference, MemberStatus, NewMember};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Fresh in-memory database with the schema applied. Pinned to a single
/// connection: a second in-memory connection would see a different
/// database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory database should open");

    library_service::MIGRATOR
        .run(&pool)
        .await
        .expect("migrations should apply");

    pool
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn new_member(first: &str, email: &str, mobile: &str) -> NewMember {
    NewMember {
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        signup_date: date(2024, 1, 15),
        address: "1 Library Lane".to_string(),
        mobile: mobile.to_string(),
        email: email.to_string(),
        social_media: None,
        preference: ContactPreference::Email,
        status: MemberStatus::Active,
    }
}

pub fn new_book(isbn: &str, title: &str) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author_first_name: "Iris".to_string(),
        author_last_name: "Penwright".to_string(),
        publisher: "Harbour House".to_string(),
        publication_year: 2019,
        genre: "Fiction".to_string(),
    }
}
