/// Book catalog database operations, keyed on ISBN
use crate::error::{LibraryError, Result};
use crate::models::Book;
use sqlx::SqlitePool;

/// Find book by ISBN
pub async fn find_by_isbn(pool: &SqlitePool, isbn: &str) -> Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = ?1")
        .bind(isbn)
        .fetch_optional(pool)
        .await?;

    Ok(book)
}

/// Insert a new catalog entry. The ISBN uniqueness check and the insert
/// run in one transaction.
pub async fn insert_book(pool: &SqlitePool, book: &Book) -> Result<Book> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = ?1)")
        .bind(&book.isbn)
        .fetch_one(&mut *tx)
        .await?;

    if exists {
        tx.rollback().await?;
        return Err(LibraryError::DuplicateIsbn);
    }

    let stored = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (isbn, title, author_first_name, author_last_name, publisher, publication_year, genre)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING *
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&book.author_first_name)
    .bind(&book.author_last_name)
    .bind(&book.publisher)
    .bind(book.publication_year)
    .bind(&book.genre)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(stored)
}

/// Overwrite all mutable fields of an existing catalog entry
pub async fn update_book(pool: &SqlitePool, book: &Book) -> Result<Book> {
    let stored = sqlx::query_as::<_, Book>(
        r#"
        UPDATE books
        SET title = ?2, author_first_name = ?3, author_last_name = ?4,
            publisher = ?5, publication_year = ?6, genre = ?7
        WHERE isbn = ?1
        RETURNING *
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&book.author_first_name)
    .bind(&book.author_last_name)
    .bind(&book.publisher)
    .bind(book.publication_year)
    .bind(&book.genre)
    .fetch_optional(pool)
    .await?;

    stored.ok_or(LibraryError::BookNotFound)
}

/// Delete a catalog entry unless open loans still reference it
pub async fn delete_book(pool: &SqlitePool, isbn: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = ?1)")
        .bind(isbn)
        .fetch_one(&mut *tx)
        .await?;

    if !exists {
        tx.rollback().await?;
        return Err(LibraryError::BookNotFound);
    }

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM loans WHERE isbn = ?1 AND return_date IS NULL",
    )
    .bind(isbn)
    .fetch_one(&mut *tx)
    .await?;

    if count > 0 {
        tx.rollback().await?;
        return Err(LibraryError::BookHasActiveLoans { count });
    }

    sqlx::query("DELETE FROM books WHERE isbn = ?1")
        .bind(isbn)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// List the whole catalog
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
        .fetch_all(pool)
        .await?;

    Ok(books)
}

/// Search the catalog by partial match on title or author name
pub async fn search_books(pool: &SqlitePool, term: &str) -> Result<Vec<Book>> {
    let pattern = format!("%{}%", term);
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT * FROM books
        WHERE title LIKE ?1 OR author_first_name LIKE ?1 OR author_last_name LIKE ?1
        ORDER BY title
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

/// List books with no open loan: the catalog minus every ISBN currently out
pub async fn list_available_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT b.*
        FROM books AS b
        LEFT JOIN loans AS l ON b.isbn = l.isbn AND l.return_date IS NULL
        WHERE l.isbn IS NULL
        ORDER BY b.title
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(books)
}
