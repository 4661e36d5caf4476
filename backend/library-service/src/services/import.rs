//! Bulk import of uploaded records
//!
//! CSV parsing is the dashboard's concern; by the time rows reach this
//! module they are plain header -> value records. Upload templates have
//! drifted over time (`Member_FName`, `ISBN`, ...), so each entity
//! declares a mapping table from known headers to storage columns and a
//! shared normalization routine applies it. A bad row is reported and
//! skipped; it never aborts the batch.

use crate::db;
use crate::error::Result as LibResult;
use crate::models::{Book, ContactPreference, MemberStatus, NewMember};
use crate::services::library::LibraryStore;
use chrono::NaiveDate;
use std::collections::HashMap;

/// One uploaded record: header -> raw value
pub type ImportRow = HashMap<String, String>;

/// Per-row result of a bulk import, 1-based row numbering matching the
/// uploaded file
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub row: usize,
    pub success: bool,
    pub message: String,
}

impl ImportOutcome {
    fn ok(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            success: true,
            message: message.into(),
        }
    }

    fn failed(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            success: false,
            message: message.into(),
        }
    }
}

/// Upload-header to storage-column mapping, matched case-insensitively.
/// Unknown headers fall through lowercased, so a file that already uses
/// storage column names imports unchanged.
struct FieldMapping {
    columns: &'static [(&'static str, &'static str)],
}

impl FieldMapping {
    fn normalize(&self, row: &ImportRow) -> HashMap<String, String> {
        let mut normalized = HashMap::new();
        for (header, value) in row {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let key = self
                .columns
                .iter()
                .find(|(from, _)| from.eq_ignore_ascii_case(header.trim()))
                .map(|(_, to)| (*to).to_string())
                .unwrap_or_else(|| header.trim().to_lowercase());
            normalized.insert(key, value.to_string());
        }
        normalized
    }
}

const MEMBER_FIELDS: FieldMapping = FieldMapping {
    columns: &[
        ("Member_FName", "first_name"),
        ("Member_LName", "last_name"),
        ("Signup_Date", "signup_date"),
        ("Address", "address"),
        ("Mobile", "mobile"),
        ("Email", "email"),
        ("Social_Media", "social_media"),
        ("Preference", "preference"),
        ("Member_Status", "status"),
        // Ids are system-assigned; an explicit id column is ignored
        ("MemberID", "id"),
    ],
};

const BOOK_FIELDS: FieldMapping = FieldMapping {
    columns: &[
        ("ISBN", "isbn"),
        ("Title", "title"),
        ("Author_FName", "author_first_name"),
        ("Author_LName", "author_last_name"),
        ("Publisher", "publisher"),
        ("Publication_Year", "publication_year"),
        ("Genre", "genre"),
    ],
};

const LOAN_FIELDS: FieldMapping = FieldMapping {
    columns: &[
        ("LoanID", "id"),
        ("MemberID", "member_id"),
        ("ISBN", "isbn"),
        ("Borrow_date", "borrow_date"),
        ("Return_date", "return_date"),
    ],
};

fn missing_fields<'a>(
    row: &HashMap<String, String>,
    required: &'a [&'a str],
) -> Vec<&'a str> {
    required
        .iter()
        .filter(|field| !row.contains_key(**field))
        .copied()
        .collect()
}

fn require_all(row: &HashMap<String, String>, required: &[&str]) -> Result<(), String> {
    let missing = missing_fields(row, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Skipping: missing required field(s): {}",
            missing.join(", ")
        ))
    }
}

fn parse_date(row: &HashMap<String, String>, field: &str) -> Result<NaiveDate, String> {
    let value = &row[field];
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a valid {} (expected YYYY-MM-DD)", value, field))
}

fn member_from_row(row: &HashMap<String, String>) -> Result<NewMember, String> {
    require_all(
        row,
        &[
            "first_name",
            "last_name",
            "signup_date",
            "address",
            "mobile",
            "email",
            "preference",
            "status",
        ],
    )?;

    let preference = ContactPreference::from_str(&row["preference"])
        .ok_or_else(|| format!("'{}' is not a valid preference", row["preference"]))?;
    let status = MemberStatus::from_str(&row["status"])
        .ok_or_else(|| format!("'{}' is not a valid member status", row["status"]))?;

    Ok(NewMember {
        first_name: row["first_name"].clone(),
        last_name: row["last_name"].clone(),
        signup_date: parse_date(row, "signup_date")?,
        address: row["address"].clone(),
        mobile: row["mobile"].clone(),
        email: row["email"].clone(),
        social_media: row.get("social_media").cloned(),
        preference,
        status,
    })
}

fn book_from_row(row: &HashMap<String, String>) -> Result<Book, String> {
    require_all(
        row,
        &[
            "isbn",
            "title",
            "author_first_name",
            "author_last_name",
            "publisher",
            "publication_year",
            "genre",
        ],
    )?;

    let publication_year = row["publication_year"]
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a valid publication year", row["publication_year"]))?;

    Ok(Book {
        isbn: row["isbn"].clone(),
        title: row["title"].clone(),
        author_first_name: row["author_first_name"].clone(),
        author_last_name: row["author_last_name"].clone(),
        publisher: row["publisher"].clone(),
        publication_year,
        genre: row["genre"].clone(),
    })
}

impl LibraryStore {
    /// Import member rows; returns one outcome per row
    pub async fn import_members(&self, rows: &[ImportRow]) -> Vec<ImportOutcome> {
        let mut outcomes = Vec::with_capacity(rows.len());
        for (index, raw) in rows.iter().enumerate() {
            let row_number = index + 1;
            let row = MEMBER_FIELDS.normalize(raw);

            let member = match member_from_row(&row) {
                Ok(member) => member,
                Err(message) => {
                    outcomes.push(ImportOutcome::failed(row_number, message));
                    continue;
                }
            };

            outcomes.push(match self.add_member(&member).await {
                Ok(_) => ImportOutcome::ok(row_number, "Member added successfully!"),
                Err(e) => ImportOutcome::failed(row_number, e.to_string()),
            });
        }
        outcomes
    }

    /// Import book rows; returns one outcome per row
    pub async fn import_books(&self, rows: &[ImportRow]) -> Vec<ImportOutcome> {
        let mut outcomes = Vec::with_capacity(rows.len());
        for (index, raw) in rows.iter().enumerate() {
            let row_number = index + 1;
            let row = BOOK_FIELDS.normalize(raw);

            let book = match book_from_row(&row) {
                Ok(book) => book,
                Err(message) => {
                    outcomes.push(ImportOutcome::failed(row_number, message));
                    continue;
                }
            };

            outcomes.push(match self.add_book(&book).await {
                Ok(_) => ImportOutcome::ok(row_number, "Book added successfully!"),
                Err(e) => ImportOutcome::failed(row_number, e.to_string()),
            });
        }
        outcomes
    }

    /// Import loan rows; returns one outcome per row.
    ///
    /// A row with a return date is a historical closed loan and skips the
    /// availability check; a row without one opens a live loan through
    /// the full `add_loan` path.
    pub async fn import_loans(&self, rows: &[ImportRow]) -> Vec<ImportOutcome> {
        let mut outcomes = Vec::with_capacity(rows.len());
        for (index, raw) in rows.iter().enumerate() {
            let row_number = index + 1;
            let row = LOAN_FIELDS.normalize(raw);

            let outcome = match self.loan_from_row(&row).await {
                Ok(()) => ImportOutcome::ok(row_number, "Loan added successfully!"),
                Err(message) => ImportOutcome::failed(row_number, message),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn loan_from_row(&self, row: &HashMap<String, String>) -> Result<(), String> {
        require_all(row, &["member_id", "isbn", "borrow_date"])?;

        let member_id = row["member_id"]
            .parse::<i64>()
            .map_err(|_| format!("'{}' is not a valid member id", row["member_id"]))?;
        let borrow_date = parse_date(row, "borrow_date")?;

        let result: LibResult<()> = match row.get("return_date") {
            Some(_) => {
                let return_date = parse_date(row, "return_date")?;
                db::loans::insert_closed_loan(
                    self.pool(),
                    member_id,
                    &row["isbn"],
                    borrow_date,
                    return_date,
                )
                .await
                .map(|_| ())
            }
            None => self
                .add_loan(member_id, &row["isbn"], borrow_date)
                .await
                .map(|_| ()),
        };

        result.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(pairs: &[(&str, &str)]) -> ImportRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn normalize_maps_template_headers() {
        let row = raw_row(&[
            ("Member_FName", "Ada"),
            ("EMAIL", "ada@example.com"),
            ("unknown_extra", "kept"),
        ]);
        let normalized = MEMBER_FIELDS.normalize(&row);
        assert_eq!(normalized["first_name"], "Ada");
        assert_eq!(normalized["email"], "ada@example.com");
        assert_eq!(normalized["unknown_extra"], "kept");
    }

    #[test]
    fn normalize_drops_blank_values() {
        let row = raw_row(&[("Social_Media", "   "), ("Mobile", "0412 345 678")]);
        let normalized = MEMBER_FIELDS.normalize(&row);
        assert!(!normalized.contains_key("social_media"));
        assert_eq!(normalized["mobile"], "0412 345 678");
    }

    #[test]
    fn member_row_reports_missing_fields() {
        let row = MEMBER_FIELDS.normalize(&raw_row(&[("Member_FName", "Ada")]));
        let err = member_from_row(&row).expect_err("row should be incomplete");
        assert!(err.contains("missing required field(s)"));
        assert!(err.contains("last_name"));
    }

    #[test]
    fn member_row_rejects_bad_date() {
        let row = MEMBER_FIELDS.normalize(&raw_row(&[
            ("Member_FName", "Ada"),
            ("Member_LName", "Lovelace"),
            ("Signup_Date", "01/02/2024"),
            ("Address", "1 Analytical Way"),
            ("Mobile", "0412345678"),
            ("Email", "ada@example.com"),
            ("Preference", "Email"),
            ("Member_Status", "active"),
        ]));
        let err = member_from_row(&row).expect_err("date format should be rejected");
        assert!(err.contains("signup_date"));
    }

    #[test]
    fn book_row_parses_year() {
        let row = BOOK_FIELDS.normalize(&raw_row(&[
            ("ISBN", "9781593278281"),
            ("Title", "The Rust Programming Language"),
            ("Author_FName", "Steve"),
            ("Author_LName", "Klabnik"),
            ("Publisher", "No Starch Press"),
            ("Publication_Year", "2019"),
            ("Genre", "Programming"),
        ]));
        let book = book_from_row(&row).expect("row should parse");
        assert_eq!(book.publication_year, 2019);
    }
}
