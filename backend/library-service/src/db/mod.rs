/// Database operations for the library service
pub mod books;
pub mod loans;
pub mod members;
pub mod users;
