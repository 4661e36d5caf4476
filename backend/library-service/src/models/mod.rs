/// Data models for the library domain
pub mod book;
pub mod loan;
pub mod member;
pub mod user;

pub use book::Book;
pub use loan::{Loan, LoanDetails};
pub use member::{ContactPreference, Member, MemberCriterion, MemberQuery, MemberStatus, NewMember};
pub use user::{User, UserRole};
