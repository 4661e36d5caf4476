mod common;

use library_service::{LibraryError, LibraryStore};

#[tokio::test]
async fn add_find_update_delete_book() {
    let store = LibraryStore::new(common::test_pool().await);
    store
        .add_book(&common::new_book("9780000000111", "Tides"))
        .await
        .expect("book should be added");

    let mut book = store
        .find_book("9780000000111")
        .await
        .expect("lookup should succeed")
        .expect("book should exist");
    assert_eq!(book.title, "Tides");

    book.title = "Tides, Revised".to_string();
    book.publication_year = 2021;
    let updated = store.update_book(&book).await.expect("update should succeed");
    assert_eq!(updated.title, "Tides, Revised");
    assert_eq!(updated.publication_year, 2021);

    store
        .delete_book("9780000000111")
        .await
        .expect("delete should succeed");
    assert!(store
        .find_book("9780000000111")
        .await
        .expect("lookup should succeed")
        .is_none());
}

#[tokio::test]
async fn duplicate_isbn_is_rejected() {
    let store = LibraryStore::new(common::test_pool().await);
    store
        .add_book(&common::new_book("9780000000111", "Tides"))
        .await
        .expect("book should be added");

    let err = store
        .add_book(&common::new_book("9780000000111", "A Different Title"))
        .await
        .expect_err("duplicate ISBN should be rejected");
    assert!(matches!(err, LibraryError::DuplicateIsbn));
}

#[tokio::test]
async fn update_and_delete_unknown_book_fail() {
    let store = LibraryStore::new(common::test_pool().await);

    let err = store
        .update_book(&common::new_book("9780000000999", "Ghost"))
        .await
        .expect_err("update of missing book should fail");
    assert!(matches!(err, LibraryError::BookNotFound));

    let err = store
        .delete_book("9780000000999")
        .await
        .expect_err("delete of missing book should fail");
    assert!(matches!(err, LibraryError::BookNotFound));
}

#[tokio::test]
async fn delete_book_blocked_by_open_loan_until_returned() {
    let store = LibraryStore::new(common::test_pool().await);
    let ada = store
        .add_member(&common::new_member("Ada", "ada@example.com", "0412000001"))
        .await
        .expect("member should be added");
    store
        .add_book(&common::new_book("9780000000111", "Tides"))
        .await
        .expect("book should be added");
    let loan = store
        .add_loan(ada.id, "9780000000111", common::date(2024, 2, 1))
        .await
        .expect("loan should open");

    let err = store
        .delete_book("9780000000111")
        .await
        .expect_err("open loan should block the delete");
    assert!(matches!(err, LibraryError::BookHasActiveLoans { count: 1 }));

    store
        .return_loan(loan.id, common::date(2024, 2, 20))
        .await
        .expect("return should succeed");
    store
        .delete_book("9780000000111")
        .await
        .expect("delete should succeed once the loan is closed");
}

#[tokio::test]
async fn add_loan_requires_member_book_and_availability() {
    let store = LibraryStore::new(common::test_pool().await);
    let ada = store
        .add_member(&common::new_member("Ada", "ada@example.com", "0412000001"))
        .await
        .expect("member should be added");
    store
        .add_book(&common::new_book("9780000000111", "Tides"))
        .await
        .expect("book should be added");

    let err = store
        .add_loan(4242, "9780000000111", common::date(2024, 2, 1))
        .await
        .expect_err("unknown member should fail");
    assert!(matches!(err, LibraryError::MemberNotFound));

    let err = store
        .add_loan(ada.id, "9780000000999", common::date(2024, 2, 1))
        .await
        .expect_err("unknown book should fail");
    assert!(matches!(err, LibraryError::BookNotFound));

    let loan = store
        .add_loan(ada.id, "9780000000111", common::date(2024, 2, 1))
        .await
        .expect("loan should open");
    assert!(loan.is_open());

    let err = store
        .add_loan(ada.id, "9780000000111", common::date(2024, 2, 2))
        .await
        .expect_err("book on loan should be unavailable");
    assert!(matches!(err, LibraryError::BookUnavailable));

    // Returning the book makes it loanable again
    store
        .return_loan(loan.id, common::date(2024, 2, 20))
        .await
        .expect("return should succeed");
    store
        .add_loan(ada.id, "9780000000111", common::date(2024, 3, 1))
        .await
        .expect("second loan should open after the return");
}

#[tokio::test]
async fn return_and_delete_unknown_loan_fail() {
    let store = LibraryStore::new(common::test_pool().await);

    let err = store
        .return_loan(4242, common::date(2024, 2, 20))
        .await
        .expect_err("return of missing loan should fail");
    assert!(matches!(err, LibraryError::LoanNotFound));

    let err = store
        .delete_loan(4242)
        .await
        .expect_err("delete of missing loan should fail");
    assert!(matches!(err, LibraryError::LoanNotFound));
}

#[tokio::test]
async fn delete_loan_is_unconditional() {
    let store = LibraryStore::new(common::test_pool().await);
    let ada = store
        .add_member(&common::new_member("Ada", "ada@example.com", "0412000001"))
        .await
        .expect("member should be added");
    store
        .add_book(&common::new_book("9780000000111", "Tides"))
        .await
        .expect("book should be added");

    // Open loan deletes fine
    let loan = store
        .add_loan(ada.id, "9780000000111", common::date(2024, 2, 1))
        .await
        .expect("loan should open");
    store.delete_loan(loan.id).await.expect("open loan should delete");

    // So does a closed one
    let loan = store
        .add_loan(ada.id, "9780000000111", common::date(2024, 3, 1))
        .await
        .expect("loan should open");
    store
        .return_loan(loan.id, common::date(2024, 3, 20))
        .await
        .expect("return should succeed");
    store
        .delete_loan(loan.id)
        .await
        .expect("closed loan should delete");

    assert!(store.list_loans().await.expect("list should succeed").is_empty());
}

#[tokio::test]
async fn available_books_excludes_only_open_loans() {
    let store = LibraryStore::new(common::test_pool().await);
    let ada = store
        .add_member(&common::new_member("Ada", "ada@example.com", "0412000001"))
        .await
        .expect("member should be added");

    store
        .add_book(&common::new_book("9780000000111", "A: Out On Loan"))
        .await
        .expect("book should be added");
    store
        .add_book(&common::new_book("9780000000222", "B: Returned"))
        .await
        .expect("book should be added");
    store
        .add_book(&common::new_book("9780000000333", "C: Never Loaned"))
        .await
        .expect("book should be added");

    // A has an open loan
    store
        .add_loan(ada.id, "9780000000111", common::date(2024, 2, 1))
        .await
        .expect("loan should open");
    // B has a closed loan
    let closed = store
        .add_loan(ada.id, "9780000000222", common::date(2024, 1, 1))
        .await
        .expect("loan should open");
    store
        .return_loan(closed.id, common::date(2024, 1, 20))
        .await
        .expect("return should succeed");

    let available = store
        .list_available_books()
        .await
        .expect("list should succeed");
    let isbns: Vec<&str> = available.iter().map(|b| b.isbn.as_str()).collect();
    assert_eq!(isbns, vec!["9780000000222", "9780000000333"]);
}

#[tokio::test]
async fn loan_details_join_member_and_book_fields() {
    let store = LibraryStore::new(common::test_pool().await);
    let ada = store
        .add_member(&common::new_member("Ada", "ada@example.com", "0412000001"))
        .await
        .expect("member should be added");
    store
        .add_book(&common::new_book("9780000000111", "Tides"))
        .await
        .expect("book should be added");
    let early = store
        .add_loan(ada.id, "9780000000111", common::date(2024, 1, 1))
        .await
        .expect("loan should open");
    store
        .return_loan(early.id, common::date(2024, 1, 10))
        .await
        .expect("return should succeed");
    let late = store
        .add_loan(ada.id, "9780000000111", common::date(2024, 2, 1))
        .await
        .expect("loan should open");

    let details = store
        .loan_details(late.id)
        .await
        .expect("lookup should succeed")
        .expect("details should exist");
    assert_eq!(details.member_first_name, "Ada");
    assert_eq!(details.member_email, "ada@example.com");
    assert_eq!(details.title, "Tides");
    assert!(details.return_date.is_none());

    let active = store
        .list_active_loan_details()
        .await
        .expect("list should succeed");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].loan_id, late.id);

    let all = store.list_loan_details().await.expect("list should succeed");
    assert_eq!(all.len(), 2);
    // Newest borrow date first
    assert_eq!(all[0].loan_id, late.id);
}

#[tokio::test]
async fn search_books_matches_title_and_author() {
    let store = LibraryStore::new(common::test_pool().await);
    store
        .add_book(&common::new_book("9780000000111", "The Salt Path"))
        .await
        .expect("book should be added");
    let mut other = common::new_book("9780000000222", "Hollow Coves");
    other.author_last_name = "Saltmarsh".to_string();
    store.add_book(&other).await.expect("book should be added");
    store
        .add_book(&common::new_book("9780000000333", "Unrelated"))
        .await
        .expect("book should be added");

    let hits = store.search_books("Salt").await.expect("search should succeed");
    let isbns: Vec<&str> = hits.iter().map(|b| b.isbn.as_str()).collect();
    assert_eq!(isbns, vec!["9780000000222", "9780000000111"]);
}

// The end-to-end scenario from the dashboard's acceptance checklist
#[tokio::test]
async fn full_member_book_loan_scenario() {
    let store = LibraryStore::new(common::test_pool().await);

    let m1 = store
        .add_member(&common::new_member("Mira", "e1@example.com", "0412000001"))
        .await
        .expect("first member should be added");

    let err = store
        .add_member(&common::new_member("Mila", "e1@example.com", "0412000002"))
        .await
        .expect_err("reused email should be rejected");
    assert!(matches!(err, LibraryError::DuplicateEmail));

    store
        .add_book(&common::new_book("111", "Acceptance"))
        .await
        .expect("book should be added");

    let loan = store
        .add_loan(m1.id, "111", common::date(2024, 1, 1))
        .await
        .expect("loan should open");

    let err = store
        .add_loan(m1.id, "111", common::date(2024, 1, 2))
        .await
        .expect_err("book already out should be unavailable");
    assert!(matches!(err, LibraryError::BookUnavailable));

    store
        .return_loan(loan.id, common::date(2024, 1, 15))
        .await
        .expect("return should succeed");

    let available = store
        .list_available_books()
        .await
        .expect("list should succeed");
    assert!(available.iter().any(|b| b.isbn == "111"));
}
