use chrono::{DateTime, Local, TimeDelta, TimeZone};
use library_lending::{Admin, Directory, LendingError, Publication, Reader};

fn morning() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 9, 2, 9, 30, 0).unwrap()
}

fn catalogue(titles: &[&str]) -> (Directory, Admin) {
    let mut directory = Directory::new("Scenario Library");
    let admin = directory.super_admin();
    for title in titles {
        directory
            .add_publication(&admin, Publication::book(*title, "Author", "ISBN", "General"))
            .unwrap();
    }
    (directory, admin)
}

#[test]
fn super_admin_adds_book_once() {
    let mut directory = Directory::new("Scenario Library");
    let admin = directory.super_admin();

    assert_eq!(
        directory.add_publication(&admin, Publication::book("T1", "A1", "ISBN1", "General")),
        Ok(())
    );
    assert_eq!(
        directory.add_publication(&admin, Publication::book("T1", "A2", "ISBN2", "General")),
        Err(LendingError::DuplicateTitle("T1".into()))
    );
    assert_eq!(directory.publications().len(), 1);
}

#[test]
fn quota_frees_up_after_return() {
    let (mut directory, _) = catalogue(&["T1", "T2", "T3", "T4"]);
    let mut reader = Reader::new("R", "r1", "pw");

    for title in ["T1", "T2", "T3"] {
        reader
            .request_borrow_at(&mut directory, title, None, morning())
            .unwrap();
    }
    assert_eq!(
        reader.request_borrow_at(&mut directory, "T4", None, morning()),
        Err(LendingError::QuotaExceeded { limit: 3 })
    );
    assert!(!directory.find_publication("T4").unwrap().is_borrowed());

    reader.request_return(&mut directory, "T2").unwrap();
    reader
        .request_borrow_at(&mut directory, "T4", None, morning())
        .unwrap();
    assert_eq!(reader.remaining_quota(), 0);
    assert_eq!(reader.borrowed_items(), vec!["T1", "T3", "T4"]);
}

#[test]
fn ten_day_loan_then_return() {
    let (mut directory, _) = catalogue(&["T1"]);
    let mut reader = Reader::new("R", "r1", "pw");

    let message = reader
        .request_borrow_at(&mut directory, "T1", Some(10), morning())
        .unwrap();
    let due = morning() + TimeDelta::days(10);
    assert!(message.contains(&due.format("%Y-%m-%d").to_string()));
    assert_eq!(directory.find_publication("T1").unwrap().due_date(), Some(due));

    reader.request_return(&mut directory, "T1").unwrap();
    let publication = directory.find_publication("T1").unwrap();
    assert!(publication.describe().contains("available"));
    assert!(publication.borrower().is_none());
    assert!(publication.due_date().is_none());
}

#[test]
fn latest_magazine_loan_period_changes_on_archive() {
    let mut magazine = Publication::magazine("Weekly", "2024-36", "Press");
    magazine.mark_as_latest();
    assert_eq!(magazine.max_loan_days(), 7);
    magazine.mark_as_archive();
    assert_eq!(magazine.max_loan_days(), 14);
}

#[test]
fn borrowed_item_reports_existing_borrower() {
    let (mut directory, _) = catalogue(&["T1"]);
    let mut first = Reader::new("First", "r1", "pw");
    let mut second = Reader::new("Second", "r2", "pw");
    first
        .request_borrow_at(&mut directory, "T1", Some(3), morning())
        .unwrap();
    let before = directory.find_publication("T1").unwrap();

    let err = second
        .request_borrow_at(&mut directory, "T1", None, morning())
        .unwrap_err();

    assert!(err.to_string().contains("First"));
    assert_eq!(directory.find_publication("T1").unwrap(), before);
}

#[test]
fn only_first_admin_manages_admins() {
    let (mut directory, root) = catalogue(&[]);
    let deputy = Admin::new("Deputy", "admin002", "pw");

    assert!(root
        .register_admin(&mut directory, deputy.clone())
        .starts_with("OK"));
    let refused = deputy.register_admin(&mut directory, Admin::new("Third", "admin003", "pw"));
    assert!(refused.contains(&LendingError::SuperAdminRequired.to_string()));
    assert_eq!(directory.admins().len(), 2);
}

#[test]
fn ids_stay_unique_across_adds() {
    let (mut directory, root) = catalogue(&[]);
    for attempt in 0..3 {
        let reader = directory.add_reader(&root, Reader::new("R", "r1", "pw"));
        let admin = directory.add_admin(&root, Admin::new("A", "a1", "pw"));
        let magazine = directory.add_publication(&root, Publication::magazine("M", "1", "P"));
        if attempt == 0 {
            assert_eq!(reader, Ok(()));
            assert_eq!(admin, Ok(()));
            assert_eq!(magazine, Ok(()));
        } else {
            assert_eq!(reader, Err(LendingError::DuplicateReaderId("r1".into())));
            assert_eq!(admin, Err(LendingError::DuplicateAdminId("a1".into())));
            assert_eq!(magazine, Err(LendingError::DuplicateTitle("M".into())));
        }
    }
    assert_eq!(directory.readers().len(), 1);
    assert_eq!(directory.admins().len(), 2);
    assert_eq!(directory.publications().len(), 1);
}
