//! Requests that readers and admins send to the directory.
//!
//! Readers and admins never hold a pointer back into the [`Directory`]; each
//! request receives it explicitly, which keeps ownership of every collection
//! inside the directory.

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::directory::Directory;
use crate::error::LendingError;
use crate::models::{Admin, Publication, Reader};

/// Borrow `title` from `publications` into `reader`'s list.
pub(crate) fn checkout(
    reader: &mut Reader,
    publications: &mut [Publication],
    title: &str,
    days: Option<i64>,
    now: DateTime<Local>,
) -> Result<String, LendingError> {
    if reader.borrowed.len() >= reader.max_borrow_limit() {
        warn!(reader = reader.reader_id(), title, "borrow refused: quota reached");
        return Err(LendingError::QuotaExceeded {
            limit: reader.max_borrow_limit(),
        });
    }

    let publication = publications
        .iter_mut()
        .find(|p| p.title() == title)
        .ok_or_else(|| LendingError::PublicationNotFound(title.to_string()))?;

    let message = publication.receive_borrow(reader, days, now)?;
    reader.borrowed.push(title.to_string());
    info!(reader = reader.reader_id(), title, "publication borrowed");
    Ok(format!("{} {message}", reader.name()))
}

/// Return `title` from `reader`'s list to `publications`.
pub(crate) fn checkin(
    reader: &mut Reader,
    publications: &mut [Publication],
    title: &str,
    now: DateTime<Local>,
) -> Result<String, LendingError> {
    let position = reader
        .borrowed
        .iter()
        .position(|t| t == title)
        .ok_or_else(|| LendingError::NotBorrowed(title.to_string()))?;

    let publication = publications
        .iter_mut()
        .find(|p| p.title() == title && p.borrower() == Some(reader.reader_id()));
    let Some(publication) = publication else {
        error!(reader = reader.reader_id(), title, "reader list and catalogue disagree");
        return Err(LendingError::LoanStateMismatch(title.to_string()));
    };

    let overdue_days = publication
        .due_date()
        .map(|due| (now - due).num_days())
        .unwrap_or(0);
    if !publication.receive_return() {
        error!(reader = reader.reader_id(), title, "publication was not on loan");
        return Err(LendingError::LoanStateMismatch(title.to_string()));
    }
    reader.borrowed.remove(position);
    info!(reader = reader.reader_id(), title, overdue_days, "publication returned");

    if overdue_days > 0 {
        Ok(format!(
            "{} returned \"{title}\" ({overdue_days} days overdue).",
            reader.name()
        ))
    } else {
        Ok(format!("{} returned \"{title}\".", reader.name()))
    }
}

impl Reader {
    /// Ask `directory` to lend `title`. `days` falls back to the
    /// publication's loan period. When this reader's ID is registered, the
    /// directory's record is the one charged and `self` is refreshed from it.
    pub fn request_borrow(
        &mut self,
        directory: &mut Directory,
        title: &str,
        days: Option<i64>,
    ) -> Result<String, LendingError> {
        self.request_borrow_at(directory, title, days, Local::now())
    }

    pub fn request_borrow_at(
        &mut self,
        directory: &mut Directory,
        title: &str,
        days: Option<i64>,
        now: DateTime<Local>,
    ) -> Result<String, LendingError> {
        if directory.is_registered(self.reader_id()) {
            let result = directory.lend_at(self.reader_id(), title, days, now);
            self.sync_with(directory);
            return result;
        }
        checkout(self, directory.publications_mut(), title, days, now)
    }

    pub fn request_return(
        &mut self,
        directory: &mut Directory,
        title: &str,
    ) -> Result<String, LendingError> {
        self.request_return_at(directory, title, Local::now())
    }

    pub fn request_return_at(
        &mut self,
        directory: &mut Directory,
        title: &str,
        now: DateTime<Local>,
    ) -> Result<String, LendingError> {
        if directory.is_registered(self.reader_id()) {
            let result = directory.take_back_at(self.reader_id(), title, now);
            self.sync_with(directory);
            return result;
        }
        checkin(self, directory.publications_mut(), title, now)
    }

    /// A registered reader's loans live in the directory record; mirror them.
    fn sync_with(&mut self, directory: &Directory) {
        if let Some(stored) = directory.find_reader(self.reader_id()) {
            self.max_borrow_limit = stored.max_borrow_limit;
            self.borrowed = stored.borrowed;
        }
    }
}

/// Render a directory result the way the admin screens print it.
fn outcome(result: Result<String, LendingError>) -> String {
    match result {
        Ok(text) => format!("OK: {text}"),
        Err(err) => format!("FAILED: {err}"),
    }
}

impl Admin {
    pub fn add_publication(&self, directory: &mut Directory, publication: Publication) -> String {
        let title = publication.title().to_string();
        outcome(
            directory
                .add_publication(self, publication)
                .map(|()| format!("{} added \"{title}\"", self.name())),
        )
    }

    pub fn remove_publication(&self, directory: &mut Directory, title: &str) -> String {
        outcome(
            directory
                .remove_publication(self, title)
                .map(|_| format!("{} removed \"{title}\"", self.name())),
        )
    }

    pub fn register_reader(&self, directory: &mut Directory, reader: Reader) -> String {
        let name = reader.name().to_string();
        outcome(
            directory
                .add_reader(self, reader)
                .map(|()| format!("{} registered reader {name}", self.name())),
        )
    }

    pub fn register_admin(&self, directory: &mut Directory, new_admin: Admin) -> String {
        let name = new_admin.name().to_string();
        outcome(
            directory
                .add_admin(self, new_admin)
                .map(|()| format!("{} added admin {name}", self.name())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn stocked() -> (Directory, Admin) {
        let mut directory = Directory::new("Test Library");
        let admin = directory.super_admin();
        for title in ["T1", "T2", "T3", "T4"] {
            directory
                .add_publication(&admin, Publication::book(title, "A", "I", "C"))
                .unwrap();
        }
        (directory, admin)
    }

    #[test]
    fn quota_blocks_without_touching_state() {
        let (mut directory, _) = stocked();
        let mut reader = Reader::new("Alice", "r1", "pw").with_limit(1);
        reader.request_borrow_at(&mut directory, "T1", None, noon()).unwrap();

        let err = reader
            .request_borrow_at(&mut directory, "T2", None, noon())
            .unwrap_err();

        assert_eq!(err, LendingError::QuotaExceeded { limit: 1 });
        assert_eq!(reader.borrowed_items(), vec!["T1".to_string()]);
        assert!(!directory.find_publication("T2").unwrap().is_borrowed());
    }

    #[test]
    fn unknown_title_is_not_found() {
        let (mut directory, _) = stocked();
        let mut reader = Reader::new("Alice", "r1", "pw");
        assert_eq!(
            reader.request_borrow(&mut directory, "Nope", None),
            Err(LendingError::PublicationNotFound("Nope".into()))
        );
    }

    #[test]
    fn failed_borrow_leaves_reader_list_alone() {
        let (mut directory, _) = stocked();
        let mut alice = Reader::new("Alice", "r1", "pw");
        let mut bob = Reader::new("Bob", "r2", "pw");
        alice.request_borrow_at(&mut directory, "T1", None, noon()).unwrap();

        assert!(bob.request_borrow_at(&mut directory, "T1", None, noon()).is_err());
        assert!(bob.borrowed_items().is_empty());
    }

    #[test]
    fn return_requires_own_loan() {
        let (mut directory, _) = stocked();
        let mut reader = Reader::new("Alice", "r1", "pw");
        assert_eq!(
            reader.request_return(&mut directory, "T1"),
            Err(LendingError::NotBorrowed("T1".into()))
        );
    }

    #[test]
    fn late_return_reports_overdue_days() {
        let (mut directory, _) = stocked();
        let mut reader = Reader::new("Alice", "r1", "pw");
        reader.request_borrow_at(&mut directory, "T1", Some(2), noon()).unwrap();

        let message = reader
            .request_return_at(&mut directory, "T1", noon() + TimeDelta::days(5))
            .unwrap();

        assert!(message.contains("3 days overdue"));
        assert!(reader.borrowed_items().is_empty());
    }

    #[test]
    fn mismatch_is_reported_distinctly() {
        let (mut directory, admin) = stocked();
        let mut reader = Reader::new("Alice", "r1", "pw");
        reader.request_borrow_at(&mut directory, "T1", None, noon()).unwrap();
        directory.remove_publication(&admin, "T1").unwrap();

        let err = reader.request_return(&mut directory, "T1").unwrap_err();
        assert!(err.is_internal());
        assert_eq!(reader.borrowed_items(), vec!["T1".to_string()]);
    }

    #[test]
    fn registered_reader_shares_quota_with_directory_record() {
        let (mut directory, _) = stocked();
        directory
            .enroll_reader(Reader::new("Alice", "r1", "pw").with_limit(1))
            .unwrap();
        directory.lend_at("r1", "T1", None, noon()).unwrap();

        let mut copy = Reader::new("Alice", "r1", "pw").with_limit(3);
        assert_eq!(
            copy.request_borrow_at(&mut directory, "T2", None, noon()),
            Err(LendingError::QuotaExceeded { limit: 1 })
        );
        assert!(!directory.find_publication("T2").unwrap().is_borrowed());
        assert_eq!(copy.borrowed_items(), vec!["T1".to_string()]);
        assert_eq!(copy.remaining_quota(), 0);

        copy.request_return_at(&mut directory, "T1", noon()).unwrap();
        assert!(directory.find_reader("r1").unwrap().borrowed_items().is_empty());

        copy.request_borrow_at(&mut directory, "T2", None, noon()).unwrap();
        assert_eq!(directory.loans_of("r1").len(), 1);
        directory.take_back_at("r1", "T2", noon()).unwrap();
        assert!(!directory.find_publication("T2").unwrap().is_borrowed());
    }

    #[test]
    fn admin_messages_describe_outcome() {
        let (mut directory, admin) = stocked();
        let message = admin.add_publication(&mut directory, Publication::book("T9", "A", "I", "C"));
        assert!(message.starts_with("OK"));
        assert!(message.contains("T9"));

        let message = admin.add_publication(&mut directory, Publication::book("T9", "A", "I", "C"));
        assert!(message.starts_with("FAILED"));

        let outsider = Admin::new("Outsider", "x1", "pw");
        let message = outsider.remove_publication(&mut directory, "T9");
        assert!(message.contains(&LendingError::PermissionDenied.to_string()));
    }
}
