//! The directory owns every publication, reader and admin and is the only
//! place where those collections change. Queries hand out clones so callers
//! cannot edit directory state behind its back.

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::error::LendingError;
use crate::lending::{checkin, checkout};
use crate::models::{Admin, Loan, Publication, Reader};

/// Display name of the super admin created with every directory.
pub const DEFAULT_SUPER_ADMIN_NAME: &str = "System Administrator";
pub const DEFAULT_SUPER_ADMIN_ID: &str = "admin";
pub const DEFAULT_SUPER_ADMIN_PASSWORD: &str = "admin123";

/// A loan whose due date has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueLoan {
    pub title: String,
    pub borrower_id: String,
    pub borrower_name: String,
    pub due: DateTime<Local>,
    pub days_overdue: i64,
}

#[derive(Debug, Clone)]
pub struct Directory {
    name: String,
    publications: Vec<Publication>,
    readers: Vec<Reader>,
    admins: Vec<Admin>,
    super_admin_id: String,
}

impl Directory {
    /// Create a directory with the built-in super admin.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_super_admin(
            name,
            Admin::new(
                DEFAULT_SUPER_ADMIN_NAME,
                DEFAULT_SUPER_ADMIN_ID,
                DEFAULT_SUPER_ADMIN_PASSWORD,
            ),
        )
    }

    /// Create a directory whose first admin, and therefore super admin, is
    /// `super_admin`.
    pub fn with_super_admin(name: impl Into<String>, super_admin: Admin) -> Self {
        Self {
            name: name.into(),
            publications: Vec::new(),
            readers: Vec::new(),
            super_admin_id: super_admin.admin_id().to_string(),
            admins: vec![super_admin],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first admin, created together with the directory. Admins are never
    /// removed, so it is always at the front.
    pub fn super_admin(&self) -> Admin {
        self.admins[0].clone()
    }

    /// Matches on the admin ID alone; admin IDs are unique, which
    /// `add_admin` enforces.
    pub fn is_super_admin(&self, admin: &Admin) -> bool {
        admin.admin_id() == self.super_admin_id
    }

    fn check_permission(&self, admin: &Admin) -> Result<(), LendingError> {
        if self.admins.contains(admin) {
            Ok(())
        } else {
            warn!(admin = admin.admin_id(), "rejected request from non-admin");
            Err(LendingError::PermissionDenied)
        }
    }

    pub fn add_publication(
        &mut self,
        admin: &Admin,
        publication: Publication,
    ) -> Result<(), LendingError> {
        self.check_permission(admin)?;
        if self.publications.iter().any(|p| p.title() == publication.title()) {
            return Err(LendingError::DuplicateTitle(publication.title().to_string()));
        }
        info!(admin = admin.admin_id(), title = publication.title(), "publication added");
        self.publications.push(publication);
        Ok(())
    }

    /// Remove a publication. If it was on loan to a registered reader, the
    /// title also leaves that reader's list.
    pub fn remove_publication(
        &mut self,
        admin: &Admin,
        title: &str,
    ) -> Result<Publication, LendingError> {
        self.check_permission(admin)?;
        let index = self
            .publications
            .iter()
            .position(|p| p.title() == title)
            .ok_or_else(|| LendingError::PublicationNotFound(title.to_string()))?;
        let removed = self.publications.remove(index);

        if let Some(borrower_id) = removed.borrower() {
            if let Some(reader) = self.readers.iter_mut().find(|r| r.reader_id() == borrower_id) {
                reader.borrowed.retain(|t| t != title);
            }
            warn!(title, borrower = borrower_id, "removed a publication that was on loan");
        }
        info!(admin = admin.admin_id(), title, "publication removed");
        Ok(removed)
    }

    pub fn add_reader(&mut self, admin: &Admin, reader: Reader) -> Result<(), LendingError> {
        self.check_permission(admin)?;
        self.insert_reader(reader)
    }

    /// Self-service registration; only the ID uniqueness rule applies.
    pub fn enroll_reader(&mut self, reader: Reader) -> Result<(), LendingError> {
        self.insert_reader(reader)
    }

    fn insert_reader(&mut self, reader: Reader) -> Result<(), LendingError> {
        if self.readers.iter().any(|r| r.reader_id() == reader.reader_id()) {
            return Err(LendingError::DuplicateReaderId(reader.reader_id().to_string()));
        }
        info!(reader = reader.reader_id(), "reader registered");
        self.readers.push(reader);
        Ok(())
    }

    /// Only the super admin may add admins; being an admin is not enough.
    pub fn add_admin(&mut self, requesting: &Admin, new_admin: Admin) -> Result<(), LendingError> {
        if !self.is_super_admin(requesting) {
            warn!(admin = requesting.admin_id(), "non-super admin tried to add an admin");
            return Err(LendingError::SuperAdminRequired);
        }
        if self.admins.iter().any(|a| a.admin_id() == new_admin.admin_id()) {
            return Err(LendingError::DuplicateAdminId(new_admin.admin_id().to_string()));
        }
        info!(admin = new_admin.admin_id(), "admin added");
        self.admins.push(new_admin);
        Ok(())
    }

    /// Switch a magazine between latest issue and archive.
    pub fn set_magazine_latest(
        &mut self,
        admin: &Admin,
        title: &str,
        latest: bool,
    ) -> Result<(), LendingError> {
        self.check_permission(admin)?;
        let publication = self
            .publications
            .iter_mut()
            .find(|p| p.title() == title)
            .ok_or_else(|| LendingError::PublicationNotFound(title.to_string()))?;
        if !publication.is_magazine() {
            return Err(LendingError::NotAMagazine(title.to_string()));
        }
        if latest {
            publication.mark_as_latest();
        } else {
            publication.mark_as_archive();
        }
        info!(title, latest, "magazine status changed");
        Ok(())
    }

    pub fn find_publication(&self, title: &str) -> Option<Publication> {
        self.publications.iter().find(|p| p.title() == title).cloned()
    }

    pub fn list_available(&self) -> Vec<Publication> {
        self.publications
            .iter()
            .filter(|p| !p.is_borrowed())
            .cloned()
            .collect()
    }

    pub fn is_registered(&self, reader_id: &str) -> bool {
        self.readers.iter().any(|r| r.reader_id() == reader_id)
    }

    pub fn find_reader(&self, reader_id: &str) -> Option<Reader> {
        self.readers.iter().find(|r| r.reader_id() == reader_id).cloned()
    }

    pub fn publications(&self) -> Vec<Publication> {
        self.publications.clone()
    }

    pub fn readers(&self) -> Vec<Reader> {
        self.readers.clone()
    }

    pub fn admins(&self) -> Vec<Admin> {
        self.admins.clone()
    }

    /// Publications currently lent to `reader_id`, in borrow order.
    pub fn loans_of(&self, reader_id: &str) -> Vec<Publication> {
        let Some(reader) = self.readers.iter().find(|r| r.reader_id() == reader_id) else {
            return Vec::new();
        };
        reader
            .borrowed
            .iter()
            .filter_map(|title| self.publications.iter().find(|p| p.title() == title))
            .cloned()
            .collect()
    }

    pub fn authenticate_admin(&self, admin_id: &str, password: &str) -> Option<Admin> {
        self.admins
            .iter()
            .find(|a| a.admin_id() == admin_id && a.check_password(password))
            .cloned()
    }

    pub fn authenticate_reader(&self, reader_id: &str, password: &str) -> Option<Reader> {
        self.readers
            .iter()
            .find(|r| r.reader_id() == reader_id && r.check_password(password))
            .cloned()
    }

    /// Borrow on behalf of a registered reader.
    pub fn lend(
        &mut self,
        reader_id: &str,
        title: &str,
        days: Option<i64>,
    ) -> Result<String, LendingError> {
        self.lend_at(reader_id, title, days, Local::now())
    }

    pub fn lend_at(
        &mut self,
        reader_id: &str,
        title: &str,
        days: Option<i64>,
        now: DateTime<Local>,
    ) -> Result<String, LendingError> {
        let reader = self
            .readers
            .iter_mut()
            .find(|r| r.reader_id() == reader_id)
            .ok_or_else(|| LendingError::ReaderNotFound(reader_id.to_string()))?;
        checkout(reader, &mut self.publications, title, days, now)
    }

    /// Return on behalf of a registered reader.
    pub fn take_back(&mut self, reader_id: &str, title: &str) -> Result<String, LendingError> {
        self.take_back_at(reader_id, title, Local::now())
    }

    pub fn take_back_at(
        &mut self,
        reader_id: &str,
        title: &str,
        now: DateTime<Local>,
    ) -> Result<String, LendingError> {
        let reader = self
            .readers
            .iter_mut()
            .find(|r| r.reader_id() == reader_id)
            .ok_or_else(|| LendingError::ReaderNotFound(reader_id.to_string()))?;
        checkin(reader, &mut self.publications, title, now)
    }

    /// Loans past their due date at `now`, most overdue first. Due dates are
    /// advisory, so this only reports.
    pub fn list_overdue(&self, now: DateTime<Local>) -> Vec<OverdueLoan> {
        let mut overdue: Vec<OverdueLoan> = self
            .publications
            .iter()
            .filter_map(|p| {
                let loan = p.loan()?;
                (loan.due < now).then(|| OverdueLoan {
                    title: p.title().to_string(),
                    borrower_id: loan.borrower_id.clone(),
                    borrower_name: loan.borrower_name.clone(),
                    due: loan.due,
                    days_overdue: (now - loan.due).num_days(),
                })
            })
            .collect();
        overdue.sort_by(|a, b| a.due.cmp(&b.due));
        overdue
    }

    pub(crate) fn publications_mut(&mut self) -> &mut [Publication] {
        &mut self.publications
    }

    /// Reattach a persisted loan. The borrower must be a registered reader
    /// with quota left and the publication must be free; otherwise the loan
    /// is dropped and `false` returned.
    pub(crate) fn restore_loan(&mut self, title: &str, loan: Loan) -> bool {
        let Some(reader) = self
            .readers
            .iter_mut()
            .find(|r| r.reader_id() == loan.borrower_id)
        else {
            return false;
        };
        let Some(publication) = self.publications.iter_mut().find(|p| p.title() == title) else {
            return false;
        };
        if publication.is_borrowed() || reader.remaining_quota() == 0 {
            return false;
        }
        reader.borrowed.push(title.to_string());
        publication.restore_loan(loan);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn library() -> (Directory, Admin) {
        let directory = Directory::new("Test Library");
        let admin = directory.super_admin();
        (directory, admin)
    }

    #[test]
    fn first_admin_is_super_admin() {
        let (directory, admin) = library();
        assert_eq!(admin.admin_id(), DEFAULT_SUPER_ADMIN_ID);
        assert!(directory.is_super_admin(&admin));
        assert_eq!(directory.admins().len(), 1);
    }

    #[test]
    fn duplicate_titles_are_rejected() {
        let (mut directory, admin) = library();
        directory
            .add_publication(&admin, Publication::book("T1", "A1", "ISBN1", "Tech"))
            .unwrap();
        assert_eq!(
            directory.add_publication(&admin, Publication::magazine("T1", "1", "P")),
            Err(LendingError::DuplicateTitle("T1".into()))
        );
        assert_eq!(directory.publications().len(), 1);
    }

    #[test]
    fn non_admins_cannot_mutate() {
        let (mut directory, _) = library();
        let outsider = Admin::new("Outsider", "x1", "pw");
        assert_eq!(
            directory.add_publication(&outsider, Publication::book("T1", "A", "I", "C")),
            Err(LendingError::PermissionDenied)
        );
        assert_eq!(
            directory.remove_publication(&outsider, "T1"),
            Err(LendingError::PermissionDenied)
        );
        assert_eq!(
            directory.add_reader(&outsider, Reader::new("R", "r1", "pw")),
            Err(LendingError::PermissionDenied)
        );
        assert!(directory.publications().is_empty());
        assert!(directory.readers().is_empty());
    }

    #[test]
    fn only_super_admin_adds_admins() {
        let (mut directory, root) = library();
        let helper = Admin::new("Helper", "admin002", "pw");

        directory.add_admin(&root, helper.clone()).unwrap();
        assert_eq!(
            directory.add_admin(&helper, Admin::new("Third", "admin003", "pw")),
            Err(LendingError::SuperAdminRequired)
        );
        assert_eq!(
            directory.add_admin(&root, Admin::new("Clone", "admin002", "pw")),
            Err(LendingError::DuplicateAdminId("admin002".into()))
        );

        // Regular admin rights still apply to the helper.
        directory
            .add_publication(&helper, Publication::book("T1", "A", "I", "C"))
            .unwrap();
        assert_eq!(directory.admins().len(), 2);
    }

    #[test]
    fn reader_ids_are_unique() {
        let (mut directory, admin) = library();
        directory.add_reader(&admin, Reader::new("R", "r1", "pw")).unwrap();
        assert_eq!(
            directory.enroll_reader(Reader::new("Other", "r1", "pw")),
            Err(LendingError::DuplicateReaderId("r1".into()))
        );
        assert_eq!(directory.readers().len(), 1);
    }

    #[test]
    fn remove_missing_title_is_not_found() {
        let (mut directory, admin) = library();
        assert_eq!(
            directory.remove_publication(&admin, "Ghost"),
            Err(LendingError::PublicationNotFound("Ghost".into()))
        );
    }

    #[test]
    fn removing_lent_item_clears_reader_list() {
        let (mut directory, admin) = library();
        directory
            .add_publication(&admin, Publication::book("T1", "A", "I", "C"))
            .unwrap();
        directory.enroll_reader(Reader::new("R", "r1", "pw")).unwrap();
        directory.lend("r1", "T1", None).unwrap();

        directory.remove_publication(&admin, "T1").unwrap();
        assert!(directory.find_reader("r1").unwrap().borrowed_items().is_empty());
    }

    #[test]
    fn snapshots_do_not_leak_mutation() {
        let (mut directory, admin) = library();
        directory
            .add_publication(&admin, Publication::book("T1", "A", "I", "C"))
            .unwrap();

        let mut copy = directory.find_publication("T1").unwrap();
        copy.receive_borrow(&Reader::new("R", "r1", "pw"), None, noon())
            .unwrap();

        assert!(!directory.find_publication("T1").unwrap().is_borrowed());
        assert_eq!(directory.list_available().len(), 1);
    }

    #[test]
    fn lend_and_take_back_registered_reader() {
        let (mut directory, admin) = library();
        directory
            .add_publication(&admin, Publication::book("T1", "A", "I", "C"))
            .unwrap();
        directory.enroll_reader(Reader::new("R", "r1", "pw")).unwrap();

        directory.lend_at("r1", "T1", Some(3), noon()).unwrap();
        assert!(directory.list_available().is_empty());
        assert_eq!(directory.loans_of("r1").len(), 1);

        directory.take_back_at("r1", "T1", noon()).unwrap();
        assert_eq!(directory.list_available().len(), 1);
        assert!(directory.loans_of("r1").is_empty());
        assert_eq!(
            directory.lend("ghost", "T1", None),
            Err(LendingError::ReaderNotFound("ghost".into()))
        );
    }

    #[test]
    fn magazine_flag_toggles_only_magazines() {
        let (mut directory, admin) = library();
        directory
            .add_publication(&admin, Publication::magazine("M1", "2024-05", "P"))
            .unwrap();
        directory
            .add_publication(&admin, Publication::book("B1", "A", "I", "C"))
            .unwrap();

        directory.set_magazine_latest(&admin, "M1", true).unwrap();
        assert_eq!(directory.find_publication("M1").unwrap().max_loan_days(), 7);
        assert_eq!(
            directory.set_magazine_latest(&admin, "B1", true),
            Err(LendingError::NotAMagazine("B1".into()))
        );
    }

    #[test]
    fn overdue_report_orders_by_due_date() {
        let (mut directory, admin) = library();
        for title in ["T1", "T2", "T3"] {
            directory
                .add_publication(&admin, Publication::book(title, "A", "I", "C"))
                .unwrap();
        }
        directory.enroll_reader(Reader::new("R", "r1", "pw")).unwrap();
        directory.lend_at("r1", "T1", Some(5), noon()).unwrap();
        directory.lend_at("r1", "T2", Some(2), noon()).unwrap();
        directory.lend_at("r1", "T3", Some(30), noon()).unwrap();

        let report = directory.list_overdue(noon() + TimeDelta::days(10));
        let titles: Vec<_> = report.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["T2", "T1"]);
        assert_eq!(report[0].days_overdue, 8);
    }

    #[test]
    fn authentication_checks_passwords() {
        let (mut directory, _) = library();
        directory.enroll_reader(Reader::new("R", "r1", "secret")).unwrap();

        assert!(directory.authenticate_reader("r1", "secret").is_some());
        assert!(directory.authenticate_reader("r1", "wrong").is_none());
        assert!(directory
            .authenticate_admin(DEFAULT_SUPER_ADMIN_ID, DEFAULT_SUPER_ADMIN_PASSWORD)
            .is_some());
        assert!(directory.authenticate_admin(DEFAULT_SUPER_ADMIN_ID, "").is_none());
    }
}
