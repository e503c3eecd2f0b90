//! Domain models for the lending desk: the lendable publications and the two
//! kinds of people who touch them. These types keep their state private and
//! only change it through the messages defined on them (or in
//! [`crate::lending`]), so the loan bookkeeping cannot be edited from outside.

use std::fmt;

use chrono::{DateTime, Local, TimeDelta};

use crate::error::LendingError;

/// Loan period for every book.
pub const BOOK_LOAN_DAYS: i64 = 14;
/// Loan period for the current issue of a magazine.
pub const LATEST_MAGAZINE_LOAN_DAYS: i64 = 7;
/// Loan period for archived magazine issues.
pub const ARCHIVED_MAGAZINE_LOAN_DAYS: i64 = 14;
/// How many items a reader may hold at once unless configured otherwise.
pub const DEFAULT_BORROW_LIMIT: usize = 3;

/// Type-specific data for a publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationKind {
    Book {
        author: String,
        isbn: String,
        category: String,
    },
    Magazine {
        issue: String,
        publisher: String,
        is_latest: bool,
    },
}

/// An active loan. Having one at all is what makes a publication "borrowed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub borrower_id: String,
    pub borrower_name: String,
    pub due: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    title: String,
    kind: PublicationKind,
    loan: Option<Loan>,
}

impl Publication {
    pub fn book(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind: PublicationKind::Book {
                author: author.into(),
                isbn: isbn.into(),
                category: category.into(),
            },
            loan: None,
        }
    }

    /// New magazines start out archived; call [`Publication::mark_as_latest`]
    /// for the current issue.
    pub fn magazine(
        title: impl Into<String>,
        issue: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind: PublicationKind::Magazine {
                issue: issue.into(),
                publisher: publisher.into(),
                is_latest: false,
            },
            loan: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> &PublicationKind {
        &self.kind
    }

    pub fn is_magazine(&self) -> bool {
        matches!(self.kind, PublicationKind::Magazine { .. })
    }

    pub fn is_borrowed(&self) -> bool {
        self.loan.is_some()
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    /// ID of the reader currently holding this item.
    pub fn borrower(&self) -> Option<&str> {
        self.loan.as_ref().map(|loan| loan.borrower_id.as_str())
    }

    pub fn due_date(&self) -> Option<DateTime<Local>> {
        self.loan.as_ref().map(|loan| loan.due)
    }

    /// Number of days a reader may keep this publication.
    pub fn max_loan_days(&self) -> i64 {
        match self.kind {
            PublicationKind::Book { .. } => BOOK_LOAN_DAYS,
            PublicationKind::Magazine { is_latest: true, .. } => LATEST_MAGAZINE_LOAN_DAYS,
            PublicationKind::Magazine {
                is_latest: false, ..
            } => ARCHIVED_MAGAZINE_LOAN_DAYS,
        }
    }

    /// Human-readable summary including the type-specific fields and the
    /// current availability.
    pub fn describe(&self) -> String {
        let details = match &self.kind {
            PublicationKind::Book {
                author, category, ..
            } => format!("\"{}\" - author: {author}, category: {category}", self.title),
            PublicationKind::Magazine {
                issue,
                publisher,
                is_latest,
            } => {
                let status = if *is_latest { "latest issue" } else { "archived" };
                format!(
                    "\"{}\" - issue: {issue}, publisher: {publisher} ({status})",
                    self.title
                )
            }
        };
        match &self.loan {
            Some(loan) => format!(
                "{details} [on loan to {} until {}]",
                loan.borrower_name,
                loan.due.format("%Y-%m-%d")
            ),
            None => format!("{details} [available]"),
        }
    }

    /// No-op for books.
    pub fn mark_as_latest(&mut self) {
        if let PublicationKind::Magazine { is_latest, .. } = &mut self.kind {
            *is_latest = true;
        }
    }

    /// No-op for books.
    pub fn mark_as_archive(&mut self) {
        if let PublicationKind::Magazine { is_latest, .. } = &mut self.kind {
            *is_latest = false;
        }
    }

    /// Handle a borrow request from `reader`. When `days` is `None` the
    /// publication's own loan period applies. On failure nothing changes.
    pub fn receive_borrow(
        &mut self,
        reader: &Reader,
        days: Option<i64>,
        now: DateTime<Local>,
    ) -> Result<String, LendingError> {
        if let Some(loan) = &self.loan {
            return Err(LendingError::AlreadyBorrowed {
                borrower: loan.borrower_name.clone(),
                due: loan.due,
            });
        }

        let days = days.unwrap_or_else(|| self.max_loan_days());
        if days <= 0 {
            return Err(LendingError::InvalidDuration(days));
        }
        let due = TimeDelta::try_days(days)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or(LendingError::InvalidDuration(days))?;

        self.loan = Some(Loan {
            borrower_id: reader.reader_id().to_string(),
            borrower_name: reader.name().to_string(),
            due,
        });
        Ok(format!(
            "Borrowed \"{}\", please return by {}.",
            self.title,
            due.format("%Y-%m-%d")
        ))
    }

    /// Clear the loan. Returns `false` when there was nothing to return.
    pub fn receive_return(&mut self) -> bool {
        self.loan.take().is_some()
    }

    pub(crate) fn restore_loan(&mut self, loan: Loan) {
        self.loan = Some(loan);
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A library member. The borrowed list holds titles, which are the keys of
/// the directory's publication collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reader {
    name: String,
    reader_id: String,
    password: String,
    pub(crate) max_borrow_limit: usize,
    pub(crate) borrowed: Vec<String>,
}

impl Reader {
    pub fn new(
        name: impl Into<String>,
        reader_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reader_id: reader_id.into(),
            password: password.into(),
            max_borrow_limit: DEFAULT_BORROW_LIMIT,
            borrowed: Vec::new(),
        }
    }

    pub fn with_limit(mut self, max_borrow_limit: usize) -> Self {
        self.max_borrow_limit = max_borrow_limit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reader_id(&self) -> &str {
        &self.reader_id
    }

    pub fn max_borrow_limit(&self) -> usize {
        self.max_borrow_limit
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn check_password(&self, password: &str) -> bool {
        self.password == password
    }

    /// Snapshot of the titles currently on loan to this reader.
    pub fn borrowed_items(&self) -> Vec<String> {
        self.borrowed.clone()
    }

    pub fn has_borrowed(&self, title: &str) -> bool {
        self.borrowed.iter().any(|t| t == title)
    }

    pub fn remaining_quota(&self) -> usize {
        self.max_borrow_limit.saturating_sub(self.borrowed.len())
    }
}

/// An administrator identity. Operations that need the directory take it
/// explicitly (see [`crate::lending`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    name: String,
    admin_id: String,
    password: String,
}

impl Admin {
    pub fn new(
        name: impl Into<String>,
        admin_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            admin_id: admin_id.into(),
            password: password.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn check_password(&self, password: &str) -> bool {
        self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn loan_fields_agree(publication: &Publication) -> bool {
        publication.is_borrowed() == publication.borrower().is_some()
            && publication.is_borrowed() == publication.due_date().is_some()
    }

    #[test]
    fn loan_periods_follow_kind() {
        let book = Publication::book("T1", "A1", "ISBN1", "Tech");
        assert_eq!(book.max_loan_days(), 14);

        let mut magazine = Publication::magazine("M1", "2024-05", "Press");
        assert_eq!(magazine.max_loan_days(), 14);
        magazine.mark_as_latest();
        assert_eq!(magazine.max_loan_days(), 7);
        magazine.mark_as_archive();
        assert_eq!(magazine.max_loan_days(), 14);
    }

    #[test]
    fn borrow_sets_due_date_from_days() {
        let reader = Reader::new("Alice", "r1", "pw");
        let mut book = Publication::book("T1", "A1", "ISBN1", "Tech");

        let message = book.receive_borrow(&reader, Some(10), noon()).unwrap();

        let due = noon() + TimeDelta::days(10);
        assert_eq!(book.due_date(), Some(due));
        assert_eq!(book.borrower(), Some("r1"));
        assert!(message.contains(&due.format("%Y-%m-%d").to_string()));
        assert!(loan_fields_agree(&book));
    }

    #[test]
    fn borrow_defaults_to_loan_period() {
        let reader = Reader::new("Alice", "r1", "pw");
        let mut magazine = Publication::magazine("M1", "2024-05", "Press");
        magazine.mark_as_latest();

        magazine.receive_borrow(&reader, None, noon()).unwrap();

        assert_eq!(magazine.due_date(), Some(noon() + TimeDelta::days(7)));
    }

    #[test]
    fn second_borrow_keeps_first_loan() {
        let alice = Reader::new("Alice", "r1", "pw");
        let bob = Reader::new("Bob", "r2", "pw");
        let mut book = Publication::book("T1", "A1", "ISBN1", "Tech");
        book.receive_borrow(&alice, Some(5), noon()).unwrap();
        let before = book.clone();

        let err = book
            .receive_borrow(&bob, Some(9), noon() + TimeDelta::days(1))
            .unwrap_err();

        assert!(matches!(err, LendingError::AlreadyBorrowed { ref borrower, .. } if borrower == "Alice"));
        assert!(err.to_string().contains("Alice"));
        assert_eq!(book, before);
    }

    #[test]
    fn non_positive_days_are_rejected() {
        let reader = Reader::new("Alice", "r1", "pw");
        let mut book = Publication::book("T1", "A1", "ISBN1", "Tech");

        assert_eq!(
            book.receive_borrow(&reader, Some(0), noon()),
            Err(LendingError::InvalidDuration(0))
        );
        assert_eq!(
            book.receive_borrow(&reader, Some(-3), noon()),
            Err(LendingError::InvalidDuration(-3))
        );
        assert_eq!(
            book.receive_borrow(&reader, Some(i64::MAX), noon()),
            Err(LendingError::InvalidDuration(i64::MAX))
        );
        assert!(!book.is_borrowed());
        assert!(loan_fields_agree(&book));
    }

    #[test]
    fn return_clears_loan_once() {
        let reader = Reader::new("Alice", "r1", "pw");
        let mut book = Publication::book("T1", "A1", "ISBN1", "Tech");
        assert!(!book.receive_return());

        book.receive_borrow(&reader, None, noon()).unwrap();
        assert!(book.receive_return());
        assert!(!book.is_borrowed());
        assert!(loan_fields_agree(&book));
        assert!(!book.receive_return());
    }

    #[test]
    fn describe_mentions_type_fields() {
        let book = Publication::book("T1", "A1", "ISBN1", "Tech");
        let text = book.describe();
        assert!(text.contains("A1"));
        assert!(text.contains("Tech"));
        assert!(text.contains("available"));

        let mut magazine = Publication::magazine("M1", "2024-05", "Press");
        magazine.mark_as_latest();
        let text = magazine.describe();
        assert!(text.contains("2024-05"));
        assert!(text.contains("latest issue"));
    }

    #[test]
    fn quota_counts_down() {
        let mut reader = Reader::new("Alice", "r1", "pw").with_limit(2);
        assert_eq!(reader.remaining_quota(), 2);
        reader.borrowed.push("T1".into());
        assert_eq!(reader.remaining_quota(), 1);
        assert_eq!(reader.borrowed_items(), vec!["T1".to_string()]);
    }
}
