//! Domain failures surfaced to readers and admins.
//!
//! Every variant renders as the message shown to the user, so callers that
//! only need text can simply `to_string()` the error.

use chrono::{DateTime, Local};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendingError {
    #[error("Permission denied.")]
    PermissionDenied,

    #[error("Permission denied: only the super admin can add admins.")]
    SuperAdminRequired,

    #[error("A publication titled \"{0}\" already exists.")]
    DuplicateTitle(String),

    #[error("Reader ID {0} is already registered.")]
    DuplicateReaderId(String),

    #[error("Admin ID {0} already exists.")]
    DuplicateAdminId(String),

    #[error("The library has no publication titled \"{0}\".")]
    PublicationNotFound(String),

    #[error("No reader with ID {0}.")]
    ReaderNotFound(String),

    #[error("Already borrowed by {borrower}, expected back {}.", .due.format("%Y-%m-%d"))]
    AlreadyBorrowed {
        borrower: String,
        due: DateTime<Local>,
    },

    #[error("Loan period must be greater than 0 days (got {0}).")]
    InvalidDuration(i64),

    #[error("Borrow limit reached ({limit} items); return something first.")]
    QuotaExceeded { limit: usize },

    #[error("\"{0}\" is not on your borrowed list.")]
    NotBorrowed(String),

    #[error("\"{0}\" is a book, not a magazine.")]
    NotAMagazine(String),

    /// The reader's list and the publication disagree about a loan. This
    /// signals a bookkeeping bug rather than a user mistake.
    #[error("Loan records for \"{0}\" are inconsistent; please contact an administrator.")]
    LoanStateMismatch(String),
}

impl LendingError {
    /// True for the inconsistency variant that points at a bug.
    pub fn is_internal(&self) -> bool {
        matches!(self, LendingError::LoanStateMismatch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn already_borrowed_names_borrower_and_date() {
        let due = Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let err = LendingError::AlreadyBorrowed {
            borrower: "Alice".into(),
            due,
        };
        let text = err.to_string();
        assert!(text.contains("Alice"));
        assert!(text.contains("2024-03-09"));
    }

    #[test]
    fn super_admin_message_is_distinct() {
        assert_ne!(
            LendingError::PermissionDenied.to_string(),
            LendingError::SuperAdminRequired.to_string()
        );
    }

    #[test]
    fn only_mismatch_is_internal() {
        assert!(LendingError::LoanStateMismatch("T".into()).is_internal());
        assert!(!LendingError::NotBorrowed("T".into()).is_internal());
        assert!(!LendingError::QuotaExceeded { limit: 3 }.is_internal());
    }
}
