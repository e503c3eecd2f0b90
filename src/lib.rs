//! Core library surface for the library lending desk.
//!
//! The domain (publications, readers, admins and the directory that owns
//! them) lives in plain modules with no I/O; persistence, logging and the two
//! front ends sit on top so the `bin` target and the tests reuse the same
//! pieces.
pub mod demo;
pub mod directory;
pub mod error;
pub mod lending;
pub mod logger;
pub mod models;
pub mod service;
pub mod store;
pub mod ui;

pub use directory::{Directory, OverdueLoan};
pub use error::LendingError;
pub use models::{Admin, Loan, Publication, PublicationKind, Reader};

/// Persistence and application state used by `main.rs`.
pub use service::LendingService;
pub use store::JsonStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
