//! Ratatui front end: a welcome screen with login and registration, plus one
//! dashboard per role.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
