//! Terminal front end: rendering, the interactive client loop and setup.

pub mod chart;
pub mod interactive;
pub mod setup;
pub mod terminal;
pub mod ui;

pub use terminal::TerminalView;
