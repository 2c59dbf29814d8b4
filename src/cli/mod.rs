//! Command-line shell over the journal library.
mod app;
mod main;

pub use app::App;
pub use main::Cli;
