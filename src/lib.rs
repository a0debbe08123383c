// reposcout: search GitHub repositories from the terminal.
// Library root shared by the binary and the integration tests.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::{Cli, Config};
pub use error::{Result, ScoutError};
