//! Command-line front end for the household budget engine.
//!
//! The binary in `main.rs` is a thin wrapper: it reads the configuration,
//! installs logging and hands the parsed command to [`commands::execute`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod report;
pub mod utils;

pub use cli::{Cli, Command};
pub use commands::{Session, execute};
pub use config::AppConfig;
