//! # CLI Layer
//!
//! One UI client for rmdify. This is the only code that:
//! - Parses arguments
//! - Writes to stdout/stderr and picks exit codes
//! - Installs the log subscriber
//! - Prompts the user
//!
//! ## Structure
//!
//! - [`setup`]: clap definitions
//! - [`commands`]: `run()`, context setup and one `handle_*` per command
//! - [`print`]: turning `CmdResult`s into terminal output

mod commands;
mod print;
mod setup;

pub use commands::run;
