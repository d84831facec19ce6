//! # Rmdify Architecture
//!
//! Rmdify is a Markdown document editor built as a **library with a CLI
//! client**. Documents live in a local key/value store laid out like browser
//! local storage; the terminal client lists, edits, previews, stars, deletes
//! and exports them.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The only place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands and editor sessions            │
//! │  - Normalizes inputs (selectors → ids, config defaults)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs), editor.rs, export/          │
//! │  - Business logic on plain Rust types                       │
//! │  - Time is passed in; nothing prints                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore trait, LocalStore over a KvBackend         │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never calls
//! `std::process::exit`. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Testing
//!
//! Commands carry most of the unit tests and run against
//! `LocalStore<MemBackend>`. Filesystem pieces use `tempfile`. The binary is
//! covered end to end in `tests/` with `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`editor`]: Editing session with autosave, external editor round trip
//! - [`export`]: Markdown, text, HTML and PDF artifacts
//! - [`store`]: Storage traits and implementations
//! - [`model`]: `Document` and `DocumentId`
//! - [`index`]: 1-based display indexes and selectors
//! - [`router`]: Named pages (`/`, `/app`, `/mapp`, `/mobile`)
//! - [`preview`]: Terminal rendering of Markdown
//! - [`debounce`]: Autosave timer
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod export;
pub mod index;
pub mod model;
pub mod preview;
pub mod router;
pub mod store;
