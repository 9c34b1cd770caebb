//! # Dearly CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/` and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/dearly/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Selection + dispatch onto the collection (commands.rs)   │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collection (crates/dearlyapp/src/collection/)              │
//! │  - Browsing state, write-through mutations                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store + Images (crates/dearlyapp/src/{store,images}/)      │
//! │  - SQLite records, JPEG faces on disk                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI layer is UI agnostic. The CLI owns argument parsing,
//! logging setup, error reporting and every byte written to the terminal.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
