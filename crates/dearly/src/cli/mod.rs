//! # CLI Behavior
//!
//! This is one possible client for dearly. A desktop or mobile front end would
//! drive the same [`dearlyapp::collection::CardCollection`].
//!
//! ## Selectors
//!
//! Commands that act on cards take selectors: a 1-based index into the
//! newest-first listing (`dearly list` with no options), a range (`2-4`) or a
//! full card UUID.
//!
//! ## Bulk Actions
//!
//! `favorite`, `unfavorite` and `delete` accept many selectors. They run through
//! the collection's selection mode exactly like a multi-select in a GUI: enter
//! selection, toggle each card, apply the action.
//!
//! ## Logging
//!
//! Library logs go to stderr through `tracing-subscriber`. The filter comes from
//! `DEARLY_LOG` (e.g. `DEARLY_LOG=dearlyapp=debug`), defaulting to `warn`, or
//! `debug` with `--verbose`.

mod commands;
mod render;
mod setup;

use anyhow::Result;
use clap::Parser;
use dearlyapp::init::initialize;
use setup::Cli;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = initialize(cli.root.clone())?;
    commands::dispatch(cli.command, ctx)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("DEARLY_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
