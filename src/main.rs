#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! taintstream - streaming taint-path discovery over a code graph.
//!
//! Scans a repository for sources, sinks, and sanitizers, builds a code
//! graph, and searches it for source-to-sink paths, streaming findings
//! as they are discovered.

mod cli;
mod config;
mod detectors;
mod engine;
mod graph;
mod reporters;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli::log_level(cli.verbosity)));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    cli::run(cli)
}
