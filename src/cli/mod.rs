//! CLI surface (§4.7, §6): a single required positional argument (repository
//! path) plus flags for caps, workers, verbosity and output format.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use tracing::info;

use crate::config::EngineConfig;
use crate::detectors::{self, SourceFiles};
use crate::engine::{DepthFirstSearch, Orchestrator, SearchCaps};
use crate::graph::{self, GraphHandle, GraphReadyStatus};
use crate::reporters::{self, OutputFormat};

/// Streaming taint-path discovery over a code graph.
#[derive(Parser, Debug)]
#[command(name = "taintstream")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the repository to scan
    pub path: PathBuf,

    /// Build command for the external graph backend (accepted for interface
    /// completeness; the in-memory graph builder ignores it)
    #[arg(long)]
    pub build_command: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Maximum simple paths to enumerate per source/sink pair
    #[arg(long, default_value_t = EngineConfig::default().caps.path_cap)]
    pub path_cap: usize,

    /// Maximum traversal depth per search
    #[arg(long, default_value_t = EngineConfig::default().caps.depth_cap)]
    pub depth_cap: usize,

    /// Number of concurrent path-search workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Output format: text or json
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

/// Translate `-v` counts into an `EnvFilter` directive, deferring to
/// `RUST_LOG` when set (teacher convention: explicit flag, env override).
pub fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Run the CLI end to end: validate the repository path, build the graph,
/// wire detectors through the orchestrator, and render findings as they
/// arrive.
pub fn run(cli: Cli) -> Result<()> {
    if !cli.path.is_dir() {
        bail!("'{}' is not a directory", cli.path.display());
    }

    let format: OutputFormat = cli.format.parse()?;
    let workers = cli.workers.unwrap_or_else(|| EngineConfig::default().workers);
    let caps = SearchCaps {
        path_cap: cli.path_cap,
        depth_cap: cli.depth_cap,
    };

    let files = detectors::collect_files(&cli.path);
    info!(files = files.len(), repo = %cli.path.display(), "scanning repository");

    let (code_graph, status) = graph::build_graph(&cli.path, &files)?;
    match &status {
        GraphReadyStatus::Error { error, .. } => {
            bail!("graph builder failed: {}", error);
        }
        GraphReadyStatus::Success { database_path, .. } => {
            info!(database_path = %database_path, "graph ready");
        }
    }

    let provider: Arc<dyn detectors::FileProvider> =
        Arc::new(SourceFiles::new(files, cli.path.clone()));
    let graph: Arc<dyn GraphHandle> = Arc::new(code_graph);

    let (source_tx, source_rx) = bounded(1024);
    let (sink_tx, sink_rx) = bounded(1024);
    let (sanitizer_tx, sanitizer_rx) = bounded(1024);
    let (path_tx, path_rx) = bounded(256);

    let detector_handles =
        detectors::spawn_detector_threads(provider, source_tx, sink_tx, sanitizer_tx);

    let orchestrator = Arc::new(Orchestrator::new(graph, Arc::new(DepthFirstSearch), caps));
    let orchestrator_handle = {
        let orchestrator = Arc::clone(&orchestrator);
        std::thread::spawn(move || {
            orchestrator.start(source_rx, sink_rx, sanitizer_rx, path_tx, workers);
        })
    };

    let mut findings_emitted = 0usize;
    for finding in path_rx {
        println!("{}", reporters::render(&finding, format));
        findings_emitted += 1;
    }

    for handle in detector_handles {
        let _ = handle.join();
    }
    let _ = orchestrator_handle.join();

    info!(findings = findings_emitted, "done");
    Ok(())
}
