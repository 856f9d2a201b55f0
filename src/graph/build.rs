//! Graph construction: the ambient collaborator that builds a concrete
//! [`super::CodeGraph`] and reports readiness on a graph-ready status record.
//!
//! Building a real external code-graph database is out of scope (§ Non-goals).
//! This stands in a deterministic, dependency-free substitute: within each
//! scanned file, consecutive non-blank source lines become adjacent nodes.
//! That is enough to connect a source to a sink within the same function-sized
//! window and to exercise the full Path Search contract end to end.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::CodeGraph;

/// Status of the graph-ready channel (§6): mirrors the external graph
/// builder's `{status, database_path?, error?, repo}` contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphReadyStatus {
    Success {
        database_path: String,
        repo: String,
    },
    #[allow(dead_code)]
    Error {
        error: String,
        repo: String,
    },
}

/// Fatal initialization error (§4.8, §7): the graph backend never becomes
/// ready and the engine cannot run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("graph backend for '{repo}' never became ready: {reason}")]
    GraphNotReady { repo: String, reason: String },
}

/// Build a [`CodeGraph`] from the given files, all resolved relative to
/// `repo_root`. Returns the graph and a readiness status record.
pub fn build_graph(
    repo_root: &Path,
    files: &[PathBuf],
) -> Result<(CodeGraph, GraphReadyStatus), EngineError> {
    let repo = repo_root.display().to_string();
    if !repo_root.is_dir() {
        return Err(EngineError::GraphNotReady {
            repo,
            reason: "repository path is not a readable directory".to_string(),
        });
    }
    let mut builder = CodeGraph::builder();

    for path in files {
        let rel = path
            .strip_prefix(repo_root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(file = %rel, error = %e, "graph builder: skipping unreadable file");
                continue;
            }
        };

        let mut prev: Option<super::NodeId> = None;
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = (idx + 1) as u32;
            let node = builder.node(&rel, line_no);
            if let Some(p) = prev {
                builder.edge(p, node);
            }
            prev = Some(node);
        }
    }

    let graph = builder.build();
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph builder: finished"
    );

    Ok((
        graph,
        GraphReadyStatus::Success {
            database_path: "in-memory".to_string(),
            repo,
        },
    ))
}
