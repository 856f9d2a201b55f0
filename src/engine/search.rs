//! Path Search (C): bounded depth-first enumeration of simple paths between
//! a source's node and a sink's node (§4.2).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

use crate::graph::{GraphHandle, NodeId};

use super::record::DetectionRecord;

/// Resource bounds every Path Search instance must honor (§4.2, §5).
#[derive(Debug, Clone, Copy)]
pub struct SearchCaps {
    pub path_cap: usize,
    pub depth_cap: usize,
}

impl Default for SearchCaps {
    fn default() -> Self {
        Self {
            path_cap: 1024,
            depth_cap: 64,
        }
    }
}

/// A discovered simple path from a source's node to a sink's node (§3).
#[derive(Debug, Clone, Serialize)]
pub struct PathFinding {
    pub source: DetectionRecord,
    pub sink: DetectionRecord,
    pub nodes: Vec<NodeId>,
    pub sanitizers_crossed: Vec<NodeId>,
    pub sanitized: bool,
    pub discovered_at_logical_time: u64,
}

/// Everything a Path Search instance needs: the two endpoints, a frozen
/// sanitizer snapshot, the graph, and the cancellation/ordering state it
/// shares with the orchestrator.
pub struct SearchContext {
    pub source: DetectionRecord,
    pub sink: DetectionRecord,
    pub sanitizer_snapshot: Vec<DetectionRecord>,
    pub graph: Arc<dyn GraphHandle>,
    pub cancel: Arc<AtomicBool>,
    pub caps: SearchCaps,
    pub logical_clock: Arc<AtomicU64>,
}

/// A pluggable path-discovery strategy. Depth-first is the only one this
/// crate implements; a future strategy (e.g. shortest-path) participates in
/// the same orchestrator dispatch table by implementing this trait (§9).
pub trait PathSearchStrategy: Send + Sync {
    fn search(&self, ctx: &SearchContext) -> Vec<PathFinding>;
}

/// Enumerates all simple paths from source to sink, bounded by
/// [`SearchCaps`] and responsive to cancellation between neighbor expansions.
pub struct DepthFirstSearch;

impl PathSearchStrategy for DepthFirstSearch {
    fn search(&self, ctx: &SearchContext) -> Vec<PathFinding> {
        let Some(source_node) = ctx.graph.locate(&ctx.source.file, ctx.source.line) else {
            debug!(file = %ctx.source.file, line = ctx.source.line, "source does not locate; skipping search");
            return Vec::new();
        };
        let Some(sink_node) = ctx.graph.locate(&ctx.sink.file, ctx.sink.line) else {
            debug!(file = %ctx.sink.file, line = ctx.sink.line, "sink does not locate; skipping search");
            return Vec::new();
        };

        let sanitizer_nodes: FxHashSet<NodeId> = ctx
            .sanitizer_snapshot
            .iter()
            .filter_map(|s| ctx.graph.locate(&s.file, s.line))
            .collect();

        let mut raw_paths = Vec::new();
        let mut path = vec![source_node];
        let mut visited = FxHashSet::default();
        visited.insert(source_node);

        walk(
            ctx.graph.as_ref(),
            sink_node,
            &mut path,
            &mut visited,
            &ctx.cancel,
            ctx.caps,
            &mut raw_paths,
        );

        raw_paths
            .into_iter()
            .map(|nodes| {
                let sanitizers_crossed: Vec<NodeId> = nodes
                    .iter()
                    .filter(|n| sanitizer_nodes.contains(n))
                    .copied()
                    .collect();
                let sanitized = !sanitizers_crossed.is_empty();
                let discovered_at_logical_time = ctx.logical_clock.fetch_add(1, Ordering::SeqCst);
                PathFinding {
                    source: ctx.source.clone(),
                    sink: ctx.sink.clone(),
                    nodes,
                    sanitizers_crossed,
                    sanitized,
                    discovered_at_logical_time,
                }
            })
            .collect()
    }
}

fn walk(
    graph: &dyn GraphHandle,
    target: NodeId,
    path: &mut Vec<NodeId>,
    visited: &mut FxHashSet<NodeId>,
    cancel: &AtomicBool,
    caps: SearchCaps,
    out: &mut Vec<Vec<NodeId>>,
) {
    if out.len() >= caps.path_cap || cancel.load(Ordering::Relaxed) {
        return;
    }

    let current = *path.last().expect("path is never empty");
    if current == target {
        out.push(path.clone());
        return;
    }
    if path.len() >= caps.depth_cap {
        return;
    }

    for neighbor in graph.neighbors(current) {
        if out.len() >= caps.path_cap || cancel.load(Ordering::Relaxed) {
            return;
        }
        if visited.contains(&neighbor) {
            continue;
        }
        path.push(neighbor);
        visited.insert(neighbor);
        walk(graph, target, path, visited, cancel, caps, out);
        visited.remove(&neighbor);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DetectorKind;
    use crate::graph::CodeGraph;
    use std::sync::atomic::AtomicU64;

    fn ctx(
        graph: Arc<dyn GraphHandle>,
        source_line: u32,
        sink_line: u32,
        sanitizer_lines: &[u32],
        caps: SearchCaps,
    ) -> SearchContext {
        SearchContext {
            source: DetectionRecord::test_fixture(DetectorKind::Source, "a.rs", source_line),
            sink: DetectionRecord::test_fixture(DetectorKind::Sink, "a.rs", sink_line),
            sanitizer_snapshot: sanitizer_lines
                .iter()
                .map(|l| DetectionRecord::test_fixture(DetectorKind::Sanitizer, "a.rs", *l))
                .collect(),
            graph,
            cancel: Arc::new(AtomicBool::new(false)),
            caps,
            logical_clock: Arc::new(AtomicU64::new(0)),
        }
    }

    #[test]
    fn direct_path_no_sanitizers() {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n50 = b.node("a.rs", 50);
        b.edge(n10, n50);
        let graph: Arc<dyn GraphHandle> = Arc::new(b.build());

        let ctx = ctx(graph, 10, 50, &[], SearchCaps::default());
        let findings = DepthFirstSearch.search(&ctx);

        assert_eq!(findings.len(), 1);
        assert!(!findings[0].sanitized);
        assert!(findings[0].sanitizers_crossed.is_empty());
    }

    #[test]
    fn two_paths_one_sanitized() {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n20 = b.node("a.rs", 20);
        let n30 = b.node("a.rs", 30);
        let n50 = b.node("a.rs", 50);
        b.edge(n10, n20);
        b.edge(n10, n50);
        b.edge(n20, n30);
        b.edge(n30, n50);
        let graph: Arc<dyn GraphHandle> = Arc::new(b.build());

        let ctx = ctx(graph, 10, 50, &[30], SearchCaps::default());
        let mut findings = DepthFirstSearch.search(&ctx);
        findings.sort_by_key(|f| f.nodes.len());

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].nodes.len(), 2);
        assert!(!findings[0].sanitized);
        assert_eq!(findings[1].nodes.len(), 4);
        assert!(findings[1].sanitized);
        assert_eq!(findings[1].sanitizers_crossed.len(), 1);
    }

    #[test]
    fn cycle_does_not_loop() {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n20 = b.node("a.rs", 20);
        let n30 = b.node("a.rs", 30);
        let n50 = b.node("a.rs", 50);
        b.edge(n10, n20);
        b.edge(n20, n30);
        b.edge(n30, n20);
        b.edge(n30, n50);
        let graph: Arc<dyn GraphHandle> = Arc::new(b.build());

        let ctx = ctx(graph, 10, 50, &[], SearchCaps::default());
        let findings = DepthFirstSearch.search(&ctx);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].nodes.len(), 4);
        let unique: FxHashSet<_> = findings[0].nodes.iter().collect();
        assert_eq!(unique.len(), findings[0].nodes.len());
    }

    #[test]
    fn disconnected_endpoints_emit_nothing() {
        let mut b = CodeGraph::builder();
        b.node("a.rs", 10);
        b.node("a.rs", 50);
        let graph: Arc<dyn GraphHandle> = Arc::new(b.build());

        let ctx = ctx(graph, 10, 50, &[], SearchCaps::default());
        assert!(DepthFirstSearch.search(&ctx).is_empty());
    }

    #[test]
    fn unresolvable_endpoint_emits_nothing() {
        let mut b = CodeGraph::builder();
        b.node("a.rs", 10);
        let graph: Arc<dyn GraphHandle> = Arc::new(b.build());

        let ctx = ctx(graph, 10, 999, &[], SearchCaps::default());
        assert!(DepthFirstSearch.search(&ctx).is_empty());
    }

    #[test]
    fn path_cap_bounds_enumeration() {
        // A "diamond of diamonds" blows up combinatorially; the cap must hold.
        let mut b = CodeGraph::builder();
        let start = b.node("a.rs", 0);
        let mut layer = vec![start];
        for depth in 1..=10u32 {
            let mut next_layer = vec![];
            for i in 0..2 {
                let n = b.node("a.rs", depth * 100 + i);
                for prev in &layer {
                    b.edge(*prev, n);
                }
                next_layer.push(n);
            }
            layer = next_layer;
        }
        let sink = b.node("a.rs", 9999);
        for prev in &layer {
            b.edge(*prev, sink);
        }
        let graph: Arc<dyn GraphHandle> = Arc::new(b.build());

        let caps = SearchCaps {
            path_cap: 5,
            depth_cap: 64,
        };
        let ctx = ctx(graph, 0, 9999, &[], caps);
        let findings = DepthFirstSearch.search(&ctx);
        assert_eq!(findings.len(), 5);
    }

    #[test]
    fn cancellation_stops_the_walk_promptly() {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n50 = b.node("a.rs", 50);
        b.edge(n10, n50);
        let graph: Arc<dyn GraphHandle> = Arc::new(b.build());

        let ctx = ctx(graph, 10, 50, &[], SearchCaps::default());
        ctx.cancel.store(true, Ordering::SeqCst);
        assert!(DepthFirstSearch.search(&ctx).is_empty());
    }
}
