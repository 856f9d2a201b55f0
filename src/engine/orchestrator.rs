//! Orchestrator (D): turns three detection-record streams into a stream of
//! path findings without duplicating work and without starving any producer
//! (§4.3).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, Select, Sender};
use rustc_hash::FxHashSet;
use tracing::{info, warn};

use crate::graph::GraphHandle;

use super::pair::{pair_key, PairKey};
use super::record::DetectionRecord;
use super::search::{PathFinding, PathSearchStrategy, SearchCaps, SearchContext};

/// Everything the ingest loop and pair-generation logic share, guarded by a
/// single mutex: exactly one logical writer at a time (§5).
#[derive(Default)]
struct Shared {
    sources: Vec<DetectionRecord>,
    sinks: Vec<DetectionRecord>,
    sanitizers: Vec<DetectionRecord>,
    dispatched: FxHashSet<PairKey>,
}

pub struct Orchestrator {
    graph: Arc<dyn GraphHandle>,
    strategy: Arc<dyn PathSearchStrategy>,
    caps: SearchCaps,
    shared: Mutex<Shared>,
    cancel: Arc<AtomicBool>,
    logical_clock: Arc<AtomicU64>,
}

impl Orchestrator {
    pub fn new(
        graph: Arc<dyn GraphHandle>,
        strategy: Arc<dyn PathSearchStrategy>,
        caps: SearchCaps,
    ) -> Self {
        Self {
            graph,
            strategy,
            caps,
            shared: Mutex::new(Shared::default()),
            cancel: Arc::new(AtomicBool::new(false)),
            logical_clock: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Request graceful shutdown. No new pairs are dispatched after this;
    /// in-flight searches notice the cancellation flag between neighbor
    /// expansions and terminate promptly.
    #[allow(dead_code)]
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Consume the three input channels and dispatch Path Searches until all
    /// three are closed and drained, all dispatched searches have completed,
    /// or cancellation fires. `path_tx` is dropped (closing the outbound
    /// channel) when this returns.
    pub fn start(
        &self,
        source_rx: Receiver<DetectionRecord>,
        sink_rx: Receiver<DetectionRecord>,
        sanitizer_rx: Receiver<DetectionRecord>,
        path_tx: Sender<PathFinding>,
        workers: usize,
    ) {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()
            .expect("failed to build search worker pool");

        let mut source_open = true;
        let mut sink_open = true;
        let mut sanitizer_open = true;
        let mut dispatched_count = 0usize;

        pool.install(|| {
            rayon::scope(|scope| {
                while source_open || sink_open || sanitizer_open {
                    if self.cancel.load(Ordering::Relaxed) {
                        break;
                    }

                    let mut sel = Select::new();
                    let mut source_idx = None;
                    let mut sink_idx = None;
                    let mut sanitizer_idx = None;
                    if source_open {
                        source_idx = Some(sel.recv(&source_rx));
                    }
                    if sink_open {
                        sink_idx = Some(sel.recv(&sink_rx));
                    }
                    if sanitizer_open {
                        sanitizer_idx = Some(sel.recv(&sanitizer_rx));
                    }

                    let oper = match sel.select_timeout(Duration::from_millis(50)) {
                        Ok(oper) => oper,
                        Err(_) => continue, // timed out; re-check cancellation
                    };
                    let idx = oper.index();

                    if Some(idx) == source_idx {
                        match oper.recv(&source_rx) {
                            Ok(record) => {
                                dispatched_count +=
                                    self.on_source(record, scope, &path_tx);
                            }
                            Err(_) => source_open = false,
                        }
                    } else if Some(idx) == sink_idx {
                        match oper.recv(&sink_rx) {
                            Ok(record) => {
                                dispatched_count += self.on_sink(record, scope, &path_tx);
                            }
                            Err(_) => sink_open = false,
                        }
                    } else if Some(idx) == sanitizer_idx {
                        match oper.recv(&sanitizer_rx) {
                            Ok(record) => self.on_sanitizer(record),
                            Err(_) => sanitizer_open = false,
                        }
                    }
                }
            });
        });

        info!(
            pairs_dispatched = dispatched_count,
            "orchestrator: all searches drained, shutting down"
        );
    }

    fn on_source(
        &self,
        record: DetectionRecord,
        scope: &rayon::Scope<'_>,
        path_tx: &Sender<PathFinding>,
    ) -> usize {
        let candidates = {
            let mut shared = self.shared.lock().expect("orchestrator mutex poisoned");
            shared.sources.push(record.clone());
            let mut new_pairs = Vec::new();
            for sink in shared.sinks.clone() {
                let key = pair_key(&record, &sink);
                if shared.dispatched.insert(key) {
                    new_pairs.push((record.clone(), sink, shared.sanitizers.clone()));
                }
            }
            new_pairs
        };
        self.dispatch_all(candidates, scope, path_tx)
    }

    fn on_sink(
        &self,
        record: DetectionRecord,
        scope: &rayon::Scope<'_>,
        path_tx: &Sender<PathFinding>,
    ) -> usize {
        let candidates = {
            let mut shared = self.shared.lock().expect("orchestrator mutex poisoned");
            shared.sinks.push(record.clone());
            let mut new_pairs = Vec::new();
            for source in shared.sources.clone() {
                let key = pair_key(&source, &record);
                if shared.dispatched.insert(key) {
                    new_pairs.push((source, record.clone(), shared.sanitizers.clone()));
                }
            }
            new_pairs
        };
        self.dispatch_all(candidates, scope, path_tx)
    }

    fn on_sanitizer(&self, record: DetectionRecord) {
        let mut shared = self.shared.lock().expect("orchestrator mutex poisoned");
        shared.sanitizers.push(record);
    }

    fn dispatch_all(
        &self,
        candidates: Vec<(DetectionRecord, DetectionRecord, Vec<DetectionRecord>)>,
        scope: &rayon::Scope<'_>,
        path_tx: &Sender<PathFinding>,
    ) -> usize {
        if self.cancel.load(Ordering::Relaxed) {
            return 0;
        }
        let count = candidates.len();
        for (source, sink, sanitizers) in candidates {
            self.dispatch(source, sink, sanitizers, scope, path_tx);
        }
        count
    }

    fn dispatch(
        &self,
        source: DetectionRecord,
        sink: DetectionRecord,
        sanitizer_snapshot: Vec<DetectionRecord>,
        scope: &rayon::Scope<'_>,
        path_tx: &Sender<PathFinding>,
    ) {
        let graph = Arc::clone(&self.graph);
        let strategy = Arc::clone(&self.strategy);
        let caps = self.caps;
        let cancel = Arc::clone(&self.cancel);
        let logical_clock = Arc::clone(&self.logical_clock);
        let tx = path_tx.clone();

        scope.spawn(move |_| {
            let ctx = SearchContext {
                source,
                sink,
                sanitizer_snapshot,
                graph,
                cancel,
                caps,
                logical_clock,
            };
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                strategy.search(&ctx)
            }));
            match result {
                Ok(findings) => {
                    for finding in findings {
                        if tx.send(finding).is_err() {
                            break;
                        }
                    }
                }
                Err(_) => {
                    warn!(
                        source_file = %ctx.source.file,
                        source_line = ctx.source.line,
                        sink_file = %ctx.sink.file,
                        sink_line = ctx.sink.line,
                        "path search task panicked; skipping"
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DepthFirstSearch, DetectorKind};
    use crate::graph::CodeGraph;
    use crossbeam_channel::unbounded;

    fn fixture_graph() -> Arc<dyn GraphHandle> {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n50 = b.node("a.rs", 50);
        b.edge(n10, n50);
        Arc::new(b.build())
    }

    #[test]
    fn dedup_dispatches_only_once() {
        let orchestrator = Orchestrator::new(
            fixture_graph(),
            Arc::new(DepthFirstSearch),
            SearchCaps::default(),
        );

        let (source_tx, source_rx) = unbounded();
        let (sink_tx, sink_rx) = unbounded();
        let (sanitizer_tx, sanitizer_rx) = unbounded();
        let (path_tx, path_rx) = unbounded();

        let source = DetectionRecord::test_fixture(DetectorKind::Source, "a.rs", 10);
        for _ in 0..3 {
            source_tx.send(source.clone()).unwrap();
        }
        sink_tx
            .send(DetectionRecord::test_fixture(DetectorKind::Sink, "a.rs", 50))
            .unwrap();
        drop(source_tx);
        drop(sink_tx);
        drop(sanitizer_tx);

        orchestrator.start(source_rx, sink_rx, sanitizer_rx, path_tx, 2);

        let findings: Vec<_> = path_rx.try_iter().collect();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn direct_path_end_to_end() {
        let orchestrator = Orchestrator::new(
            fixture_graph(),
            Arc::new(DepthFirstSearch),
            SearchCaps::default(),
        );

        let (source_tx, source_rx) = unbounded();
        let (sink_tx, sink_rx) = unbounded();
        let (sanitizer_tx, sanitizer_rx) = unbounded();
        let (path_tx, path_rx) = unbounded();

        source_tx
            .send(DetectionRecord::test_fixture(DetectorKind::Source, "a.rs", 10))
            .unwrap();
        sink_tx
            .send(DetectionRecord::test_fixture(DetectorKind::Sink, "a.rs", 50))
            .unwrap();
        drop(source_tx);
        drop(sink_tx);
        drop(sanitizer_tx);

        orchestrator.start(source_rx, sink_rx, sanitizer_rx, path_tx, 2);

        let findings: Vec<_> = path_rx.try_iter().collect();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].nodes.len(), 2);
        assert!(!findings[0].sanitized);
    }

    #[test]
    fn stop_prevents_new_dispatch() {
        let orchestrator = Orchestrator::new(
            fixture_graph(),
            Arc::new(DepthFirstSearch),
            SearchCaps::default(),
        );
        orchestrator.stop();

        let (source_tx, source_rx) = unbounded();
        let (sink_tx, sink_rx) = unbounded();
        let (sanitizer_tx, sanitizer_rx) = unbounded();
        let (path_tx, path_rx) = unbounded();

        source_tx
            .send(DetectionRecord::test_fixture(DetectorKind::Source, "a.rs", 10))
            .unwrap();
        sink_tx
            .send(DetectionRecord::test_fixture(DetectorKind::Sink, "a.rs", 50))
            .unwrap();
        drop(source_tx);
        drop(sink_tx);
        drop(sanitizer_tx);

        orchestrator.start(source_rx, sink_rx, sanitizer_rx, path_tx, 2);
        assert!(path_rx.try_iter().next().is_none());
    }
}
