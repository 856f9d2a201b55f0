//! Engine configuration, built once from parsed CLI flags and threaded
//! through the orchestrator and detectors (§4.8).

use crate::engine::SearchCaps;

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub caps: SearchCaps,
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            caps: SearchCaps::default(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}
