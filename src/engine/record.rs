//! The detection record: the shared shape emitted by source/sink/sanitizer
//! detectors and consumed by the orchestrator (§3).

use serde::{Deserialize, Serialize};

/// Which of the three finding streams a detection record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    Source,
    Sink,
    Sanitizer,
}

/// A single source/sink/sanitizer hit produced by a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub kind: DetectorKind,
    pub rule_name: String,
    pub file: String,
    pub line: u32,
    pub match_text: String,
    pub confidence: f64,
    pub description: String,
    pub line_content: String,
}

impl DetectionRecord {
    #[cfg(test)]
    pub fn test_fixture(kind: DetectorKind, file: &str, line: u32) -> Self {
        Self {
            kind,
            rule_name: "test-rule".to_string(),
            file: file.to_string(),
            line,
            match_text: "match".to_string(),
            confidence: 1.0,
            description: "test fixture".to_string(),
            line_content: String::new(),
        }
    }
}
