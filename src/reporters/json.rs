//! Newline-delimited JSON rendering of a path finding.

use crate::engine::PathFinding;

pub fn render(finding: &PathFinding) -> String {
    serde_json::to_string(finding).unwrap_or_else(|e| {
        format!(r#"{{"error":"failed to serialize path finding: {}"}}"#, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DetectionRecord, DetectorKind};
    use crate::graph::CodeGraph;

    #[test]
    fn renders_valid_json() {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n50 = b.node("a.rs", 50);
        let finding = PathFinding {
            source: DetectionRecord::test_fixture(DetectorKind::Source, "a.rs", 10),
            sink: DetectionRecord::test_fixture(DetectorKind::Sink, "a.rs", 50),
            nodes: vec![n10, n50],
            sanitizers_crossed: vec![],
            sanitized: false,
            discovered_at_logical_time: 3,
        };
        let rendered = render(&finding);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["discovered_at_logical_time"], 3);
        assert_eq!(parsed["sanitized"], false);
    }
}
