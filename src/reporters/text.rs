//! Human-readable terminal rendering of a path finding.

use console::style;

use crate::engine::PathFinding;

pub fn render(finding: &PathFinding) -> String {
    let arrow = if finding.sanitized {
        style("=>").green()
    } else {
        style("=>").red()
    };

    let status = if finding.sanitized {
        style("sanitized").green()
    } else {
        style("UNSANITIZED").red().bold()
    };

    format!(
        "{} {}:{} {} {}:{}  [{}]  ({} hops, {} sanitizer(s) crossed)",
        style("taint path").bold(),
        finding.source.file,
        finding.source.line,
        arrow,
        finding.sink.file,
        finding.sink.line,
        status,
        finding.nodes.len(),
        finding.sanitizers_crossed.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DetectorKind;
    use crate::graph::CodeGraph;

    #[test]
    fn renders_unsanitized_path() {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n50 = b.node("a.rs", 50);
        let finding = PathFinding {
            source: crate::engine::DetectionRecord::test_fixture(DetectorKind::Source, "a.rs", 10),
            sink: crate::engine::DetectionRecord::test_fixture(DetectorKind::Sink, "a.rs", 50),
            nodes: vec![n10, n50],
            sanitizers_crossed: vec![],
            sanitized: false,
            discovered_at_logical_time: 0,
        };
        let rendered = render(&finding);
        assert!(rendered.contains("a.rs:10"));
        assert!(rendered.contains("a.rs:50"));
    }
}
