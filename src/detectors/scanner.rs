//! Detector threads: one per kind (source/sink/sanitizer), each scanning the
//! file set and sending matches onto its Finding Stream channel (§4.5).
//!
//! Grounded in the teacher's producer-thread idiom (bounded pipelines of file
//! work feeding a channel), adapted here to a fixed three-thread layout since
//! there are exactly three detector kinds.

use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use tracing::warn;

use crate::engine::{DetectionRecord, DetectorKind};

use super::catalog::{sanitizer_rules, sink_rules, source_rules};
use super::file_provider::FileProvider;

/// Scan every file known to `provider` for source hits and send each match
/// on `tx`. `tx` is dropped when the scan completes, closing the channel.
pub fn scan_sources(provider: &dyn FileProvider, tx: &Sender<DetectionRecord>) {
    let rules = source_rules();
    for path in provider.files() {
        let Some(content) = provider.content(path) else {
            warn!(file = %path.display(), "source detector: could not read file, skipping");
            continue;
        };
        let rel = path
            .strip_prefix(provider.repo_path())
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        for (idx, line) in content.lines().enumerate() {
            for r in &rules {
                if let Some(m) = r.pattern.find(line) {
                    let record = DetectionRecord {
                        kind: DetectorKind::Source,
                        rule_name: r.rule_name.clone(),
                        file: rel.clone(),
                        line: (idx + 1) as u32,
                        match_text: m.as_str().to_string(),
                        confidence: r.confidence,
                        description: r.description.clone(),
                        line_content: line.trim().to_string(),
                    };
                    if tx.send(record).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

/// Scan every file known to `provider` for sink hits (across all
/// categories) and send each match on `tx`.
pub fn scan_sinks(provider: &dyn FileProvider, tx: &Sender<DetectionRecord>) {
    let catalog = sink_rules();
    for path in provider.files() {
        let Some(content) = provider.content(path) else {
            warn!(file = %path.display(), "sink detector: could not read file, skipping");
            continue;
        };
        let rel = path
            .strip_prefix(provider.repo_path())
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        for (idx, line) in content.lines().enumerate() {
            for (category, rules) in &catalog {
                for r in rules {
                    if let Some(m) = r.pattern.find(line) {
                        let record = DetectionRecord {
                            kind: DetectorKind::Sink,
                            rule_name: format!("{}:{}", category.cwe_id(), r.rule_name),
                            file: rel.clone(),
                            line: (idx + 1) as u32,
                            match_text: m.as_str().to_string(),
                            confidence: r.confidence,
                            description: r.description.clone(),
                            line_content: line.trim().to_string(),
                        };
                        if tx.send(record).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Scan every file known to `provider` for sanitizer hits and send each
/// match on `tx`.
pub fn scan_sanitizers(provider: &dyn FileProvider, tx: &Sender<DetectionRecord>) {
    let rules = sanitizer_rules();
    for path in provider.files() {
        let Some(content) = provider.content(path) else {
            warn!(file = %path.display(), "sanitizer detector: could not read file, skipping");
            continue;
        };
        let rel = path
            .strip_prefix(provider.repo_path())
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        for (idx, line) in content.lines().enumerate() {
            for r in &rules {
                if let Some(m) = r.pattern.find(line) {
                    let record = DetectionRecord {
                        kind: DetectorKind::Sanitizer,
                        rule_name: r.rule_name.clone(),
                        file: rel.clone(),
                        line: (idx + 1) as u32,
                        match_text: m.as_str().to_string(),
                        confidence: r.confidence,
                        description: r.description.clone(),
                        line_content: line.trim().to_string(),
                    };
                    if tx.send(record).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

/// Spawn the three detector threads against a shared file provider. Each
/// thread drops its sender when the scan completes, signaling closure of
/// that Finding Stream channel (§4.1).
pub fn spawn_detector_threads(
    provider: std::sync::Arc<dyn FileProvider>,
    source_tx: Sender<DetectionRecord>,
    sink_tx: Sender<DetectionRecord>,
    sanitizer_tx: Sender<DetectionRecord>,
) -> Vec<JoinHandle<()>> {
    let p1 = std::sync::Arc::clone(&provider);
    let p2 = std::sync::Arc::clone(&provider);
    let p3 = provider;

    vec![
        std::thread::spawn(move || scan_sources(p1.as_ref(), &source_tx)),
        std::thread::spawn(move || scan_sinks(p2.as_ref(), &sink_tx)),
        std::thread::spawn(move || scan_sanitizers(p3.as_ref(), &sanitizer_tx)),
    ]
}
