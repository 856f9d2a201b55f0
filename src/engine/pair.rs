//! Pair key: canonical identity of a source×sink pair (§3), used to enforce
//! at-most-once dispatch.

use super::record::DetectionRecord;

pub type PairKey = (String, u32, String, u32);

pub fn pair_key(source: &DetectionRecord, sink: &DetectionRecord) -> PairKey {
    (
        source.file.clone(),
        source.line,
        sink.file.clone(),
        sink.line,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DetectorKind;

    #[test]
    fn identical_endpoints_collapse_to_one_key() {
        let a = DetectionRecord::test_fixture(DetectorKind::Source, "a.rs", 10);
        let b = DetectionRecord::test_fixture(DetectorKind::Sink, "a.rs", 50);
        let mut other_a = a.clone();
        other_a.rule_name = "different-rule".to_string();

        assert_eq!(pair_key(&a, &b), pair_key(&other_a, &b));
    }
}
