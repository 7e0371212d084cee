use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::sections::SectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompletenessStatus {
    Complete,
    Incomplete,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletenessMetrics {
    pub sections_present: usize,
    pub sections_required: usize,
    /// Percentage rounded to one decimal.
    pub completion_rate: f64,
    pub completion_display: String,
    pub status: CompletenessStatus,
    pub missing_sections: Vec<SectionKind>,
}

impl CompletenessMetrics {
    pub fn measure(sections: &BTreeMap<SectionKind, Value>) -> Self {
        let required = SectionKind::ALL.len();
        let missing: Vec<_> = SectionKind::ALL
            .into_iter()
            .filter(|kind| !sections.contains_key(kind))
            .collect();
        let present = required - missing.len();
        let rate = (present as f64 / required as f64 * 1000.0).round() / 10.0;

        Self {
            sections_present: present,
            sections_required: required,
            completion_rate: rate,
            completion_display: format!("{rate:.1}%"),
            status: if present >= required {
                CompletenessStatus::Complete
            } else {
                CompletenessStatus::Incomplete
            },
            missing_sections: missing,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == CompletenessStatus::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(kinds: &[SectionKind]) -> BTreeMap<SectionKind, Value> {
        kinds
            .iter()
            .map(|k| (*k, serde_json::json!({"present": true})))
            .collect()
    }

    #[test]
    fn all_sections_is_complete() {
        let metrics = CompletenessMetrics::measure(&sections(&SectionKind::ALL));

        assert_eq!(metrics.sections_present, 11);
        assert_eq!(metrics.completion_rate, 100.0);
        assert_eq!(metrics.completion_display, "100.0%");
        assert!(metrics.is_complete());
        assert!(metrics.missing_sections.is_empty());
    }

    #[test]
    fn partial_sections_round_to_one_decimal() {
        let metrics = CompletenessMetrics::measure(&sections(&SectionKind::ALL[..7]));

        assert_eq!(metrics.sections_present, 7);
        assert_eq!(metrics.completion_rate, 63.6);
        assert_eq!(metrics.completion_display, "63.6%");
        assert_eq!(metrics.status, CompletenessStatus::Incomplete);
        assert_eq!(metrics.missing_sections, SectionKind::ALL[7..].to_vec());
    }

    #[test]
    fn rate_matches_formula_for_every_count() {
        for present in 0..=11 {
            let metrics = CompletenessMetrics::measure(&sections(&SectionKind::ALL[..present]));
            let expected = (present as f64 / 11.0 * 100.0 * 10.0).round() / 10.0;
            assert_eq!(metrics.completion_rate, expected, "present = {present}");
            assert_eq!(metrics.is_complete(), present == 11);
        }
    }

    #[test]
    fn status_serializes_uppercase() {
        let metrics = CompletenessMetrics::measure(&sections(&[SectionKind::PrePitch]));
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["status"], "INCOMPLETE");
        assert_eq!(json["missing_sections"][0], "web_research");
    }
}
