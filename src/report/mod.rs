//! Report assembly: eleven analysis sections, a consolidation summary and a
//! completeness metric, with an emergency report when assembly fails.

pub mod completeness;
pub mod sections;
pub mod store;

pub use completeness::{CompletenessMetrics, CompletenessStatus};
pub use sections::SectionKind;
pub use store::{FileStore, NullStore, ReportStore};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

pub const ENGINE_VERSION: &str = concat!("marketlens/", env!("CARGO_PKG_VERSION"));
pub const RECOVERY_INSTRUCTION: &str = "Review the error and regenerate the report";

const PROJECT_DATA_KEY: &str = "project_data";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("analysis input must be a JSON object, got {0}")]
    InvalidInput(&'static str),

    #[error("section '{section}' could not be generated: {source}")]
    Section {
        section: SectionKind,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub completeness: String,
    pub all_sections_included: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalConsolidation {
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub next_steps: Vec<String>,
    pub completeness_guarantee: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedReport {
    pub report_metadata: ReportMetadata,
    pub input_data: Value,
    pub analysis_sections: BTreeMap<SectionKind, Value>,
    pub final_consolidation: FinalConsolidation,
    pub completeness_metrics: CompletenessMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmergencyMetadata {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub status: String,
    pub error: String,
}

/// Reduced report returned when assembly fails. Carries the input untouched.
#[derive(Debug, Clone, Serialize)]
pub struct EmergencyReport {
    pub report_metadata: EmergencyMetadata,
    pub partial_data: Value,
    pub saved_components: String,
    pub next_steps: String,
}

impl EmergencyReport {
    pub fn new(input: &Value, session_id: &str, error: impl std::fmt::Display) -> Self {
        Self {
            report_metadata: EmergencyMetadata {
                session_id: session_id.to_string(),
                generated_at: Utc::now(),
                status: "EMERGENCY".into(),
                error: error.to_string(),
            },
            partial_data: input.clone(),
            saved_components: "Partial data preserved".into(),
            next_steps: RECOVERY_INSTRUCTION.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportOutcome {
    Complete(Box<CompletedReport>),
    Emergency(EmergencyReport),
}

impl ReportOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, ReportOutcome::Complete(_))
    }

    pub fn as_complete(&self) -> Option<&CompletedReport> {
        match self {
            ReportOutcome::Complete(report) => Some(&**report),
            ReportOutcome::Emergency(_) => None,
        }
    }

    pub fn as_emergency(&self) -> Option<&EmergencyReport> {
        match self {
            ReportOutcome::Emergency(report) => Some(report),
            ReportOutcome::Complete(_) => None,
        }
    }
}

/// Assembles reports and hands them to a `ReportStore`.
pub struct ReportGenerator<S> {
    store: S,
}

impl<S: ReportStore> ReportGenerator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Never fails: assembly errors produce an `EmergencyReport`.
    pub fn generate_complete_report(&self, input: &Value, session_id: &str) -> ReportOutcome {
        info!(session_id, "generating complete report");
        match assemble(input, session_id) {
            Ok(report) => {
                self.persist(&report, session_id);
                info!(
                    session_id,
                    sections = report.completeness_metrics.sections_present,
                    status = ?report.completeness_metrics.status,
                    "report generated"
                );
                ReportOutcome::Complete(Box::new(report))
            }
            Err(e) => {
                error!(%e, session_id, "report generation failed, returning emergency report");
                ReportOutcome::Emergency(EmergencyReport::new(input, session_id, e))
            }
        }
    }

    fn persist(&self, report: &CompletedReport, session_id: &str) {
        let payload = match serde_json::to_value(report) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(%e, session_id, "could not serialize report for storage");
                return;
            }
        };
        self.store
            .save("final_complete_report", &payload, "final_reports", session_id);
        self.store
            .save("full_analysis_final", &payload, "full_analysis", session_id);
        for (kind, section) in &report.analysis_sections {
            self.store.save(
                &format!("section_{}", kind.name()),
                section,
                kind.storage_category(),
                session_id,
            );
        }
    }
}

fn assemble(input: &Value, session_id: &str) -> Result<CompletedReport, ReportError> {
    let fields = input
        .as_object()
        .ok_or_else(|| ReportError::InvalidInput(json_kind(input)))?;

    let mut analysis_sections = BTreeMap::new();
    for kind in SectionKind::ALL {
        analysis_sections.insert(kind, kind.build(fields)?);
    }

    let completeness_metrics = CompletenessMetrics::measure(&analysis_sections);
    let input_data = fields
        .get(PROJECT_DATA_KEY)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    Ok(CompletedReport {
        report_metadata: ReportMetadata {
            session_id: session_id.to_string(),
            generated_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            completeness: completeness_metrics.completion_display.clone(),
            all_sections_included: completeness_metrics.is_complete(),
        },
        input_data,
        analysis_sections,
        final_consolidation: final_consolidation(),
        completeness_metrics,
    })
}

fn final_consolidation() -> FinalConsolidation {
    FinalConsolidation {
        executive_summary: "Complete analysis covering every required section".into(),
        key_findings: vec![
            "Detailed audience profile mapped".into(),
            "Persuasion drivers identified".into(),
            "Complete objection handling system".into(),
            "Structured future predictions".into(),
        ],
        next_steps: vec![
            "Implement the identified strategies".into(),
            "Test the persuasion drivers".into(),
            "Monitor conversion metrics".into(),
        ],
        completeness_guarantee: "All required sections included".into(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        saves: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingStore {
        fn saves(&self) -> Vec<(String, String, String)> {
            self.saves.lock().unwrap().clone()
        }
    }

    impl ReportStore for RecordingStore {
        fn save(&self, step_name: &str, _payload: &Value, category: &str, session_id: &str) {
            self.saves.lock().unwrap().push((
                step_name.to_string(),
                category.to_string(),
                session_id.to_string(),
            ));
        }
    }

    fn full_input() -> Value {
        json!({
            "project_data": {"segment": "fitness coaching", "product": "online course"},
            "web_research": {"total_results": 120, "search_results": [{"url": "https://a.com"}]},
            "audience_profile": {"pains": ["lack of time"], "channels": ["instagram"]},
            "persuasion_drivers": {"custom_drivers": [{"name": "urgency"}]},
            "visual_proofs": {"generated_proofs": ["before/after"]},
            "objection_handling": {"objection_responses": ["guarantee"]},
            "pre_pitch": {"pre_pitch_structure": ["hook"]},
            "future_predictions": {"predictions": ["market grows"]}
        })
    }

    #[test]
    fn empty_input_yields_all_sections() {
        let generator = ReportGenerator::new(NullStore);

        let outcome = generator.generate_complete_report(&json!({}), "s1");
        let report = outcome.as_complete().expect("complete report");

        assert_eq!(report.analysis_sections.len(), 11);
        for kind in SectionKind::ALL {
            let section = &report.analysis_sections[&kind];
            assert!(!section.as_object().unwrap().is_empty(), "{kind} is empty");
        }
        assert_eq!(report.input_data, json!({}));
        assert!(report.completeness_metrics.is_complete());
        assert_eq!(report.report_metadata.completeness, "100.0%");
        assert!(report.report_metadata.all_sections_included);
    }

    #[test]
    fn full_input_carries_project_data_and_fields() {
        let generator = ReportGenerator::new(NullStore);

        let outcome = generator.generate_complete_report(&full_input(), "s2");
        let report = outcome.as_complete().unwrap();

        assert_eq!(report.input_data["segment"], "fitness coaching");
        assert_eq!(
            report.analysis_sections[&SectionKind::WebResearch]["total_sources"],
            120
        );
        assert_eq!(
            report.analysis_sections[&SectionKind::PersuasionDrivers]["total_drivers"],
            1
        );
        assert_eq!(report.report_metadata.session_id, "s2");
        assert_eq!(report.report_metadata.engine_version, ENGINE_VERSION);
    }

    #[test]
    fn serialized_report_has_expected_shape() {
        let generator = ReportGenerator::new(NullStore);

        let outcome = generator.generate_complete_report(&full_input(), "s3");
        let json = serde_json::to_value(&outcome).unwrap();

        for key in [
            "report_metadata",
            "input_data",
            "analysis_sections",
            "final_consolidation",
            "completeness_metrics",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["analysis_sections"].as_object().unwrap().len(), 11);
        assert_eq!(json["completeness_metrics"]["status"], "COMPLETE");
        assert_eq!(json["completeness_metrics"]["completion_rate"], 100.0);
    }

    #[test]
    fn null_and_float_fields_still_yield_complete_report() {
        let generator = ReportGenerator::new(NullStore);

        for input in [
            json!({"web_research": {"total_results": null}}),
            json!({"audience_profile": {"pains": null}}),
            json!({"web_research": {"total_results": 12.0}}),
        ] {
            let outcome = generator.generate_complete_report(&input, "s8");
            assert!(outcome.is_complete(), "emergency report for {input}");
            let report = outcome.as_complete().unwrap();
            assert_eq!(report.analysis_sections.len(), 11);
        }
    }

    #[test]
    fn malformed_section_returns_emergency_report() {
        let store = RecordingStore::default();
        let generator = ReportGenerator::new(&store);
        let input = json!({
            "project_data": {"segment": "x"},
            "persuasion_drivers": {"custom_drivers": "should be a list"}
        });

        let outcome = generator.generate_complete_report(&input, "s4");
        let emergency = outcome.as_emergency().expect("emergency report");

        assert_eq!(emergency.partial_data, input);
        assert!(!emergency.report_metadata.error.is_empty());
        assert!(emergency.report_metadata.error.contains("persuasion_drivers"));
        assert_eq!(emergency.report_metadata.status, "EMERGENCY");
        assert_eq!(emergency.next_steps, RECOVERY_INSTRUCTION);
        assert!(store.saves().is_empty());
    }

    #[test]
    fn non_object_input_returns_emergency_report() {
        let generator = ReportGenerator::new(NullStore);
        let input = json!(["not", "a", "mapping"]);

        let outcome = generator.generate_complete_report(&input, "s5");

        let emergency = outcome.as_emergency().unwrap();
        assert_eq!(emergency.partial_data, input);
        assert!(emergency.report_metadata.error.contains("an array"));
        assert!(!outcome.is_complete());
    }

    #[test]
    fn persists_report_copy_and_each_section() {
        let store = RecordingStore::default();
        let generator = ReportGenerator::new(&store);

        generator.generate_complete_report(&full_input(), "s6");
        let saves = store.saves();

        assert_eq!(saves.len(), 2 + 11);
        assert_eq!(saves[0].0, "final_complete_report");
        assert_eq!(saves[0].1, "final_reports");
        assert_eq!(saves[1].0, "full_analysis_final");
        assert_eq!(saves[1].1, "full_analysis");
        assert!(saves.iter().all(|(_, _, session)| session == "s6"));
        assert!(saves.contains(&(
            "section_persuasion_drivers".into(),
            "mental_drivers".into(),
            "s6".into()
        )));
        assert!(saves.contains(&(
            "section_competition_analysis".into(),
            "full_analysis".into(),
            "s6".into()
        )));
    }

    #[test]
    fn file_store_receives_full_report() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(FileStore::new(dir.path()));

        generator.generate_complete_report(&full_input(), "s7");

        let path = dir
            .path()
            .join("s7")
            .join("final_reports")
            .join("final_complete_report.json");
        let saved: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(saved["report_metadata"]["session_id"], "s7");
        assert!(
            dir.path()
                .join("s7")
                .join("anti_objection")
                .join("section_objection_handling.json")
                .exists()
        );
    }
}
