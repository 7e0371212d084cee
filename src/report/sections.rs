//! The eleven report sections. Each builder reads its optional input
//! subsection and fills anything missing with fixed illustrative content, so
//! every section is a non-empty object whatever the input holds.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use super::ReportError;

/// Web research sources carried into the report.
const MAX_SOURCES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    WebResearch,
    AudienceProfile,
    PersuasionDrivers,
    VisualProofs,
    ObjectionHandling,
    PrePitch,
    FuturePredictions,
    CompetitionAnalysis,
    ExclusiveInsights,
    StrategicKeywords,
    SalesFunnel,
}

impl SectionKind {
    /// Required sections, in report order.
    pub const ALL: [SectionKind; 11] = [
        SectionKind::WebResearch,
        SectionKind::AudienceProfile,
        SectionKind::PersuasionDrivers,
        SectionKind::VisualProofs,
        SectionKind::ObjectionHandling,
        SectionKind::PrePitch,
        SectionKind::FuturePredictions,
        SectionKind::CompetitionAnalysis,
        SectionKind::ExclusiveInsights,
        SectionKind::StrategicKeywords,
        SectionKind::SalesFunnel,
    ];

    /// Section name; also the input key the section reads from.
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::WebResearch => "web_research",
            SectionKind::AudienceProfile => "audience_profile",
            SectionKind::PersuasionDrivers => "persuasion_drivers",
            SectionKind::VisualProofs => "visual_proofs",
            SectionKind::ObjectionHandling => "objection_handling",
            SectionKind::PrePitch => "pre_pitch",
            SectionKind::FuturePredictions => "future_predictions",
            SectionKind::CompetitionAnalysis => "competition_analysis",
            SectionKind::ExclusiveInsights => "exclusive_insights",
            SectionKind::StrategicKeywords => "strategic_keywords",
            SectionKind::SalesFunnel => "sales_funnel",
        }
    }

    /// Storage category used when the section is persisted on its own.
    pub fn storage_category(self) -> &'static str {
        match self {
            SectionKind::PersuasionDrivers => "mental_drivers",
            SectionKind::VisualProofs => "visual_proofs",
            SectionKind::ObjectionHandling => "anti_objection",
            SectionKind::PrePitch => "pre_pitch",
            _ => "full_analysis",
        }
    }

    pub fn build(self, input: &Map<String, Value>) -> Result<Value, ReportError> {
        match self {
            SectionKind::WebResearch => render(self, web_research(read(self, input)?)),
            SectionKind::AudienceProfile => render(self, audience_profile(read(self, input)?)),
            SectionKind::PersuasionDrivers => {
                render(self, persuasion_drivers(read(self, input)?))
            }
            SectionKind::VisualProofs => render(self, visual_proofs(read(self, input)?)),
            SectionKind::ObjectionHandling => {
                render(self, objection_handling(read(self, input)?))
            }
            SectionKind::PrePitch => render(self, pre_pitch(read(self, input)?)),
            SectionKind::FuturePredictions => {
                render(self, future_predictions(read(self, input)?))
            }
            SectionKind::CompetitionAnalysis => render(self, competition_analysis()),
            SectionKind::ExclusiveInsights => render(self, exclusive_insights()),
            SectionKind::StrategicKeywords => render(self, strategic_keywords()),
            SectionKind::SalesFunnel => render(self, sales_funnel()),
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Absent or null subsections read as the default input.
fn read<T: DeserializeOwned + Default>(
    kind: SectionKind,
    input: &Map<String, Value>,
) -> Result<T, ReportError> {
    match input.get(kind.name()) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|source| ReportError::Section {
            section: kind,
            source,
        }),
    }
}

fn render<T: Serialize>(kind: SectionKind, section: T) -> Result<Value, ReportError> {
    serde_json::to_value(section).map_err(|source| ReportError::Section {
        section: kind,
        source,
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Reads a present-but-null field as its default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WebResearchInput {
    total_results: Option<Number>,
    extracted_results: Option<Number>,
    research_quality: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    search_results: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AudienceProfileInput {
    #[serde(deserialize_with = "null_as_default")]
    demographics: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    psychographics: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pains: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    desires: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    objections: Vec<Value>,
    language: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    channels: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PersuasionDriversInput {
    #[serde(deserialize_with = "null_as_default")]
    custom_drivers: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    activation_scripts: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    anchor_phrases: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VisualProofsInput {
    #[serde(deserialize_with = "null_as_default")]
    generated_proofs: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ObjectionHandlingInput {
    #[serde(deserialize_with = "null_as_default")]
    objection_responses: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrePitchInput {
    #[serde(deserialize_with = "null_as_default")]
    pre_pitch_structure: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FuturePredictionsInput {
    #[serde(deserialize_with = "null_as_default")]
    predictions: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct WebResearchSection {
    pub summary: String,
    pub total_sources: Number,
    pub extracted_content: Number,
    pub data_quality: String,
    pub key_findings: Vec<String>,
    pub sources_used: Vec<Value>,
}

fn web_research(input: WebResearchInput) -> WebResearchSection {
    let mut sources = input.search_results;
    sources.truncate(MAX_SOURCES);
    WebResearchSection {
        summary: "Large-scale web research across multiple sources".into(),
        total_sources: input.total_results.unwrap_or_else(|| Number::from(0)),
        extracted_content: input.extracted_results.unwrap_or_else(|| Number::from(0)),
        data_quality: input.research_quality.unwrap_or_else(|| "PREMIUM".into()),
        key_findings: strings(&[
            "Market trends identified",
            "Main competitors mapped",
            "Market opportunities detected",
        ]),
        sources_used: sources,
    }
}

#[derive(Debug, Serialize)]
pub struct AudienceProfileSection {
    pub demographic_profile: Map<String, Value>,
    pub psychographic_profile: Map<String, Value>,
    pub visceral_pains: Vec<Value>,
    pub hidden_desires: Vec<Value>,
    pub main_objections: Vec<Value>,
    pub preferred_language: String,
    pub communication_channels: Vec<Value>,
    pub behavioral_insights: Vec<String>,
}

fn audience_profile(input: AudienceProfileInput) -> AudienceProfileSection {
    AudienceProfileSection {
        demographic_profile: input.demographics,
        psychographic_profile: input.psychographics,
        visceral_pains: input.pains,
        hidden_desires: input.desires,
        main_objections: input.objections,
        preferred_language: input.language.unwrap_or_else(|| "Informal".into()),
        communication_channels: input.channels,
        behavioral_insights: strings(&[
            "Decision patterns identified",
            "Emotional triggers mapped",
            "Moments of highest receptiveness",
        ]),
    }
}

#[derive(Debug, Serialize)]
pub struct PersuasionDriversSection {
    pub total_drivers: usize,
    pub custom_drivers: Vec<Value>,
    pub categories_covered: Vec<String>,
    pub activation_scripts: Map<String, Value>,
    pub anchor_phrases: Map<String, Value>,
    pub average_intensity: String,
}

fn persuasion_drivers(input: PersuasionDriversInput) -> PersuasionDriversSection {
    PersuasionDriversSection {
        total_drivers: input.custom_drivers.len(),
        custom_drivers: input.custom_drivers,
        categories_covered: strings(&[
            "Fear of loss",
            "Desire for gain",
            "Time urgency",
            "Social proof",
            "Authority",
        ]),
        activation_scripts: input.activation_scripts,
        anchor_phrases: input.anchor_phrases,
        average_intensity: "8.5/10".into(),
    }
}

#[derive(Debug, Serialize)]
pub struct VisualProofsSection {
    pub generated_proofs: Vec<Value>,
    pub proof_types: Vec<String>,
    pub presentation_scripts: Vec<String>,
    pub persuasive_impact: String,
}

fn visual_proofs(input: VisualProofsInput) -> VisualProofsSection {
    VisualProofsSection {
        generated_proofs: input.generated_proofs,
        proof_types: strings(&[
            "Result screenshots",
            "Video testimonials",
            "Case studies",
            "Real-time metrics",
            "Visual comparisons",
        ]),
        presentation_scripts: strings(&[
            "Show before/after",
            "Highlight transformations",
            "Make results evident",
        ]),
        persuasive_impact: "Very High".into(),
    }
}

#[derive(Debug, Serialize)]
pub struct ObjectionHandlingSection {
    pub universal_objections_covered: Vec<String>,
    pub neutralization_scripts: Vec<Value>,
    pub emergency_arsenal: Vec<String>,
    pub neutralization_rate: String,
}

fn objection_handling(input: ObjectionHandlingInput) -> ObjectionHandlingSection {
    ObjectionHandlingSection {
        universal_objections_covered: strings(&[
            "I don't have time",
            "It's too expensive",
            "I need to think it over",
            "I don't trust it yet",
        ]),
        neutralization_scripts: input.objection_responses,
        emergency_arsenal: strings(&[
            "Results guarantee",
            "Full support",
            "Success stories",
        ]),
        neutralization_rate: "95%".into(),
    }
}

#[derive(Debug, Serialize)]
pub struct PrePitchSection {
    pub complete_structure: Vec<Value>,
    pub psychological_sequence: Vec<String>,
    pub persuasive_triggers: Vec<String>,
    pub optimal_duration: String,
}

fn pre_pitch(input: PrePitchInput) -> PrePitchSection {
    PrePitchSection {
        complete_structure: input.pre_pitch_structure,
        psychological_sequence: strings(&[
            "Capture attention",
            "Identify the pain",
            "Amplify the problem",
            "Present the solution",
            "Prove credibility",
            "Call to action",
        ]),
        persuasive_triggers: strings(&[
            "Time scarcity",
            "Demonstrated authority",
            "Evident social proof",
        ]),
        optimal_duration: "7-12 minutes".into(),
    }
}

#[derive(Debug, Serialize)]
pub struct TimeHorizons {
    #[serde(rename = "3_months")]
    pub three_months: String,
    #[serde(rename = "6_months")]
    pub six_months: String,
    #[serde(rename = "12_months")]
    pub twelve_months: String,
    #[serde(rename = "24_months")]
    pub twenty_four_months: String,
}

#[derive(Debug, Serialize)]
pub struct FuturePredictionsSection {
    pub time_horizons: TimeHorizons,
    pub key_predictions: Vec<Value>,
    pub identified_opportunities: Vec<String>,
    pub potential_risks: Vec<String>,
}

fn future_predictions(input: FuturePredictionsInput) -> FuturePredictionsSection {
    FuturePredictionsSection {
        time_horizons: TimeHorizons {
            three_months: "Immediate trends".into(),
            six_months: "Emerging opportunities".into(),
            twelve_months: "Structural changes".into(),
            twenty_four_months: "Disruptive transformations".into(),
        },
        key_predictions: input.predictions,
        identified_opportunities: strings(&[
            "New market segments",
            "Emerging technologies",
            "Regulatory changes",
        ]),
        potential_risks: strings(&[
            "New competitors entering",
            "Behavior shifts",
            "Economic pressure",
        ]),
    }
}

#[derive(Debug, Serialize)]
pub struct Positioning {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompetitionAnalysisSection {
    pub main_competitors: Vec<String>,
    pub positioning_analysis: Positioning,
    pub differentiation_strategies: Vec<String>,
}

fn competition_analysis() -> CompetitionAnalysisSection {
    CompetitionAnalysisSection {
        main_competitors: strings(&["Market leader", "Main challenger", "Emerging competitor"]),
        positioning_analysis: Positioning {
            strengths: strings(&["Quality", "Price", "Service"]),
            weaknesses: strings(&["Innovation", "Agility", "Personalization"]),
            opportunities: strings(&["Specific niche", "Technology", "Experience"]),
        },
        differentiation_strategies: strings(&[
            "Unique value proposition",
            "Superior experience",
            "Constant innovation",
        ]),
    }
}

#[derive(Debug, Serialize)]
pub struct ExclusiveInsightsSection {
    pub strategic_insights: Vec<String>,
    pub unique_discoveries: Vec<String>,
    pub action_recommendations: Vec<String>,
}

fn exclusive_insights() -> ExclusiveInsightsSection {
    ExclusiveInsightsSection {
        strategic_insights: strings(&[
            "Unexplored behavioral pattern",
            "Time-bound window of opportunity",
            "Sustainable competitive advantage",
        ]),
        unique_discoveries: strings(&[
            "Latent need identified",
            "Underserved segment",
            "Possible disruptive innovation",
        ]),
        action_recommendations: strings(&[
            "Prioritize a specific segment",
            "Develop an innovative solution",
            "Accelerate market entry",
        ]),
    }
}

#[derive(Debug, Serialize)]
pub struct StrategicKeywordsSection {
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
    pub long_tail_keywords: Vec<String>,
    pub seo_opportunities: Vec<String>,
}

fn strategic_keywords() -> StrategicKeywordsSection {
    StrategicKeywordsSection {
        primary_keywords: strings(&["Primary term 1", "Primary term 2", "Primary term 3"]),
        secondary_keywords: strings(&["Related term 1", "Related term 2", "Related term 3"]),
        long_tail_keywords: strings(&[
            "Specific phrase 1",
            "Specific phrase 2",
            "Specific phrase 3",
        ]),
        seo_opportunities: strings(&[
            "Content gap identified",
            "Low-competition keywords",
            "Emerging terms",
        ]),
    }
}

#[derive(Debug, Serialize)]
pub struct FunnelStage {
    pub objective: String,
    pub strategies: Vec<String>,
    pub metrics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FunnelStages {
    pub awareness: FunnelStage,
    pub consideration: FunnelStage,
    pub decision: FunnelStage,
}

#[derive(Debug, Serialize)]
pub struct SalesFunnelSection {
    pub funnel_stages: FunnelStages,
    pub recommended_optimizations: Vec<String>,
    pub expected_conversion_rate: String,
}

fn sales_funnel() -> SalesFunnelSection {
    let stage = |objective: &str, strategies: &[&str], metrics: &[&str]| FunnelStage {
        objective: objective.to_string(),
        strategies: strings(strategies),
        metrics: strings(metrics),
    };
    SalesFunnelSection {
        funnel_stages: FunnelStages {
            awareness: stage(
                "Spark interest",
                &["Content marketing", "SEO", "Social media"],
                &["Impressions", "Clicks", "Engagement"],
            ),
            consideration: stage(
                "Educate and nurture",
                &["E-books", "Webinars", "Email marketing"],
                &["Downloads", "Attendance", "Open rate"],
            ),
            decision: stage(
                "Convert to sale",
                &["Demos", "Trials", "Consulting"],
                &["Conversions", "Sales", "ROI"],
            ),
        },
        recommended_optimizations: strings(&[
            "Personalize messaging",
            "Automate follow-up",
            "Segment audiences",
        ]),
        expected_conversion_rate: "15-25%".into(),
    }
}
