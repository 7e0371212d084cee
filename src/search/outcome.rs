use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::exa::types::SearchRequest;

/// Which request produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Neural,
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    ComprehensiveNeural,
    BasicFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub text: String,
    pub score: f64,
    pub relevance_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub source: ResultSource,
}

/// Result of `search_comprehensive`. Always well-formed; failures carry `error`
/// and an empty result list.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub success: bool,
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_strategy: Option<SearchStrategy>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_params: Option<SearchRequest>,
}

impl SearchOutcome {
    pub fn succeeded(query: &str, results: Vec<SearchResult>, strategy: SearchStrategy) -> Self {
        Self {
            success: true,
            query: query.to_string(),
            total_results: results.len(),
            results,
            search_strategy: Some(strategy),
            timestamp: Utc::now(),
            error: None,
            search_params: None,
        }
    }

    pub fn failed(query: &str, error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            query: query.to_string(),
            total_results: 0,
            results: Vec::new(),
            search_strategy: None,
            timestamp: Utc::now(),
            error: Some(error.to_string()),
            search_params: None,
        }
    }

    pub fn with_params(mut self, params: SearchRequest) -> Self {
        self.search_params = Some(params);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_serializes_without_strategy() {
        let outcome = SearchOutcome::failed("q", "boom");
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["results"], serde_json::json!([]));
        assert!(json.get("search_strategy").is_none());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn strategy_and_source_tags() {
        assert_eq!(
            serde_json::to_value(SearchStrategy::BasicFallback).unwrap(),
            "basic_fallback"
        );
        assert_eq!(
            serde_json::to_value(SearchStrategy::ComprehensiveNeural).unwrap(),
            "comprehensive_neural"
        );
        assert_eq!(serde_json::to_value(ResultSource::Basic).unwrap(), "basic");
    }
}
