use tracing::debug;

use super::outcome::{ResultSource, SearchResult};
use crate::exa::types::{ExaResult, SearchResponse};

pub const NO_TITLE: &str = "No title";
/// Upper bound on stored result text, in characters.
pub const MAX_TEXT_CHARS: usize = 2000;
/// Neural results with less trimmed text than this are dropped.
pub const MIN_TEXT_CHARS: usize = 100;

/// Converts a search-with-contents response, dropping results below the text floor.
pub fn neural_results(response: &SearchResponse) -> Vec<SearchResult> {
    let results: Vec<_> = response.results.iter().filter_map(neural_result).collect();
    let dropped = response.results.len() - results.len();
    if dropped > 0 {
        debug!(dropped, kept = results.len(), "filtered short neural results");
    }
    results
}

pub fn basic_results(response: &SearchResponse) -> Vec<SearchResult> {
    response.results.iter().map(basic_result).collect()
}

fn neural_result(raw: &ExaResult) -> Option<SearchResult> {
    let text = truncate_chars(raw.text.as_deref().unwrap_or_default(), MAX_TEXT_CHARS);
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return None;
    }
    let score = raw.score.unwrap_or(0.0);
    Some(SearchResult {
        title: title_or_default(raw),
        url: raw.url.clone().unwrap_or_default(),
        text,
        score,
        relevance_score: score * 100.0,
        published_date: raw.published_date.clone(),
        author: raw.author.clone(),
        source: ResultSource::Neural,
    })
}

fn basic_result(raw: &ExaResult) -> SearchResult {
    let score = raw.score.unwrap_or(0.0);
    SearchResult {
        title: title_or_default(raw),
        url: raw.url.clone().unwrap_or_default(),
        text: String::new(),
        score,
        relevance_score: score * 100.0,
        published_date: raw.published_date.clone(),
        author: raw.author.clone(),
        source: ResultSource::Basic,
    }
}

fn title_or_default(raw: &ExaResult) -> String {
    raw.title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_TITLE)
        .to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: Option<&str>, text: Option<String>) -> ExaResult {
        ExaResult {
            title: title.map(str::to_string),
            url: Some("https://example.com".into()),
            text,
            score: Some(0.5),
            ..Default::default()
        }
    }

    fn response(results: Vec<ExaResult>) -> SearchResponse {
        SearchResponse {
            results,
            ..Default::default()
        }
    }

    #[test]
    fn keeps_only_results_above_text_floor() {
        let resp = response(vec![
            raw(Some("short"), Some("a".repeat(50))),
            raw(Some("long"), Some("b".repeat(150))),
        ]);

        let results = neural_results(&resp);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "long");
        assert_eq!(results[0].text.len(), 150);
    }

    #[test]
    fn floor_counts_trimmed_text() {
        let padded = format!("{}{}", " ".repeat(200), "x".repeat(99));
        let resp = response(vec![raw(Some("padded"), Some(padded))]);
        assert!(neural_results(&resp).is_empty());
    }

    #[test]
    fn truncates_long_text_to_exact_limit() {
        let resp = response(vec![raw(Some("big"), Some("z".repeat(5000)))]);
        let results = neural_results(&resp);
        assert_eq!(results[0].text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(2500);
        let resp = response(vec![raw(Some("accents"), Some(text))]);
        let results = neural_results(&resp);
        assert_eq!(results[0].text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let resp = response(vec![ExaResult {
            text: Some("t".repeat(120)),
            ..Default::default()
        }]);

        let result = &neural_results(&resp)[0];

        assert_eq!(result.title, NO_TITLE);
        assert_eq!(result.url, "");
        assert_eq!(result.score, 0.0);
        assert!(result.published_date.is_none());
        assert!(result.author.is_none());
        assert_eq!(result.source, ResultSource::Neural);
    }

    #[test]
    fn relevance_score_scales_score() {
        let resp = response(vec![raw(Some("t"), Some("x".repeat(100)))]);
        assert_eq!(neural_results(&resp)[0].relevance_score, 50.0);
    }

    #[test]
    fn basic_results_have_empty_text() {
        let resp = response(vec![
            raw(None, Some("ignored body text".into())),
            raw(Some("  "), None),
        ]);

        let results = basic_results(&resp);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.text.is_empty()));
        assert!(results.iter().all(|r| r.source == ResultSource::Basic));
        assert!(results.iter().all(|r| r.title == NO_TITLE));
    }
}
