use chrono::{DateTime, NaiveDate};

use crate::exa::types::{ContentsOptions, SearchRequest, SearchType, TextOptions};

/// Result cap for the comprehensive (neural with contents) strategy.
pub const MAX_COMPREHENSIVE_RESULTS: u32 = 20;
/// Result cap for the basic fallback strategy.
pub const MAX_FALLBACK_RESULTS: u32 = 10;
pub const DEFAULT_NUM_RESULTS: u32 = 10;
pub const DEFAULT_MIN_LENGTH: usize = 200;
pub const DEFAULT_MAX_LENGTH: usize = 2000;

/// Local parameter errors, raised before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("invalid date '{0}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),

    #[error("invalid text length bounds: min {min} exceeds max {max}")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("invalid URL '{0}': must be HTTP(S)")]
    InvalidUrl(String),
}

/// Options for a plain `search` call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub num_results: u32,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub start_crawl_date: Option<String>,
    pub end_crawl_date: Option<String>,
    pub start_published_date: Option<String>,
    pub end_published_date: Option<String>,
    pub use_autoprompt: bool,
    pub search_type: SearchType,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
            start_crawl_date: None,
            end_crawl_date: None,
            start_published_date: None,
            end_published_date: None,
            use_autoprompt: true,
            search_type: SearchType::Neural,
        }
    }
}

/// Which content kinds `get_contents` asks for.
#[derive(Debug, Clone, Copy)]
pub struct ContentsFlags {
    pub text: bool,
    pub highlights: bool,
    pub summary: bool,
}

impl Default for ContentsFlags {
    fn default() -> Self {
        Self {
            text: true,
            highlights: false,
            summary: false,
        }
    }
}

/// Optional filters for `search_comprehensive`.
#[derive(Debug, Clone, Default)]
pub struct ComprehensiveFilters {
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

pub fn build_search_request(
    query: &str,
    options: &SearchOptions,
) -> Result<SearchRequest, SearchError> {
    let query = validate_query(query)?;
    let mut request = SearchRequest::new(query, options.num_results);
    request.use_autoprompt = options.use_autoprompt;
    request.search_type = Some(options.search_type);
    request.include_domains = non_blank(&options.include_domains);
    request.exclude_domains = non_blank(&options.exclude_domains);
    request.start_crawl_date = validate_date(options.start_crawl_date.as_deref())?;
    request.end_crawl_date = validate_date(options.end_crawl_date.as_deref())?;
    request.start_published_date = validate_date(options.start_published_date.as_deref())?;
    request.end_published_date = validate_date(options.end_published_date.as_deref())?;
    Ok(request)
}

/// Neural search-with-contents request used as the primary strategy.
pub fn build_comprehensive_request(
    query: &str,
    num_results: u32,
    filters: &ComprehensiveFilters,
) -> Result<SearchRequest, SearchError> {
    let query = validate_query(query)?;
    let min = filters.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
    let max = filters.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
    if min > max {
        return Err(SearchError::InvalidLengthBounds { min, max });
    }

    let mut request = SearchRequest::new(query, num_results.min(MAX_COMPREHENSIVE_RESULTS));
    request.search_type = Some(SearchType::Neural);
    request.include_domains = non_blank(&filters.include_domains);
    request.exclude_domains = non_blank(&filters.exclude_domains);
    request.start_crawl_date = validate_date(filters.start_date.as_deref())?;
    request.end_crawl_date = validate_date(filters.end_date.as_deref())?;
    request.contents = Some(ContentsOptions {
        text: TextOptions {
            min_characters: Some(min),
            max_characters: Some(max),
        },
    });
    Ok(request)
}

/// Basic keyword search used when the primary request fails. No contents.
pub fn build_fallback_request(query: &str, num_results: u32) -> SearchRequest {
    let mut request = SearchRequest::new(query.trim(), num_results.min(MAX_FALLBACK_RESULTS));
    request.search_type = Some(SearchType::Keyword);
    request
}

pub fn validate_similar_url(raw: &str) -> Result<(), SearchError> {
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(SearchError::InvalidUrl(raw.to_string())),
    }
}

fn validate_query(query: &str) -> Result<&str, SearchError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(trimmed)
}

fn validate_date(date: Option<&str>) -> Result<Option<String>, SearchError> {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    let valid = NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(date).is_ok();
    if !valid {
        return Err(SearchError::InvalidDate(date.to_string()));
    }
    Ok(Some(date.to_string()))
}

fn non_blank(domains: &[String]) -> Vec<String> {
    domains
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
