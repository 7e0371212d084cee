//! Search wrapper over the Exa API: defensive pass-through calls and the
//! comprehensive search with its single basic-search fallback.

pub mod extract;
pub mod outcome;
pub mod params;

pub use outcome::{ResultSource, SearchOutcome, SearchResult, SearchStrategy};
pub use params::{ComprehensiveFilters, ContentsFlags, SearchError, SearchOptions};

use tracing::{debug, info, warn};

use crate::exa::types::{ContentsRequest, FindSimilarRequest, SearchResponse};
use crate::exa::{ExaApi, ExaError};

/// Why a comprehensive search ended without results.
#[derive(Debug, thiserror::Error)]
enum ComprehensiveError {
    #[error("{0}")]
    Unavailable(ExaError),

    #[error("{0}")]
    Local(#[from] SearchError),

    #[error("basic search failed: {0}")]
    Fallback(ExaError),
}

/// Wrapper around an optional Exa client. Built without a client it stays
/// unavailable for its whole lifetime; every call then short-circuits.
pub struct SearchService<C> {
    client: Option<C>,
}

impl<C: ExaApi> SearchService<C> {
    pub fn new(client: Option<C>) -> Self {
        if client.is_none() {
            warn!("Exa client not configured; search is unavailable");
        }
        Self { client }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Raw search. `None` when unavailable, on invalid parameters, or when the call fails.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Option<SearchResponse> {
        let client = self.available_client()?;
        let request = params::build_search_request(query, options)
            .inspect_err(|e| warn!(error = %e, "invalid search parameters"))
            .ok()?;

        match client.search(&request).await {
            Ok(response) => {
                info!(results = response.results.len(), "exa search complete");
                Some(response)
            }
            Err(e) => {
                warn!(error = %e, query = %request.query, "exa search failed");
                None
            }
        }
    }

    pub async fn get_contents(
        &self,
        ids: &[String],
        flags: &ContentsFlags,
    ) -> Option<SearchResponse> {
        let client = self.available_client()?;
        let request = ContentsRequest {
            ids: ids.to_vec(),
            text: flags.text,
            highlights: flags.highlights,
            summary: flags.summary,
        };

        match client.get_contents(&request).await {
            Ok(response) => {
                info!(contents = response.results.len(), "exa contents complete");
                Some(response)
            }
            Err(e) => {
                warn!(error = %e, ids = ids.len(), "exa contents failed");
                None
            }
        }
    }

    pub async fn find_similar(
        &self,
        url: &str,
        num_results: u32,
        exclude_source_domain: bool,
    ) -> Option<SearchResponse> {
        let client = self.available_client()?;
        params::validate_similar_url(url)
            .inspect_err(|e| warn!(error = %e, "invalid similarity URL"))
            .ok()?;
        let request = FindSimilarRequest {
            url: url.to_string(),
            num_results,
            exclude_source_domain,
        };

        match client.find_similar(&request).await {
            Ok(response) => {
                info!(similar = response.results.len(), "exa find_similar complete");
                Some(response)
            }
            Err(e) => {
                warn!(error = %e, url, "exa find_similar failed");
                None
            }
        }
    }

    /// Neural search with page contents, falling back once to a basic search
    /// when the remote call fails. Never fails outward.
    pub async fn search_comprehensive(
        &self,
        query: &str,
        num_results: u32,
        filters: &ComprehensiveFilters,
    ) -> SearchOutcome {
        info!(query, num_results, "starting comprehensive search");
        match self.run_comprehensive(query, num_results, filters).await {
            Ok(outcome) => {
                info!(
                    results = outcome.total_results,
                    strategy = ?outcome.search_strategy,
                    "comprehensive search complete"
                );
                outcome
            }
            Err(e) => {
                warn!(error = %e, query, "comprehensive search failed");
                SearchOutcome::failed(query, e)
            }
        }
    }

    async fn run_comprehensive(
        &self,
        query: &str,
        num_results: u32,
        filters: &ComprehensiveFilters,
    ) -> Result<SearchOutcome, ComprehensiveError> {
        let client = self
            .client
            .as_ref()
            .ok_or(ComprehensiveError::Unavailable(ExaError::ApiKeyNotSet))?;

        let request = params::build_comprehensive_request(query, num_results, filters)?;
        debug!(num_results = request.num_results, "primary request built");

        match client.search(&request).await {
            Ok(response) => {
                let results = extract::neural_results(&response);
                Ok(
                    SearchOutcome::succeeded(query, results, SearchStrategy::ComprehensiveNeural)
                        .with_params(request),
                )
            }
            Err(e) => {
                warn!(error = %e, "neural search failed, falling back to basic search");
                let fallback = params::build_fallback_request(query, num_results);
                let response = client
                    .search(&fallback)
                    .await
                    .map_err(ComprehensiveError::Fallback)?;
                let results = extract::basic_results(&response);
                Ok(SearchOutcome::succeeded(
                    query,
                    results,
                    SearchStrategy::BasicFallback,
                ))
            }
        }
    }

    fn available_client(&self) -> Option<&C> {
        if self.client.is_none() {
            warn!("Exa is not available");
        }
        self.client.as_ref()
    }
}
