//! Search across entity types.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::http::HttpMethod;
use crate::params::ParamsMap;
use crate::transport::{Transport, UreqTransport};
use crate::types::{SearchResult, SearchResultType};

const QUERY: &str = "query";
const LIMIT: &str = "limit";
const SEARCH_TYPES: &str = "searchtypes";

pub type SearchResults = HashMap<SearchResultType, Vec<SearchResult>>;

pub struct SearchService<T = UreqTransport> {
    executor: Arc<RequestExecutor<T>>,
    base_url: String,
}

impl<T: Transport> SearchService<T> {
    /// `base_url` is the API root, e.g. `https://tenant.example.com/api`.
    pub fn new(executor: Arc<RequestExecutor<T>>, base_url: &str) -> Self {
        Self {
            executor,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search for `query`, optionally restricted to `types`. A `None` limit
    /// leaves the server default in place.
    pub fn search(
        &self,
        query: &str,
        types: &[SearchResultType],
        limit: Option<u32>,
    ) -> Result<SearchResults, ApiError> {
        let url = format!("{}/search", self.base_url);
        let body = self
            .executor
            .execute_form(&url, search_params(query, types, limit), HttpMethod::Get)?;
        parse_results(&body)
    }
}

fn search_params(query: &str, types: &[SearchResultType], limit: Option<u32>) -> ParamsMap {
    let mut params = ParamsMap::new();
    params.add_param(QUERY, query.trim());
    params.add_optional_param(LIMIT, limit.map(|l| l.to_string()));
    if !types.is_empty() {
        let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        params.add_param(SEARCH_TYPES, format!("[{}]", names.join(",")));
    }
    params
}

fn parse_results(body: &str) -> Result<SearchResults, ApiError> {
    let raw: HashMap<String, Vec<SearchResult>> =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    let mut results = SearchResults::new();
    for (name, hits) in raw {
        match name.parse::<SearchResultType>() {
            Ok(kind) => {
                results.insert(kind, hits);
            }
            Err(reason) => tracing::debug!(%reason, "skipping search results"),
        }
    }
    Ok(results)
}
