//! Stateless HTTP request builder and response parser for EBI Search.
//!
//! # Design
//! `RnaCentralClient` holds only its configuration and carries no mutable
//! state between calls. Each lookup is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round trip, keeping
//! the client deterministic and free of I/O.

use tracing::debug;

use crate::config::DictionaryConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::mapper::{paginate, sort_entries, ResponseMapper};
use crate::prune::prune_extra_fields;
use crate::query::QueryBuilder;
use crate::types::{
    DictInfo, Entry, EntryOptions, ItemList, Match, MatchOptions, SearchResponse, SortKey,
};

const ABBREV: &str = "RNAcentral";
const NAME: &str = "RNAcentral";

/// Synchronous, stateless client for the RNAcentral domain of EBI Search.
#[derive(Debug, Clone)]
pub struct RnaCentralClient {
    config: DictionaryConfig,
}

impl Default for RnaCentralClient {
    fn default() -> Self {
        Self::new(DictionaryConfig::default())
    }
}

impl RnaCentralClient {
    pub fn new(config: DictionaryConfig) -> Self {
        Self { config }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(DictionaryConfig::with_base_url(base_url))
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    pub fn dictionary_info(&self) -> ItemList<DictInfo> {
        ItemList {
            items: vec![DictInfo {
                id: self.config.dict_id.clone(),
                abbrev: ABBREV.to_string(),
                name: NAME.to_string(),
            }],
        }
    }

    pub fn build_get_entries(&self, options: &EntryOptions) -> HttpRequest {
        let url = QueryBuilder::new(&self.config).entry_search_url(options);
        debug!(%url, "entry search");
        HttpRequest::get_json(url)
    }

    /// Map the response and, when ids were requested, sort and page locally.
    ///
    /// Requested ids the service did not return are left out.
    pub fn parse_get_entries(
        &self,
        options: &EntryOptions,
        response: HttpResponse,
    ) -> Result<ItemList<Entry>, ApiError> {
        let body = parse_search_response(response)?;
        let mut entries = ResponseMapper::new(&self.config.dict_id).map_entries(&body);

        if options.has_id_filter() {
            let requested = options.filter.id.iter().filter(|id| !id.trim().is_empty()).count();
            if entries.len() < requested {
                debug!(requested, returned = entries.len(), "some requested ids were not found");
            }
            let key = SortKey::parse(options.sort.as_deref());
            entries = paginate(
                sort_entries(entries, key),
                options.page,
                options.per_page,
                self.config.default_page_size,
            );
        }

        Ok(ItemList {
            items: prune_extra_fields(entries, &options.z),
        })
    }

    /// `None` when `text` is blank: there is nothing to ask the service.
    pub fn build_get_matches(&self, text: &str, options: &MatchOptions) -> Option<HttpRequest> {
        if text.trim().is_empty() {
            return None;
        }
        let url = QueryBuilder::new(&self.config).match_search_url(text, options);
        debug!(%url, "match search");
        Some(HttpRequest::get_json(url))
    }

    pub fn parse_get_matches(
        &self,
        text: &str,
        options: &MatchOptions,
        response: HttpResponse,
    ) -> Result<ItemList<Match>, ApiError> {
        let body = parse_search_response(response)?;
        let matches = ResponseMapper::new(&self.config.dict_id).map_matches(&body, text);
        Ok(ItemList {
            items: prune_extra_fields(matches, &options.z),
        })
    }
}

fn parse_search_response(response: HttpResponse) -> Result<SearchResponse, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map a non-200 status to `Service` when the body is JSON, `Http` otherwise.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(payload) => Err(ApiError::Service {
            status: response.status,
            payload,
        }),
        Err(_) => Err(ApiError::Http {
            status: response.status,
            body: response.body.clone(),
        }),
    }
}
