//! Request URL construction for EBI Search.
//!
//! # Design
//! Three URL shapes exist: fetch-by-ids (`<base>/entry/<ids>?fields=...`),
//! browse-all (`<base>?query=domain_source:<domain>&fields=...`) and text
//! search (`<base>?query=<text>&fields=...`). The last two are paginated
//! with `size`/`start`; fetch-by-ids is not, because the service returns
//! exactly the ids asked for. All three end in `&format=<format>`, and all
//! pagination goes through [`QueryBuilder::page_window`] so the clamp rules
//! live in one place.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::{DictionaryConfig, IDS_PLACEHOLDER, QUERY_PLACEHOLDER};
use crate::types::{EntryOptions, MatchOptions};

/// Everything except `A-Z a-z 0-9 - _ . ~` is escaped, `* ( ) ! '` included.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Tokens shorter than this are searched verbatim, without a wildcard.
const MIN_WILDCARD_LEN: usize = 3;

/// Percent-encode a query component.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// `https://rnacentral.org/rna/URS0000301B08_9606` -> `URS0000301B08_9606`.
/// A plain id is returned as is.
pub fn last_path_segment(s: &str) -> &str {
    s.rsplit('/').next().unwrap_or(s)
}

/// Rewrite free text into EBI Search query syntax.
///
/// `and`/`or`/`not` in any casing become boolean operators; every other
/// token of at least three characters gets a trailing `*`.
pub fn extended_search_string(text: &str) -> String {
    text.trim()
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| match word.to_lowercase().as_str() {
            "and" => "AND".to_string(),
            "or" => "OR".to_string(),
            "not" => "NOT".to_string(),
            _ if word.chars().count() < MIN_WILDCARD_LEN => word.to_string(),
            _ => format!("{word}*"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `size` and `start` for one page of a paginated search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub size: usize,
    pub start: usize,
}

/// Builds request URLs from a [`DictionaryConfig`].
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    config: &'a DictionaryConfig,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(config: &'a DictionaryConfig) -> Self {
        Self { config }
    }

    /// URL for `get_entries`: fetch-by-ids when any id is non-blank,
    /// browse-all otherwise.
    pub fn entry_search_url(&self, options: &EntryOptions) -> String {
        let ids: Vec<&str> = options
            .filter
            .id
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(last_path_segment)
            .collect();

        if ids.is_empty() {
            let browse_query = format!("?query=domain_source:{}", self.config.domain);
            let url = self
                .config
                .entry_url_template
                .replace(&format!("/entry/{IDS_PLACEHOLDER}"), &browse_query);
            let window = self.page_window(options.page, options.per_page);
            self.assemble(url, '&', Some(window))
        } else {
            let url = self
                .config
                .entry_url_template
                .replace(IDS_PLACEHOLDER, &ids.join(","));
            self.assemble(url, '?', None)
        }
    }

    /// URL for `get_matches_for_text`. `text` is expected to be non-blank.
    pub fn match_search_url(&self, text: &str, options: &MatchOptions) -> String {
        let query = encode_component(&extended_search_string(text));
        let url = self
            .config
            .match_url_template
            .replace(QUERY_PLACEHOLDER, &query);
        let window = self.page_window(options.page, options.per_page);
        self.assemble(url, '&', Some(window))
    }

    /// Page size and start offset for a paginated search.
    ///
    /// A `per_page` above the service maximum falls back to the default
    /// size rather than being capped. `start` never reaches
    /// `max_start_offset`.
    pub fn page_window(&self, page: Option<usize>, per_page: Option<usize>) -> PageWindow {
        let size = per_page
            .filter(|n| (1..=self.config.max_page_size).contains(n))
            .unwrap_or(self.config.default_page_size);

        let start = page
            .filter(|p| *p >= 1)
            .map(|p| (p - 1).saturating_mul(size))
            .unwrap_or(0);
        let start = if start >= self.config.max_start_offset {
            self.config.max_start_offset.saturating_sub(1)
        } else {
            start
        };

        PageWindow { size, start }
    }

    fn assemble(&self, mut url: String, fields_sep: char, window: Option<PageWindow>) -> String {
        url.push(fields_sep);
        url.push_str("fields=");
        url.push_str(&encode_component(&self.config.fields_param()));
        if let Some(PageWindow { size, start }) = window {
            url.push_str(&format!("&size={size}&start={start}"));
        }
        url.push_str("&format=");
        url.push_str(&self.config.format);
        url
    }
}
