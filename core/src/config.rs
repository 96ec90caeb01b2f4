//! Construction-time configuration of the RNAcentral dictionary.
//!
//! # Design
//! `DictionaryConfig` is immutable once a client is built from it. The two
//! URL templates are derived from `base_url` unless given explicitly, so a
//! test can point the whole client at a mock server by swapping one string.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_DICT_ID: &str = "https://www.rnacentral.org";
pub const DEFAULT_BASE_URL: &str = "https://www.ebi.ac.uk/ebisearch/ws/rest/rnacentral";
pub const DEFAULT_DOMAIN: &str = "rnacentral";
pub const DEFAULT_FIELDS: [&str; 9] = [
    "id",
    "name",
    "description",
    "gene",
    "gene_synonym",
    "active",
    "expert_db",
    "rna_type",
    "species",
];

/// Placeholder for the comma-joined id list in the entry template.
pub const IDS_PLACEHOLDER: &str = "$ids";
/// Placeholder for the encoded query string in the match template.
pub const QUERY_PLACEHOLDER: &str = "$queryString";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryConfig {
    pub dict_id: String,
    /// Fields requested from EBI Search, in request order.
    pub fields: Vec<String>,
    pub base_url: String,
    pub domain: String,
    pub entry_url_template: String,
    pub match_url_template: String,
    pub default_page_size: usize,
    /// Largest `size` the service accepts.
    pub max_page_size: usize,
    /// The service rejects any `start` at or beyond this value.
    pub max_start_offset: usize,
    pub format: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl DictionaryConfig {
    /// Default configuration with both URL templates rooted at `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            dict_id: DEFAULT_DICT_ID.to_string(),
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            entry_url_template: entry_template(&base_url),
            match_url_template: match_template(&base_url),
            base_url,
            domain: DEFAULT_DOMAIN.to_string(),
            default_page_size: 50,
            max_page_size: 100,
            max_start_offset: 1_000_000,
            format: "json".to_string(),
        }
    }

    /// The same configuration with both URL templates re-derived from a new
    /// base.
    pub fn rebased(self, base_url: &str) -> Self {
        let base = Self::with_base_url(base_url);
        Self {
            base_url: base.base_url,
            entry_url_template: base.entry_url_template,
            match_url_template: base.match_url_template,
            ..self
        }
    }

    /// Read a (possibly partial) JSON configuration document.
    ///
    /// Missing keys take their defaults; missing templates are derived from
    /// the effective `base_url`.
    pub fn from_json(doc: &str) -> Result<Self, ApiError> {
        let file: ConfigFile =
            serde_json::from_str(doc).map_err(|e| ApiError::Config(e.to_string()))?;

        let mut config = Self::with_base_url(file.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
        if let Some(dict_id) = file.dict_id {
            config.dict_id = dict_id;
        }
        if let Some(fields) = file.fields {
            config.fields = fields;
        }
        if let Some(domain) = file.domain {
            config.domain = domain;
        }
        if let Some(template) = file.entry_url_template {
            config.entry_url_template = template;
        }
        if let Some(template) = file.match_url_template {
            config.match_url_template = template;
        }
        if let Some(size) = file.default_page_size {
            config.default_page_size = size;
        }
        if let Some(size) = file.max_page_size {
            config.max_page_size = size;
        }
        if let Some(offset) = file.max_start_offset {
            config.max_start_offset = offset;
        }
        if let Some(format) = file.format {
            config.format = format;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.default_page_size == 0 {
            return Err(ApiError::Config("default_page_size must be at least 1".to_string()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ApiError::Config(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        if self.max_start_offset == 0 {
            return Err(ApiError::Config("max_start_offset must be at least 1".to_string()));
        }
        if self.fields.is_empty() {
            return Err(ApiError::Config("fields must not be empty".to_string()));
        }
        Ok(())
    }

    /// The field list as sent to the service, before encoding.
    pub fn fields_param(&self) -> String {
        self.fields.join(",")
    }
}

fn entry_template(base_url: &str) -> String {
    format!("{base_url}/entry/{IDS_PLACEHOLDER}")
}

fn match_template(base_url: &str) -> String {
    format!("{base_url}?query={QUERY_PLACEHOLDER}")
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    dict_id: Option<String>,
    fields: Option<Vec<String>>,
    base_url: Option<String>,
    domain: Option<String>,
    entry_url_template: Option<String>,
    match_url_template: Option<String>,
    default_page_size: Option<usize>,
    max_page_size: Option<usize>,
    max_start_offset: Option<usize>,
    format: Option<String>,
}
