//! Domain types: caller options, raw EBI Search records and the normalized
//! entry/match objects handed back to callers.
//!
//! # Design
//! The raw types mirror the EBI Search JSON shape but are defined
//! independently from the mock server's copy; integration tests catch drift.
//!
//! Caller options deserialize leniently. A `page` that is not a positive
//! integer, a `sort` that is not a string or a `filter.id` that is not a
//! list of strings all degrade to "absent" instead of failing, so a caller
//! forwarding loosely typed JSON always gets a request built from defaults.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::prune::ZSelector;

// ---------------------------------------------------------------------------
// Caller options
// ---------------------------------------------------------------------------

/// Options accepted by `get_entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOptions {
    #[serde(default, deserialize_with = "lenient_filter")]
    pub filter: EntryFilter,
    #[serde(default, deserialize_with = "positive_int")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "positive_int")]
    pub per_page: Option<usize>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sort: Option<String>,
    #[serde(default)]
    pub z: ZSelector,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryFilter {
    /// Record ids or record URLs; only the last path segment is sent.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub id: Vec<String>,
}

/// Options accepted by `get_matches_for_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    #[serde(default, deserialize_with = "positive_int")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "positive_int")]
    pub per_page: Option<usize>,
    #[serde(default)]
    pub z: ZSelector,
}

impl EntryOptions {
    /// Options requesting the given ids, everything else defaulted.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter: EntryFilter {
                id: ids.into_iter().map(Into::into).collect(),
            },
            ..Self::default()
        }
    }

    /// True when at least one requested id is non-blank.
    ///
    /// Decides both the URL shape and whether results are sorted and paged
    /// locally, so an all-blank list browses and keeps the service's page.
    pub fn has_id_filter(&self) -> bool {
        self.filter.id.iter().any(|id| !id.trim().is_empty())
    }
}

/// Ordering applied to entries fetched by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Str,
}

impl SortKey {
    /// `"id"` and `"dictID"` sort by id, `"str"` by main term. Anything else
    /// falls back to id.
    pub fn parse(sort: Option<&str>) -> Self {
        match sort {
            Some("str") => SortKey::Str,
            _ => SortKey::Id,
        }
    }
}

/// Integers and whole-valued floats (`2.0`) of at least 1.
fn positive_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().and_then(whole_float)))
        .filter(|n| *n >= 1)
        .and_then(|n| usize::try_from(n).ok()))
}

fn whole_float(f: f64) -> Option<u64> {
    (f.is_finite() && f.fract() == 0.0 && f >= 1.0 && f <= u64::MAX as f64).then(|| f as u64)
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(Value::as_str).map(str::to_string))
}

fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_filter<'de, D: Deserializer<'de>>(d: D) -> Result<EntryFilter, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Raw EBI Search response
// ---------------------------------------------------------------------------

/// Top-level EBI Search response. Other keys (`hitCount`, `facets`, ...)
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub fields: RawFields,
}

/// Every EBI Search field is multi-valued, even the logically single ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    #[serde(default)]
    pub id: Vec<String>,
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub gene: Vec<String>,
    #[serde(default)]
    pub gene_synonym: Vec<String>,
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default)]
    pub expert_db: Vec<String>,
    #[serde(default)]
    pub rna_type: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
}

// ---------------------------------------------------------------------------
// Normalized objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictInfo {
    pub id: String,
    pub abbrev: String,
    pub name: String,
}

/// Envelope for every successful lookup. `items` may be empty, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemList<T> {
    pub items: Vec<T>,
}

impl<T> ItemList<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub str: String,
}

impl Term {
    pub fn new(s: impl Into<String>) -> Self {
        Self { str: s.into() }
    }
}

/// Optional per-record extras. A key is present only when the service
/// returned a value for it; absence means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obsolete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<String>>,
    #[serde(default, rename = "RNAtype", skip_serializing_if = "Option::is_none")]
    pub rna_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

impl ExtraFields {
    pub fn is_empty(&self) -> bool {
        self.obsolete.is_none()
            && self.databases.is_none()
            && self.rna_type.is_none()
            && self.species.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(rename = "dictID")]
    pub dict_id: String,
    pub descr: String,
    /// Main term first, then deduplicated gene names and synonyms.
    pub terms: Vec<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<ExtraFields>,
}

impl Entry {
    /// The main term, or `""` for a record without terms.
    pub fn main_term(&self) -> &str {
        self.terms.first().map(|t| t.str.as_str()).unwrap_or("")
    }
}

/// How a match's main term relates to the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// The main term starts with the searched text.
    #[serde(rename = "S")]
    StartsWith,
    #[serde(rename = "T")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    #[serde(rename = "dictID")]
    pub dict_id: String,
    pub str: String,
    pub descr: String,
    #[serde(rename = "type")]
    pub match_type: MatchType,
    pub terms: Vec<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<ExtraFields>,
}
