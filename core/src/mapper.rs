//! Mapping of EBI Search records to normalized entries and matches, plus the
//! local sort and page step used when specific ids were requested.
//!
//! # Design
//! Every function here is pure. Records that break the service's usual
//! guarantees (no id, no label of any kind) still map: the missing parts
//! become empty strings and a warning is logged.

use std::cmp::Ordering;

use tracing::warn;

use crate::types::{
    Entry, ExtraFields, Match, MatchType, RawFields, SearchResponse, SortKey, Term,
};

/// `active[0]` value of a record that is not obsolete.
const ACTIVE: &str = "Active";

/// Maps raw records for one dictionary.
#[derive(Debug, Clone, Copy)]
pub struct ResponseMapper<'a> {
    dict_id: &'a str,
}

impl<'a> ResponseMapper<'a> {
    pub fn new(dict_id: &'a str) -> Self {
        Self { dict_id }
    }

    pub fn map_entries(&self, response: &SearchResponse) -> Vec<Entry> {
        response
            .entries
            .iter()
            .map(|raw| self.map_entry(&raw.fields))
            .collect()
    }

    /// Like [`map_entries`](Self::map_entries), with each record's main term
    /// classified against the searched `text`.
    pub fn map_matches(&self, response: &SearchResponse, text: &str) -> Vec<Match> {
        response
            .entries
            .iter()
            .map(|raw| {
                let entry = self.map_entry(&raw.fields);
                let label = entry.main_term().to_string();
                let match_type = if label.starts_with(text) {
                    MatchType::StartsWith
                } else {
                    MatchType::Other
                };
                Match {
                    id: entry.id,
                    dict_id: entry.dict_id,
                    str: label,
                    descr: entry.descr,
                    match_type,
                    terms: entry.terms,
                    z: entry.z,
                }
            })
            .collect()
    }

    fn map_entry(&self, fields: &RawFields) -> Entry {
        let record_id = first(&fields.id);
        if record_id.is_empty() {
            warn!("EBI Search record without an id");
        }
        Entry {
            id: format!("{}/rna/{record_id}", self.dict_id),
            dict_id: self.dict_id.to_string(),
            descr: first(&fields.description).to_string(),
            terms: build_terms(fields),
            z: Some(extra_fields(fields)),
        }
    }
}

fn first(values: &[String]) -> &str {
    values.first().map(String::as_str).unwrap_or("")
}

/// Where a record's main term came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainTermSource {
    Name,
    Gene,
    GeneSynonym,
    Missing,
}

/// First non-empty of `name`, `gene`, `gene_synonym`.
fn main_term(fields: &RawFields) -> (&str, MainTermSource) {
    if let Some(name) = fields.name.first() {
        (name.as_str(), MainTermSource::Name)
    } else if let Some(gene) = fields.gene.first() {
        (gene.as_str(), MainTermSource::Gene)
    } else if let Some(synonym) = fields.gene_synonym.first() {
        (synonym.as_str(), MainTermSource::GeneSynonym)
    } else {
        (first(&fields.id), MainTermSource::Missing)
    }
}

/// Main term first, then gene names and synonyms without duplicates.
///
/// A main term taken from the gene lists is not repeated as a synonym. A
/// main term taken from `name` is never compared with the synonyms.
pub fn build_terms(fields: &RawFields) -> Vec<Term> {
    let (main, source) = main_term(fields);
    let main = match source {
        MainTermSource::Missing => {
            warn!(record = main, "EBI Search record without name, gene or gene synonym");
            ""
        }
        _ => main,
    };

    let from_gene_lists = matches!(source, MainTermSource::Gene | MainTermSource::GeneSynonym);
    let synonyms = extract_synonyms(&fields.gene, &fields.gene_synonym)
        .into_iter()
        .filter(|synonym| !(from_gene_lists && synonym == main));

    std::iter::once(Term::new(main))
        .chain(synonyms.map(Term::new))
        .collect()
}

/// `gene` followed by `gene_synonyms`, exact duplicates removed, first
/// occurrence kept.
pub fn extract_synonyms(gene: &[String], gene_synonyms: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(gene.len() + gene_synonyms.len());
    for synonym in gene.iter().chain(gene_synonyms) {
        if !out.contains(synonym) {
            out.push(synonym.clone());
        }
    }
    out
}

/// The `z` bag, holding only the keys the record has a value for.
///
/// `obsolete` is true iff `active[0]` is present and is not `"Active"`.
pub fn extra_fields(fields: &RawFields) -> ExtraFields {
    ExtraFields {
        obsolete: fields.active.first().map(|state| state != ACTIVE),
        databases: Some(fields.expert_db.clone()).filter(|dbs| !dbs.is_empty()),
        rna_type: fields.rna_type.first().cloned(),
        species: fields.species.first().cloned(),
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sort entries fetched by id, ignoring case.
///
/// [`SortKey::Str`] orders by main term and breaks ties by id.
pub fn sort_entries(mut entries: Vec<Entry>, key: SortKey) -> Vec<Entry> {
    match key {
        SortKey::Id => entries.sort_by(|a, b| cmp_ignore_case(&a.id, &b.id)),
        SortKey::Str => entries.sort_by(|a, b| {
            cmp_ignore_case(a.main_term(), b.main_term()).then_with(|| cmp_ignore_case(&a.id, &b.id))
        }),
    }
    entries
}

/// One page of `items`. A missing or zero `page` is the first page, a
/// missing or zero `per_page` is `default_per_page`. There is no upper cap
/// on `per_page` here. Pages past the end are empty.
pub fn paginate<T>(
    items: Vec<T>,
    page: Option<usize>,
    per_page: Option<usize>,
    default_per_page: usize,
) -> Vec<T> {
    let page = page.filter(|p| *p >= 1).unwrap_or(1);
    let per_page = per_page.filter(|n| *n >= 1).unwrap_or(default_per_page);
    let start = (page - 1).saturating_mul(per_page);

    items.into_iter().skip(start).take(per_page).collect()
}
