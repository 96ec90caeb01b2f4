//! In-memory stand-in for the EBI Search REST API, `rnacentral` domain.
//!
//! Serves the two endpoints the dictionary client calls:
//! `GET {BASE_PATH}?query=...` and `GET {BASE_PATH}/entry/{ids}`. Query
//! support is a small subset of EBI Search syntax: bare terms, trailing `*`
//! wildcards, `AND`/`OR`/`NOT`, and the `domain_source:rnacentral` browse
//! query. Limits on `size` and `start` match the real service.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const BASE_PATH: &str = "/ebisearch/ws/rest/rnacentral";
pub const MAX_SIZE: usize = 100;
pub const MAX_START: usize = 1_000_000;
const DEFAULT_SIZE: usize = 15;
const BROWSE_QUERY: &str = "domain_source:rnacentral";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub source: String,
    pub fields: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "hitCount")]
    pub hit_count: usize,
    pub entries: Vec<Record>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub fields: Option<String>,
    pub size: Option<usize>,
    pub start: Option<usize>,
    pub format: Option<String>,
}

#[derive(Deserialize)]
pub struct EntryParams {
    pub fields: Option<String>,
    pub format: Option<String>,
}

pub type Db = Arc<RwLock<BTreeMap<String, Record>>>;

type ApiResult = Result<Json<SearchResult>, (StatusCode, Json<Value>)>;

/// The records bundled in `fixtures/records.json`.
pub fn fixture_records() -> Vec<Record> {
    serde_json::from_str(include_str!("../fixtures/records.json"))
        .expect("bundled fixture records are valid JSON")
}

pub fn app() -> Router {
    app_with(fixture_records())
}

pub fn app_with(records: Vec<Record>) -> Router {
    let db: Db = Arc::new(RwLock::new(
        records.into_iter().map(|r| (r.id.clone(), r)).collect(),
    ));
    Router::new()
        .route(BASE_PATH, get(search))
        .route(&format!("{BASE_PATH}/entry/{{ids}}"), get(get_entries))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn search(State(db): State<Db>, Query(params): Query<SearchParams>) -> ApiResult {
    check_format(params.format.as_deref())?;
    let size = params.size.unwrap_or(DEFAULT_SIZE);
    if size > MAX_SIZE {
        return Err(bad_request(format!("size must be between 0 and {MAX_SIZE}")));
    }
    let start = params.start.unwrap_or(0);
    if start >= MAX_START {
        return Err(bad_request(format!("start must be lower than {MAX_START}")));
    }

    let records = db.read().await;
    let hits: Vec<&Record> = records
        .values()
        .filter(|r| matches_query(&params.query, r))
        .collect();
    debug!(query = %params.query, hits = hits.len(), "search");

    let fields = requested_fields(params.fields.as_deref());
    Ok(Json(SearchResult {
        hit_count: hits.len(),
        entries: hits
            .into_iter()
            .skip(start)
            .take(size)
            .map(|r| project(r, &fields))
            .collect(),
    }))
}

async fn get_entries(
    State(db): State<Db>,
    Path(ids): Path<String>,
    Query(params): Query<EntryParams>,
) -> ApiResult {
    check_format(params.format.as_deref())?;
    let records = db.read().await;
    let fields = requested_fields(params.fields.as_deref());
    let entries: Vec<Record> = ids
        .split(',')
        .filter_map(|id| records.get(id))
        .map(|r| project(r, &fields))
        .collect();
    debug!(%ids, found = entries.len(), "entry lookup");

    Ok(Json(SearchResult {
        hit_count: entries.len(),
        entries,
    }))
}

fn bad_request(message: String) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "errorMessage": message })))
}

fn check_format(format: Option<&str>) -> Result<(), (StatusCode, Json<Value>)> {
    match format {
        None | Some("json") => Ok(()),
        Some(other) => Err(bad_request(format!("unsupported format: {other}"))),
    }
}

fn requested_fields(fields: Option<&str>) -> Vec<String> {
    fields
        .unwrap_or("")
        .split(',')
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Copy of `record` carrying only `fields`. A requested field the record
/// lacks comes back as an empty list, as EBI Search does.
fn project(record: &Record, fields: &[String]) -> Record {
    Record {
        id: record.id.clone(),
        source: record.source.clone(),
        fields: fields
            .iter()
            .map(|f| (f.clone(), record.fields.get(f).cloned().unwrap_or_default()))
            .collect(),
    }
}

#[derive(Clone, Copy)]
enum Op {
    And,
    Or,
    Not,
}

/// Evaluate a query left to right. Adjacent terms are joined with `AND`.
pub fn matches_query(query: &str, record: &Record) -> bool {
    if query.trim() == BROWSE_QUERY {
        return true;
    }

    let words = searchable_words(record);
    let mut result: Option<bool> = None;
    let mut op = Op::And;
    for token in query.split_whitespace() {
        match token {
            "AND" => op = Op::And,
            "OR" => op = Op::Or,
            "NOT" => op = Op::Not,
            term => {
                let hit = term_matches(term, &words);
                result = Some(match (result, op) {
                    (None, Op::Not) => !hit,
                    (None, _) => hit,
                    (Some(acc), Op::And) => acc && hit,
                    (Some(acc), Op::Or) => acc || hit,
                    (Some(acc), Op::Not) => acc && !hit,
                });
                op = Op::And;
            }
        }
    }
    result.unwrap_or(false)
}

fn searchable_words(record: &Record) -> Vec<String> {
    ["name", "description", "gene", "gene_synonym"]
        .iter()
        .filter_map(|field| record.fields.get(*field))
        .flatten()
        .flat_map(|value| {
            value
                .split(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.')))
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn term_matches(term: &str, words: &[String]) -> bool {
    let term = term.to_lowercase();
    match term.strip_suffix('*') {
        Some(prefix) => words.iter().any(|w| w.starts_with(prefix)),
        None => words.iter().any(|w| *w == term),
    }
}
