//! Synchronous dictionary client for RNAcentral records served by EBI Search.
//!
//! # Overview
//! Given record ids or free text, builds the EBI Search request URL and maps
//! the JSON response into normalized entry and match objects. The client
//! never touches the network itself (host-does-IO pattern): the caller
//! executes the HTTP round trip, either by hand between `build_*` and
//! `parse_*` or by handing a [`Transport`] to [`RnaCentralDictionary`].
//!
//! # Design
//! - `RnaCentralClient` is stateless; it holds only a `DictionaryConfig`.
//! - URL construction lives in `query`, record mapping, sorting and paging
//!   in `mapper`, extra-field selection in `prune`. All three are pure.
//! - `Dictionary` is the lookup interface shared by dictionary sources;
//!   pruning is an explicit step of the implementation, not a base class.

pub mod client;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod http;
pub mod mapper;
pub mod prune;
pub mod query;
pub mod types;

pub use client::RnaCentralClient;
pub use config::DictionaryConfig;
pub use dictionary::{Dictionary, RnaCentralDictionary};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport};
pub use prune::{prune_extra_fields, ZSelector};
pub use types::{
    DictInfo, Entry, EntryFilter, EntryOptions, ExtraFields, ItemList, Match, MatchOptions,
    MatchType, SortKey, Term,
};
