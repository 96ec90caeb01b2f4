//! The lookup interface shared by dictionary sources, and its RNAcentral
//! implementation.
//!
//! `RnaCentralDictionary` is the client plus a [`Transport`]: it builds the
//! request, hands it to the transport and parses whatever comes back. A
//! transport error is returned unchanged, with no retry.

use crate::client::RnaCentralClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{DictInfo, Entry, EntryOptions, ItemList, Match, MatchOptions};

pub trait Dictionary {
    fn dictionary_info(&self) -> ItemList<DictInfo>;

    fn get_entries(&self, options: &EntryOptions) -> Result<ItemList<Entry>, ApiError>;

    /// Blank `text` yields an empty list without contacting the service.
    fn get_matches_for_text(
        &self,
        text: &str,
        options: &MatchOptions,
    ) -> Result<ItemList<Match>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct RnaCentralDictionary<T> {
    client: RnaCentralClient,
    transport: T,
}

impl<T: Transport> RnaCentralDictionary<T> {
    pub fn new(client: RnaCentralClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &RnaCentralClient {
        &self.client
    }
}

impl<T: Transport> Dictionary for RnaCentralDictionary<T> {
    fn dictionary_info(&self) -> ItemList<DictInfo> {
        self.client.dictionary_info()
    }

    fn get_entries(&self, options: &EntryOptions) -> Result<ItemList<Entry>, ApiError> {
        let request = self.client.build_get_entries(options);
        let response = self.transport.execute(&request)?;
        self.client.parse_get_entries(options, response)
    }

    fn get_matches_for_text(
        &self,
        text: &str,
        options: &MatchOptions,
    ) -> Result<ItemList<Match>, ApiError> {
        let Some(request) = self.client.build_get_matches(text, options) else {
            return Ok(ItemList::empty());
        };
        let response = self.transport.execute(&request)?;
        self.client.parse_get_matches(text, options, response)
    }
}
