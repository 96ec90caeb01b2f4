//! Extra-field ("z") selection.
//!
//! Callers choose which optional extras they want back: all of them, a named
//! subset, or none. Pruning runs after mapping, as a plain function over the
//! finished items.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{Entry, ExtraFields, Match};

/// Which `z` keys to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ZSelector {
    /// Keep every key (option absent or `true`).
    #[default]
    All,
    /// Keep only these keys. Empty drops `z` altogether.
    Only(Vec<String>),
}

impl ZSelector {
    pub fn none() -> Self {
        ZSelector::Only(Vec::new())
    }

    pub fn only<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ZSelector::Only(keys.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for ZSelector {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) | Some(Value::Bool(true)) => ZSelector::All,
            Some(Value::Bool(false)) => ZSelector::none(),
            Some(Value::String(key)) => ZSelector::Only(vec![key]),
            Some(Value::Array(keys)) => ZSelector::Only(
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Some(_) => ZSelector::All,
        })
    }
}

/// Items carrying an optional `z` bag.
pub trait HasExtraFields {
    fn extra_fields_mut(&mut self) -> &mut Option<ExtraFields>;
}

impl HasExtraFields for Entry {
    fn extra_fields_mut(&mut self) -> &mut Option<ExtraFields> {
        &mut self.z
    }
}

impl HasExtraFields for Match {
    fn extra_fields_mut(&mut self) -> &mut Option<ExtraFields> {
        &mut self.z
    }
}

/// Keep only the selected `z` keys of every item.
///
/// An item whose `z` ends up empty loses the `z` key entirely. With
/// [`ZSelector::All`] items pass through untouched, an empty `z` included.
pub fn prune_extra_fields<T: HasExtraFields>(mut items: Vec<T>, selector: &ZSelector) -> Vec<T> {
    let keys = match selector {
        ZSelector::All => return items,
        ZSelector::Only(keys) => keys,
    };

    for item in &mut items {
        let z = item.extra_fields_mut();
        let kept = z.take().map(|extras| retain_keys(extras, keys));
        *z = kept.filter(|extras| !extras.is_empty());
    }
    items
}

fn retain_keys(extras: ExtraFields, keys: &[String]) -> ExtraFields {
    let wants = |key: &str| keys.iter().any(|k| k == key);
    ExtraFields {
        obsolete: extras.obsolete.filter(|_| wants("obsolete")),
        databases: extras.databases.filter(|_| wants("databases")),
        rna_type: extras.rna_type.filter(|_| wants("RNAtype")),
        species: extras.species.filter(|_| wants("species")),
    }
}
