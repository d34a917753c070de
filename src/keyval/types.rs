//! Key-value zone types.

use std::collections::HashMap;

/// Keys and values of one zone.
pub type KeyValPairs = HashMap<String, String>;

/// Every zone of a kind, by zone name.
pub type KeyValPairsByZone = HashMap<String, KeyValPairs>;

/// Build a [`KeyValPairs`] from borrowed pairs.
pub fn pairs<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> KeyValPairs {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
