//! Transformer allow-list and varchar size parsing

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Transformer whose creation options carry a byte size.
pub const VARCHAR: &str = "varchar";

/// Transformers accepted by the loader.
pub const STANDARD_TRANSFORMERS: [&str; 12] = [
    "bigint",
    "float",
    "varchar",
    "ipAsnInteger",
    "int",
    "bool",
    "ipCity",
    "ipCountry",
    "ipRegion",
    "ipAsn",
    "stringToIntegerMD5",
    "f@timestamp@unix",
];

static STANDARD_SET: Lazy<TransformerSet> =
    Lazy::new(|| TransformerSet::from_iter(STANDARD_TRANSFORMERS));

static VARCHAR_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(([0-9]+)\)$").expect("varchar size pattern is valid"));

/// Immutable set of transformer names a column may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformerSet {
    names: BTreeSet<String>,
}

impl TransformerSet {
    /// The standard loader allow-list.
    pub fn standard() -> Self {
        STANDARD_SET.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for TransformerSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl<S: Into<String>> FromIterator<S> for TransformerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parse a varchar size such as `(500)`.
///
/// Returns `None` unless the whole string is a parenthesized run of digits
/// that fits in a `u64`.
pub fn varchar_size(column_creation_options: &str) -> Option<u64> {
    VARCHAR_SIZE
        .captures(column_creation_options)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}
