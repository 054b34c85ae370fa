//! SQL identifier rules for table and column names

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static STRICT_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$-]*$").expect("strict identifier pattern is valid")
});

/// Which names count as valid identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// Length bound and no NUL byte
    #[default]
    Permissive,
    /// Permissive, plus: first char a letter or `_`, then letters, digits,
    /// `_`, `$` or `-`
    Strict,
}

impl IdentifierPolicy {
    /// Check `name` against this policy with an inclusive byte-length ceiling.
    pub fn is_valid(&self, name: &str, max_len: usize) -> bool {
        if name.is_empty() || name.len() > max_len || name.contains('\0') {
            return false;
        }
        match self {
            IdentifierPolicy::Permissive => true,
            IdentifierPolicy::Strict => STRICT_IDENTIFIER.is_match(name),
        }
    }
}
