//! Format patterns shared by the value objects.
//!
//! Every pattern is anchored at both ends and compiled once on first use.

use std::sync::OnceLock;

use regex::Regex;

/// A regular expression literal compiled lazily into a process-wide cache.
pub(crate) struct StaticPattern {
    source: &'static str,
    compiled: OnceLock<Regex>,
}

impl StaticPattern {
    const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// The pattern source text.
    #[cfg(test)]
    pub(crate) fn source(&self) -> &'static str {
        self.source
    }

    /// Whether `input` matches the whole pattern.
    pub(crate) fn is_match(&self, input: &str) -> bool {
        self.compiled
            .get_or_init(|| Regex::new(self.source).expect("pattern literal is a valid regex"))
            .is_match(input)
    }
}

/// `000.000.000-00` or `00000000000`.
pub(crate) static CPF: StaticPattern =
    StaticPattern::new(r"^[0-9]{3}[\.]?[0-9]{3}[\.]?[0-9]{3}[-]?[0-9]{2}$");

/// `00.000.000/0000-00` or `00000000000000`.
pub(crate) static CNPJ: StaticPattern =
    StaticPattern::new(r"^[0-9]{2}[\.]?[0-9]{3}[\.]?[0-9]{3}[\/]?[0-9]{4}[-]?[0-9]{2}$");

/// Lowercase local part, no TLD requirement on the domain.
pub(crate) static EMAIL: StaticPattern = StaticPattern::new(r"^[a-z0-9+_.-]+@[a-z0-9.-]+$");

/// Brazilian mobile: optional `+55`, two-digit area code, nine digits starting with 9.
pub(crate) static PHONE: StaticPattern =
    StaticPattern::new(r"^((?:\+?55)?)([1-9][0-9])(9[0-9]{8})$");

/// UUID-shaped random key, lowercase hex.
pub(crate) static RANDOM: StaticPattern = StaticPattern::new(
    r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
);
