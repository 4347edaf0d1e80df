//! The configured set of ballot options.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from constructing an [`OptionSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionSetError {
    /// The set contained no options at all.
    #[error("option set must contain at least one option")]
    Empty,

    /// An option identifier was empty after trimming.
    #[error("option identifier must not be empty")]
    EmptyIdentifier,

    /// The same identifier appeared twice (after uppercasing).
    #[error("duplicate option: {0}")]
    Duplicate(String),
}

/// The fixed, ordered set of ballot options.
///
/// Configured once at server startup and immutable for the process lifetime.
/// Identifiers are uppercased at construction so that membership checks and
/// wire output agree on a single spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<String>,
}

impl OptionSet {
    /// Builds an option set from an ordered sequence of identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is empty, contains an empty
    /// identifier, or contains duplicates.
    pub fn new<I, S>(options: I) -> Result<Self, OptionSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for option in options {
            let option = option.as_ref().trim().to_ascii_uppercase();
            if option.is_empty() {
                return Err(OptionSetError::EmptyIdentifier);
            }
            if normalized.contains(&option) {
                return Err(OptionSetError::Duplicate(option));
            }
            normalized.push(option);
        }
        if normalized.is_empty() {
            return Err(OptionSetError::Empty);
        }
        Ok(Self { options: normalized })
    }

    /// Returns true if `option` is a configured option (exact, uppercase).
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Iterates the options in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(String::as_str)
    }

    /// Number of configured options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if no options are configured (unreachable via `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Comma-separated rendering in configured order, e.g. `A,B,C`.
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.options.join(",")
    }
}

impl Default for OptionSet {
    /// The baseline three-way ballot.
    fn default() -> Self {
        Self::new(["A", "B", "C"]).expect("default option set is valid")
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv())
    }
}

impl FromStr for OptionSet {
    type Err = OptionSetError;

    /// Parses a comma-separated list, e.g. `A,B,C`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(','))
    }
}
