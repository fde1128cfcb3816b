//! Pipe-delimited allow/block lists
//!
//! Issuer, audience, origin allow and origin block lists are all configured
//! as a single string such as `"svcA | svcB"`. Entries are trimmed and empty
//! entries dropped, so an empty setting never matches an empty identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Entry separator
pub const LIST_DELIMITER: char = '|';

/// A parsed pipe-delimited list with exact-match membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimitedList {
    entries: Vec<String>,
}

impl DelimitedList {
    /// Parse a raw pipe-delimited string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(LIST_DELIMITER)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    /// Build a list from already-separated entries
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    /// Exact (case-sensitive) membership test
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.entries.iter().any(|entry| entry == candidate)
    }

    /// Whether the list has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Entries as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }
}

impl FromStr for DelimitedList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for DelimitedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join("|"))
    }
}

impl Serialize for DelimitedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DelimitedList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
