//! Tokenizing parser for audit log lines.
//!
//! Replay works on parsed [`AuditRecord`]s, never on substring search: a
//! `LOGIN` line whose user happens to be the string `VOTE_ACCEPT` must not
//! count as a vote.

use chrono::NaiveDateTime;

/// Timestamp layout at the front of every record.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One tokenized audit log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    tag: String,
    fields: Vec<(String, String)>,
}

impl AuditRecord {
    /// Parses one log line, returning `None` if it is not a well-formed
    /// record (bad timestamp, bad tag, or a field without `=`).
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();

        let date = tokens.next()?;
        let time = tokens.next()?;
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), TIMESTAMP_FORMAT).ok()?;

        let tag = tokens.next()?;
        if !tag.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
            return None;
        }

        let mut fields = Vec::new();
        for token in tokens {
            let (key, value) = token.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            fields.push((key.to_string(), value.to_string()));
        }

        Some(Self {
            tag: tag.to_string(),
            fields,
        })
    }

    /// The record's event tag, e.g. `VOTE_ACCEPT`.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The first value recorded under `key`, if any.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
