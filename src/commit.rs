//! Commit records passed through the filter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A commit as handed to the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Commit {
    pub fn new(hash: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            subject: subject.into(),
            body: None,
            author: None,
            timestamp: None,
        }
    }

    /// Split a full commit message into subject and body.
    pub fn from_message(hash: impl Into<String>, message: &str) -> Self {
        let message = message.trim();
        let (subject, body) = match message.split_once('\n') {
            Some((subject, rest)) => {
                let rest = rest.trim();
                (subject.trim(), (!rest.is_empty()).then(|| rest.to_string()))
            }
            None => (message, None),
        };

        Self {
            body,
            ..Self::new(hash, subject)
        }
    }

    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.hash.len());
        &self.hash[..end]
    }
}

/// A commit together with the files it changed, in the order git reported them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitWithFiles {
    #[serde(flatten)]
    pub commit: Commit,
    pub files: Arc<Vec<String>>,
}

impl CommitWithFiles {
    pub fn new(commit: Commit, files: Arc<Vec<String>>) -> Self {
        Self { commit, files }
    }

    pub fn hash(&self) -> &str {
        &self.commit.hash
    }

    pub fn subject(&self) -> &str {
        &self.commit.subject
    }
}
