//! Resource identity and revision types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Title of a content source at the origin, plus its storage-key form.
///
/// The canonical form replaces spaces with underscores, matching the way
/// MediaWiki spells titles in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    title: String,
    canonical: String,
}

impl ResourceId {
    /// Build an identity from a human-readable title.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, Error> {
        let title = title.into();
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(Error::InvalidInput("resource title cannot be empty".into()));
        }

        let canonical = trimmed.replace(' ', "_");
        Ok(Self { title: trimmed.to_string(), canonical })
    }

    /// The title as given (trimmed).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The origin's spelling of the title, used in requests.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The canonical title as a single storage-key segment.
    ///
    /// `/` is written as `%2F`. MediaWiki titles cannot contain
    /// percent-encoded sequences, so the mapping stays one-to-one.
    pub fn key_segment(&self) -> String {
        self.canonical.replace('/', "%2F")
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// One immutable version of a resource at the origin.
///
/// Only `id` takes part in ordering; `timestamp` is advisory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RevisionDescriptor {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
}

impl PartialEq for RevisionDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RevisionDescriptor {}

/// A cached blob discovered by listing the store.
///
/// Never persisted on its own; rebuilt from storage keys on every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRevision {
    pub resource: ResourceId,
    pub revision_id: u64,
    pub key: String,
}
