//! MediaWiki response types and normalization.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use wikicache_core::RevisionDescriptor;

use super::MediaWikiError;

/// Raw REST API page object (`/page/{title}/bare`).
///
/// Fields are optional so absence is reported by name rather than as a
/// generic parse failure.
#[derive(Debug, Deserialize)]
pub struct BarePageResponse {
    #[serde(default)]
    pub latest: Option<LatestRevision>,
}

#[derive(Debug, Deserialize)]
pub struct LatestRevision {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Raw Action API response for `action=expandtemplates`.
#[derive(Debug, Deserialize)]
pub struct ExpandTemplatesResponse {
    #[serde(default)]
    pub expandtemplates: Option<ExpandedWikitext>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ExpandedWikitext {
    #[serde(default)]
    pub wikitext: Option<String>,
}

/// Error object the Action API returns with HTTP 200.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

impl TryFrom<BarePageResponse> for RevisionDescriptor {
    type Error = MediaWikiError;

    fn try_from(raw: BarePageResponse) -> Result<Self, Self::Error> {
        let latest = raw.latest.ok_or(MediaWikiError::MissingField("latest"))?;
        let id = latest.id.ok_or(MediaWikiError::MissingField("latest.id"))?;
        let timestamp = latest.timestamp.ok_or(MediaWikiError::MissingField("latest.timestamp"))?;
        Ok(RevisionDescriptor { id, timestamp })
    }
}

impl ExpandTemplatesResponse {
    /// The expanded wikitext, or the API's reported error.
    pub fn into_wikitext(self) -> Result<String, MediaWikiError> {
        if let Some(err) = self.error {
            return Err(MediaWikiError::Api { code: err.code, info: err.info });
        }
        self.expandtemplates
            .ok_or(MediaWikiError::MissingField("expandtemplates"))?
            .wikitext
            .ok_or(MediaWikiError::MissingField("expandtemplates.wikitext"))
    }
}

/// Parse a JSON body into `T`.
pub fn parse_json<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, MediaWikiError> {
    serde_json::from_slice(bytes).map_err(|e| MediaWikiError::Parse(e.to_string()))
}
