//! Remote content source abstraction.
//!
//! The cache talks to the origin only through [`ContentSource`]. The HTTP
//! implementation lives in `wikicache-client`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Error;
use crate::resource::{ResourceId, RevisionDescriptor};

/// Expanded content of a resource together with fetch timing.
///
/// The timestamps bracket the moment the fetched revision was current at the
/// origin, which matters if the page changes while it is being fetched.
#[derive(Debug, Clone)]
pub struct ExpandedContent {
    pub text: String,
    /// Client clock when the request was sent.
    pub requested_at: DateTime<Utc>,
    /// Origin clock from the `Date` response header, when present.
    pub server_date: Option<DateTime<Utc>>,
    /// Time from sending the request to reading the full body.
    pub elapsed: Duration,
}

impl ExpandedContent {
    /// Content with no timing information, stamped now.
    pub fn untimed(text: impl Into<String>) -> Self {
        Self { text: text.into(), requested_at: Utc::now(), server_date: None, elapsed: Duration::ZERO }
    }

    /// Client clock when the body finished arriving.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.requested_at + chrono::TimeDelta::from_std(self.elapsed).unwrap_or(chrono::TimeDelta::zero())
    }
}

/// An origin that serves revision metadata and expanded content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Latest revision metadata. Cheap: no content body.
    ///
    /// # Errors
    ///
    /// `Error::RemoteUnavailable` on transport or HTTP failure,
    /// `Error::MalformedResponse` if the expected fields are missing.
    async fn latest_revision(&self, resource: &ResourceId) -> Result<RevisionDescriptor, Error>;

    /// Full content with all templates expanded by the origin.
    ///
    /// Expensive; only call when a refresh is required. Same errors as
    /// [`ContentSource::latest_revision`].
    async fn expanded_content(&self, resource: &ResourceId) -> Result<ExpandedContent, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_received_at_adds_elapsed() {
        let content = ExpandedContent {
            text: String::new(),
            requested_at: DateTime::<Utc>::UNIX_EPOCH,
            server_date: None,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(content.received_at().timestamp_millis(), 1500);
    }
}
