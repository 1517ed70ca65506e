//! Revision-aware content cache.
//!
//! Answers "what is the current content of resource X" while fetching the
//! expensive expanded content at most once per new revision:
//!
//! 1. List stored revisions under the resource's key prefix.
//! 2. Ask the origin for its latest revision id (cheap metadata call).
//! 3. If the newest stored id is at or ahead of the origin, serve the stored blob.
//! 4. Otherwise fetch expanded content, store it under the origin's id, return it.
//!
//! Concurrent calls for the same resource are not coordinated. Two callers
//! racing on a stale entry both fetch and both write the same immutable key,
//! which is safe but wasteful. Wrap calls in a per-resource lock if
//! at-most-one fetch per revision per process is required.

pub mod freshness;

pub use freshness::Freshness;

use crate::Error;
use crate::resource::{ResourceId, StoredRevision};
use crate::source::ContentSource;
use crate::store::{BlobStore, KeyScheme, TextEncoding};

/// Content returned by [`RevisionCache::get_current_content`].
#[derive(Debug)]
pub struct CurrentContent {
    pub text: String,
    pub revision_id: u64,
    /// Storage key holding (or meant to hold) this revision.
    pub key: String,
    pub freshness: Freshness,
    /// Set when refreshed content was fetched but could not be written.
    pub persist_error: Option<Error>,
}

impl CurrentContent {
    /// Whether the content is known to be in the store.
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Cache of expanded content keyed by resource and revision id.
#[derive(Debug)]
pub struct RevisionCache<S> {
    store: BlobStore,
    source: S,
    keys: KeyScheme,
    encoding: TextEncoding,
}

impl<S: ContentSource> RevisionCache<S> {
    pub fn new(store: BlobStore, source: S, keys: KeyScheme) -> Self {
        Self { store, source, keys, encoding: TextEncoding::default() }
    }

    /// Use `encoding` for stored blobs instead of UTF-8.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn keys(&self) -> &KeyScheme {
        &self.keys
    }

    /// All stored revisions of `resource`, ascending by revision id.
    ///
    /// Subject to the store's listing page cap.
    pub async fn list_revisions(&self, resource: &ResourceId) -> Result<Vec<StoredRevision>, Error> {
        let prefix = self.keys.resource_prefix(resource);
        let keys = self.store.list_keys(&prefix).await?;
        Ok(self.keys.stored_revisions(resource, keys))
    }

    /// Stored content of one specific revision.
    pub async fn get_revision(&self, resource: &ResourceId, revision_id: u64) -> Result<String, Error> {
        let key = self.keys.revision_key(resource, revision_id);
        self.store.get_text(&key, self.encoding).await
    }

    /// Compare stored revisions against the origin.
    ///
    /// Always makes exactly one metadata call. A failing metadata call fails
    /// the check even when stored copies exist: an unverified copy is never
    /// served as current.
    pub async fn check_freshness(&self, resource: &ResourceId) -> Result<Freshness, Error> {
        let records = self.list_revisions(resource).await?;
        let latest = freshness::latest_stored(&records);

        let online = self.source.latest_revision(resource).await.inspect_err(|e| {
            tracing::debug!(
                %resource,
                stored = records.len(),
                transient = e.is_transient(),
                error = %e,
                "revision metadata unavailable; freshness cannot be decided"
            );
        })?;

        let outcome = Freshness::evaluate(latest, online);
        tracing::debug!(
            %resource,
            outcome = outcome.label(),
            requires_fetch = outcome.requires_fetch(),
            stored_records = records.len(),
            online_id = online.id,
            target_id = outcome.target_revision_id(),
            "freshness evaluated"
        );
        Ok(outcome)
    }

    /// Produce content for an evaluated outcome: read on hit, fetch and write otherwise.
    pub async fn resolve(&self, resource: &ResourceId, freshness: Freshness) -> Result<CurrentContent, Error> {
        let revision_id = freshness.target_revision_id();

        if let Freshness::Hit { stored } = &freshness {
            let key = stored.key.clone();
            let text = self.store.get_text(&key, self.encoding).await?;
            return Ok(CurrentContent { text, revision_id, key, freshness, persist_error: None });
        }

        let fetched = self.source.expanded_content(resource).await?;
        let key = self.keys.revision_key(resource, revision_id);

        let persist_error = match self.store.put_text(&key, &fetched.text, self.encoding).await {
            Ok(()) => {
                tracing::info!(
                    %resource,
                    revision_id,
                    %key,
                    bytes = fetched.text.len(),
                    fetch_ms = fetched.elapsed.as_millis() as u64,
                    "stored refreshed content"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    %resource,
                    revision_id,
                    %key,
                    error = %e,
                    "fetched content could not be stored; returning it uncached"
                );
                Some(e)
            }
        };

        Ok(CurrentContent { text: fetched.text, revision_id, key, freshness, persist_error })
    }

    /// Current content of `resource`, refreshing the store when it is stale.
    ///
    /// # Errors
    ///
    /// Any listing, metadata, read, or fetch failure aborts the call with the
    /// originating error. A failed write after a successful fetch does not:
    /// see [`CurrentContent::persist_error`].
    pub async fn get_current_content(&self, resource: &ResourceId) -> Result<CurrentContent, Error> {
        let freshness = self.check_freshness(resource).await?;
        self.resolve(resource, freshness).await
    }
}
