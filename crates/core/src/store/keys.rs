//! Storage key scheme for cached content.
//!
//! Raw content lives at
//! `sources/<origin>/raw/<title key segment>/revid=<revision id>.<extension>`.
//! Keys double as version addresses: a key is written once per revision and
//! its content never changes afterwards.

use std::sync::LazyLock;

use regex::Regex;

use crate::resource::{ResourceId, StoredRevision};

/// Top-level namespace shared by every origin.
pub const SOURCES_NAMESPACE: &str = "sources";

static REVISION_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"revid=(\d+)").unwrap());

/// Builds and parses storage keys for one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScheme {
    origin: String,
    extension: String,
}

impl KeyScheme {
    pub fn new(origin: impl Into<String>, extension: impl Into<String>) -> Self {
        Self { origin: origin.into(), extension: extension.into() }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Prefix grouping all stored revisions of one resource.
    pub fn resource_prefix(&self, resource: &ResourceId) -> String {
        format!("{SOURCES_NAMESPACE}/{}/raw/{}", self.origin, resource.key_segment())
    }

    pub fn revision_key(&self, resource: &ResourceId, revision_id: u64) -> String {
        format!("{}/revid={revision_id}.{}", self.resource_prefix(resource), self.extension)
    }

    /// Key for a table extracted from raw content, e.g. a columnar file.
    pub fn extracted_table_key(&self, name: &str, extension: &str) -> String {
        format!("{SOURCES_NAMESPACE}/{}/extracted_tables/{name}.{extension}", self.origin)
    }

    /// Turn a listing into revision records, skipping keys without a revision id.
    pub fn stored_revisions<I>(&self, resource: &ResourceId, keys: I) -> Vec<StoredRevision>
    where
        I: IntoIterator<Item = String>,
    {
        let mut records: Vec<StoredRevision> = keys
            .into_iter()
            .filter_map(|key| match parse_revision_id(&key) {
                Some(revision_id) => Some(StoredRevision { resource: resource.clone(), revision_id, key }),
                None => {
                    tracing::debug!(%key, "ignoring key without a revision id");
                    None
                }
            })
            .collect();
        records.sort_by_key(|r| r.revision_id);
        records
    }
}

/// Extract the numeric revision id from a key.
///
/// Returns `None` when the key has no `revid=<digits>` component or the
/// digits overflow `u64`.
pub fn parse_revision_id(key: &str) -> Option<u64> {
    REVISION_ID_RE
        .captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme() -> KeyScheme {
        KeyScheme::new("bulbapedia", "wikitext")
    }

    #[test]
    fn test_revision_key_layout() {
        let page = ResourceId::new("Test Page").unwrap();
        assert_eq!(scheme().revision_key(&page, 42), "sources/bulbapedia/raw/Test_Page/revid=42.wikitext");
        assert_eq!(scheme().resource_prefix(&page), "sources/bulbapedia/raw/Test_Page");
    }

    #[test]
    fn test_subpage_title_stays_one_segment() {
        let page = ResourceId::new("AC/DC").unwrap();
        assert_eq!(scheme().revision_key(&page, 5), "sources/bulbapedia/raw/AC%2FDC/revid=5.wikitext");
    }

    #[test]
    fn test_extracted_table_key() {
        assert_eq!(
            scheme().extracted_table_key("ost_releases_info.en", "parquet"),
            "sources/bulbapedia/extracted_tables/ost_releases_info.en.parquet"
        );
    }

    #[test]
    fn test_parse_revision_id() {
        assert_eq!(parse_revision_id("sources/bulbapedia/raw/Test_Page/revid=3.wikitext"), Some(3));
        assert_eq!(parse_revision_id("sources/bulbapedia/raw/Test_Page/readme.txt"), None);
        assert_eq!(parse_revision_id("revid=.wikitext"), None);
        assert_eq!(parse_revision_id("revid=99999999999999999999999.wikitext"), None);
    }

    #[test]
    fn test_stored_revisions_skips_unrelated_keys() {
        let page = ResourceId::new("Test Page").unwrap();
        let keys = vec![
            "sources/bulbapedia/raw/Test_Page/revid=3.wikitext".to_string(),
            "sources/bulbapedia/raw/Test_Page/readme.txt".to_string(),
        ];

        let records = scheme().stored_revisions(&page, keys);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revision_id, 3);
        assert_eq!(records[0].resource, page);
    }

    #[test]
    fn test_stored_revisions_sorted_by_id() {
        let page = ResourceId::new("Test Page").unwrap();
        let keys = ["revid=10.wikitext", "revid=2.wikitext", "revid=7.wikitext"]
            .map(|name| format!("sources/bulbapedia/raw/Test_Page/{name}"));

        let ids: Vec<u64> = scheme().stored_revisions(&page, keys).iter().map(|r| r.revision_id).collect();
        assert_eq!(ids, vec![2, 7, 10]);
    }
}
