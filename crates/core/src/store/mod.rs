//! Object store client for cached content.
//!
//! A thin typed layer over [`object_store`], scoped to one bucket. It reads and
//! writes text blobs by key and lists keys under a prefix. Backends:
//!
//! - S3 and S3-compatible services (MinIO, RustFS)
//! - Local filesystem directory
//! - In-memory, for tests
//!
//! Listings stop at a configured page cap (at most 1000 keys) and are not
//! paginated further. Truncation is logged, never hidden.

pub mod encoding;
pub mod keys;

use std::sync::Arc;

use bytes::Bytes;
use futures_util::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use crate::Error;
use crate::config::{StoreBackend, StoreConfig};

pub use encoding::TextEncoding;
pub use keys::KeyScheme;

/// Handle to one bucket of an object store.
#[derive(Clone, Debug)]
pub struct BlobStore {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
    list_page_cap: usize,
}

impl BlobStore {
    /// Open the store described by `config`.
    ///
    /// For the local backend the root directory is created if missing.
    pub fn open(config: &StoreConfig) -> Result<Self, Error> {
        let (inner, bucket): (Arc<dyn ObjectStore>, String) = match config.backend {
            StoreBackend::S3 => {
                let bucket = config.require_bucket()?;
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.with_endpoint(endpoint).with_virtual_hosted_style_request(false);
                }
                if let Some(region) = &config.region {
                    builder = builder.with_region(region);
                }
                if config.allow_http {
                    builder = builder.with_allow_http(true);
                }
                (Arc::new(builder.build()?), bucket.to_string())
            }
            StoreBackend::Local => {
                let root = config.root.as_ref().ok_or_else(|| {
                    Error::InvalidInput("store.root is required for the local backend".into())
                })?;
                std::fs::create_dir_all(root)
                    .map_err(|e| Error::Store(format!("failed to create {}: {e}", root.display())))?;
                let fs = LocalFileSystem::new_with_prefix(root)?;
                let bucket = config.bucket.clone().unwrap_or_else(|| root.display().to_string());
                (Arc::new(fs), bucket)
            }
            StoreBackend::Memory => {
                (Arc::new(InMemory::new()), config.bucket.clone().unwrap_or_else(|| "memory".into()))
            }
        };

        tracing::debug!(backend = ?config.backend, %bucket, "opened object store");

        Ok(Self::from_object_store(inner, bucket, config.list_page_cap))
    }

    /// Open an empty in-memory store for testing.
    pub fn open_in_memory() -> Self {
        Self::from_object_store(Arc::new(InMemory::new()), "memory", 1000)
    }

    /// Wrap an existing object store.
    pub fn from_object_store(inner: Arc<dyn ObjectStore>, bucket: impl Into<String>, list_page_cap: usize) -> Self {
        Self { inner, bucket: bucket.into(), list_page_cap: list_page_cap.max(1) }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Write `text` to `key`, replacing any existing object.
    pub async fn put_text(&self, key: &str, text: &str, encoding: TextEncoding) -> Result<(), Error> {
        let bytes = encoding.encode(text)?;
        self.put_bytes(key, Bytes::from(bytes)).await
    }

    /// Write raw bytes to `key`, replacing any existing object.
    pub async fn put_bytes(&self, key: &str, bytes: Bytes) -> Result<(), Error> {
        let path = object_path(key)?;
        let len = bytes.len();
        self.inner.put(&path, PutPayload::from(bytes)).await?;
        tracing::debug!(bucket = %self.bucket, %key, len, "wrote object");
        Ok(())
    }

    /// Read the object at `key` and decode it as text.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the key does not exist
    /// - `Error::DecodeError` if the bytes are invalid under `encoding`
    pub async fn get_text(&self, key: &str, encoding: TextEncoding) -> Result<String, Error> {
        let path = object_path(key)?;
        let bytes = self.inner.get(&path).await?.bytes().await?;

        encoding
            .decode(&bytes)
            .ok_or_else(|| Error::DecodeError { key: key.to_string(), encoding: encoding.to_string() })
    }

    /// List keys under `prefix`, up to the page cap.
    ///
    /// Prefix matching is by whole path segments. An absent prefix yields an
    /// empty list.
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, Error> {
        let path = object_path(prefix)?;
        let mut stream = self.inner.list(Some(&path));
        let mut keys = Vec::new();

        while let Some(meta) = stream.next().await {
            if keys.len() == self.list_page_cap {
                tracing::warn!(
                    bucket = %self.bucket,
                    %prefix,
                    cap = self.list_page_cap,
                    "listing truncated at page cap; later keys are not visible"
                );
                break;
            }
            keys.push(meta?.location.to_string());
        }

        Ok(keys)
    }
}

fn object_path(key: &str) -> Result<ObjectPath, Error> {
    ObjectPath::parse(key).map_err(|e| Error::InvalidInput(format!("invalid object key {key:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get_text() {
        let store = BlobStore::open_in_memory();
        store
            .put_text("sources/test/raw/Page/revid=1.wikitext", "{| class=\"wikitable\"", TextEncoding::Utf8)
            .await
            .unwrap();

        let text = store
            .get_text("sources/test/raw/Page/revid=1.wikitext", TextEncoding::Utf8)
            .await
            .unwrap();
        assert_eq!(text, "{| class=\"wikitable\"");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = BlobStore::open_in_memory();
        let result = store.get_text("sources/test/raw/Nope/revid=1.wikitext", TextEncoding::Utf8).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_invalid_utf8_is_decode_error() {
        let store = BlobStore::open_in_memory();
        store.put_bytes("blob", Bytes::from_static(&[0xc3, 0x28])).await.unwrap();

        let result = store.get_text("blob", TextEncoding::Utf8).await;
        assert!(matches!(result, Err(Error::DecodeError { ref key, .. }) if key == "blob"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = BlobStore::open_in_memory();
        store.put_text("dir/k", "first", TextEncoding::Utf8).await.unwrap();
        store.put_text("dir/k", "second", TextEncoding::Utf8).await.unwrap();

        assert_eq!(store.get_text("dir/k", TextEncoding::Utf8).await.unwrap(), "second");
        assert_eq!(store.list_keys("dir").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_empty_prefix() {
        let store = BlobStore::open_in_memory();
        let keys = store.list_keys("sources/test/raw/Nothing").await.unwrap();
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_segment_aware() {
        let store = BlobStore::open_in_memory();
        store.put_text("sources/t/raw/Page/revid=1.wikitext", "a", TextEncoding::Utf8).await.unwrap();
        store.put_text("sources/t/raw/Page_2/revid=1.wikitext", "b", TextEncoding::Utf8).await.unwrap();

        let keys = store.list_keys("sources/t/raw/Page").await.unwrap();
        assert_eq!(keys, vec!["sources/t/raw/Page/revid=1.wikitext".to_string()]);
    }

    #[tokio::test]
    async fn test_list_respects_page_cap() {
        let store = BlobStore::from_object_store(Arc::new(InMemory::new()), "capped", 3);
        for id in 0..5 {
            store
                .put_text(&format!("sources/t/raw/Page/revid={id}.wikitext"), "x", TextEncoding::Utf8)
                .await
                .unwrap();
        }

        let keys = store.list_keys("sources/t/raw/Page").await.unwrap();
        assert_eq!(keys.len(), 3);
    }

    #[tokio::test]
    async fn test_non_ascii_keys_are_stored_verbatim() {
        let store = BlobStore::open_in_memory();
        let key = "sources/t/raw/List_of_Pokémon_music_CDs/revid=5.wikitext";
        store.put_text(key, "x", TextEncoding::Utf8).await.unwrap();

        let keys = store.list_keys("sources/t/raw/List_of_Pokémon_music_CDs").await.unwrap();
        assert_eq!(keys, vec![key.to_string()]);
    }

    #[tokio::test]
    async fn test_local_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Local,
            root: Some(dir.path().join("lake")),
            ..Default::default()
        };
        let store = BlobStore::open(&config).unwrap();

        store.put_text("sources/t/raw/Page/revid=9.wikitext", "body", TextEncoding::Latin1).await.unwrap();
        assert_eq!(
            store.get_text("sources/t/raw/Page/revid=9.wikitext", TextEncoding::Latin1).await.unwrap(),
            "body"
        );
        assert_eq!(store.list_keys("sources/t/raw/Page").await.unwrap().len(), 1);
        assert!(store.list_keys("sources/t/raw/Other").await.unwrap().is_empty());
    }

    #[test]
    fn test_open_s3_without_bucket_fails() {
        let result = BlobStore::open(&StoreConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_open_memory_uses_configured_bucket() {
        let config = StoreConfig { bucket: Some("vgmcharts".into()), ..StoreConfig::memory() };
        let store = BlobStore::open(&config).unwrap();
        assert_eq!(store.bucket(), "vgmcharts");
    }
}
