//! Core types and shared functionality for wikicache.
//!
//! This crate provides:
//! - Revision-aware content cache over an object store
//! - Object store client and storage key scheme
//! - The content source trait implemented by origin clients
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod resource;
pub mod source;
pub mod store;
pub mod tabular;

pub use cache::{CurrentContent, Freshness, RevisionCache};
pub use config::{AppConfig, ConfigError, StoreBackend, StoreConfig};
pub use error::Error;
pub use resource::{ResourceId, RevisionDescriptor, StoredRevision};
pub use source::{ContentSource, ExpandedContent};
pub use store::{BlobStore, KeyScheme, TextEncoding};
