//! Origin clients for wikicache.
//!
//! This crate provides the MediaWiki implementation of
//! [`wikicache_core::ContentSource`], used by the revision-aware cache to
//! check revisions and fetch expanded page content.

pub mod mediawiki;

pub use mediawiki::{MediaWikiClient, MediaWikiConfig, MediaWikiError};
