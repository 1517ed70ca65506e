//! wikicache command-line entry point.
//!
//! Thin caller around the revision-aware cache. Content goes to stdout;
//! logs go to stderr as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wikicache_client::{MediaWikiClient, MediaWikiConfig};
use wikicache_core::{AppConfig, BlobStore, KeyScheme, ResourceId, RevisionCache};

#[derive(Debug, Parser)]
#[command(name = "wikicache", version, about = "Revision-aware cache of expanded wiki pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current expanded content of a page, refreshing the cache if stale.
    Get {
        /// Page title, e.g. "List of Pokémon music CDs".
        title: String,
    },
    /// List the revisions of a page held in the store.
    Revisions {
        title: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;

    let store = BlobStore::open(&config.store)?;
    let client = MediaWikiClient::new(MediaWikiConfig::from(&config))?;
    let cache = RevisionCache::new(store, client, KeyScheme::new(&config.origin_name, &config.extension));

    match cli.command {
        Command::Get { title } => {
            let resource = ResourceId::new(title)?;
            let content = cache.get_current_content(&resource).await?;
            tracing::info!(
                %resource,
                revision_id = content.revision_id,
                outcome = content.freshness.label(),
                persisted = content.is_persisted(),
                "served content"
            );
            println!("{}", content.text);
        }
        Command::Revisions { title } => {
            let resource = ResourceId::new(title)?;
            let revisions = cache.list_revisions(&resource).await?;
            println!("{}", serde_json::to_string_pretty(&revisions)?);
        }
    }

    Ok(())
}
