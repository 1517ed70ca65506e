//! MediaWiki request construction.
//!
//! Two endpoints are used:
//! - REST API `GET /page/{title}/bare`: revision metadata without content
//! - Action API `action=expandtemplates`: content with templates expanded

use serde::Serialize;
use url::Url;

use super::MediaWikiError;

/// Query parameters for the Action API `expandtemplates` module.
///
/// See https://www.mediawiki.org/wiki/API:Expandtemplates
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExpandTemplatesParams {
    pub action: &'static str,
    /// Wikitext to expand: a transclusion of the whole page.
    pub text: String,
    pub prop: &'static str,
    pub format: &'static str,
}

impl ExpandTemplatesParams {
    pub fn for_title(title: &str) -> Self {
        Self { action: "expandtemplates", text: format!("{{{{:{title}}}}}"), prop: "wikitext", format: "json" }
    }
}

/// URL of the REST `bare` page object, with the title as one encoded path segment.
pub fn bare_page_url(rest_base: &Url, title: &str) -> Result<Url, MediaWikiError> {
    let mut url = rest_base.clone();
    url.path_segments_mut()
        .map_err(|_| MediaWikiError::InvalidUrl(format!("cannot be a base URL: {rest_base}")))?
        .pop_if_empty()
        .extend(["page", title, "bare"]);
    Ok(url)
}

/// Parse a configured base URL, requiring http or https.
pub fn parse_base_url(raw: &str) -> Result<Url, MediaWikiError> {
    let url = Url::parse(raw.trim()).map_err(|e| MediaWikiError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(MediaWikiError::InvalidUrl(format!("unsupported scheme: {scheme}"))),
    }
}
