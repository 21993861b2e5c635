//! Species enrichment lookup.
//!
//! Rendering asks a [`SpeciesLookup`] for a short encyclopedia entry per bird. The lookup is
//! best effort: the renderer treats any error the same as "nothing found".

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::EnrichmentLookupError;

pub type LookupResult = std::result::Result<Option<SpeciesPage>, EnrichmentLookupError>;

/// An encyclopedia page describing a species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesPage {
    pub url: String,
    pub title: String,
    pub summary: String,
}

impl SpeciesPage {
    pub fn new(url: impl Into<String>, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            summary: summary.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.summary.trim().is_empty()
    }
}

pub trait SpeciesLookup {
    /// Finds the page for a species by display name
    fn search(&self, name: &str) -> LookupResult;
}

/// Lookup that never finds anything. Used when enrichment is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl SpeciesLookup for NoLookup {
    fn search(&self, _name: &str) -> LookupResult {
        Ok(None)
    }
}

/// Adapts a plain function or closure into a [`SpeciesLookup`]
pub struct FnLookup<F>(F);

pub fn lookup_fn<F>(f: F) -> FnLookup<F>
where
    F: Fn(&str) -> LookupResult,
{
    FnLookup(f)
}

impl<F> SpeciesLookup for FnLookup<F>
where
    F: Fn(&str) -> LookupResult,
{
    fn search(&self, name: &str) -> LookupResult {
        (self.0)(name)
    }
}

// ===== WIKIPEDIA =====

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: String,
    #[serde(default)]
    extract: String,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrls>,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: String,
}

/// Looks species up on Wikipedia: a full-text search, then the summary of the top hit
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    base_url: Url,
    http: reqwest::blocking::Client,
}

impl WikipediaClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Wikipedia URL cannot be used as a base: {}", base_url));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("birdbuddy_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the search API call for `name`
    pub fn search_url(&self, name: &str) -> Url {
        let mut url = self.endpoint(&["w", "api.php"]);
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", name)
            .append_pair("srlimit", "1")
            .append_pair("format", "json");
        url
    }

    /// URL of the page summary for an exact article title
    pub fn summary_url(&self, title: &str) -> Url {
        self.endpoint(&["api", "rest_v1", "page", "summary", title])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> std::result::Result<T, EnrichmentLookupError> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentLookupError::Status(status.as_u16()));
        }
        response
            .json::<T>()
            .map_err(|e| EnrichmentLookupError::Decode(e.to_string()))
    }

    fn top_title(&self, name: &str) -> std::result::Result<Option<String>, EnrichmentLookupError> {
        let response: SearchResponse = self.get_json(self.search_url(name))?;
        Ok(response
            .query
            .and_then(|query| query.search.into_iter().next())
            .map(|hit| hit.title))
    }
}

impl SpeciesLookup for WikipediaClient {
    fn search(&self, name: &str) -> LookupResult {
        let Some(title) = self.top_title(name)? else {
            tracing::debug!("No Wikipedia results for {}", name);
            return Ok(None);
        };

        let summary: SummaryResponse = self.get_json(self.summary_url(&title))?;
        let url = summary
            .content_urls
            .and_then(|urls| urls.desktop)
            .map(|desktop| desktop.page)
            .unwrap_or_else(|| self.endpoint(&["wiki", &summary.title]).to_string());

        Ok(Some(SpeciesPage::new(url, summary.title, summary.extract)))
    }
}
