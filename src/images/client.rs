use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Thumbnail size requested from the encyclopedia, in pixels.
const THUMB_SIZE: u32 = 800;

#[async_trait]
pub trait ImageLookup: Send + Sync {
    /// Thumbnail URL of the best search hit for `query`, if any.
    async fn thumbnail(&self, query: &str) -> anyhow::Result<Option<String>>;
}

/// MediaWiki `pageimages` search against Wikipedia.
#[derive(Clone)]
pub struct WikipediaClient {
    client: Client,
    url: String,
}

impl WikipediaClient {
    pub fn new(url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("navigo/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build image http client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    index: Option<i64>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

/// Thumbnail of the top-ranked page that has one. No results is not an error.
pub(crate) fn parse_thumbnail(raw: Value) -> anyhow::Result<Option<String>> {
    let parsed: QueryResponse = serde_json::from_value(raw).context("decode image response")?;
    let mut pages = parsed.query.map(|q| q.pages).unwrap_or_default();
    pages.sort_by_key(|p| p.index.unwrap_or(i64::MAX));
    Ok(pages
        .into_iter()
        .filter_map(|p| p.thumbnail)
        .map(|t| t.source)
        .find(|s| !s.is_empty()))
}

#[async_trait]
impl ImageLookup for WikipediaClient {
    async fn thumbnail(&self, query: &str) -> anyhow::Result<Option<String>> {
        let size = THUMB_SIZE.to_string();
        let raw: Value = self
            .client
            .get(&self.url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", "3"),
                ("prop", "pageimages"),
                ("piprop", "thumbnail"),
                ("pithumbsize", size.as_str()),
            ])
            .send()
            .await
            .context("image request")?
            .error_for_status()
            .context("image status")?
            .json()
            .await
            .context("image body")?;
        parse_thumbnail(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_best_ranked_page_with_thumbnail() {
        let raw = json!({
            "batchcomplete": true,
            "query": {"pages": [
                {"pageid": 3, "title": "Agra", "index": 2,
                 "thumbnail": {"source": "https://upload.example/agra.jpg", "width": 800, "height": 600}},
                {"pageid": 1, "title": "Taj Mahal", "index": 1,
                 "thumbnail": {"source": "https://upload.example/taj.jpg", "width": 800, "height": 533}},
                {"pageid": 2, "title": "Yamuna", "index": 0}
            ]}
        });
        assert_eq!(
            parse_thumbnail(raw).unwrap().as_deref(),
            Some("https://upload.example/taj.jpg")
        );
    }

    #[test]
    fn no_results_is_none() {
        assert_eq!(parse_thumbnail(json!({"batchcomplete": true})).unwrap(), None);
    }
}
