use reqwest::Url;
use tracing::{debug, warn};

use crate::images::client::ImageLookup;

/// Search-engine thumbnail endpoint used when nothing better is known.
const SEARCH_THUMB_URL: &str = "https://tse1.mm.bing.net/th";

/// Host of stored image URLs that no longer resolve.
pub const DEPRECATED_IMAGE_HOST: &str = "source.unsplash.com";

/// Image for `place`: encyclopedia thumbnail, else `fallback`, else a
/// search-engine thumbnail. Lookup errors fall through to the next source.
pub async fn resolve_image(lookup: &dyn ImageLookup, place: &str, fallback: Option<&str>) -> String {
    let query = format!("{place} India");
    match lookup.thumbnail(&query).await {
        Ok(Some(url)) => {
            debug!(place, %url, "encyclopedia thumbnail");
            return url;
        }
        Ok(None) => debug!(place, "no encyclopedia thumbnail"),
        Err(err) => warn!(place, error = %err, "image lookup failed"),
    }

    match fallback.map(str::trim).filter(|f| !f.is_empty()) {
        Some(url) => url.to_string(),
        None => search_thumbnail_url(&query),
    }
}

pub fn search_thumbnail_url(query: &str) -> String {
    let params = [("q", query), ("w", "800"), ("h", "600"), ("c", "7")];
    match Url::parse_with_params(SEARCH_THUMB_URL, &params) {
        Ok(url) => url.into(),
        Err(_) => SEARCH_THUMB_URL.to_string(),
    }
}

/// True when `url` points at the deprecated image host.
pub fn is_deprecated(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(DEPRECATED_IMAGE_HOST)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Fake {
        Hit(&'static str),
        Miss,
        Down,
    }

    struct FakeLookup {
        mode: Fake,
        queries: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn new(mode: Fake) -> Self {
            Self { mode, queries: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl ImageLookup for FakeLookup {
        async fn thumbnail(&self, query: &str) -> anyhow::Result<Option<String>> {
            self.queries.lock().unwrap().push(query.to_string());
            match self.mode {
                Fake::Hit(url) => Ok(Some(url.to_string())),
                Fake::Miss => Ok(None),
                Fake::Down => anyhow::bail!("timed out"),
            }
        }
    }

    #[tokio::test]
    async fn thumbnail_wins_and_query_names_india() {
        let lookup = FakeLookup::new(Fake::Hit("https://upload.example/hampi.jpg"));
        let url = resolve_image(&lookup, "Hampi", Some("https://fallback.example/x.jpg")).await;
        assert_eq!(url, "https://upload.example/hampi.jpg");
        assert_eq!(lookup.queries.lock().unwrap().as_slice(), ["Hampi India"]);
    }

    #[tokio::test]
    async fn fallback_used_on_miss_or_error() {
        for mode in [Fake::Miss, Fake::Down] {
            let lookup = FakeLookup::new(mode);
            let url = resolve_image(&lookup, "Hampi", Some("https://fallback.example/x.jpg")).await;
            assert_eq!(url, "https://fallback.example/x.jpg");
        }
    }

    #[tokio::test]
    async fn search_url_when_nothing_else() {
        let lookup = FakeLookup::new(Fake::Miss);
        let url = resolve_image(&lookup, "Rann of Kutch", Some("  ")).await;
        assert!(url.starts_with("https://tse1.mm.bing.net/th?"));
        assert!(url.contains("q=Rann+of+Kutch+India"));
    }

    #[test]
    fn search_url_encodes_query() {
        let url = search_thumbnail_url("Goa & Daman");
        assert!(url.contains("q=Goa+%26+Daman"));
        assert!(url.contains("w=800"));
    }

    #[test]
    fn detects_deprecated_host() {
        assert!(is_deprecated("https://source.unsplash.com/800x600/?taj"));
        assert!(!is_deprecated("https://images.unsplash.com/photo-1"));
        assert!(!is_deprecated("not a url"));
    }
}
