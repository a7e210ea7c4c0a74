//! HTTP backend for the search API.

use crate::backend::SearchBackend;
use crate::error::{ErrorKind, Result};
use crate::models::{FileEntry, InfoHash, Statistics, TorrentDetail, TorrentSummary};
use crate::query::QueryParams;
use crate::request::PageRequest;
use crate::stats::StatsWindow;
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

const API_PREFIX: &str = "/api/v0.1";

/// Search backend reached over HTTP(S).
///
/// # Examples
///
/// ```
/// use magview_search::backend::HttpBackend;
/// use std::time::Duration;
///
/// let backend = HttpBackend::new("http://localhost:8080/", Duration::from_secs(10)).unwrap();
/// assert_eq!(backend.feed_url(Some("debian")), "http://localhost:8080/feed?query=debian");
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    name: String,
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url` (scheme, host and optional path
    /// prefix; a trailing slash is ignored).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Transport)?;
        Ok(Self {
            name: "http".to_string(),
            client,
            base_url,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the RSS feed, optionally filtered by a search query.
    pub fn feed_url(&self, query: Option<&str>) -> String {
        let params = QueryParams::new().with("query", query.filter(|q| !q.is_empty()));
        self.url("/feed", &params)
    }

    fn api_url(&self, path: &str, params: &QueryParams) -> String {
        self.url(&format!("{API_PREFIX}{path}"), params)
    }

    fn url(&self, path: &str, params: &QueryParams) -> String {
        match params.encode() {
            query if query.is_empty() => format!("{}{path}", self.base_url),
            query => format!("{}{path}?{query}", self.base_url),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(backend = %self.name, %url, "GET");
        let response = self.client.get(url).send().await.or_raise(|| ErrorKind::Transport)?;
        match response.status() {
            status if status.is_success() => {},
            StatusCode::NOT_FOUND => exn::bail!(ErrorKind::NotFound(url.to_string())),
            status => {
                tracing::info!(backend = %self.name, %url, %status, "Backend returned an error status");
                exn::bail!(ErrorKind::Status(status.as_u16()))
            },
        }
        let body = response.bytes().await.or_raise(|| ErrorKind::Transport)?;
        serde_json::from_slice(&body).or_raise(|| ErrorKind::InvalidResponse)
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(backend = %self.name, order_by = %request.order_by))]
    async fn torrents(&self, request: &PageRequest) -> Result<Vec<TorrentSummary>> {
        let records: Vec<TorrentSummary> = self.get_json(&self.api_url("/torrents", &request.to_params())).await?;
        tracing::debug!(records = records.len(), "Received page");
        Ok(records)
    }

    #[instrument(skip_all, fields(backend = %self.name, %info_hash))]
    async fn torrent(&self, info_hash: &InfoHash) -> Result<TorrentDetail> {
        self.get_json(&self.api_url(&format!("/torrents/{info_hash}"), &QueryParams::new())).await
    }

    #[instrument(skip_all, fields(backend = %self.name, %info_hash))]
    async fn files(&self, info_hash: &InfoHash) -> Result<Vec<FileEntry>> {
        self.get_json(&self.api_url(&format!("/torrents/{info_hash}/filelist"), &QueryParams::new())).await
    }

    #[instrument(skip_all, fields(backend = %self.name, from = window.from(), n = window.n()))]
    async fn statistics(&self, window: &StatsWindow) -> Result<Statistics> {
        self.get_json(&self.api_url("/statistics", &window.to_params())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(base, Duration::from_secs(1)).unwrap()
    }

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080")]
    #[case("http://localhost:8080/", "http://localhost:8080")]
    #[case("https://example.org/magnetico//", "https://example.org/magnetico")]
    fn test_base_url_trimmed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(backend(input).base_url(), expected);
    }

    #[rstest]
    #[case(None, "http://h/feed")]
    #[case(Some(""), "http://h/feed")]
    #[case(Some("a b&c"), "http://h/feed?query=a%20b%26c")]
    fn test_feed_url(#[case] query: Option<&str>, #[case] expected: &str) {
        assert_eq!(backend("http://h").feed_url(query), expected);
    }

    #[test]
    fn test_api_urls() {
        let backend = backend("http://h/");
        let hash: InfoHash = "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
        assert_eq!(
            backend.api_url(&format!("/torrents/{hash}/filelist"), &QueryParams::new()),
            "http://h/api/v0.1/torrents/0123456789abcdef0123456789abcdef01234567/filelist"
        );
        let params = QueryParams::new().with("from", Some("2024-05")).with("n", Some(3));
        assert_eq!(backend.api_url("/statistics", &params), "http://h/api/v0.1/statistics?from=2024-05&n=3");
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Port 9 (discard) on loopback is never served in test environments.
        let backend = backend("http://127.0.0.1:9");
        let hash: InfoHash = "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
        let err = backend.torrent(&hash).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Transport);
        assert!(err.is_retryable());
    }
}
