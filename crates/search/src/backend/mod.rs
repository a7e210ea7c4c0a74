//! Search backend trait and implementations.
//!
//! [`SearchBackend`] covers the read-only endpoints of the search API:
//! paginated search, torrent detail, file listing and statistics.
//! [`HttpBackend`] talks to a real server; `MockBackend` (feature `mock`)
//! keeps everything in memory for tests.

mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::http::HttpBackend;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockBackend;
use crate::error::Result;
use crate::models::{FileEntry, InfoHash, Statistics, TorrentDetail, TorrentSummary};
use crate::request::PageRequest;
use crate::stats::StatsWindow;
use async_trait::async_trait;

/// Unified interface for search backends.
///
/// Implementations only translate requests into responses; pagination state
/// lives in [`Paginator`](crate::Paginator) and is never shared with the
/// backend.
///
/// # Examples
///
/// ```
/// use magview_search::backend::SearchBackend;
/// use magview_search::error::Result;
/// use magview_search::{BatchOutcome, Paginator};
///
/// async fn count_first_page(backend: &dyn SearchBackend, query: &str) -> Result<usize> {
///     let mut paginator = Paginator::new(Some(query));
///     let Some(request) = paginator.next_page()? else {
///         return Ok(0);
///     };
///     let records = backend.torrents(&request).await?;
///     match paginator.apply_batch(request.ticket(), &records)? {
///         BatchOutcome::Appended(n) => Ok(n),
///         BatchOutcome::Exhausted => Ok(0),
///     }
/// }
/// ```
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Name of the backend, used for logging only.
    fn name(&self) -> &str;

    /// One page of search results, in the order requested.
    ///
    /// An empty page means there is nothing after the request's cursor.
    async fn torrents(&self, request: &PageRequest) -> Result<Vec<TorrentSummary>>;

    /// Metadata of a single torrent.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the backend
    /// doesn't know the info hash.
    async fn torrent(&self, info_hash: &InfoHash) -> Result<TorrentDetail>;

    /// Flat file listing of a single torrent, in the backend's order.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the backend
    /// doesn't know the info hash.
    async fn files(&self, info_hash: &InfoHash) -> Result<Vec<FileEntry>>;

    /// Discovery statistics for the buckets covered by `window`.
    async fn statistics(&self, window: &StatsWindow) -> Result<Statistics>;
}
