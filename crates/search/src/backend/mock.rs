//! In-memory search backend for testing.

use crate::backend::SearchBackend;
use crate::error::{ErrorKind, Result};
use crate::models::{FileEntry, InfoHash, Statistics, TorrentDetail, TorrentSummary};
use crate::order::OrderedValue;
use crate::request::PageRequest;
use crate::stats::StatsWindow;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

const DEFAULT_LIMIT: u32 = 20;

/// In-memory search backend for testing.
///
/// Records live behind a [`RwLock`] so tests can add more while a listing is
/// being paged through. Search follows the same contract as the real server:
/// filter by query, hide records discovered after the request's epoch, sort by
/// the requested criterion with `id` as tiebreaker, skip everything up to and
/// including the cursor, then truncate to the page size.
///
/// # Examples
///
/// ```
/// use magview_search::backend::{MockBackend, SearchBackend};
/// use magview_search::{Paginator, TorrentSummary};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_records([TorrentSummary {
///     id: 1,
///     info_hash: "ab".repeat(20),
///     name: "debian-12.5.0-amd64-netinst.iso".to_string(),
///     size: 659_554_304,
///     discovered_on: 1_700_000_000,
///     n_files: 1,
///     relevance: 0.0,
/// }]);
/// let mut paginator = Paginator::new(Some("DEBIAN")).with_epoch(1_800_000_000);
/// let request = paginator.next_page()?.unwrap();
/// assert_eq!(backend.torrents(&request).await?.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    records: RwLock<Vec<TorrentSummary>>,
    files: HashMap<String, Vec<FileEntry>>,
    statistics: Statistics,
    fail_next: AtomicUsize,
    requests: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend pre-populated with search records.
    pub fn with_records(records: impl IntoIterator<Item = TorrentSummary>) -> Self {
        Self {
            name: "mock".to_string(),
            records: RwLock::new(records.into_iter().collect()),
            files: HashMap::new(),
            statistics: Statistics::default(),
            fail_next: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    /// Register the file listing of the torrent with `info_hash`.
    pub fn with_files(mut self, info_hash: &str, files: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let files = files.into_iter().map(|(path, size)| FileEntry { path: path.into(), size }).collect();
        self.files.insert(info_hash.to_ascii_lowercase(), files);
        self
    }

    /// Statistics returned for every window.
    pub fn with_statistics(mut self, statistics: Statistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Change the name of the mock backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a record, as if the crawler had just discovered it.
    pub async fn insert(&self, record: TorrentSummary) {
        self.records.write().await.push(record);
    }

    /// Make the next `n` calls (to any endpoint) fail with a transport error.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, AtomicOrdering::SeqCst);
    }

    /// Number of calls received so far, including failed ones.
    pub fn requests(&self) -> usize {
        self.requests.load(AtomicOrdering::SeqCst)
    }

    fn begin(&self) -> Result<()> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);
        let failing = self
            .fail_next
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            tracing::debug!(backend = %self.name, "Injected failure");
            exn::bail!(ErrorKind::Transport);
        }
        Ok(())
    }

    fn find(&self, records: &[TorrentSummary], info_hash: &InfoHash) -> Option<TorrentSummary> {
        let wanted = info_hash.to_string();
        records.iter().find(|r| r.info_hash.eq_ignore_ascii_case(&wanted)).cloned()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        Self::with_records([])
    }
}

/// Compare two ordered values of the same criterion.
fn compare(a: &OrderedValue, b: &OrderedValue) -> Ordering {
    match (a, b) {
        (OrderedValue::Unsigned(a), OrderedValue::Unsigned(b)) => a.cmp(b),
        (OrderedValue::Signed(a), OrderedValue::Signed(b)) => a.cmp(b),
        (OrderedValue::Float(a), OrderedValue::Float(b)) => a.total_cmp(b),
        // Different criteria never meet in one sort; fall back to something total.
        (a, b) => as_f64(a).total_cmp(&as_f64(b)),
    }
}

fn as_f64(value: &OrderedValue) -> f64 {
    match *value {
        OrderedValue::Unsigned(v) => v as f64,
        OrderedValue::Signed(v) => v as f64,
        OrderedValue::Float(v) => v,
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn torrents(&self, request: &PageRequest) -> Result<Vec<TorrentSummary>> {
        self.begin()?;
        let cursor = match (request.last_id, request.last_ordered_value) {
            (Some(id), Some(value)) => Some((value, id)),
            (None, None) => None,
            // The server requires both or neither.
            _ => exn::bail!(ErrorKind::Status(400)),
        };
        if !request.order_by.is_supported() {
            exn::bail!(ErrorKind::Status(400));
        }
        let needle = request.query.as_deref().map(str::to_lowercase);

        let mut matching: Vec<(OrderedValue, TorrentSummary)> = Vec::new();
        for record in self.records.read().await.iter() {
            if record.discovered_on > request.epoch {
                continue;
            }
            if needle.as_deref().is_some_and(|needle| !record.name.to_lowercase().contains(needle)) {
                continue;
            }
            matching.push((request.order_by.resolve(record)?, record.clone()));
        }

        let directed = |ordering: Ordering| match request.ascending {
            true => ordering,
            false => ordering.reverse(),
        };
        matching.sort_by(|(a, ra), (b, rb)| directed(compare(a, b).then(ra.id.cmp(&rb.id))));

        let limit = request.limit.unwrap_or(DEFAULT_LIMIT) as usize;
        Ok(matching
            .into_iter()
            .filter(|(value, record)| match &cursor {
                Some((last_value, last_id)) => {
                    directed(compare(value, last_value).then(record.id.cmp(last_id))) == Ordering::Greater
                },
                None => true,
            })
            .take(limit)
            .map(|(_, record)| record)
            .collect())
    }

    async fn torrent(&self, info_hash: &InfoHash) -> Result<TorrentDetail> {
        self.begin()?;
        let records = self.records.read().await;
        self.find(&records, info_hash)
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(info_hash.to_string())))
    }

    async fn files(&self, info_hash: &InfoHash) -> Result<Vec<FileEntry>> {
        self.begin()?;
        self.files
            .get(&info_hash.to_string())
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(info_hash.to_string())))
    }

    async fn statistics(&self, _window: &StatsWindow) -> Result<Statistics> {
        self.begin()?;
        Ok(self.statistics.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderBy;
    use crate::paginate::{BatchOutcome, Paginator};
    use rstest::rstest;

    fn record(id: u64, name: &str, size: u64, discovered_on: i64) -> TorrentSummary {
        TorrentSummary {
            id,
            info_hash: format!("{id:040x}"),
            name: name.to_string(),
            size,
            discovered_on,
            n_files: (id % 4) as u32 + 1,
            relevance: -(id as f64) / 2.0,
        }
    }

    fn backend() -> MockBackend {
        MockBackend::with_records([
            record(1, "Debian netinst", 300, 100),
            record(2, "Arch Linux", 800, 300),
            record(3, "debian DVD", 800, 200),
            record(4, "Fedora Workstation", 100, 400),
            record(5, "Ubuntu Desktop", 500, 500),
        ])
    }

    fn request(paginator: &mut Paginator) -> PageRequest {
        paginator.next_page().unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive() {
        let backend = backend();
        let mut paginator = Paginator::new(Some("DEBIAN")).with_epoch(1_000);
        let records = backend.torrents(&request(&mut paginator)).await.unwrap();
        let mut ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_epoch_hides_newer_records() {
        let backend = backend();
        let mut paginator = Paginator::new(None::<String>).with_epoch(300);
        let records = backend.torrents(&request(&mut paginator)).await.unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_ties_broken_by_id() {
        let backend = backend();
        let mut paginator = Paginator::new(None::<String>).with_epoch(1_000).with_order(OrderBy::TotalSize, false);
        let records = backend.torrents(&request(&mut paginator)).await.unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 5, 1, 4]);
    }

    #[rstest]
    #[case(OrderBy::TotalSize, true)]
    #[case(OrderBy::TotalSize, false)]
    #[case(OrderBy::DiscoveredOn, false)]
    #[case(OrderBy::NFiles, true)]
    #[case(OrderBy::Relevance, true)]
    #[tokio::test]
    async fn test_cursor_skips_seen_records(#[case] order_by: OrderBy, #[case] ascending: bool) {
        let backend = backend();
        let mut paginator =
            Paginator::new(None::<String>).with_epoch(1_000).with_limit(Some(2)).with_order(order_by, ascending);
        let mut seen = Vec::new();
        loop {
            let page = request(&mut paginator);
            let records = backend.torrents(&page).await.unwrap();
            assert!(records.len() <= 2);
            match paginator.apply_batch(page.ticket(), &records).unwrap() {
                BatchOutcome::Appended(_) => seen.extend(records.iter().map(|r| r.id)),
                BatchOutcome::Exhausted => break,
            }
        }
        let mut sorted = seen.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_half_cursor_is_rejected() {
        let backend = backend();
        let mut paginator = Paginator::new(None::<String>);
        let mut page = request(&mut paginator);
        page.last_id = Some(3);
        let err = backend.torrents(&page).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Status(400));
    }

    #[tokio::test]
    async fn test_fail_next() {
        let backend = backend();
        backend.fail_next(2);
        let mut paginator = Paginator::new(None::<String>).with_epoch(1_000);
        let page = request(&mut paginator);
        assert_eq!(*backend.torrents(&page).await.unwrap_err(), ErrorKind::Transport);
        assert_eq!(*backend.torrents(&page).await.unwrap_err(), ErrorKind::Transport);
        assert_eq!(backend.torrents(&page).await.unwrap().len(), 5);
        assert_eq!(backend.requests(), 3);
    }

    #[tokio::test]
    async fn test_detail_and_files() {
        let hash = format!("{:040x}", 2);
        let backend = backend().with_files(&hash, [("iso/arch.iso", 800)]);
        let info_hash: InfoHash = hash.parse().unwrap();
        assert_eq!(backend.torrent(&info_hash).await.unwrap().name, "Arch Linux");
        let files = backend.files(&info_hash).await.unwrap();
        assert_eq!(files, vec![FileEntry { path: "iso/arch.iso".to_string(), size: 800 }]);

        let unknown: InfoHash = "ff".repeat(20).parse().unwrap();
        assert!(matches!(&*backend.torrent(&unknown).await.unwrap_err(), ErrorKind::NotFound(_)));
        assert!(matches!(&*backend.files(&unknown).await.unwrap_err(), ErrorKind::NotFound(_)));
    }
}
