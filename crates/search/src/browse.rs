//! "Load more" driver shared by every result view.
//!
//! [`load_more`] fetches exactly one page: it asks the [`Paginator`] for the
//! next request, sends it to the backend and applies the response, handing
//! new records to whatever [`ResultSink`] the view supplies. [`browse`] loops
//! over it and reports progress as a stream of [`BrowseEvent`]s.

use crate::backend::SearchBackend;
use crate::error::Result;
use crate::models::TorrentSummary;
use crate::order::OrderBy;
use crate::paginate::{BatchOutcome, Paginator};
use async_stream::stream;
use futures::Stream;

/// Append capability of a result view.
pub trait ResultSink {
    /// Records of one page, in the order the backend returned them.
    fn append(&mut self, records: &[TorrentSummary]);

    /// No more results for the current query and ordering.
    fn exhausted(&mut self) {}
}

impl ResultSink for Vec<TorrentSummary> {
    fn append(&mut self, records: &[TorrentSummary]) {
        self.extend_from_slice(records);
    }
}

/// Result of a single [`load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This many records were appended to the sink.
    Appended(usize),
    /// The backend returned an empty page; the sink was told.
    Exhausted,
    /// The paginator was already exhausted; no request was made.
    NothingToLoad,
}

/// Fetch the next page and append it to `sink`.
///
/// On a backend error the paginator returns to `Ready` with its cursor
/// untouched and the error is returned, so calling this again retries the
/// same page.
pub async fn load_more(
    backend: &dyn SearchBackend,
    paginator: &mut Paginator,
    sink: &mut dyn ResultSink,
) -> Result<LoadOutcome> {
    let Some(request) = paginator.next_page()? else {
        return Ok(LoadOutcome::NothingToLoad);
    };
    let records = match backend.torrents(&request).await {
        Ok(records) => records,
        Err(e) => {
            if let Err(stale) = paginator.fail(request.ticket()) {
                tracing::debug!(error = %*stale, "Failed request no longer in flight");
            }
            return Err(e);
        },
    };
    match paginator.apply_batch(request.ticket(), &records)? {
        BatchOutcome::Appended(n) => {
            sink.append(&records);
            Ok(LoadOutcome::Appended(n))
        },
        BatchOutcome::Exhausted => {
            sink.exhausted();
            Ok(LoadOutcome::Exhausted)
        },
    }
}

/// Limits for [`browse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseOptions {
    /// Stop after this many non-empty pages; `None` pages until exhausted.
    pub max_pages: Option<usize>,
    /// Retries per page for retryable errors.
    pub retries: u32,
}
impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            max_pages: Some(1),
            retries: 2,
        }
    }
}

/// Progress events emitted by [`browse`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Page`](Self::Page) and [`Retrying`](Self::Retrying): zero or more
///    times.
/// 3. [`Exhausted`](Self::Exhausted): at most once, if the backend ran out of
///    results before the page limit.
/// 4. [`Complete`](Self::Complete): exactly once, signalling the stream is
///    finished.
///
/// An error terminates the stream early, in which case
/// [`Complete`](Self::Complete) is never emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseEvent {
    Started { order_by: OrderBy, ascending: bool },
    Page(Vec<TorrentSummary>),
    /// A retryable error occurred; the same page is being requested again.
    Retrying { attempt: u32 },
    Exhausted,
    Complete { pages: usize, records: usize },
}

/// Stream pages of results from `backend` until the paginator is exhausted or
/// `options.max_pages` pages have been loaded.
pub fn browse<'a>(
    backend: &'a dyn SearchBackend,
    paginator: &'a mut Paginator,
    options: BrowseOptions,
) -> impl Stream<Item = Result<BrowseEvent>> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        let (order_by, ascending) = (paginator.cursor().order_by, paginator.cursor().ascending);
        yield Ok(BrowseEvent::Started { order_by, ascending });

        let (mut pages, mut records, mut attempt) = (0, 0, 0);
        while options.max_pages.is_none_or(|max| pages < max) {
            let mut buffer: Vec<TorrentSummary> = Vec::new();
            match load_more(backend, paginator, &mut buffer).await {
                Ok(LoadOutcome::Appended(n)) => {
                    attempt = 0;
                    pages += 1;
                    records += n;
                    yield Ok(BrowseEvent::Page(buffer));
                },
                Ok(LoadOutcome::Exhausted | LoadOutcome::NothingToLoad) => {
                    yield Ok(BrowseEvent::Exhausted);
                    break;
                },
                Err(e) if e.is_retryable() && attempt < options.retries => {
                    attempt += 1;
                    tracing::info!(backend = backend.name(), attempt, error = %*e, "Retrying page request");
                    yield Ok(BrowseEvent::Retrying { attempt });
                },
                Err(e) => {
                    yield Err(e);
                    return;
                },
            }
        }

        yield Ok(BrowseEvent::Complete { pages, records });
    })
}
