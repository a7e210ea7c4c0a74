//! Keyset pagination over the search endpoint.
//!
//! Instead of offsets, each page is requested relative to the last record of
//! the previous one: its `id` and the value of the ordering criterion. That
//! pair only means something under the ordering it was captured with, so
//! changing the query, the criterion or the direction discards it.
//!
//! ```text
//!            next_page()            apply_batch([..])
//!   Ready ───────────────▶ Loading ───────────────────▶ Ready
//!     ▲                       │
//!     └──────── fail() ───────┤ apply_batch([])
//!                             ▼
//!                         Exhausted  (only reset() leaves it)
//! ```

use crate::error::{ErrorKind, Result};
use crate::models::TorrentSummary;
use crate::order::{OrderBy, OrderedValue};
use crate::request::{PageRequest, Ticket};
use time::UtcDateTime;

/// Lifecycle of a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// More results may be available; a page can be requested.
    Ready,
    /// A page request is in flight.
    Loading,
    /// The backend returned an empty page for this ordering.
    Exhausted,
}

/// Minimal state needed to fetch the page after the last one seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub last_id: Option<u64>,
    pub last_ordered_value: Option<OrderedValue>,
    pub order_by: OrderBy,
    pub ascending: bool,
}
impl Cursor {
    fn empty(order_by: OrderBy, ascending: bool) -> Self {
        Self {
            last_id: None,
            last_ordered_value: None,
            order_by,
            ascending,
        }
    }
}

/// What applying a batch did to the paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The records should be appended to the display; more may follow.
    Appended(usize),
    /// No more results for this query and ordering.
    Exhausted,
}

/// Owns the query, the session epoch and the cursor for one result listing.
///
/// At most one page request is in flight at a time. Requesting another page
/// while one is loading is rejected with [`ErrorKind::Busy`] rather than
/// queued.
#[derive(Debug, Clone)]
pub struct Paginator {
    query: Option<String>,
    epoch: i64,
    limit: Option<u32>,
    cursor: Cursor,
    state: PageState,
    generation: u64,
    sequence: u64,
    in_flight: Option<Ticket>,
}
impl Paginator {
    /// Create a paginator with the default ordering for `query`, and the
    /// session epoch fixed to the current time.
    pub fn new(query: Option<impl Into<String>>) -> Self {
        let query = normalize(query.map(Into::into));
        let (order_by, ascending) = Self::default_order(query.as_deref());
        Self {
            query,
            epoch: UtcDateTime::now().unix_timestamp(),
            limit: None,
            cursor: Cursor::empty(order_by, ascending),
            state: PageState::Ready,
            generation: 0,
            sequence: 0,
            in_flight: None,
        }
    }

    /// Pin the "as-of" timestamp sent with every page request.
    pub fn with_epoch(mut self, epoch: i64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Page size to request; `None` lets the backend decide.
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Override the default ordering (resets the cursor).
    pub fn with_order(mut self, order_by: OrderBy, ascending: bool) -> Self {
        let query = self.query.take();
        self.reset(query, order_by, ascending);
        self
    }

    /// Relevance for free-text queries; most recently discovered first
    /// otherwise.
    ///
    /// Relevance is requested ascending, matching the backend's own default
    /// where the best match has the lowest rank.
    pub fn default_order(query: Option<&str>) -> (OrderBy, bool) {
        match query.is_some_and(|q| !q.is_empty()) {
            true => (OrderBy::Relevance, true),
            false => (OrderBy::DiscoveredOn, false),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Start over with a new query and/or ordering.
    ///
    /// Clears the cursor and returns to [`PageState::Ready`], whatever state
    /// the paginator was in. A request still in flight becomes stale: its
    /// response will be rejected by [`apply_batch()`](Self::apply_batch).
    pub fn reset(&mut self, query: Option<String>, order_by: OrderBy, ascending: bool) {
        self.query = normalize(query);
        self.cursor = Cursor::empty(order_by, ascending);
        self.state = PageState::Ready;
        self.generation += 1;
        self.in_flight = None;
        tracing::debug!(query = ?self.query, %order_by, ascending, "Pagination reset");
    }

    /// Build the request for the next page and mark it in flight.
    ///
    /// Returns `Ok(None)` once exhausted (nothing left to load) and
    /// [`ErrorKind::Busy`] if a request is already in flight.
    pub fn next_page(&mut self) -> Result<Option<PageRequest>> {
        match self.state {
            PageState::Exhausted => return Ok(None),
            PageState::Loading => exn::bail!(ErrorKind::Busy),
            PageState::Ready => {},
        }
        self.sequence += 1;
        let ticket = Ticket {
            generation: self.generation,
            sequence: self.sequence,
        };
        self.in_flight = Some(ticket);
        self.state = PageState::Loading;
        Ok(Some(PageRequest {
            query: self.query.clone(),
            epoch: self.epoch,
            last_id: self.cursor.last_id,
            last_ordered_value: self.cursor.last_ordered_value,
            order_by: self.cursor.order_by,
            ascending: self.cursor.ascending,
            limit: self.limit,
            ticket,
        }))
    }

    /// Apply the records returned for the request identified by `ticket`.
    ///
    /// An empty batch exhausts the paginator. Otherwise the last record (the
    /// backend's ordering is trusted) becomes the new cursor. If its ordered
    /// value can't be resolved, the error is returned, the cursor is left as
    /// it was and nothing should be appended.
    pub fn apply_batch(&mut self, ticket: Ticket, records: &[TorrentSummary]) -> Result<BatchOutcome> {
        self.settle(ticket)?;
        let Some(last) = records.last() else {
            self.state = PageState::Exhausted;
            tracing::debug!(order_by = %self.cursor.order_by, "Pagination exhausted");
            return Ok(BatchOutcome::Exhausted);
        };
        self.state = PageState::Ready;
        let value = self.cursor.order_by.resolve(last)?;
        self.cursor.last_id = Some(last.id);
        self.cursor.last_ordered_value = Some(value);
        tracing::debug!(records = records.len(), last_id = last.id, last_value = %value, "Page applied");
        Ok(BatchOutcome::Appended(records.len()))
    }

    /// Record that the request identified by `ticket` failed.
    ///
    /// The paginator returns to [`PageState::Ready`] with the cursor
    /// untouched, so the next [`next_page()`](Self::next_page) asks for the
    /// same page again.
    pub fn fail(&mut self, ticket: Ticket) -> Result<()> {
        self.settle(ticket)?;
        self.state = PageState::Ready;
        tracing::debug!(last_id = ?self.cursor.last_id, "Page request failed; cursor kept for retry");
        Ok(())
    }

    fn settle(&mut self, ticket: Ticket) -> Result<()> {
        if ticket.generation != self.generation {
            exn::bail!(ErrorKind::StaleResponse);
        }
        if self.in_flight != Some(ticket) {
            exn::bail!(ErrorKind::NotLoading);
        }
        self.in_flight = None;
        Ok(())
    }
}

fn normalize(query: Option<String>) -> Option<String> {
    query.filter(|q| !q.is_empty())
}
