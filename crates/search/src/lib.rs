//! Client for the torrent metadata search API.
//!
//! Results are paged with a keyset cursor rather than offsets: every request
//! after the first carries the `id` and ordered value of the last record seen,
//! plus the session `epoch` so that newly discovered torrents don't shift
//! pages mid-browse. [`Paginator`] owns that state; [`browse::load_more`]
//! drives it against any [`SearchBackend`](backend::SearchBackend).

pub mod backend;
pub mod browse;
pub mod error;
mod models;
mod order;
mod paginate;
mod query;
mod request;
mod stats;

pub use crate::models::{FileEntry, InfoHash, Statistics, TorrentDetail, TorrentSummary};
pub use crate::order::{OrderBy, OrderedValue};
pub use crate::paginate::{BatchOutcome, Cursor, PageState, Paginator};
pub use crate::query::QueryParams;
pub use crate::request::{PageRequest, Ticket};
pub use crate::stats::{StatsWindow, TimeUnit};
use std::sync::Arc;

pub type BackendHandle = Arc<dyn backend::SearchBackend + Send + Sync>;
