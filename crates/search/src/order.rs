//! Ordering criteria and their extraction rules.
//!
//! The backend sorts by one of a closed set of criteria. The keyset cursor
//! needs the value of that criterion on the last record of a page, so every
//! criterion maps to exactly one field of [`TorrentSummary`] (or to an
//! explicit error for the criteria the backend declares but never fills in).

use crate::error::{Error, ErrorKind, Result};
use crate::models::TorrentSummary;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A sortable field of a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderBy {
    TotalSize,
    DiscoveredOn,
    /// Declared by the API, not populated by the backend.
    UpdatedOn,
    NFiles,
    /// Declared by the API, not populated by the backend.
    NSeeders,
    /// Declared by the API, not populated by the backend.
    NLeechers,
    Relevance,
}
impl OrderBy {
    pub const ALL: [OrderBy; 7] = [
        Self::TotalSize,
        Self::DiscoveredOn,
        Self::UpdatedOn,
        Self::NFiles,
        Self::NSeeders,
        Self::NLeechers,
        Self::Relevance,
    ];

    /// Wire spelling, as accepted by the `orderBy` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalSize => "TOTAL_SIZE",
            Self::DiscoveredOn => "DISCOVERED_ON",
            Self::UpdatedOn => "UPDATED_ON",
            Self::NFiles => "N_FILES",
            Self::NSeeders => "N_SEEDERS",
            Self::NLeechers => "N_LEECHERS",
            Self::Relevance => "RELEVANCE",
        }
    }

    /// Whether the backend populates this field on its records.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::UpdatedOn | Self::NSeeders | Self::NLeechers)
    }

    /// Extracts the value this criterion orders by from `record`.
    ///
    /// Fails with [`ErrorKind::NotImplementedServerSide`] for the criteria the
    /// backend never fills in, rather than inventing a value that would put
    /// the cursor somewhere meaningless.
    ///
    /// ```
    /// use magview_search::{OrderBy, OrderedValue, TorrentSummary};
    /// # let record = TorrentSummary {
    /// #     id: 7, info_hash: "00".repeat(20), name: "debian.iso".into(),
    /// #     size: 4096, discovered_on: 1_700_000_000, n_files: 1, relevance: 0.0,
    /// # };
    /// assert_eq!(OrderBy::TotalSize.resolve(&record).unwrap(), OrderedValue::Unsigned(4096));
    /// assert!(OrderBy::NSeeders.resolve(&record).is_err());
    /// ```
    pub fn resolve(&self, record: &TorrentSummary) -> Result<OrderedValue> {
        Ok(match self {
            Self::TotalSize => OrderedValue::Unsigned(record.size),
            Self::DiscoveredOn => OrderedValue::Signed(record.discovered_on),
            Self::NFiles => OrderedValue::Unsigned(u64::from(record.n_files)),
            Self::Relevance => OrderedValue::Float(record.relevance),
            Self::UpdatedOn | Self::NSeeders | Self::NLeechers => {
                exn::bail!(ErrorKind::NotImplementedServerSide(*self))
            },
        })
    }
}
impl FromStr for OrderBy {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|criterion| criterion.as_str() == s)
            .ok_or_else(|| exn::Exn::from(ErrorKind::UnsupportedCriterion(s.to_string())))
    }
}
impl Display for OrderBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The value of an ordering criterion on one record.
///
/// Serialized with its natural decimal representation for the
/// `lastOrderedValue` query parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderedValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}
impl Display for OrderedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}
