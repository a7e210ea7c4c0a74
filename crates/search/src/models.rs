//! Wire models returned by the search API.
//!
//! Field names follow the backend's camelCase JSON.

use crate::error::{Error, ErrorKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// One search result.
///
/// `id` is opaque to the client but totally ordered, which the backend uses
/// to break ties between records with the same ordered value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentSummary {
    pub id: u64,
    /// Hex-encoded SHA-1 info hash.
    pub info_hash: String,
    pub name: String,
    /// Total size of all files in bytes
    pub size: u64,
    /// Unix timestamp (seconds)
    pub discovered_on: i64,
    pub n_files: u32,
    /// Only meaningful for free-text queries; zero otherwise.
    #[serde(default)]
    pub relevance: f64,
}

/// The detail endpoint returns the same shape as a search result.
pub type TorrentDetail = TorrentSummary;

/// One file of a torrent, as listed by the file-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    /// Slash-delimited path relative to the torrent root
    pub path: String,
    pub size: u64,
}

/// Time-bucketed discovery statistics.
///
/// Each series maps a bucket label (e.g. `2024-05-01`) to a value. Keys sort
/// chronologically because the labels are zero-padded ISO-style strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub n_discovered: BTreeMap<String, u64>,
    #[serde(default)]
    pub n_files: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_size: BTreeMap<String, u64>,
}
impl Statistics {
    /// Every bucket label present in any series, in order.
    pub fn buckets(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .n_discovered
            .keys()
            .chain(self.n_files.keys())
            .chain(self.total_size.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

/// A validated 20-byte info hash.
///
/// Parsing rejects anything that isn't exactly 40 hex characters, so a typo
/// fails before a request is ever made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);
impl InfoHash {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}
impl FromStr for InfoHash {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 20];
        match hex::decode_to_slice(s.trim(), &mut bytes) {
            Ok(()) => Ok(Self(bytes)),
            Err(_) => exn::bail!(ErrorKind::InvalidInfoHash(s.to_string())),
        }
    }
}
impl Display for InfoHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&hex::encode(self.0))
    }
}
