//! Search Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::order::OrderBy;
use derive_more::{Display, Error};

/// A search client error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for search client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
///
/// ### Configuration Errors
/// Raised synchronously at the point a value is set or resolved; the caller
/// handed over something outside the contract.
/// - [`ErrorKind::UnsupportedCriterion`]
/// - [`ErrorKind::NotImplementedServerSide`]
/// - [`ErrorKind::InvalidInfoHash`]
/// - [`ErrorKind::InvalidWindow`]
///
/// ### Pagination State Errors
/// - [`ErrorKind::Busy`]
/// - [`ErrorKind::StaleResponse`]
/// - [`ErrorKind::NotLoading`]
///
/// ### Transport Errors
/// The paginator stays `Ready` with its cursor untouched after these, so the
/// same page can be requested again.
/// - [`ErrorKind::Transport`]
/// - [`ErrorKind::Status`]
/// - [`ErrorKind::InvalidResponse`]
/// - [`ErrorKind::NotFound`]
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// Not a member of the ordering enumeration.
    #[display("unsupported order criterion: {_0}")]
    UnsupportedCriterion(#[error(not(source))] String),
    /// A declared criterion the backend does not populate.
    #[display("ordering by {_0} is not implemented server-side")]
    NotImplementedServerSide(#[error(not(source))] OrderBy),
    #[display("invalid info hash: {_0}")]
    InvalidInfoHash(#[error(not(source))] String),
    /// Statistics window could not be constructed.
    #[display("invalid statistics window: {_0}")]
    InvalidWindow(#[error(not(source))] String),
    /// A page request is already in flight.
    #[display("a page request is already in flight")]
    Busy,
    /// The response belongs to a request issued before the last reset.
    #[display("response does not belong to the request in flight")]
    StaleResponse,
    /// A response arrived but no request was in flight.
    #[display("no page request in flight")]
    NotLoading,
    /// Connection, DNS or timeout failure.
    #[display("transport error")]
    Transport,
    /// The backend answered with a non-2xx status.
    #[display("backend responded with HTTP {_0}")]
    Status(#[error(not(source))] u16),
    /// The response body could not be decoded.
    #[display("invalid response from backend")]
    InvalidResponse,
    #[display("not found: {_0}")]
    NotFound(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport | Self::Busy => true,
            Self::Status(code) => *code >= 500,
            _ => false,
        }
    }
}
