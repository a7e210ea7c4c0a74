//! File Tree Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed path entries, rejected when the entry is constructed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("path has no segments")]
    EmptyPath,
    /// Leading, trailing or doubled separator.
    #[display("path contains an empty segment: {_0:?}")]
    EmptySegment(#[error(not(source))] String),
}
