//! CLI Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("search service request failed")]
    Search,
    #[display("malformed file listing")]
    FileTree,
    #[display("could not start the async runtime")]
    Runtime,
    #[display("could not write output")]
    Output,
}
