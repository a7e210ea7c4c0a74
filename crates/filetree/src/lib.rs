//! Rebuild torrent file listings as trees.
//!
//! The backend lists a torrent's files as flat slash-delimited paths. This
//! crate turns such a listing into a nested hierarchy ([`build`]), renders a
//! hierarchy as an indented text listing ([`serialize`]), and feeds either
//! form into an interactive tree display ([`widget`]).

mod build;
mod entry;
pub mod error;
mod node;
pub mod serialize;
mod size;
pub mod widget;

pub use crate::build::build;
pub use crate::entry::PathEntry;
pub use crate::node::{NodeKind, TreeNode};
pub use crate::size::humanize;

/// Path separator used by the backend's file listings.
pub const SEPARATOR: &str = "/";
