//! Command-line interface.

use clap::{ArgAction, Args, Parser, Subcommand};
use magview_search::error::Result as SearchResult;
use magview_search::{OrderBy, Paginator};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "MAGVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search torrents by name, or list the latest discoveries
    Search(SearchArgs),
    /// Show one torrent and its file tree
    Torrent {
        /// 40-character hex info hash
        info_hash: String,
        /// Show the file tree as an expandable widget, with sizes
        #[arg(long)]
        widget: bool,
    },
    /// Show discovery statistics
    Stats {
        /// Number of buckets
        #[arg(long, default_value_t = 7)]
        n: u32,
        /// Bucket size: hours, days, weeks, months or years
        #[arg(long, default_value = "days")]
        unit: String,
    },
    /// Print the RSS feed URL
    Feed {
        /// Only include torrents matching this query
        query: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Free-text query; omit to list the most recently discovered torrents
    pub query: Option<String>,

    /// TOTAL_SIZE, DISCOVERED_ON, N_FILES or RELEVANCE (case-insensitive)
    #[arg(long)]
    pub order_by: Option<String>,

    #[arg(long, conflicts_with = "descending")]
    pub ascending: bool,

    #[arg(long)]
    pub descending: bool,

    /// Pages to load; 0 loads until there are no more results
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Render results as a table instead of a list
    #[arg(long)]
    pub table: bool,
}
impl SearchArgs {
    /// Ordering to browse with.
    ///
    /// Without `--order-by` the default for the query applies. The direction
    /// defaults to ascending for relevance (best match first) and descending
    /// for everything else (largest, newest, most files first).
    pub fn ordering(&self) -> SearchResult<(OrderBy, bool)> {
        let order_by = match &self.order_by {
            Some(criterion) => criterion.to_ascii_uppercase().parse::<OrderBy>()?,
            None => Paginator::default_order(self.query.as_deref()).0,
        };
        let ascending = match (self.ascending, self.descending) {
            (true, _) => true,
            (_, true) => false,
            _ => order_by == OrderBy::Relevance,
        };
        Ok((order_by, ascending))
    }

    /// `None` pages until exhausted.
    pub fn max_pages(&self) -> Option<usize> {
        (self.pages > 0).then_some(self.pages)
    }
}
