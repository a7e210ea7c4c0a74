//! Subcommand implementations.
//!
//! Every command writes to the `out` it is given and talks to the search
//! service only through a [`SearchBackend`], so they run unchanged against
//! the in-memory backend.

use crate::cli::SearchArgs;
use crate::error::{ErrorKind, Result};
use crate::view::{ResultView, humanize_date};
use exn::ResultExt;
use futures::StreamExt;
use magview_filetree::widget::{MemoryWidget, feed_tree};
use magview_filetree::{PathEntry, build, humanize, serialize};
use magview_search::backend::{HttpBackend, SearchBackend};
use magview_search::browse::{BrowseEvent, BrowseOptions, ResultSink, browse};
use magview_search::{InfoHash, Paginator, QueryParams, StatsWindow, TimeUnit};
use std::io::Write;
use std::pin::pin;

/// Retries per page for transport errors and 5xx responses.
const RETRIES: u32 = 2;

/// What a search run showed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    pub pages: usize,
    pub records: usize,
    pub exhausted: bool,
}

pub async fn search(
    backend: &dyn SearchBackend,
    args: &SearchArgs,
    page_size: Option<u32>,
    epoch: Option<i64>,
    out: &mut dyn Write,
) -> Result<SearchSummary> {
    let (order_by, ascending) = args.ordering().or_raise(|| ErrorKind::Search)?;
    let mut paginator = Paginator::new(args.query.clone()).with_limit(page_size).with_order(order_by, ascending);
    if let Some(epoch) = epoch {
        paginator = paginator.with_epoch(epoch);
    }
    let options = BrowseOptions {
        max_pages: args.max_pages(),
        retries: RETRIES,
    };

    let mut view = ResultView::new(&mut *out, args.table);
    let mut summary = SearchSummary {
        pages: 0,
        records: 0,
        exhausted: false,
    };
    let mut events = pin!(browse(backend, &mut paginator, options));
    while let Some(event) = events.next().await {
        match event.or_raise(|| ErrorKind::Search)? {
            BrowseEvent::Started { order_by, ascending } => {
                tracing::info!(backend = backend.name(), query = ?args.query, %order_by, ascending, "Searching");
            },
            BrowseEvent::Page(records) => view.append(&records),
            BrowseEvent::Retrying { attempt } => {
                tracing::warn!(attempt, max = RETRIES, "Request failed, retrying");
            },
            BrowseEvent::Exhausted => {
                summary.exhausted = true;
                view.exhausted();
            },
            BrowseEvent::Complete { pages, records } => {
                summary.pages = pages;
                summary.records = records;
            },
        }
    }
    view.finish().or_raise(|| ErrorKind::Output)?;
    Ok(summary)
}

pub async fn torrent(backend: &dyn SearchBackend, info_hash: &str, widget: bool, out: &mut dyn Write) -> Result<()> {
    let info_hash = info_hash.parse::<InfoHash>().or_raise(|| ErrorKind::Search)?;
    let detail = backend.torrent(&info_hash).await.or_raise(|| ErrorKind::Search)?;
    let files = backend.files(&info_hash).await.or_raise(|| ErrorKind::Search)?;
    let entries = files
        .iter()
        .map(|file| PathEntry::parse(&file.path, file.size))
        .collect::<magview_filetree::error::Result<Vec<PathEntry>>>()
        .or_raise(|| ErrorKind::FileTree)?;
    let tree = build(&entries);

    let magnet = format!("magnet:?xt=urn:btih:{info_hash}&{}", QueryParams::new().with("dn", Some(&detail.name)));
    let lines = match widget {
        true => {
            let mut widget = MemoryWidget::new();
            feed_tree(&mut widget, &tree);
            widget.render()
        },
        false => serialize::to_lines(&tree),
    };

    let write = |out: &mut dyn Write| -> std::io::Result<()> {
        writeln!(out, "{}", detail.name)?;
        writeln!(out, "Info hash:  {info_hash}")?;
        writeln!(out, "Size:       {}", humanize(detail.size))?;
        writeln!(out, "Files:      {}", detail.n_files)?;
        writeln!(out, "Discovered: {}", humanize_date(detail.discovered_on))?;
        writeln!(out, "Magnet:     {magnet}")?;
        writeln!(out)?;
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        out.flush()
    };
    write(out).or_raise(|| ErrorKind::Output)
}

pub async fn stats(backend: &dyn SearchBackend, n: u32, unit: &str, out: &mut dyn Write) -> Result<()> {
    let unit = unit.parse::<TimeUnit>().or_raise(|| ErrorKind::Search)?;
    let window = StatsWindow::new(n, unit).or_raise(|| ErrorKind::Search)?;
    let statistics = backend.statistics(&window).await.or_raise(|| ErrorKind::Search)?;

    let write = |out: &mut dyn Write| -> std::io::Result<()> {
        writeln!(out, "{:<16}  {:>12}  {:>12}  {:>12}", "Since", "Torrents", "Files", "Total size")?;
        for bucket in statistics.buckets() {
            let count = |series: &std::collections::BTreeMap<String, u64>| series.get(bucket).copied().unwrap_or(0);
            writeln!(
                out,
                "{bucket:<16}  {:>12}  {:>12}  {:>12}",
                count(&statistics.n_discovered),
                count(&statistics.n_files),
                humanize(count(&statistics.total_size)),
            )?;
        }
        out.flush()
    };
    tracing::debug!(from = window.from(), n, %unit, buckets = statistics.buckets().len(), "Statistics received");
    write(out).or_raise(|| ErrorKind::Output)
}

pub fn feed(backend: &HttpBackend, query: Option<&str>, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", backend.feed_url(query)).or_raise(|| ErrorKind::Output)
}
