//! Terminal renderings of search results.
//!
//! Both views implement [`ResultSink`] so the same "load more" driver can fill
//! either of them. Write failures can't be returned from `append()`, so the
//! first one is kept and reported by `finish()`.

use magview_filetree::humanize;
use magview_search::TorrentSummary;
use magview_search::browse::ResultSink;
use std::io::{self, Write};
use time::UtcDateTime;
use time::macros::format_description;

const NO_MORE_RESULTS: &str = "No more results.";
const NAME_WIDTH: usize = 60;

/// Unix timestamp as a `DD/MM/YYYY` UTC date.
pub fn humanize_date(timestamp: i64) -> String {
    let format = format_description!("[day]/[month]/[year]");
    UtcDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|date| date.format(format).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Shorten `name` to at most `width` characters, marking the cut.
fn truncate(name: &str, width: usize) -> String {
    match name.char_indices().nth(width.saturating_sub(1)) {
        Some((cut, _)) if name.chars().count() > width => format!("{}…", &name[..cut]),
        _ => name.to_string(),
    }
}

/// Output shared by both views: counts rows and keeps the first write error,
/// after which nothing more is written.
struct Latched<W> {
    out: W,
    rows: usize,
    error: Option<io::Error>,
}

impl<W: Write> Latched<W> {
    fn new(out: W) -> Self {
        Self { out, rows: 0, error: None }
    }

    /// Write each record with `row`, which also gets the number of rows
    /// already shown.
    fn write_rows(&mut self, records: &[TorrentSummary], mut row: impl FnMut(&mut W, usize, &TorrentSummary) -> io::Result<()>) {
        for record in records {
            if self.error.is_some() {
                return;
            }
            match row(&mut self.out, self.rows, record) {
                Ok(()) => self.rows += 1,
                Err(e) => self.error = Some(e),
            }
        }
    }

    fn exhausted(&mut self) {
        if self.error.is_none()
            && let Err(e) = writeln!(self.out, "{NO_MORE_RESULTS}")
        {
            self.error = Some(e);
        }
    }

    fn finish(mut self) -> io::Result<usize> {
        match self.error.take() {
            Some(e) => Err(e),
            None => self.out.flush().map(|()| self.rows),
        }
    }
}

/// Records as two-line entries: the name, then size, file count, date and
/// info hash.
pub struct ListView<W> {
    output: Latched<W>,
}

impl<W: Write> ListView<W> {
    pub fn new(out: W) -> Self {
        Self { output: Latched::new(out) }
    }

    fn row(out: &mut W, record: &TorrentSummary) -> io::Result<()> {
        writeln!(out, "{}", record.name)?;
        writeln!(
            out,
            "    {} · {} files · discovered {} · {}",
            humanize(record.size),
            record.n_files,
            humanize_date(record.discovered_on),
            record.info_hash,
        )
    }

    /// Number of records shown, or the first write error.
    pub fn finish(self) -> io::Result<usize> {
        self.output.finish()
    }
}

impl<W: Write> ResultSink for ListView<W> {
    fn append(&mut self, records: &[TorrentSummary]) {
        self.output.write_rows(records, |out, _, record| Self::row(out, record));
    }

    fn exhausted(&mut self) {
        self.output.exhausted();
    }
}

/// Records as rows of a fixed-width table, header printed before the first
/// row.
pub struct TableView<W> {
    output: Latched<W>,
}

impl<W: Write> TableView<W> {
    pub fn new(out: W) -> Self {
        Self { output: Latched::new(out) }
    }

    fn header(out: &mut W) -> io::Result<()> {
        writeln!(out, "{:<NAME_WIDTH$}  {:>12}  {:>6}  {:>10}", "Name", "Size", "Files", "Discovered")?;
        writeln!(out, "{}", "-".repeat(NAME_WIDTH + 2 + 12 + 2 + 6 + 2 + 10))
    }

    fn row(out: &mut W, shown: usize, record: &TorrentSummary) -> io::Result<()> {
        if shown == 0 {
            Self::header(out)?;
        }
        writeln!(
            out,
            "{:<NAME_WIDTH$}  {:>12}  {:>6}  {:>10}",
            truncate(&record.name, NAME_WIDTH),
            humanize(record.size),
            record.n_files,
            humanize_date(record.discovered_on),
        )
    }

    /// Number of rows shown, or the first write error.
    pub fn finish(self) -> io::Result<usize> {
        self.output.finish()
    }
}

impl<W: Write> ResultSink for TableView<W> {
    fn append(&mut self, records: &[TorrentSummary]) {
        self.output.write_rows(records, Self::row);
    }

    fn exhausted(&mut self) {
        self.output.exhausted();
    }
}

/// Either view, chosen at runtime.
pub enum ResultView<W> {
    List(ListView<W>),
    Table(TableView<W>),
}

impl<W: Write> ResultView<W> {
    pub fn new(out: W, table: bool) -> Self {
        match table {
            true => Self::Table(TableView::new(out)),
            false => Self::List(ListView::new(out)),
        }
    }

    pub fn finish(self) -> io::Result<usize> {
        match self {
            Self::List(view) => view.finish(),
            Self::Table(view) => view.finish(),
        }
    }
}

impl<W: Write> ResultSink for ResultView<W> {
    fn append(&mut self, records: &[TorrentSummary]) {
        match self {
            Self::List(view) => view.append(records),
            Self::Table(view) => view.append(records),
        }
    }

    fn exhausted(&mut self) {
        match self {
            Self::List(view) => view.exhausted(),
            Self::Table(view) => view.exhausted(),
        }
    }
}
