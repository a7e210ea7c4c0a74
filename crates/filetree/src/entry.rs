use crate::SEPARATOR;
use crate::error::{ErrorKind, Result};

/// One file of a listing: a non-empty sequence of non-empty path segments
/// and the file's size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    segments: Vec<String>,
    size: u64,
}

impl PathEntry {
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>, size: u64) -> Result<Self> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            exn::bail!(ErrorKind::EmptyPath);
        }
        if segments.iter().any(String::is_empty) {
            exn::bail!(ErrorKind::EmptySegment(segments.join(SEPARATOR)));
        }
        Ok(Self { segments, size })
    }

    /// Split a slash-delimited `path` into segments.
    ///
    /// ```
    /// use magview_filetree::PathEntry;
    ///
    /// let entry = PathEntry::parse("debian/README.txt", 1024).unwrap();
    /// assert_eq!(entry.segments(), ["debian", "README.txt"]);
    /// assert!(PathEntry::parse("debian//README.txt", 1024).is_err());
    /// ```
    pub fn parse(path: &str, size: u64) -> Result<Self> {
        if path.is_empty() {
            exn::bail!(ErrorKind::EmptyPath);
        }
        Self::new(path.split(SEPARATOR), size)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last segment.
    pub fn name(&self) -> &str {
        // Never empty, checked on construction.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn path(&self) -> String {
        self.segments.join(SEPARATOR)
    }
}
