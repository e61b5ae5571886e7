//! Reading documents.
//!
//! A read is the point where the caller declares "this is the version I am
//! working from", so it always replaces the baseline, whatever was recorded
//! before.

use crate::hash::ContentHash;
use crate::{Engine, TrackedSnapshot, TrackingError, TrackingResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Longest line shown in full; the baseline always keeps the whole line.
const MAX_LINE_DISPLAY: usize = 2000;

/// Which lines to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    /// First line, 1-indexed. Values below 1 are treated as 1.
    pub offset: usize,
    /// Maximum number of lines. `None` uses the engine default.
    pub limit: Option<usize>,
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self {
            offset: 1,
            limit: None,
        }
    }
}

impl ReadRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }
}

/// One line of a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    /// 1-indexed line number.
    pub number: usize,
    pub text: String,
}

/// The slice of a document returned by a read.
#[derive(Debug, Clone)]
pub struct ReadView {
    pub identity: PathBuf,
    pub lines: Vec<NumberedLine>,
    /// Line count of the whole document.
    pub total_lines: usize,
    /// Effective first line after clamping.
    pub offset: usize,
    pub size: u64,
    pub content_hash: ContentHash,
}

impl ReadView {
    fn slice(snapshot: &TrackedSnapshot, offset: usize, limit: usize) -> Self {
        let all: Vec<&str> = snapshot.content().lines().collect();
        let total_lines = all.len();

        let offset = offset.max(1);
        let start = (offset - 1).min(total_lines);
        let end = start.saturating_add(limit).min(total_lines);

        let lines = all[start..end]
            .iter()
            .enumerate()
            .map(|(i, text)| NumberedLine {
                number: start + i + 1,
                text: (*text).to_string(),
            })
            .collect();

        Self {
            identity: snapshot.identity().to_path_buf(),
            lines,
            total_lines,
            offset,
            size: snapshot.size(),
            content_hash: snapshot.content_hash(),
        }
    }

    /// Whether the requested range held no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render as `cat -n`: right-aligned line number, tab, text.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{:>6}\t{}", line.number, truncate_line(&line.text)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn truncate_line(line: &str) -> std::borrow::Cow<'_, str> {
    match line.char_indices().nth(MAX_LINE_DISPLAY) {
        Some((cut, _)) => format!("{}... [truncated]", &line[..cut]).into(),
        None => line.into(),
    }
}

impl Engine {
    /// Read a document and make its current state the baseline.
    ///
    /// Offsets past the end of the document return an empty slice rather
    /// than an error.
    pub async fn read(&self, identity: &Path, request: ReadRequest) -> TrackingResult<ReadView> {
        let limit = request.limit.unwrap_or(self.settings.read_limit);
        if limit == 0 {
            return Err(TrackingError::invalid_request("limit must be greater than 0"));
        }

        let _guard = self.store.lock(identity).await;

        let snapshot = TrackedSnapshot::load(identity, self.settings.max_file_size).await?;
        let view = ReadView::slice(&snapshot, request.offset, limit);

        let replaced = self.store.put(snapshot).await;
        info!(
            path = %identity.display(),
            hash = %view.content_hash.short(),
            lines = view.total_lines,
            rebaselined = replaced.is_some(),
            "Read document"
        );

        Ok(view)
    }
}
