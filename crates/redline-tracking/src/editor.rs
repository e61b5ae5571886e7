//! Guarded edits.
//!
//! An edit only writes when the file on disk is exactly the baseline the
//! caller last saw. Every refusal leaves both the file and the store
//! untouched; the only commit point is the final `put` of the new baseline.

use crate::diff::{line_changes, unified_diff};
use crate::hash::ContentHash;
use crate::{Detection, Engine, TrackedSnapshot, TrackingError, TrackingResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// An exact-match replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub old_string: String,
    pub new_string: String,
    /// Number of occurrences the caller expects to replace.
    pub expected_replacements: usize,
}

impl EditRequest {
    /// Replace exactly one occurrence of `old_string`.
    pub fn new(old_string: impl Into<String>, new_string: impl Into<String>) -> Self {
        Self {
            old_string: old_string.into(),
            new_string: new_string.into(),
            expected_replacements: 1,
        }
    }

    /// Expect `count` occurrences instead of one.
    pub fn expecting(mut self, count: usize) -> Self {
        self.expected_replacements = count;
        self
    }

    fn validate(&self) -> TrackingResult<()> {
        if self.expected_replacements == 0 {
            return Err(TrackingError::invalid_request(
                "expected_replacements must be at least 1",
            ));
        }
        if self.old_string.is_empty() {
            return Err(TrackingError::invalid_request("old_string must not be empty"));
        }
        if self.old_string == self.new_string {
            return Err(TrackingError::invalid_request(
                "old_string and new_string are the same",
            ));
        }
        Ok(())
    }
}

/// Why an edit was refused as a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// There is no baseline to check against; read the file first.
    NotRead,
    /// The file changed on disk since the baseline was recorded.
    ModifiedExternally,
}

impl ConflictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictReason::NotRead => "not_read",
            ConflictReason::ModifiedExternally => "modified_externally",
        }
    }
}

/// A refused edit with what the caller needs to recover.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub identity: PathBuf,
    pub reason: ConflictReason,
    /// Baseline → current diff. Empty when the file was never read.
    pub diff: String,
    pub baseline_hash: Option<ContentHash>,
    pub current_hash: Option<ContentHash>,
}

impl Conflict {
    /// Explanation suitable for showing to the caller.
    pub fn message(&self) -> String {
        match self.reason {
            ConflictReason::NotRead => format!(
                "{} has not been read in this session. Read it before editing.",
                self.identity.display()
            ),
            ConflictReason::ModifiedExternally => {
                let diff = if self.diff.is_empty() {
                    "No line-by-line differences found (metadata changed)"
                } else {
                    self.diff.as_str()
                };
                format!(
                    "{} has been modified externally since it was last read.\n\n\
                     External changes detected:\n{}\n\n\
                     Read the document again to get the latest version before editing.",
                    self.identity.display(),
                    diff
                )
            }
        }
    }
}

/// A committed edit.
#[derive(Debug, Clone)]
pub struct EditSuccess {
    pub identity: PathBuf,
    pub replacements: usize,
    /// Numbered lines around the first replacement.
    pub snippet: String,
    /// Unified diff of the applied change.
    pub diff: String,
    pub additions: usize,
    pub deletions: usize,
    /// Digest of the new baseline.
    pub content_hash: ContentHash,
}

/// How an edit ended.
#[derive(Debug, Clone)]
pub enum EditOutcome {
    Success(EditSuccess),
    Conflict(Conflict),
    NoMatch,
    AmbiguousMatch { found: usize, expected: usize },
}

impl EditOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EditOutcome::Success(_))
    }

    /// Short machine-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            EditOutcome::Success(_) => "success",
            EditOutcome::Conflict(_) => "conflict",
            EditOutcome::NoMatch => "no_match",
            EditOutcome::AmbiguousMatch { .. } => "ambiguous_match",
        }
    }
}

impl Engine {
    /// Replace `old_string` with `new_string` if the document is unchanged
    /// since its baseline and the match count is exactly as expected.
    pub async fn edit(&self, identity: &Path, request: EditRequest) -> TrackingResult<EditOutcome> {
        request.validate()?;

        let _guard = self.store.lock(identity).await;

        let detection =
            crate::detect(&self.store, identity, self.settings.max_file_size).await?;
        let baseline = match detection {
            Detection::Untracked => {
                warn!(path = %identity.display(), "Edit refused: file not read");
                return Ok(EditOutcome::Conflict(Conflict {
                    identity: identity.to_path_buf(),
                    reason: ConflictReason::NotRead,
                    diff: String::new(),
                    baseline_hash: None,
                    current_hash: None,
                }));
            }
            Detection::Missing { .. } => {
                return Err(TrackingError::FileNotFound(identity.to_path_buf()));
            }
            Detection::Modified { baseline, current } => {
                let diff = current.diff_from(&baseline, self.settings.diff);
                warn!(path = %identity.display(), "Edit refused: modified externally");
                return Ok(EditOutcome::Conflict(Conflict {
                    identity: identity.to_path_buf(),
                    reason: ConflictReason::ModifiedExternally,
                    diff,
                    baseline_hash: Some(baseline.content_hash()),
                    current_hash: current.content_hash,
                }));
            }
            Detection::Unchanged { baseline } => baseline,
        };

        let content = baseline.content();
        let found = content.matches(request.old_string.as_str()).count();
        if found == 0 {
            debug!(path = %identity.display(), "Edit refused: no match");
            return Ok(EditOutcome::NoMatch);
        }
        if found != request.expected_replacements {
            debug!(
                path = %identity.display(),
                found,
                expected = request.expected_replacements,
                "Edit refused: match count differs"
            );
            return Ok(EditOutcome::AmbiguousMatch {
                found,
                expected: request.expected_replacements,
            });
        }

        let new_content = content.replace(&request.old_string, &request.new_string);
        let first_match = content.find(request.old_string.as_str()).unwrap_or(0);

        write_atomic(identity, new_content.as_bytes()).await?;

        let modified_at = fs::metadata(identity)
            .await
            .and_then(|m| m.modified())
            .map_err(|e| {
                warn!(path = %identity.display(), error = %e, "Written file metadata unavailable");
                TrackingError::from_io(identity, e)
            })?;

        let diff = unified_diff(
            content,
            &new_content,
            &format!("a/{}", identity.display()),
            &format!("b/{}", identity.display()),
            self.settings.diff,
        );
        let (additions, deletions) = line_changes(content, &new_content);
        let snippet = context_snippet(
            &new_content,
            first_match,
            &request.new_string,
            self.settings.snippet_context_lines,
        );

        let snapshot = TrackedSnapshot::new(identity, new_content, modified_at);
        let content_hash = snapshot.content_hash();
        self.store.put(snapshot).await;

        info!(
            path = %identity.display(),
            replacements = found,
            hash = %content_hash.short(),
            "Edit committed"
        );

        Ok(EditOutcome::Success(EditSuccess {
            identity: identity.to_path_buf(),
            replacements: found,
            snippet,
            diff,
            additions,
            deletions,
            content_hash,
        }))
    }
}

/// Write to a temporary sibling, then rename over the target.
async fn write_atomic(path: &Path, bytes: &[u8]) -> TrackingResult<()> {
    let suffix: u64 = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ (std::process::id() as u64);
    let temp_name = format!(
        ".{}.{:x}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        suffix
    );
    let temp_path = path
        .parent()
        .map(|p| p.join(&temp_name))
        .unwrap_or_else(|| PathBuf::from(&temp_name));

    fs::write(&temp_path, bytes)
        .await
        .map_err(|e| TrackingError::from_io(&temp_path, e))?;

    // Keep the original file's permission bits.
    if let Ok(metadata) = fs::metadata(path).await {
        let _ = fs::set_permissions(&temp_path, metadata.permissions()).await;
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(TrackingError::from_io(path, e));
    }

    Ok(())
}

/// Numbered lines around the replacement that starts at byte `start`.
fn context_snippet(content: &str, start: usize, replacement: &str, radius: usize) -> String {
    let first_line = content[..start].matches('\n').count();
    let span = replacement.matches('\n').count();
    let from = first_line.saturating_sub(radius);
    let to = first_line + span + radius;

    content
        .lines()
        .enumerate()
        .skip(from)
        .take(to - from + 1)
        .map(|(i, line)| format!("{:>6}\t{}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
