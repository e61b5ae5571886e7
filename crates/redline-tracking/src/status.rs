//! Read-only status checks.

use crate::hash::ContentHash;
use crate::{ChangeState, Detection, Engine, TrackedSnapshot, TrackingResult};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Baseline metadata included in a status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineInfo {
    pub size: u64,
    #[serde(skip)]
    pub modified_at: SystemTime,
    pub content_hash: ContentHash,
}

impl From<&TrackedSnapshot> for BaselineInfo {
    fn from(snapshot: &TrackedSnapshot) -> Self {
        Self {
            size: snapshot.size(),
            modified_at: snapshot.modified_at(),
            content_hash: snapshot.content_hash(),
        }
    }
}

/// The state of one document relative to its baseline.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub identity: PathBuf,
    pub state: ChangeState,
    /// Baseline → current diff, present only when modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_size: Option<u64>,
}

impl StatusReport {
    /// Human-readable summary.
    pub fn render(&self) -> String {
        let path = self.identity.display();
        let mut out = match self.state {
            ChangeState::Untracked => {
                format!("{path} has not been read in this session.")
            }
            ChangeState::Missing => {
                format!("{path} was read earlier but no longer exists.")
            }
            ChangeState::Unchanged => {
                format!("{path} is unchanged since it was last read.")
            }
            ChangeState::Modified => {
                format!("{path} has been modified since it was last read.")
            }
        };

        if let Some(baseline) = &self.baseline {
            let read_at: DateTime<Local> = baseline.modified_at.into();
            out.push_str(&format!(
                "\n\nLast read: {} bytes, modified {}, sha256 {}",
                baseline.size,
                read_at.format("%Y-%m-%d %H:%M:%S"),
                baseline.content_hash.short()
            ));
        }
        if let Some(size) = self.current_size {
            out.push_str(&format!("\nOn disk: {size} bytes"));
        }
        if let Some(diff) = &self.diff {
            if diff.is_empty() {
                out.push_str("\n\nNo line-by-line differences found (metadata changed)");
            } else {
                out.push_str("\n\nChanges:\n");
                out.push_str(diff);
            }
        }
        out
    }
}

impl Engine {
    /// Report how a document relates to its baseline.
    ///
    /// Never records or replaces a baseline, so calling it any number of
    /// times between a read and an edit changes nothing.
    pub async fn status(&self, identity: &Path) -> TrackingResult<StatusReport> {
        let detection =
            crate::detect(&self.store, identity, self.settings.max_file_size).await?;
        let state = detection.state();
        let baseline = detection.baseline().map(|b| BaselineInfo::from(b.as_ref()));

        let (diff, current_size) = match &detection {
            Detection::Modified { baseline, current } => (
                Some(current.diff_from(baseline, self.settings.diff)),
                Some(current.size),
            ),
            Detection::Unchanged { baseline } => (None, Some(baseline.size())),
            Detection::Untracked | Detection::Missing { .. } => (None, None),
        };

        Ok(StatusReport {
            identity: identity.to_path_buf(),
            state,
            diff,
            baseline,
            current_size,
        })
    }
}
