//! Change detection and conflict prevention for shared text documents.
//!
//! Several editors (people, scripts, agents) may read and modify the same
//! document. This crate keeps a baseline snapshot of every document the
//! process has read or written and refuses to write over changes it has not
//! seen:
//!
//! - [`Engine::read`] loads a document and records its baseline
//! - [`Engine::edit`] applies an exact-match replacement, but only if the
//!   file on disk still matches the baseline
//! - [`Engine::status`] reports whether a document changed since its baseline
//!
//! # Example
//!
//! ```no_run
//! use redline_tracking::{EditOutcome, EditRequest, Engine, ReadRequest};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::default();
//! let path = Path::new("/home/user/Documents/draft.md");
//!
//! engine.read(path, ReadRequest::default()).await?;
//!
//! match engine.edit(path, EditRequest::new("Hello World", "Hello CUPS")).await? {
//!     EditOutcome::Success(done) => println!("{}", done.snippet),
//!     EditOutcome::Conflict(conflict) => println!("changed on disk:\n{}", conflict.diff),
//!     EditOutcome::NoMatch => println!("nothing to replace"),
//!     EditOutcome::AmbiguousMatch { found, .. } => println!("{found} matches"),
//! }
//! # Ok(())
//! # }
//! ```

mod detect;
mod diff;
mod editor;
mod engine;
mod error;
mod hash;
mod reader;
mod snapshot;
mod status;
mod store;

pub use detect::{detect, observe, ChangeState, Detection, Observation};
pub use diff::{baseline_diff, line_changes, unified_diff, DiffOptions};
pub use editor::{Conflict, ConflictReason, EditOutcome, EditRequest, EditSuccess};
pub use engine::{Engine, EngineSettings};
pub use error::{TrackingError, TrackingResult};
pub use hash::{hash, ContentHash};
pub use reader::{NumberedLine, ReadRequest, ReadView};
pub use snapshot::TrackedSnapshot;
pub use status::{BaselineInfo, StatusReport};
pub use store::{BaselineStore, IdentityGuard};
