//! The engine ties the store to its settings.

use crate::{BaselineStore, DiffOptions};
use std::sync::Arc;

/// Default maximum document size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Tunables shared by read, edit and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Diff rendering.
    pub diff: DiffOptions,
    /// Lines returned by a read when no limit is given.
    pub read_limit: usize,
    /// Lines shown on each side of an edit in the success snippet.
    pub snippet_context_lines: usize,
    /// Largest document that will be loaded.
    pub max_file_size: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            diff: DiffOptions::default(),
            read_limit: 50,
            snippet_context_lines: 2,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Read, edit and status over one shared baseline store.
///
/// Cloning an engine shares the store.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub(crate) store: Arc<BaselineStore>,
    pub(crate) settings: EngineSettings,
}

impl Engine {
    /// Create an engine over an existing store.
    pub fn new(store: Arc<BaselineStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    /// The baseline store.
    pub fn store(&self) -> &Arc<BaselineStore> {
        &self.store
    }

    /// Current settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}
