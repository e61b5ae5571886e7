//! Path utilities.
//!
//! Turns user-supplied document names into canonical identities. Every
//! request that refers to the same underlying file must end up with the
//! same `PathBuf`, because that path is the key the baseline store uses.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Get the redline configuration directory.
///
/// This follows XDG conventions on Linux/macOS:
/// - `$XDG_CONFIG_HOME/redline` if set
/// - `~/.config/redline` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("redline"))
}

/// Get the redline logs directory.
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("redline").join("logs"))
}

/// Default documents root: `~/Documents`.
pub fn default_documents_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
}

/// Normalize a path by removing `.` and `..` components.
///
/// Unlike `canonicalize`, this doesn't require the path to exist.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            _ => {
                result.push(component);
            }
        }
    }

    result
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

/// Resolves document names to canonical absolute paths.
///
/// Bare names (`draft.md`) and relative paths (`thesis/ch1.tex`) are taken
/// relative to the documents root. Absolute and `~` paths are used as given.
#[derive(Debug, Clone)]
pub struct DocumentResolver {
    root: PathBuf,
    confine: bool,
}

impl DocumentResolver {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or_else(|_| normalize(&root));
        Self {
            root,
            confine: false,
        }
    }

    /// Refuse paths that resolve outside the root.
    pub fn confined(mut self, confine: bool) -> Self {
        self.confine = confine;
        self
    }

    /// The documents root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `input` to a canonical document identity.
    ///
    /// Existing files are fully canonicalized. For files that don't exist
    /// (yet, or any more) the parent directory is canonicalized and the file
    /// name appended, so a deleted file keeps the identity it had while it
    /// existed.
    pub fn resolve(&self, input: &str) -> Result<PathBuf> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::invalid_input("file path must not be empty"));
        }

        let expanded = expand_home(input);
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            self.root.join(expanded)
        };
        let normalized = normalize(&joined);

        let canonical = match normalized.canonicalize() {
            Ok(path) => path,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                canonical_parent(&normalized)
            }
            Err(err) => return Err(Error::from_io(&normalized, err)),
        };

        if self.confine && !canonical.starts_with(&self.root) {
            return Err(Error::outside_root(&canonical, &self.root));
        }

        Ok(canonical)
    }
}

fn canonical_parent(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => parent.join(name),
            Err(_) => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}
