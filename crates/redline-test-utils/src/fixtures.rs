//! Test fixtures for documents directories.
//!
//! A fixture is a temporary directory standing in for `~/Documents`, plus a
//! resolver and an engine rooted there. Helpers that change files play the
//! part of the "other editor" that the tracking engine has to notice.

use redline_tracking::Engine;
use redline_util::DocumentResolver;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Builder for a temporary documents directory.
///
/// # Example
///
/// ```rust
/// use redline_test_utils::TestDocuments;
///
/// let docs = TestDocuments::new()
///     .with_file("draft.md", "Hello World\n")
///     .with_file("thesis/ch1.tex", "\\chapter{One}\n")
///     .build();
///
/// assert!(docs.exists("thesis/ch1.tex"));
/// ```
pub struct TestDocumentsBuilder {
    temp_dir: TempDir,
    files: BTreeMap<PathBuf, Vec<u8>>,
    config: Option<String>,
}

impl TestDocumentsBuilder {
    /// Add a text file, relative to the documents root.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.files
            .insert(path.as_ref().to_path_buf(), contents.into().into_bytes());
        self
    }

    /// Add a file with arbitrary bytes.
    pub fn with_bytes(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.files
            .insert(path.as_ref().to_path_buf(), contents.into());
        self
    }

    /// Add a `redline.json` project config at the root.
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Create everything on disk.
    pub fn build(self) -> TestDocuments {
        let root = self
            .temp_dir
            .path()
            .canonicalize()
            .unwrap_or_else(|e| panic!("Failed to canonicalize temp dir: {e}"));

        for (path, contents) in &self.files {
            write_all(&root.join(path), contents);
        }
        if let Some(config) = &self.config {
            write_all(&root.join("redline.json"), config.as_bytes());
        }

        TestDocuments {
            root,
            engine: Engine::default(),
            _temp_dir: self.temp_dir,
        }
    }
}

fn write_all(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| {
            panic!("Failed to create parent directory for {}: {}", path.display(), e)
        });
    }
    fs::write(path, contents)
        .unwrap_or_else(|e| panic!("Failed to write file {}: {}", path.display(), e));
}

/// A temporary documents directory with files on disk.
///
/// The directory is removed when this is dropped. Every call to
/// [`TestDocuments::engine`] shares one baseline store.
pub struct TestDocuments {
    root: PathBuf,
    engine: Engine,
    _temp_dir: TempDir,
}

impl TestDocuments {
    /// Start building a documents directory.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> TestDocumentsBuilder {
        TestDocumentsBuilder {
            temp_dir: TempDir::new().unwrap_or_else(|e| panic!("Failed to create temp dir: {e}")),
            files: BTreeMap::new(),
            config: None,
        }
    }

    /// Canonical path of the documents root.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Canonical path of a document, which is also its identity.
    pub fn file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    /// A resolver rooted at the documents directory.
    pub fn resolver(&self) -> DocumentResolver {
        DocumentResolver::new(&self.root)
    }

    /// The engine shared by this fixture.
    pub fn engine(&self) -> Engine {
        self.engine.clone()
    }

    /// Read a document as text.
    pub fn read(&self, name: impl AsRef<Path>) -> String {
        let path = self.file(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e))
    }

    /// Read a document's raw bytes.
    pub fn read_bytes(&self, name: impl AsRef<Path>) -> Vec<u8> {
        let path = self.file(name);
        fs::read(&path).unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e))
    }

    /// Overwrite a document, as an external editor would.
    pub fn write(&self, name: impl AsRef<Path>, contents: impl AsRef<str>) {
        write_all(&self.file(name), contents.as_ref().as_bytes());
    }

    /// Delete a document.
    pub fn remove(&self, name: impl AsRef<Path>) {
        let path = self.file(name);
        fs::remove_file(&path)
            .unwrap_or_else(|e| panic!("Failed to delete file {}: {}", path.display(), e));
    }

    /// Whether a document exists.
    pub fn exists(&self, name: impl AsRef<Path>) -> bool {
        self.file(name).exists()
    }

    /// Move a document's mtime forward without changing its bytes.
    pub fn touch(&self, name: impl AsRef<Path>, by: Duration) {
        let path = self.file(name);
        let file = fs::File::options()
            .write(true)
            .open(&path)
            .unwrap_or_else(|e| panic!("Failed to open file {}: {}", path.display(), e));
        let mtime = file
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| SystemTime::now());
        file.set_modified(mtime + by)
            .unwrap_or_else(|e| panic!("Failed to set mtime on {}: {}", path.display(), e));
    }

    /// Modification time of a document.
    pub fn modified(&self, name: impl AsRef<Path>) -> SystemTime {
        let path = self.file(name);
        fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or_else(|e| panic!("Failed to stat {}: {}", path.display(), e))
    }
}

/// Common document contents.
pub mod content {
    /// A short LaTeX document.
    pub const LATEX_ARTICLE: &str = r#"\documentclass{article}
\begin{document}
\section{Introduction}
Hello World
\end{document}
"#;

    /// A short Markdown document.
    pub const MARKDOWN_NOTES: &str = "# Notes\n\n- first\n- second\n- third\n";

    /// `n` numbered lines, each ending in a newline.
    pub fn numbered_lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_creates_nested_files() {
        let docs = TestDocuments::new()
            .with_file("thesis/ch1.tex", content::LATEX_ARTICLE)
            .build();
        assert!(docs.exists("thesis/ch1.tex"));
        assert_eq!(docs.read("thesis/ch1.tex"), content::LATEX_ARTICLE);
    }

    #[test]
    fn test_root_is_canonical() {
        let docs = TestDocuments::new().build();
        assert_eq!(docs.path(), docs.path().canonicalize().unwrap());
    }

    #[test]
    fn test_touch_keeps_bytes() {
        let docs = TestDocuments::new().with_file("a.md", "same").build();
        let before = docs.modified("a.md");
        docs.touch("a.md", Duration::from_secs(5));
        assert_eq!(docs.read("a.md"), "same");
        assert_eq!(docs.modified("a.md"), before + Duration::from_secs(5));
    }

    #[test]
    fn test_engine_is_shared() {
        let docs = TestDocuments::new().build();
        assert!(std::sync::Arc::ptr_eq(
            docs.engine().store(),
            docs.engine().store()
        ));
    }

    #[test]
    fn test_numbered_lines() {
        assert_eq!(content::numbered_lines(2), "line 1\nline 2\n");
    }
}
