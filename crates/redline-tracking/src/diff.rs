//! Unified diff rendering.

use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Diff rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Unchanged lines shown around each change.
    pub context_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { context_lines: 3 }
    }
}

/// Render a unified diff between two texts.
///
/// Returns an empty string when the texts are identical.
pub fn unified_diff(
    old: &str,
    new: &str,
    old_label: &str,
    new_label: &str,
    options: DiffOptions,
) -> String {
    if old == new {
        return String::new();
    }

    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(options.context_lines)
        .header(old_label, new_label)
        .to_string()
}

/// Diff a document's baseline content against what is on disk now.
pub fn baseline_diff(baseline: &str, current: &str, identity: &Path, options: DiffOptions) -> String {
    unified_diff(
        baseline,
        current,
        &format!("{} (last read)", identity.display()),
        &format!("{} (current)", identity.display()),
        options,
    )
}

/// Count inserted and deleted lines between two texts.
pub fn line_changes(old: &str, new: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .fold((0, 0), |(added, removed), change| match change.tag() {
            ChangeTag::Insert => (added + 1, removed),
            ChangeTag::Delete => (added, removed + 1),
            ChangeTag::Equal => (added, removed),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_empty() {
        assert_eq!(
            unified_diff("same\n", "same\n", "a", "b", DiffOptions::default()),
            ""
        );
    }

    #[test]
    fn test_single_line_change() {
        let diff = baseline_diff(
            "Hello World\n",
            "Hello Universe\n",
            Path::new("/docs/draft.md"),
            DiffOptions::default(),
        );
        assert!(diff.starts_with("--- /docs/draft.md (last read)\n+++ /docs/draft.md (current)\n"));
        assert!(diff.contains("@@ -1"));
        assert!(diff.contains("\n-Hello World\n"));
        assert!(diff.contains("\n+Hello Universe\n"));
    }

    #[test]
    fn test_context_lines_respected() {
        let old: String = (1..=20).map(|i| format!("line {i}\n")).collect();
        let new = old.replace("line 10\n", "line ten\n");

        let narrow = unified_diff(&old, &new, "a", "b", DiffOptions { context_lines: 1 });
        assert!(narrow.contains(" line 9\n"));
        assert!(!narrow.contains(" line 8\n"));

        let wide = unified_diff(&old, &new, "a", "b", DiffOptions::default());
        assert!(wide.contains(" line 7\n"));
        assert!(!wide.contains(" line 6\n"));
    }

    #[test]
    fn test_deterministic() {
        let a = unified_diff("x\ny\n", "x\nz\n", "a", "b", DiffOptions::default());
        let b = unified_diff("x\ny\n", "x\nz\n", "a", "b", DiffOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_line_changes() {
        assert_eq!(line_changes("a\nb\n", "a\nc\nd\n"), (2, 1));
        assert_eq!(line_changes("a\n", "a\n"), (0, 0));
    }
}
