//! Assertion helpers for documents and diffs.

use std::path::Path;

/// Assert that a file's content equals expected text exactly.
pub fn assert_file_equals(path: &Path, expected: &str) {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));

    if content != expected {
        panic!(
            "File {} content does not match expected:\n{}",
            path.display(),
            line_diff(expected, &content)
        );
    }
}

/// Assert that a unified diff removes `removed` and adds `added`.
///
/// Each argument is a single line, without the `-`/`+` marker.
pub fn assert_diff_changes(diff: &str, removed: &str, added: &str) {
    let has_line = |marker: char, text: &str| {
        diff.lines()
            .any(|line| line.strip_prefix(marker) == Some(text) && !line.starts_with("---"))
    };

    assert!(
        has_line('-', removed),
        "Diff does not remove {removed:?}:\n{diff}"
    );
    assert!(has_line('+', added), "Diff does not add {added:?}:\n{diff}");
}

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_strings_equal(actual: &str, expected: &str) {
    if actual != expected {
        panic!("Strings differ:\n{}", line_diff(expected, actual));
    }
}

fn line_diff(expected: &str, actual: &str) -> String {
    let diff = similar::TextDiff::from_lines(expected, actual);
    let mut output = String::new();

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            similar::ChangeTag::Delete => "-",
            similar::ChangeTag::Insert => "+",
            similar::ChangeTag::Equal => " ",
        };
        output.push_str(&format!("{}{}", sign, change));
    }
    output
}
