//! Custom test assertions for end-to-end tests

use super::config::RunOutput;
use std::path::Path;

/// NZBGet post-processing exit codes
pub const SUCCESS: i32 = 93;
/// Post-processing error
pub const ERROR: i32 = 94;
/// Nothing done / inconclusive
pub const NONE: i32 = 95;

/// Assert the run ended with `expected`, printing stdout on mismatch
pub fn assert_exit(output: &RunOutput, expected: i32) {
    assert_eq!(
        output.code, expected,
        "unexpected exit code, stdout:\n{}",
        output.stdout
    );
}

/// Assert the extension logged a line starting with `prefix` and containing `text`
pub fn assert_logged(output: &RunOutput, prefix: &str, text: &str) {
    assert!(
        output
            .stdout
            .lines()
            .any(|line| line.starts_with(prefix) && line.contains(text)),
        "expected a {} line containing {:?}, stdout:\n{}",
        prefix,
        text,
        output.stdout
    );
}

/// Assert each file exists below `root`
pub fn assert_present(root: &Path, names: &[&str]) {
    for name in names {
        assert!(root.join(name).exists(), "{} should exist", name);
    }
}

/// Assert each file is gone from below `root`
pub fn assert_absent(root: &Path, names: &[&str]) {
    for name in names {
        assert!(!root.join(name).exists(), "{} should be removed", name);
    }
}

/// File names (not paths) the fake unrar was called with
pub fn called_names(output: &RunOutput) -> Vec<String> {
    output
        .calls
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}
