//! Ignore-pattern filtering of staged files.

use crate::git::staged::StagedFile;

/// Drop every file matched by any of `patterns`, keeping the input order.
pub fn filter_ignored<P: AsRef<str>>(files: &[StagedFile], patterns: &[P]) -> Vec<StagedFile> {
    files
        .iter()
        .filter(|file| !patterns.iter().any(|p| matches_pattern(file, p.as_ref())))
        .cloned()
        .collect()
}

/// Whether `pattern` excludes `file`.
///
/// - `dir/`: the file's directory is `dir` or lies below it
/// - `*.ext`: the basename ends with `.ext`
/// - `a/b`: the path is `a/b` or lies below it
/// - `name`: the basename or the directory is exactly `name`
pub fn matches_pattern(file: &StagedFile, pattern: &str) -> bool {
    let basename = file.basename();
    let dirname = file.dirname();

    if let Some(dir) = pattern.strip_suffix('/') {
        return dirname == dir || dirname.starts_with(pattern);
    }

    if pattern.starts_with("*.") {
        return basename.ends_with(&pattern[1..]);
    }

    if pattern.contains('/') {
        return file.path == pattern
            || file
                .path
                .strip_prefix(pattern)
                .is_some_and(|rest| rest.starts_with('/'));
    }

    basename == pattern || dirname == pattern
}
