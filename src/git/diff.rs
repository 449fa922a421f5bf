//! Staged diff extraction for a single file.

use std::path::Path;

use git2::{DiffFormat, DiffOptions, Repository};
use tracing::warn;

use crate::error::GitError;
use crate::git::staged::resolve_head_tree;

/// Changes of one staged file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffContent {
    /// Added lines, `+` prefix stripped.
    pub added: Vec<String>,
    /// Removed lines, `-` prefix stripped.
    pub removed: Vec<String>,
    /// Full staged content of the file.
    pub content: String,
}

const STRUCTURAL_PREFIXES: &[&str] = &["diff ", "index ", "--- ", "+++ ", "@@ "];

/// Split unified diff text into added and removed lines.
///
/// Header and hunk lines are skipped; context and metadata lines are ignored.
/// The returned `content` is empty.
pub fn parse_unified_diff(diff_text: &str) -> DiffContent {
    let mut parsed = DiffContent::default();

    for line in diff_text.lines() {
        if STRUCTURAL_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        if let Some(added) = line.strip_prefix('+') {
            if !line.starts_with("+++") {
                parsed.added.push(added.to_string());
            }
        } else if let Some(removed) = line.strip_prefix('-') {
            if !line.starts_with("---") {
                parsed.removed.push(removed.to_string());
            }
        }
    }

    parsed
}

/// Added/removed lines and full staged content of `path`.
///
/// Any failure (including a path missing from the index, as for a staged
/// deletion) is logged and yields an empty [`DiffContent`].
pub fn staged_file_diff(repo: &Repository, path: &str) -> DiffContent {
    match try_staged_file_diff(repo, path) {
        Ok(diff) => diff,
        Err(e) => {
            warn!("Failed to read staged changes of {path}: {e}");
            DiffContent::default()
        }
    }
}

fn try_staged_file_diff(repo: &Repository, path: &str) -> Result<DiffContent, GitError> {
    let content = staged_content(repo, path)?;
    let patch = staged_patch_text(repo, path)?;

    let mut diff = parse_unified_diff(&patch);
    diff.content = content;
    Ok(diff)
}

/// Content of the index entry for `path`.
pub fn staged_content(repo: &Repository, path: &str) -> Result<String, GitError> {
    let index = repo.index().map_err(GitError::Index)?;
    let entry = index
        .get_path(Path::new(path), 0)
        .ok_or_else(|| GitError::NotStaged(path.to_string()))?;
    let blob = repo.find_blob(entry.id).map_err(GitError::Index)?;
    Ok(String::from_utf8_lossy(blob.content()).into_owned())
}

/// Unified diff of HEAD against the index, restricted to `path`.
pub fn staged_patch_text(repo: &Repository, path: &str) -> Result<String, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let mut opts = DiffOptions::new();
    opts.pathspec(path).disable_pathspec_match(true);
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(GitError::DiffFailed)?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            origin @ ('+' | '-' | ' ') => {
                text.push(origin);
                text.push_str(&content);
            }
            // File and hunk headers carry their own text.
            'F' | 'H' => text.push_str(&content),
            _ => return true,
        }
        if !text.ends_with('\n') {
            text.push('\n');
        }
        true
    })
    .map_err(GitError::DiffFailed)?;

    Ok(text)
}
