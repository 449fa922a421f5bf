//! Git operations: staged file discovery and diffs via git2, commits via the
//! `git` executable.

pub mod diff;
pub mod executor;
pub mod filter;
pub mod staged;

pub use diff::{DiffContent, parse_unified_diff, staged_file_diff};
pub use executor::{CommitExecutor, GitCommandExecutor};
pub use filter::{filter_ignored, matches_pattern};
pub use staged::{FileStatus, GitRepo, StagedChanges, StagedFile, list_staged_files};

use crate::error::GitError;

/// Check that the `git` executable is on `PATH`.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}
