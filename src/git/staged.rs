//! Staged file discovery using git2.

use std::fmt;
use std::path::Path;

use git2::{Delta, DiffOptions, ErrorCode, Repository, Tree};

use crate::error::GitError;
use crate::git::diff::{DiffContent, staged_file_diff};

/// Change status of a staged file, as the single-letter git code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Unmerged,
}

impl FileStatus {
    pub fn code(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
            FileStatus::TypeChanged => 'T',
            FileStatus::Unmerged => 'U',
        }
    }

    fn from_delta(delta: Delta) -> Option<Self> {
        match delta {
            Delta::Added => Some(FileStatus::Added),
            Delta::Modified => Some(FileStatus::Modified),
            Delta::Deleted => Some(FileStatus::Deleted),
            Delta::Renamed => Some(FileStatus::Renamed),
            Delta::Copied => Some(FileStatus::Copied),
            Delta::Typechange => Some(FileStatus::TypeChanged),
            Delta::Conflicted => Some(FileStatus::Unmerged),
            Delta::Unmodified
            | Delta::Ignored
            | Delta::Untracked
            | Delta::Unreadable => None,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A file with changes recorded in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Repository-relative path using `/` separators.
    pub path: String,
    pub status: FileStatus,
}

impl StagedFile {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    /// Final path component.
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Containing directory, or `.` for files at the repository root.
    pub fn dirname(&self) -> &str {
        match self.path.rsplit_once('/') {
            Some(("", _)) => "/",
            Some((dir, _)) => dir,
            None => ".",
        }
    }

    /// Lower-cased extension without the dot, empty when there is none.
    pub fn extension(&self) -> String {
        Path::new(self.basename())
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Source of staged changes for a review run.
pub trait StagedChanges {
    /// Staged files in path order.
    fn staged_files(&self) -> Result<Vec<StagedFile>, GitError>;

    /// Added/removed lines and full staged content of `path`.
    ///
    /// Never fails: problems reading the file degrade to an empty diff.
    fn file_diff(&self, path: &str) -> DiffContent;
}

/// A git repository opened through git2.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Find the repository containing `path`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::NotARepository)?;
        Ok(Self { repo })
    }
}

impl StagedChanges for GitRepo {
    fn staged_files(&self) -> Result<Vec<StagedFile>, GitError> {
        list_staged_files(&self.repo)
    }

    fn file_diff(&self, path: &str) -> DiffContent {
        staged_file_diff(&self.repo, path)
    }
}

/// Resolve the HEAD tree, treating an unborn branch as "no tree".
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// List staged files with their status (HEAD against the index).
///
/// Renames are not detected, so a moved file shows up as a deletion plus an
/// addition.
pub fn list_staged_files(repo: &Repository) -> Result<Vec<StagedFile>, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let mut opts = DiffOptions::new();
    opts.include_typechange(true);
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(GitError::DiffFailed)?;

    let mut files = Vec::new();
    for delta in diff.deltas() {
        let Some(status) = FileStatus::from_delta(delta.status()) else {
            continue;
        };

        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        if !path.is_empty() {
            files.push(StagedFile { path, status });
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_status_codes() {
        assert_eq!(FileStatus::Added.to_string(), "A");
        assert_eq!(FileStatus::Modified.to_string(), "M");
        assert_eq!(FileStatus::Deleted.to_string(), "D");
        assert_eq!(FileStatus::Renamed.to_string(), "R");
        assert_eq!(FileStatus::Copied.to_string(), "C");
    }

    #[test]
    fn test_path_parts() {
        let file = StagedFile::new("src/utils/Git.TS", FileStatus::Modified);
        assert_eq!(file.basename(), "Git.TS");
        assert_eq!(file.dirname(), "src/utils");
        assert_eq!(file.extension(), "ts");

        let root = StagedFile::new("README", FileStatus::Added);
        assert_eq!(root.basename(), "README");
        assert_eq!(root.dirname(), ".");
        assert_eq!(root.extension(), "");
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        let file = StagedFile::new(".gitignore", FileStatus::Modified);
        assert_eq!(file.extension(), "");
        let file = StagedFile::new("web/.env.local", FileStatus::Modified);
        assert_eq!(file.extension(), "local");
    }

    #[test]
    fn test_list_staged_files_empty_repo() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        // Untracked files are not staged
        std::fs::write(dir.path().join("new.txt"), "hello\n").unwrap();

        let files = list_staged_files(&repo).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_staged_files_unborn_branch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        std::fs::write(dir.path().join("a.rs"), "fn main() {}\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("a.rs")).unwrap();
        index.write().unwrap();

        let files = list_staged_files(&repo).unwrap();
        assert_eq!(files, vec![StagedFile::new("a.rs", FileStatus::Added)]);
    }

    #[test]
    fn test_corrupt_head_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let sig = git2::Signature::now("Test", "test@test.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[]).unwrap();

        std::fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/\0invalid").unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        let result = list_staged_files(&repo);
        assert!(
            matches!(result, Err(GitError::DiffFailed(_))),
            "Expected DiffFailed for corrupt HEAD, got: {:?}",
            result
        );
    }
}
