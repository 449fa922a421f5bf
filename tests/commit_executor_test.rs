//! Integration tests for committing through the system `git` binary.

mod common;

use common::TestRepo;
use gpcr::git::{CommitExecutor, GitCommandExecutor, GitRepo, StagedChanges};
use gpcr::CommitError;

#[test]
fn test_commit_records_message() {
    let test_repo = TestRepo::new();
    test_repo.write_staged("src/lib.rs", "pub fn f() {}\n");

    let executor = GitCommandExecutor::in_dir(test_repo.path());
    executor.commit("feat: add f").unwrap();

    assert_eq!(test_repo.head_message().trim_end(), "feat: add f");
}

#[test]
fn test_commit_message_is_passed_verbatim() {
    let test_repo = TestRepo::new();
    test_repo.write_staged("a.txt", "a\n");

    let message = "fix: handle \"quotes\" and $HOME; `ticks`";
    GitCommandExecutor::in_dir(test_repo.path())
        .commit(message)
        .unwrap();

    assert_eq!(test_repo.head_message().trim_end(), message);
}

#[test]
fn test_command_output_is_staged_after_stage_all() {
    let test_repo = TestRepo::new();
    test_repo.write_staged("a.txt", "a\n");
    test_repo.commit("initial");

    let executor = GitCommandExecutor::in_dir(test_repo.path());
    executor.run_command("echo generated > gen.txt").unwrap();
    executor.stage_all().unwrap();

    let repo = GitRepo::discover(test_repo.path()).unwrap();
    let paths: Vec<String> = repo
        .staged_files()
        .unwrap()
        .into_iter()
        .map(|f| f.path)
        .collect();
    assert_eq!(paths, ["gen.txt"]);
}

#[test]
fn test_failing_command_reports_exit_code() {
    let test_repo = TestRepo::new();
    let executor = GitCommandExecutor::in_dir(test_repo.path());

    let err = executor.run_command("echo broken >&2; exit 3").unwrap_err();
    match err {
        CommitError::CommandFailed { code, output, .. } => {
            assert_eq!(code, Some(3));
            assert_eq!(output, "broken");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn test_commit_with_nothing_staged_fails() {
    let test_repo = TestRepo::new();
    test_repo.write_staged("a.txt", "a\n");
    test_repo.commit("initial");

    let result = GitCommandExecutor::in_dir(test_repo.path()).commit("empty");
    match result {
        Err(CommitError::CommandFailed { output, .. }) => {
            // git reports this on stdout
            assert!(output.contains("nothing to commit"), "output was: {output}");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn test_linter_style_failure_shows_findings() {
    let test_repo = TestRepo::new();
    let executor = GitCommandExecutor::in_dir(test_repo.path());

    let err = executor
        .run_command("printf 'src/a.ts:%s unused\\n' 3; exit 1")
        .unwrap_err();
    assert!(err.to_string().contains("src/a.ts:3 unused"));
}
