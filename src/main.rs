//! gpcr - CLI entry point.

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use gpcr::config::{CONFIG_FILE_NAME, read_config};
use gpcr::git::{GitCommandExecutor, GitRepo, check_git_installed};
use gpcr::logging::init_logging;
use gpcr::pipeline::{TerminalPrompter, finalize, is_interactive, review_staged};
use gpcr::review::ReviewClient;
use gpcr::{CommitOutcome, PipelineError};

/// An AI-based git pre-commit code review tool.
#[derive(Parser, Debug)]
#[command(name = "gpcr")]
#[command(about = "An AI-based git pre-commit code review tool to enhance code quality before human review")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Show version number
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run code review on staged files
    Review,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Review => run_review_command().await,
    }
}

async fn run_review_command() -> ExitCode {
    println!("\n{}\n", " GPCR - Git Pre Code Review ".on_blue().white());

    let result = run_review().await;
    if let Err(err) = &result {
        report_failure(err);
    }
    ExitCode::from(exit_status(&result))
}

/// 0 when the changes were approved or committed, 1 for every other outcome.
fn exit_status(result: &Result<CommitOutcome>) -> u8 {
    match result {
        Ok(CommitOutcome::Approved | CommitOutcome::Committed) => 0,
        Err(_) => 1,
    }
}

async fn run_review() -> Result<CommitOutcome> {
    let cwd = env::current_dir().context("无法获取当前工作目录")?;
    let config = read_config(&cwd);

    check_git_installed().map_err(PipelineError::from)?;
    let repo = GitRepo::discover(&cwd).map_err(PipelineError::from)?;

    let report = review_staged(&config, &repo, ReviewClient::new).await?;

    let outcome = finalize(
        report.outcome.verdict,
        is_interactive(),
        &config,
        &TerminalPrompter,
        &GitCommandExecutor::new(),
    )?;

    Ok(outcome)
}

fn report_failure(err: &anyhow::Error) {
    let Some(pipeline_err) = err.downcast_ref::<PipelineError>() else {
        eprintln!("{} {:#}", "❌".red(), err);
        return;
    };

    match pipeline_err {
        PipelineError::Declined => {
            println!("{}", format!("\n👋 {pipeline_err}\n").blue());
        }
        PipelineError::ReviewRejected => {}
        PipelineError::MissingLlmConfig => {
            eprintln!("{}", format!("❌ {pipeline_err}").red());
            eprintln!(
                "{}",
                format!("ℹ️ 提示：在项目根目录创建 {CONFIG_FILE_NAME} 文件并配置 LLM 参数")
                .yellow()
            );
        }
        other => eprintln!("{}", format!("❌ {other}").red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpcr::{CommitError, GitError};

    fn failed(err: PipelineError) -> Result<CommitOutcome> {
        Err(err.into())
    }

    #[test]
    fn test_successful_outcomes_exit_zero() {
        assert_eq!(exit_status(&Ok(CommitOutcome::Approved)), 0);
        assert_eq!(exit_status(&Ok(CommitOutcome::Committed)), 0);
    }

    #[test]
    fn test_pipeline_stops_exit_one() {
        for err in [
            PipelineError::NoStagedFiles,
            PipelineError::NoReviewableFiles,
            PipelineError::MissingLlmConfig,
            PipelineError::ReviewRejected,
            PipelineError::Declined,
            PipelineError::Git(GitError::NotInstalled),
            PipelineError::Commit(CommitError::CommandFailed {
                command: "npm run lint".to_string(),
                code: Some(1),
                output: "src/a.ts:3 unused".to_string(),
            }),
        ] {
            assert_eq!(exit_status(&failed(err)), 1);
        }
    }

    #[test]
    fn test_setup_errors_exit_one() {
        let result: Result<CommitOutcome> = Err(anyhow::anyhow!("no working directory"));
        assert_eq!(exit_status(&result), 1);
    }

    #[test]
    fn test_version_flags_parse() {
        for flag in ["-v", "--version"] {
            let err = Cli::try_parse_from(["gpcr", flag]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        }
    }

    #[test]
    fn test_review_subcommand_parses() {
        let cli = Cli::try_parse_from(["gpcr", "review"]).unwrap();
        assert!(matches!(cli.command, Command::Review));
    }
}
