//! Review pipeline: staged files → filter → prompt → review → commit.

pub mod prompter;

use colored::Colorize;
use tracing::debug;

use crate::config::{Config, LlmCredentials};
use crate::error::{PipelineError, ReviewError};
use crate::git::{CommitExecutor, StagedChanges, filter_ignored};
use crate::review::{FileReview, ReviewOutcome, ReviewVerdict, Reviewer, build_prompt};

pub use prompter::{Prompter, TerminalPrompter, is_interactive};

/// Result of a completed review call.
#[derive(Debug)]
pub struct ReviewReport {
    pub files: Vec<FileReview>,
    pub outcome: ReviewOutcome,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Non-interactive run whose review passed; nothing committed.
    Approved,
    /// The staged changes were committed.
    Committed,
}

/// Collect, filter and review the staged changes.
///
/// `connect` builds the reviewer once the LLM credentials are known to be
/// present; it is not called when the run stops earlier.
pub async fn review_staged<S, R, F>(
    config: &Config,
    source: &S,
    connect: F,
) -> Result<ReviewReport, PipelineError>
where
    S: StagedChanges + ?Sized,
    R: Reviewer,
    F: FnOnce(&LlmCredentials) -> Result<R, ReviewError>,
{
    println!("{}", "📂 获取暂存区文件...".blue());
    let staged = source.staged_files()?;
    if staged.is_empty() {
        return Err(PipelineError::NoStagedFiles);
    }
    println!("{}", format!("✅ 找到 {} 个暂存文件", staged.len()).green());

    println!("{}", "\n🔍 过滤忽略的文件...".blue());
    let files = filter_ignored(&staged, config.ignore_patterns());
    if files.is_empty() {
        return Err(PipelineError::NoReviewableFiles);
    }
    println!(
        "{}",
        format!("✅ 过滤后剩余 {} 个文件需要审查\n", files.len()).green()
    );

    let credentials = config
        .llm_credentials()
        .ok_or(PipelineError::MissingLlmConfig)?;

    let files: Vec<FileReview> = files
        .into_iter()
        .map(|file| {
            let diff = source.file_diff(&file.path);
            FileReview { file, diff }
        })
        .collect();

    let prompt = build_prompt(&files, config);
    debug!("Built review prompt for {} files ({} chars)", files.len(), prompt.len());

    let reviewer = connect(&credentials)?;
    let outcome = reviewer.review(&prompt).await?;

    Ok(ReviewReport { files, outcome })
}

/// Act on the verdict.
///
/// Non-interactive runs only report. Interactive runs ask to continue after a
/// failed review, collect a commit message, run the custom commands (staging
/// everything after each), and commit without hooks.
pub fn finalize(
    verdict: ReviewVerdict,
    interactive: bool,
    config: &Config,
    prompter: &dyn Prompter,
    executor: &dyn CommitExecutor,
) -> Result<CommitOutcome, PipelineError> {
    if !interactive {
        return if verdict.is_pass() {
            Ok(CommitOutcome::Approved)
        } else {
            Err(PipelineError::ReviewRejected)
        };
    }

    if !verdict.is_pass() && !prompter.confirm_continue()? {
        return Err(PipelineError::Declined);
    }

    let message = prompter.commit_message()?;

    if !config.custom_commands.is_empty() {
        println!("{}", "\n🔄 执行自定义命令...".blue());
        for command in &config.custom_commands {
            executor.run_command(command)?;
            println!("{}", format!("✅ 命令执行成功: {command}").green());
            executor.stage_all()?;
            println!("{}", "✅ 执行 git add . 成功".green());
        }
    }

    println!(
        "{}",
        "\n⚠️ 注意: 使用脚本命令执行 AI Code Review 会忽略项目配置的 pre-commit hooks".yellow()
    );
    println!("{}", "🚀 正在提交代码...".blue());
    executor.commit(&message)?;
    println!("{}", "✅ 代码提交成功!\n".green());

    Ok(CommitOutcome::Committed)
}
