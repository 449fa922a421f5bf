//! Error types for gpcr modules using thiserror.

use async_openai::error::OpenAIError;
use thiserror::Error;

/// Errors from reading and merging the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(#[source] serde_json::Error),
}

/// Errors from git read operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("未检测到 git，请先安装 git")]
    NotInstalled,

    #[error("当前目录不是 git 仓库: {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Failed to read the index: {0}")]
    Index(#[source] git2::Error),

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Path '{0}' is not present in the index")]
    NotStaged(String),
}

/// Errors from the streaming review call.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Failed to build review request: {0}")]
    InvalidRequest(#[source] OpenAIError),

    #[error("Review endpoint error: {0}")]
    Api(#[source] OpenAIError),

    #[error("Failed to write review output: {0}")]
    Output(#[source] std::io::Error),
}

/// Errors from the post-review command and commit steps.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `output` holds stderr followed by stdout, whichever is non-empty.
    #[error("`{command}` exited with {}: {output}",
        code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

/// Errors that end a review run. Every variant maps to exit code 1.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("暂存区没有文件，无法进行代码审查")]
    NoStagedFiles,

    #[error("过滤后没有需要审查的文件")]
    NoReviewableFiles,

    #[error("请提供 LLM 配置，否则无法进行代码审查")]
    MissingLlmConfig,

    #[error("代码审查未通过")]
    ReviewRejected,

    #[error("已取消提交，请根据审查结果修改代码")]
    Declined,

    #[error("Prompt failed: {0}")]
    Prompt(#[source] dialoguer::Error),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("AI 代码审查调用失败: {0}")]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}

impl From<dialoguer::Error> for PipelineError {
    fn from(err: dialoguer::Error) -> Self {
        PipelineError::Prompt(err)
    }
}
