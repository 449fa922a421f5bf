//! gpcr - AI-based git pre-commit code review.
//!
//! # Overview
//!
//! gpcr reads the staged changes of a git repository, drops files matched by
//! the configured ignore patterns, asks an OpenAI-compatible model to review
//! the rest, and either reports the verdict (non-interactive) or walks the
//! user through committing (interactive).

pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod pipeline;
pub mod review;

// Re-export commonly used types
pub use config::{Config, LlmCredentials, read_config};
pub use error::{CommitError, ConfigError, GitError, PipelineError, ReviewError};
pub use git::{DiffContent, FileStatus, StagedFile};
pub use pipeline::{CommitOutcome, ReviewReport, finalize, review_staged};
pub use review::{FileReview, ReviewOutcome, ReviewVerdict};
