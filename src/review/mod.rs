//! Review prompt, streaming LLM client and verdict.

pub mod client;
pub mod prompt;
pub mod verdict;

pub use client::{REVIEW_MODEL, ReviewClient, Reviewer, SYSTEM_INSTRUCTION};
pub use prompt::{FileReview, build_prompt, file_type_category};
pub use verdict::{PASS_PHRASE, ReviewOutcome, ReviewVerdict};
