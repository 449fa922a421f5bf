//! Interactive terminal questions asked after a review.

use std::io::{self, IsTerminal};

use colored::Colorize;
use dialoguer::{Confirm, Input};

/// Questions put to the user in interactive mode.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask whether to commit despite a failed review. Defaults to no.
    fn confirm_continue(&self) -> Result<bool, dialoguer::Error>;

    /// Ask for a commit message until a non-blank one is given.
    fn commit_message(&self) -> Result<String, dialoguer::Error>;
}

/// Prompts on the controlling terminal with dialoguer.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm_continue(&self) -> Result<bool, dialoguer::Error> {
        Confirm::new()
            .with_prompt(
                "⚠️ 本次代码审查不建议提交，确定是否继续提交？"
                    .yellow()
                    .to_string(),
            )
            .default(false)
            .interact()
    }

    fn commit_message(&self) -> Result<String, dialoguer::Error> {
        Input::<String>::new()
            .with_prompt("📝 请输入提交信息".blue().to_string())
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("提交信息不能为空")
                } else {
                    Ok(())
                }
            })
            .interact_text()
    }
}

/// Both stdin and stdout are attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}
