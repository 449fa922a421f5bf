//! Streaming chat-completion client for the review call.
//!
//! Talks to any OpenAI-compatible endpoint through `async-openai`, echoing the
//! reply to the terminal as it streams in.

use std::io::{self, Write};

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, CreateChatCompletionStreamResponse,
};
use async_trait::async_trait;
use colored::Colorize;
use futures::StreamExt;
use tracing::debug;

use crate::config::LlmCredentials;
use crate::error::ReviewError;
use crate::review::verdict::{ReviewOutcome, ReviewVerdict};

/// Model requested from the endpoint.
pub const REVIEW_MODEL: &str = "deepseek-chat";

/// System message sent ahead of the prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "你是一个专业的代码审查助手，擅长发现代码中的问题并给出改进建议。请使用中文回复。";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Something that can review a prompt and return the verdict.
#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn review(&self, prompt: &str) -> Result<ReviewOutcome, ReviewError>;
}

/// Accumulates the reply while echoing it, highlighting the first chunk.
struct ReplyPrinter<'w, W: Write> {
    out: &'w mut W,
    reply: String,
    seen_first: bool,
}

impl<'w, W: Write> ReplyPrinter<'w, W> {
    fn new(out: &'w mut W) -> Self {
        Self {
            out,
            reply: String::new(),
            seen_first: false,
        }
    }

    fn push(&mut self, text: &str) -> Result<(), ReviewError> {
        if text.is_empty() {
            return Ok(());
        }
        self.reply.push_str(text);

        if self.seen_first {
            write!(self.out, "{text}").map_err(ReviewError::Output)?;
        } else {
            write!(self.out, "{}", text.yellow()).map_err(ReviewError::Output)?;
            self.seen_first = true;
        }
        self.out.flush().map_err(ReviewError::Output)
    }

    /// Echo the content delta of one streamed chunk, if it has one.
    fn accept_chunk(&mut self, chunk: &CreateChatCompletionStreamResponse) -> Result<(), ReviewError> {
        let content = chunk
            .choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref());
        match content {
            Some(text) => self.push(text),
            None => Ok(()),
        }
    }
}

/// Review client bound to one endpoint and key.
pub struct ReviewClient {
    client: Client<OpenAIConfig>,
    endpoint: String,
}

impl ReviewClient {
    pub fn new(credentials: &LlmCredentials) -> Result<Self, ReviewError> {
        let api_base = credentials.base_url.trim_end_matches('/');
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(&credentials.api_key);

        Ok(Self {
            client: Client::with_config(config),
            endpoint: chat_completions_url(api_base),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `prompt` and stream the reply into `out`.
    ///
    /// Writes a title banner once the first chunk arrives, the reply tokens as
    /// they stream in, a closing rule and a one-line verdict. A request the
    /// endpoint rejects outright writes nothing.
    pub async fn stream_review<W>(&self, prompt: &str, out: &mut W) -> Result<ReviewOutcome, ReviewError>
    where
        W: Write + Send,
    {
        let request = build_request(prompt)?;

        debug!("Sending {} char prompt to {}", prompt.len(), self.endpoint);
        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(ReviewError::Api)?;

        let first = stream.next().await.transpose().map_err(ReviewError::Api)?;

        writeln!(out, "\n{}", " 🔍 代码审查结果 ".on_blue().white()).map_err(ReviewError::Output)?;
        writeln!(out, "{}\n", RULE.blue()).map_err(ReviewError::Output)?;

        let mut printer = ReplyPrinter::new(out);
        if let Some(chunk) = first {
            printer.accept_chunk(&chunk)?;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(ReviewError::Api)?;
                printer.accept_chunk(&chunk)?;
            }
        }

        let reply = std::mem::take(&mut printer.reply);
        writeln!(out, "\n").map_err(ReviewError::Output)?;
        writeln!(out, "{}", RULE.blue()).map_err(ReviewError::Output)?;

        let outcome = ReviewOutcome::from_reply(reply);
        let summary = match outcome.verdict {
            ReviewVerdict::Pass => writeln!(
                out,
                "{}{}",
                "✅ 审查通过：".green(),
                "代码质量良好，可以提交！".bright_green()
            ),
            ReviewVerdict::Fail => writeln!(
                out,
                "{}{}",
                "⚠️ 审查结果：".yellow(),
                "代码可能需要调整，请查看上述建议。".bright_yellow()
            ),
        };
        summary.map_err(ReviewError::Output)?;

        Ok(outcome)
    }
}

#[async_trait]
impl Reviewer for ReviewClient {
    async fn review(&self, prompt: &str) -> Result<ReviewOutcome, ReviewError> {
        println!("{}", "🔍 正在进行代码审查中...".blue());
        self.stream_review(prompt, &mut io::stdout()).await
    }
}

/// Streaming request carrying the system instruction and the prompt.
fn build_request(prompt: &str) -> Result<CreateChatCompletionRequest, ReviewError> {
    let system = ChatCompletionRequestSystemMessageArgs::default()
        .content(SYSTEM_INSTRUCTION)
        .build()
        .map_err(ReviewError::InvalidRequest)?;
    let user = ChatCompletionRequestUserMessageArgs::default()
        .content(prompt)
        .build()
        .map_err(ReviewError::InvalidRequest)?;

    CreateChatCompletionRequestArgs::default()
        .model(REVIEW_MODEL)
        .messages([
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ])
        .stream(true)
        .build()
        .map_err(ReviewError::InvalidRequest)
}

/// `{base}/chat/completions`, tolerating a trailing slash on the base URL.
pub fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}
