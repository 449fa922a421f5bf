//! Pass/fail classification of the model's reply.

/// Phrase the model is instructed to reply with when no changes are needed.
pub const PASS_PHRASE: &str = "此次代码修改很棒，不需要调整，可直接提交";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    Pass,
    Fail,
}

impl ReviewVerdict {
    /// `Pass` iff the reply contains [`PASS_PHRASE`] anywhere.
    pub fn classify(reply: &str) -> Self {
        if reply.contains(PASS_PHRASE) {
            ReviewVerdict::Pass
        } else {
            ReviewVerdict::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ReviewVerdict::Pass)
    }
}

/// The complete streamed reply and its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub reply: String,
    pub verdict: ReviewVerdict,
}

impl ReviewOutcome {
    pub fn from_reply(reply: String) -> Self {
        let verdict = ReviewVerdict::classify(&reply);
        Self { reply, verdict }
    }
}
