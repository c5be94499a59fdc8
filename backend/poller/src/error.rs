use std::fmt;

use thiserror::Error;

/// Alert side effects, named for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Sound,
    Pulse,
    Shake,
    Ambient,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Effect::Sound => "sound",
            Effect::Pulse => "pulse",
            Effect::Shake => "shake",
            Effect::Ambient => "ambient",
        })
    }
}

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Render skipped: {0} anchor missing")]
    RenderSkipped(&'static str),

    #[error("Effect {effect} failed: {reason}")]
    EffectFailed { effect: Effect, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PollError {
    pub fn effect(effect: Effect, reason: impl fmt::Display) -> Self {
        PollError::EffectFailed {
            effect,
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for PollError {
    fn from(e: reqwest::Error) -> Self {
        PollError::FetchFailed(e.to_string())
    }
}

impl From<serde_json::Error> for PollError {
    fn from(e: serde_json::Error) -> Self {
        PollError::FetchFailed(format!("malformed body: {e}"))
    }
}
