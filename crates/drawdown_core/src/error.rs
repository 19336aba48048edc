//! Error types for the drawdown engine.
//!
//! Per-path failures (a retiree running out of money) are not errors — they
//! are an expected simulation outcome recorded in [`crate::kernel`] metrics.
//! The types here cover only the two user-visible failure modes: a
//! malformed scenario, and a genuinely unexpected internal condition.

pub type Result<T> = std::result::Result<T, EngineError>;

/// A scenario configuration failed validation, or the engine hit an
/// internal condition it could not recover from.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// One message per violated field; collected rather than fail-fast so
    /// a caller can fix a scenario in one round trip.
    Validation(Vec<String>),
    /// Unexpected — should not happen given a validated scenario.
    Internal(String),
}

impl EngineError {
    #[must_use]
    pub fn validation(messages: Vec<String>) -> Self {
        EngineError::Validation(messages)
    }

    /// Single human-readable line, suitable for the `ScenarioResponse`
    /// failure message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            EngineError::Validation(msgs) => msgs.join("; "),
            EngineError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EngineError {}
