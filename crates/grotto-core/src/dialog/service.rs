//! Narrative service boundary.

use core::fmt;

use super::history::ConversationTurn;

/// Sampling parameters sent with every request.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingConfig {
    pub model: String,
    pub temperature: f32,
    pub frequency_penalty: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.6,
            frequency_penalty: 1.0,
        }
    }
}

impl SamplingConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Full history snapshot plus sampling parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct NarrationRequest {
    pub turns: Vec<ConversationTurn>,
    pub sampling: SamplingConfig,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Transient; the request may be retried.
    Recoverable,
    /// Retrying will not help.
    Fatal,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceError {
    pub class: ErrorClass,
    pub reason: String,
}

impl ServiceError {
    pub fn recoverable(reason: impl Into<String>) -> Self {
        Self {
            class: ErrorClass::Recoverable,
            reason: reason.into(),
        }
    }

    pub fn fatal(reason: impl Into<String>) -> Self {
        Self {
            class: ErrorClass::Fatal,
            reason: reason.into(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.class == ErrorClass::Recoverable
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.class {
            ErrorClass::Recoverable => "recoverable",
            ErrorClass::Fatal => "fatal",
        };
        write!(f, "{class} narration failure: {}", self.reason)
    }
}

impl std::error::Error for ServiceError {}

/// Blocking request/response narrator.
pub trait NarrativeService {
    fn narrate(&mut self, request: &NarrationRequest) -> Result<String, ServiceError>;
}

/// Backoff for recoverable failures. Attempts count every request sent for
/// the same turn; exhausting them escalates to a fatal error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryConfig {
    pub max_attempts: u8,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl RetryConfig {
    pub const fn with_max_attempts(mut self, max_attempts: u8) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub const fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Delay before retry number `failures` (1-based), doubling each time.
    pub fn delay_ms(&self, failures: u8) -> u64 {
        let shift = failures.saturating_sub(1).min(16) as u32;
        self.base_delay_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_delay_ms)
    }
}
