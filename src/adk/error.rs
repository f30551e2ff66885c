// SPDX-License-Identifier: MIT

//! Typed error handling for linkpost-rs
//!
//! Every failure in the crate falls into one of these families:
//! - [ConfigError] - fatal, raised while the process starts
//! - [GenerationError] - the model provider failed, recovered by the content operations
//! - [ValidationError] - bad caller input, surfaced as a 4xx by the HTTP layer
//! - [WorkflowError] - graph construction problems and run bounds
//! - [StageError] - what a workflow stage returns; the engine turns it into a correction

use thiserror::Error;

use crate::linkpost::workflow::WorkflowState;

/// Top-level error type for linkpost-rs
#[derive(Debug, Error)]
pub enum LinkpostError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration errors, raised once at service construction
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures of the text generation provider
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport-level failure (DNS, TLS, connection reset, body decoding)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Credential rejected by the provider
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("API error from {provider} ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    /// The provider answered but produced no text
    #[error("No content generated")]
    EmptyResponse,
}

/// Caller input that cannot be served
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Topic is required")]
    MissingTopic,

    #[error("Template \"{0}\" not found")]
    UnknownTemplate(String),

    #[error("Invalid post type \"{0}\". Use: text, carousel, or template")]
    InvalidPostType(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

/// Workflow graph errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Stage '{0}' is already registered")]
    DuplicateStage(String),

    #[error("Unknown stage '{0}'")]
    UnknownStage(String),

    #[error("Stage '{0}' already has an outgoing edge")]
    DuplicateEdge(String),

    #[error("Stage '{0}' has no outgoing edge")]
    MissingEdge(String),

    #[error("No entry stage configured")]
    MissingEntry,

    /// The correction loop kept routing back; the final state is attached for inspection
    #[error("Retry limit exceeded after {retries} retries: {:?}", .state.corrections)]
    RetryLimitExceeded {
        retries: u32,
        state: Box<WorkflowState>,
    },

    /// Safety limit on stage executions; the final state is attached as well
    #[error("Workflow exceeded {steps} stage executions")]
    StepLimitExceeded {
        steps: usize,
        state: Box<WorkflowState>,
    },
}

/// Error returned by a single workflow stage
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for StageError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for StageError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl GenerationError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
