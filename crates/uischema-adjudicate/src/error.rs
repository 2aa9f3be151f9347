use std::time::Duration;

use thiserror::Error;

/// Why a model reply could not be read as a verdict.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("no JSON object found in model response")]
    NoJson,
    #[error("model response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("model response JSON is not an object")]
    NotAnObject,
    #[error("model response has no boolean `approved` field")]
    MissingApproved,
}

#[derive(Debug, Error)]
pub enum AdjudicationError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion has no message content")]
    EmptyCompletion,
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("message index {index} out of range for conversation of {len} messages")]
    MessageOutOfRange { index: usize, len: usize },
    #[error("failed to serialize context: {0}")]
    Serialize(#[from] serde_json::Error),
}
