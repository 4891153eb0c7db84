use thiserror::Error;

use crate::plan::PlanError;

/// Failures outside the engine: loading data, talking to the planner,
/// reading and writing local state.
#[derive(Debug, Error)]
pub enum AnalystError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("planner returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("missing OPENROUTER_API_KEY; set it in the environment or in {0}")]
    MissingApiKey(String),

    #[error("no text response from the planner")]
    EmptyResponse,

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown sample dataset '{0}' (try --list-samples)")]
    UnknownDataset(String),
}

pub type Result<T, E = AnalystError> = std::result::Result<T, E>;
