use thiserror::Error;

/// The only failure the model reports. Transport errors, non-2xx statuses and
/// undecodable bodies all collapse into it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("request failed: {0}")]
    RequestFailed(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(value: reqwest::Error) -> Self {
        Self::RequestFailed(value.to_string())
    }
}
