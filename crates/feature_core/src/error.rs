use thiserror::Error;

/// Rejected user input. The message is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InputError {
    pub message: String,
}

impl InputError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Anything that goes wrong after input was accepted. Logged, never rendered.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("'{0}' cannot be used as a path segment")]
    InvalidSegment(String),
    #[error("response is missing {0}")]
    Missing(&'static str),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings file: {0}")]
    File(#[from] toml::de::Error),
    #[error("setting '{key}' has an invalid value '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("endpoint '{name}' is not a valid url '{url}': {source}")]
    InvalidEndpoint {
        name: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },
}
