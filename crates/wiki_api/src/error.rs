#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid api url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("http client build error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid json: {source}")]
    Decode { url: String, source: reqwest::Error },

    #[error("response has no key '{0}'")]
    MissingKey(String),

    #[error("response value has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("article needs an id or a title")]
    MissingIdentifier,
}

pub type Result<T> = std::result::Result<T, ApiError>;
