#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Network failure, DNS, TLS or timeout while talking to the service.
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("completion service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body was not `{"choices": [{"text": ...}, ...]}` with at least one choice.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("{0} is unset or empty")]
    MissingConfig(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidConfig { name: &'static str, value: String },
}

impl CompletionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}
