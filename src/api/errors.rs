use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} returned an unreadable body: {detail}")]
    Decode { operation: &'static str, detail: String },
    #[error("{operation} was rejected: {}", .message.as_deref().unwrap_or("no reason given"))]
    Rejected { operation: &'static str, message: Option<String> },
}

impl ApiError {
    pub fn operation(&self) -> &'static str {
        match self {
            ApiError::Transport { operation, .. }
            | ApiError::Decode { operation, .. }
            | ApiError::Rejected { operation, .. } => operation,
        }
    }

    /// The service's own explanation when it answered but declined the call.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}
