use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Page location has no usable origin: {0}")]
    OpaqueOrigin(String),

    #[error("Failed to build HTTP client: {0}")]
    Setup(String),

    #[error("{0}")]
    Network(String),

    /// Non-2xx answer. Displays the body text, or the status code when the body is empty.
    #[error("{}", status_text(.status, .body))]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn status_text(status: &u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("Request failed with {status}")
    } else {
        body.to_string()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for a status line: the server's body for non-OK answers, `empty_body`
    /// when that body is blank, and the error's own text otherwise.
    pub fn user_message(&self, empty_body: &str) -> String {
        match self {
            ClientError::Status { body, .. } if body.trim().is_empty() => empty_body.to_string(),
            ClientError::Status { body, .. } => body.trim().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_prefers_body() {
        let err = ClientError::Status {
            status: 400,
            body: "amount must be greater than zero\n".into(),
        };
        assert_eq!(err.to_string(), "amount must be greater than zero");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_status_display_falls_back_to_code() {
        let err = ClientError::Status { status: 503, body: "  ".into() };
        assert_eq!(err.to_string(), "Request failed with 503");
        assert_eq!(err.user_message("Submission failed"), "Submission failed");
    }

    #[test]
    fn test_network_message_passes_through() {
        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.user_message("unused"), "connection refused");
        assert_eq!(err.status(), None);
    }
}
