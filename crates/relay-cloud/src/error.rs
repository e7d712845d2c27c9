#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed")]
    Request { url: String, source: reqwest::Error },

    #[error("failed to read response from {url}")]
    Body { url: String, source: reqwest::Error },

    #[error("failed to download {url}: {status} - {}", body.trim())]
    Download {
        url: String,
        status: u16,
        body: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP {status}: {}", body.trim())]
    Http { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid response from {path}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    #[error("{message}")]
    Stream { message: String },
}

impl GatewayError {
    /// Whether the platform answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("{program} CLI not found; make sure it is installed and in PATH")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} command failed: {args:?} ({status})")]
    CommandFailed {
        program: String,
        args: Vec<String>,
        status: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_only_for_404() {
        let not_found = GatewayError::Http {
            status: 404,
            body: "App not found.\n".to_owned(),
        };
        let conflict = GatewayError::Http {
            status: 409,
            body: "app already exists".to_owned(),
        };
        let stream = GatewayError::Stream {
            message: "404".to_owned(),
        };
        assert!(not_found.is_not_found());
        assert!(!conflict.is_not_found());
        assert!(!stream.is_not_found());
    }

    #[test]
    fn http_error_message_trims_body() {
        let err = GatewayError::Http {
            status: 500,
            body: "something went wrong\n".to_owned(),
        };
        assert_eq!(err.to_string(), "HTTP 500: something went wrong");
    }
}
