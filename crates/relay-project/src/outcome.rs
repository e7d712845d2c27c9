use std::fmt;

use relay_cloud::GatewayError;

/// Result of one per-environment step of a batch operation.
#[derive(Debug)]
pub enum Outcome {
    Ok,
    NotFound,
    Failed(GatewayError),
}

impl Outcome {
    /// Classify a gateway result; 404 is kept apart from every other failure.
    pub fn from_result(result: Result<(), GatewayError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(e) if e.is_not_found() => Self::NotFound,
            Err(e) => Self::Failed(e),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn into_failure(self) -> Option<GatewayError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::NotFound => "not found",
            Self::Failed(_) => "failed",
        })
    }
}
