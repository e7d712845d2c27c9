use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write config to {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode config")]
    ConfigEncode { source: serde_json::Error },

    #[error("unable to locate the home directory")]
    NoHomeDir,

    // ── Environment registry ──
    #[error(
        "invalid values: {} (valid options are: {})",
        invalid.join(", "),
        valid.join(", ")
    )]
    InvalidEnvs {
        invalid: Vec<String>,
        valid: Vec<String>,
    },
}
