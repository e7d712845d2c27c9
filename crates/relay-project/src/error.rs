use relay_cloud::GatewayError;
use relay_core::IdentityError;

use crate::project::Cleanup;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("please provide the name and the platform")]
    MissingNameOrPlatform,

    #[error("please provide the name of the project")]
    MissingName,

    #[error("failed to load environments: {0}")]
    Environments(relay_core::Error),

    #[error(transparent)]
    Registry(#[from] relay_core::Error),

    #[error("project not found")]
    NotFound,

    // ── Update membership ──
    #[error("env {0:?} is already defined in this project")]
    EnvAlreadyDefined(String),

    #[error("env {0:?} is not defined in this project")]
    EnvNotDefined(String),

    // ── Remote failures ──
    #[error("failed to create the project in env {env:?}: {cause}")]
    Create {
        env: String,
        cause: GatewayError,
        cleanup: Cleanup,
    },

    #[error("failed to configure project {project:?}: {cause}")]
    Configure {
        project: String,
        cause: GatewayError,
        cleanup: Cleanup,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

impl ProjectError {
    /// Outcome of the rollback that followed a failed create, if any.
    pub fn cleanup(&self) -> Option<&Cleanup> {
        match self {
            Self::Create { cleanup, .. } | Self::Configure { cleanup, .. } => Some(cleanup),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FanOutError {
    #[error("please provide the name of the project")]
    MissingName,

    #[error("configuration vars must be specified in the form NAME=value")]
    InvalidDeclarations,

    #[error(transparent)]
    Registry(#[from] relay_core::Error),

    #[error("environment {env:?}: {cause}")]
    Remote { env: String, cause: GatewayError },

    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("please provide the project name and the environment")]
    MissingTarget,

    #[error("please specify only one of the image, parent env or the list of files/directories to upload")]
    ConflictingSources,

    #[error("please specify either the image, parent env or the list of files/directories to upload")]
    NoSource,

    #[error("can only deploy directly to {entry:?}, use promote to deploy to other environments")]
    NotEntry { entry: String },

    #[error("no version running in {0:?}")]
    NoVersion(String),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Registry(#[from] relay_core::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
