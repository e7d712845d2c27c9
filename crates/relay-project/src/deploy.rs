use relay_cloud::{AppGateway, ExecError, HttpTransport, Transport, TsuruDelegate, TsuruExecutor};
use relay_core::{EnvRegistry, Environment, RelayConfig, naming};

use crate::discover::Member;
use crate::error::DeployError;
use crate::project::Projects;

/// What a deploy ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploySource {
    /// Files and directories to upload
    Content(Vec<String>),
    /// A ready-made image
    Image(String),
    /// The image currently running in another environment
    Promote(String),
}

impl DeploySource {
    /// Pick the single source given on the command line.
    ///
    /// # Errors
    ///
    /// [`DeployError::ConflictingSources`] when more than one is given,
    /// [`DeployError::NoSource`] when none is.
    pub fn from_args(
        files: Vec<String>,
        image: Option<String>,
        promote: Option<String>,
    ) -> Result<Self, DeployError> {
        let image = image.filter(|i| !i.is_empty());
        let promote = promote.filter(|p| !p.is_empty());
        match (files.is_empty(), image, promote) {
            (false, None, None) => Ok(Self::Content(files)),
            (true, Some(image), None) => Ok(Self::Image(image)),
            (true, None, Some(env)) => Ok(Self::Promote(env)),
            (true, None, None) => Err(DeployError::NoSource),
            _ => Err(DeployError::ConflictingSources),
        }
    }
}

/// A resolved deploy: which application receives what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    pub app: String,
    pub image: Option<String>,
    pub files: Vec<String>,
}

impl DeployPlan {
    /// Hand the deploy over to the platform CLI.
    pub async fn execute<E: TsuruExecutor>(
        &self,
        delegate: &TsuruDelegate<E>,
    ) -> Result<(), ExecError> {
        delegate
            .deploy(&self.app, self.image.as_deref(), &self.files)
            .await
    }
}

/// Plans deploys and promotions of a project.
pub struct Deployer<'a, T: Transport = HttpTransport> {
    gateway: &'a AppGateway<T>,
    config: &'a RelayConfig,
    registry: EnvRegistry,
}

impl<'a, T: Transport> Deployer<'a, T> {
    pub fn new(gateway: &'a AppGateway<T>, config: &'a RelayConfig) -> Self {
        Self {
            gateway,
            config,
            registry: config.registry(),
        }
    }

    /// Resolve the application `env` of `project` and what to deploy to it.
    ///
    /// Uploads and images only go to the project's entry environment; other
    /// environments are reached by promoting the image running in `from`.
    pub async fn plan(
        &self,
        project: &str,
        env: &str,
        source: DeploySource,
    ) -> Result<DeployPlan, DeployError> {
        if project.is_empty() || env.is_empty() {
            return Err(DeployError::MissingTarget);
        }
        let members = Projects::new(self.gateway, &self.registry)
            .find(project)
            .await?;
        let target = self.environment(env)?;
        let app = naming::app_name(project, target);

        let (image, files) = match source {
            DeploySource::Promote(from) => {
                (Some(self.promoted_image(project, &from).await?), Vec::new())
            }
            DeploySource::Image(image) => {
                check_entry(&members, env)?;
                (Some(image), Vec::new())
            }
            DeploySource::Content(files) => {
                check_entry(&members, env)?;
                (None, files)
            }
        };
        tracing::debug!(%app, ?image, files = files.len(), "deploy planned");
        Ok(DeployPlan { app, image, files })
    }

    /// Full reference of the image last deployed to `from`.
    async fn promoted_image(&self, project: &str, from: &str) -> Result<String, DeployError> {
        let source_app = naming::app_name(project, self.environment(from)?);
        let deploy = self.gateway.last_deploy(&source_app).await?;
        if deploy.image.is_empty() {
            return Err(DeployError::NoVersion(from.to_owned()));
        }
        Ok(self.config.app_image(&source_app, &deploy.image))
    }

    fn environment(&self, name: &str) -> Result<&Environment, DeployError> {
        self.registry.get(name).ok_or_else(|| {
            relay_core::Error::InvalidEnvs {
                invalid: vec![name.to_owned()],
                valid: self.registry.names(),
            }
            .into()
        })
    }
}

/// Direct deploys only go to the entry environment, the project's first.
fn check_entry(members: &[Member], env: &str) -> Result<(), DeployError> {
    match members.first() {
        Some(entry) if entry.env.name != env => Err(DeployError::NotEntry {
            entry: entry.env.name.clone(),
        }),
        _ => Ok(()),
    }
}
