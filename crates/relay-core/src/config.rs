use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::registry::EnvRegistry;

/// Directory under the user's home holding relay's local files.
pub const CONFIG_DIR: &str = ".relay";

/// Name of the configuration file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Separator between environment name and DNS suffix in pool names.
pub const POOL_SEPARATOR: char = '\\';

/// Image namespace used by the platform's registry for application images.
const IMAGE_NAMESPACE: &str = "tsuru";

/// `~/.relay/config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL of the remote platform API
    #[serde(default)]
    pub target: String,
    /// Docker registry host used to qualify promoted images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    /// Deployment environments, in promotion order
    #[serde(rename = "envs", default)]
    pub environments: Vec<Environment>,
}

/// A named deployment target and the DNS suffix its applications answer on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(rename = "dnsSuffix")]
    pub dns_suffix: String,
}

impl Environment {
    pub fn new(name: impl Into<String>, dns_suffix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dns_suffix: dns_suffix.into(),
        }
    }

    /// Pool that applications of this environment are placed in.
    ///
    /// ```
    /// use relay_core::Environment;
    ///
    /// let env = Environment::new("dev", "dev.example.com");
    /// assert_eq!(env.pool_name(), r"dev\dev.example.com");
    /// ```
    pub fn pool_name(&self) -> String {
        format!("{}{POOL_SEPARATOR}{}", self.name, self.dns_suffix)
    }
}

impl RelayConfig {
    /// `~/.relay/config.json`, or `None` when the home directory is unknown.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the configuration file at `path`.
    ///
    /// Unlike project-local configs, a missing file is an error: relay cannot
    /// do anything without knowing its environments.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(crate::Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        tracing::debug!(
            path = %path.display(),
            target = %config.target,
            envs = config.environments.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Write the configuration to `path`, creating its directory if needed.
    pub fn write(&self, path: &Path) -> crate::Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| crate::Error::ConfigWrite {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        let mut content =
            serde_json::to_string(self).map_err(|e| crate::Error::ConfigEncode { source: e })?;
        content.push('\n');
        std::fs::write(path, content).map_err(|e| crate::Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn registry(&self) -> EnvRegistry {
        EnvRegistry::new(self.environments.clone())
    }

    pub fn env_names(&self) -> Vec<String> {
        self.environments.iter().map(|e| e.name.clone()).collect()
    }

    /// Full image reference of `version` built for application `app`.
    pub fn app_image(&self, app: &str, version: &str) -> String {
        match self.registry.as_deref() {
            Some(registry) if !registry.is_empty() => {
                format!("{registry}/{IMAGE_NAMESPACE}/app-{app}:{version}")
            }
            _ => format!("{IMAGE_NAMESPACE}/app-{app}:{version}"),
        }
    }
}
