mod deploy;
mod env;
mod envvar;
mod platform;
mod project;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use comfy_table::{Attribute, Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use relay_cloud::AppGateway;
use relay_core::{RelayConfig, config::CONFIG_DIR, naming};
use relay_project::DeployError;

pub use deploy::{project_deploy, project_deploy_list, project_env_info, project_log};
pub use env::{env_list, target_set};
pub use envvar::{envvar_get, envvar_set, envvar_unset};
pub use platform::{plan_list, platform_list, team_create, team_list, team_remove};
pub use project::{project_create, project_info, project_list, project_remove, project_update};

/// Environment variable holding the platform session token.
const TOKEN_ENV: &str = "RELAY_TOKEN";

/// Session token file inside the relay directory.
const TOKEN_FILE: &str = "token";

fn config_path(flag: Option<&Path>) -> anyhow::Result<PathBuf> {
    match flag {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(RelayConfig::default_path().ok_or(relay_core::Error::NoHomeDir)?),
    }
}

pub(crate) fn load_config(flag: Option<&Path>) -> anyhow::Result<RelayConfig> {
    let path = config_path(flag)?;
    RelayConfig::load(&path).context(
        "unable to load environments file, please make sure that relay is properly configured",
    )
}

pub(crate) fn gateway(config: &RelayConfig) -> anyhow::Result<AppGateway> {
    if config.target.is_empty() {
        anyhow::bail!("no target defined; run `relay target-set <url>` first");
    }
    Ok(AppGateway::new(&config.target, token()))
}

/// `RELAY_TOKEN`, else the contents of `~/.relay/token`.
fn token() -> Option<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV)
        && !token.trim().is_empty()
    {
        return Some(token.trim().to_owned());
    }
    let path = dirs::home_dir()?.join(CONFIG_DIR).join(TOKEN_FILE);
    let token = std::fs::read_to_string(path).ok()?;
    Some(token.trim().to_owned()).filter(|t| !t.is_empty())
}

/// Name of the application serving `project` in `env`.
pub(crate) fn app_for(config: &RelayConfig, project: &str, env: &str) -> anyhow::Result<String> {
    if project.is_empty() || env.is_empty() {
        return Err(DeployError::MissingTarget.into());
    }
    let registry = config.registry();
    let environment = registry
        .get(env)
        .ok_or_else(|| relay_core::Error::InvalidEnvs {
            invalid: vec![env.to_owned()],
            valid: registry.names(),
        })?;
    Ok(naming::app_name(project, environment))
}

pub(crate) fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} (y/N) ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes" | "YES"))
}

pub(crate) fn table<const N: usize>(headers: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(
            headers
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}
