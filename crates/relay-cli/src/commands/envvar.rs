use std::path::Path;

use relay_cloud::EnvVarsUpdate;
use relay_project::{EnvVars, parse_declarations};

pub async fn envvar_set(
    config: Option<&Path>,
    name: &str,
    envs: &[String],
    declarations: &[String],
    private: bool,
    no_restart: bool,
) -> anyhow::Result<()> {
    let vars = EnvVarsUpdate {
        envs: parse_declarations(declarations)?,
        private,
        no_restart,
    };
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    let mut out = std::io::stdout().lock();
    EnvVars::new(&gateway, &registry)
        .set(name, envs, vars, &mut out)
        .await?;
    Ok(())
}

pub async fn envvar_get(config: Option<&Path>, name: &str, envs: &[String]) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr().lock();
    EnvVars::new(&gateway, &registry)
        .get(name, envs, &mut out, &mut err)
        .await?;
    Ok(())
}

pub async fn envvar_unset(
    config: Option<&Path>,
    name: &str,
    envs: &[String],
    names: &[String],
    no_restart: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    let mut out = std::io::stdout().lock();
    EnvVars::new(&gateway, &registry)
        .unset(name, envs, names, no_restart, &mut out)
        .await?;
    Ok(())
}
