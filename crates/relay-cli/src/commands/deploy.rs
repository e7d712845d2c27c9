use std::path::Path;

use relay_cloud::{LogOptions, TsuruDelegate};
use relay_project::{DeploySource, Deployer};

pub async fn project_deploy(
    config: Option<&Path>,
    name: &str,
    env: &str,
    files: Vec<String>,
    image: Option<String>,
    promote: Option<String>,
) -> anyhow::Result<()> {
    let source = DeploySource::from_args(files, image, promote)?;
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;

    let plan = Deployer::new(&gateway, &config)
        .plan(name, env, source)
        .await?;
    if let Some(image) = &plan.image {
        println!("Deploying {image} to {:?}...", plan.app);
    }
    plan.execute(&TsuruDelegate::new()).await?;
    Ok(())
}

pub async fn project_deploy_list(
    config: Option<&Path>,
    name: &str,
    env: &str,
) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let app = super::app_for(&config, name, env)?;
    TsuruDelegate::new().deploy_list(&app).await?;
    Ok(())
}

pub async fn project_env_info(config: Option<&Path>, name: &str, env: &str) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let app = super::app_for(&config, name, env)?;
    TsuruDelegate::new().app_info(&app).await?;
    Ok(())
}

pub async fn project_log(
    config: Option<&Path>,
    name: &str,
    env: &str,
    opts: &LogOptions,
) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let app = super::app_for(&config, name, env)?;
    TsuruDelegate::new().logs(&app, opts).await?;
    Ok(())
}
