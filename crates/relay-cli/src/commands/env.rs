use std::path::Path;

use anyhow::Context;
use relay_core::{RelayConfig, config::CONFIG_FILE};

pub fn env_list(config: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config)?;

    let mut table = super::table(["Environment", "DNS Suffix"]);
    for env in &config.environments {
        table.add_row(vec![env.name.as_str(), env.dns_suffix.as_str()]);
    }
    println!("{table}");
    Ok(())
}

pub async fn target_set(config: Option<&Path>, server: &str) -> anyhow::Result<()> {
    let path = super::config_path(config)?;

    let body = relay_cloud::download(server, CONFIG_FILE)
        .await
        .context("failed to download config file")?;
    let mut remote: RelayConfig =
        serde_json::from_str(&body).context("server published an invalid config file")?;
    if remote.target.is_empty() {
        remote.target = server.trim_end_matches('/').to_owned();
    }
    remote.write(&path)?;
    tracing::debug!(path = %path.display(), target = %remote.target, "target written");

    println!("Target successfully defined!");
    Ok(())
}
