use relay_cloud::TsuruDelegate;

pub async fn platform_list() -> anyhow::Result<()> {
    TsuruDelegate::new().platform_list().await?;
    Ok(())
}

pub async fn plan_list() -> anyhow::Result<()> {
    TsuruDelegate::new().plan_list().await?;
    Ok(())
}

pub async fn team_list() -> anyhow::Result<()> {
    TsuruDelegate::new().team_list().await?;
    Ok(())
}

pub async fn team_create(team: &str) -> anyhow::Result<()> {
    TsuruDelegate::new().team_create(team).await?;
    Ok(())
}

pub async fn team_remove(team: &str, assume_yes: bool) -> anyhow::Result<()> {
    TsuruDelegate::new().team_remove(team, assume_yes).await?;
    Ok(())
}
