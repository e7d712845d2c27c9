use std::path::Path;

use comfy_table::Cell;
use relay_project::{CreateRequest, EnvDetails, ProjectError, Projects, UpdateRequest};

pub async fn project_create(config: Option<&Path>, req: CreateRequest) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    let created = Projects::new(&gateway, &registry)
        .create(&req)
        .await
        .inspect_err(warn_orphans)?;

    println!("successfully created the project {:?}!", req.name);
    if let Some(url) = created.first().and_then(|app| app.repository_url()) {
        println!("Git repository: {url}");
    }
    Ok(())
}

pub async fn project_update(config: Option<&Path>, req: UpdateRequest) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    let mut out = std::io::stdout().lock();
    Projects::new(&gateway, &registry)
        .update(&req, &mut out)
        .await
        .inspect_err(warn_orphans)?;
    Ok(())
}

fn warn_orphans(err: &ProjectError) {
    if let Some(warning) = orphan_warning(err) {
        eprintln!("{warning}");
    }
}

/// Names the applications a failed rollback left on the platform.
fn orphan_warning(err: &ProjectError) -> Option<String> {
    let cleanup = err.cleanup().filter(|c| !c.is_clean())?;
    Some(format!(
        "WARNING: failed to remove applications created before the error: {}",
        cleanup.orphans().join(", ")
    ))
}

pub async fn project_remove(
    config: Option<&Path>,
    name: &str,
    assume_yes: bool,
) -> anyhow::Result<()> {
    if name.is_empty() {
        return Err(ProjectError::MissingName.into());
    }
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    if !assume_yes {
        let question = format!("Are you sure you want to remove the project {name:?}?");
        if !super::confirm(&question)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut out = std::io::stdout().lock();
    let outcomes = Projects::new(&gateway, &registry)
        .remove(name, &mut out)
        .await?;
    tracing::debug!(project = name, envs = outcomes.len(), "project removed");
    Ok(())
}

pub async fn project_list(config: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    let projects = Projects::new(&gateway, &registry).list().await?;

    let mut table = super::table(["Project", "Environments", "Address"]);
    for (name, members) in &projects {
        let envs: Vec<&str> = members.iter().map(|m| m.env.name.as_str()).collect();
        let addresses: Vec<&str> = members.iter().map(|m| m.address.as_str()).collect();
        table.add_row(vec![
            Cell::new(name),
            Cell::new(envs.join("\n")),
            Cell::new(addresses.join("\n")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn project_info(config: Option<&Path>, name: &str) -> anyhow::Result<()> {
    if name.is_empty() {
        return Err(ProjectError::MissingName.into());
    }
    let config = super::load_config(config)?;
    let gateway = super::gateway(&config)?;
    let registry = config.registry();

    let details = Projects::new(&gateway, &registry).info(name).await?;
    let Some(entry) = details.first() else {
        return Err(ProjectError::NotFound.into());
    };

    let app = &entry.member.app;
    println!("Project name: {name}");
    println!("Description: {}", app.description);
    println!("Repository: {}", app.repository_url);
    println!("Platform: {}", app.platform);
    println!("Teams: {}", app.teams.join(", "));
    println!("Owner: {}", app.owner);
    println!("Team owner: {}", app.team_owner);
    println!();

    let mut table = super::table([
        "Environment",
        "Address",
        "Image",
        "Git hash/tag",
        "Deploy date",
        "Units",
    ]);
    for detail in &details {
        table.add_row(env_row(detail));
    }
    println!("{table}");
    Ok(())
}

fn env_row(detail: &EnvDetails) -> Vec<String> {
    let member = &detail.member;
    let mut row = vec![
        member.env.name.clone(),
        member.address.clone(),
        String::new(),
        String::new(),
        String::new(),
        member.app.units.len().to_string(),
    ];
    if let Some(deploy) = &detail.deploy {
        row[2] = deploy.image.clone();
        if !deploy.commit.is_empty() {
            row[3] = format!("(git) {}", deploy.commit);
        }
        if let Some(timestamp) = deploy.timestamp {
            row[4] = timestamp.format("%a, %d %b %Y %H:%M:%S UTC").to_string();
        }
    }
    row
}
