mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "relay",
    about = "Manage projects as per-environment apps on a PaaS"
)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.relay/config.json)
    #[arg(long, global = true, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List currently available environments
    EnvList,
    /// Download the configuration published by a relay server
    TargetSet {
        /// Server URL
        target: String,
    },
    /// List platforms available for new projects
    PlatformList,
    /// List plans available for new projects
    PlanList,
    /// List teams
    TeamList,
    /// Create a team
    TeamCreate {
        /// Team name
        team: String,
    },
    /// Remove a team
    TeamRemove {
        /// Team name
        team: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        assume_yes: bool,
    },
    /// Create a project in one or more environments
    ProjectCreate {
        /// Project name
        #[arg(short = 'n', long = "project-name", default_value_t)]
        name: String,
        /// Platform of the project's applications
        #[arg(short = 'l', long, default_value_t)]
        platform: String,
        /// Team owning the project
        #[arg(short = 't', long, default_value_t)]
        team: String,
        /// Plan of the project's applications
        #[arg(short = 'p', long, default_value_t)]
        plan: String,
        /// Project description
        #[arg(short = 'd', long, default_value_t)]
        description: String,
        /// Environments to create the project in (default: all)
        #[arg(short = 'e', long, value_delimiter = ',')]
        envs: Vec<String>,
    },
    /// Change a project's environments and attributes
    ProjectUpdate {
        /// Project name
        #[arg(short = 'n', long = "project-name", default_value_t)]
        name: String,
        /// New team owner
        #[arg(short = 't', long, default_value_t)]
        team: String,
        /// New plan
        #[arg(short = 'p', long, default_value_t)]
        plan: String,
        /// New description
        #[arg(short = 'd', long, default_value_t)]
        description: String,
        /// Environments to add to the project
        #[arg(short = 'a', long, value_delimiter = ',')]
        add_envs: Vec<String>,
        /// Environments to remove from the project
        #[arg(short = 'r', long, value_delimiter = ',')]
        remove_envs: Vec<String>,
    },
    /// Remove a project from every environment
    ProjectRemove {
        /// Project name
        #[arg(short = 'n', long = "project-name", default_value_t)]
        name: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        assume_yes: bool,
    },
    /// List projects
    ProjectList,
    /// Show a project and its environments
    ProjectInfo {
        /// Project name
        #[arg(short = 'n', long = "project-name", default_value_t)]
        name: String,
    },
    /// Show the application of a project in one environment
    ProjectEnvInfo(Target),
    /// Deploy a new version, or promote one from another environment
    ProjectDeploy {
        #[command(flatten)]
        target: Target,
        /// Image to deploy
        #[arg(short = 'i', long)]
        image: Option<String>,
        /// Environment whose running version is promoted
        #[arg(short = 'p', long)]
        promote: Option<String>,
        /// Files and directories to upload
        files: Vec<String>,
    },
    /// List deploys of a project in one environment
    ProjectDeployList(Target),
    /// Display logs of a project in one environment
    ProjectLog {
        #[command(flatten)]
        target: Target,
        /// Number of log lines to display
        #[arg(short = 'l', long, default_value_t = 10)]
        lines: u32,
        /// Follow logs
        #[arg(short = 'f', long)]
        follow: bool,
        /// Omit dates
        #[arg(long)]
        no_date: bool,
        /// Omit sources
        #[arg(long)]
        no_source: bool,
    },
    /// Set configuration variables (NAME=value) of a project
    #[command(visible_alias = "config-set")]
    EnvvarSet {
        #[command(flatten)]
        scope: Scope,
        /// Variables in NAME=value form
        #[arg(required = true)]
        vars: Vec<String>,
        /// Hide values from envvar-get
        #[arg(short = 'p', long)]
        private: bool,
        /// Do not restart the applications
        #[arg(long)]
        no_restart: bool,
    },
    /// Show configuration variables of a project
    #[command(visible_alias = "config-get")]
    EnvvarGet(Scope),
    /// Unset configuration variables of a project
    #[command(visible_alias = "config-unset")]
    EnvvarUnset {
        #[command(flatten)]
        scope: Scope,
        /// Variable names
        #[arg(required = true)]
        names: Vec<String>,
        /// Do not restart the applications
        #[arg(long)]
        no_restart: bool,
    },
}

/// A project in a single environment.
#[derive(Args)]
struct Target {
    /// Project name
    #[arg(short = 'n', long = "project-name", default_value_t)]
    name: String,
    /// Environment name
    #[arg(short = 'e', long = "env", default_value_t)]
    env: String,
}

/// A project in several environments.
#[derive(Args)]
struct Scope {
    /// Project name
    #[arg(short = 'n', long = "project-name", default_value_t)]
    name: String,
    /// Environments (default: all)
    #[arg(short = 'e', long, value_delimiter = ',')]
    envs: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::EnvList => commands::env_list(config)?,
        Commands::TargetSet { target } => commands::target_set(config, &target).await?,
        Commands::PlatformList => commands::platform_list().await?,
        Commands::PlanList => commands::plan_list().await?,
        Commands::TeamList => commands::team_list().await?,
        Commands::TeamCreate { team } => commands::team_create(&team).await?,
        Commands::TeamRemove { team, assume_yes } => {
            commands::team_remove(&team, assume_yes).await?
        }
        Commands::ProjectCreate {
            name,
            platform,
            team,
            plan,
            description,
            envs,
        } => {
            let req = relay_project::CreateRequest {
                name,
                platform,
                team,
                plan,
                description,
                envs,
            };
            commands::project_create(config, req).await?
        }
        Commands::ProjectUpdate {
            name,
            team,
            plan,
            description,
            add_envs,
            remove_envs,
        } => {
            let req = relay_project::UpdateRequest {
                name,
                team,
                plan,
                description,
                add_envs,
                remove_envs,
            };
            commands::project_update(config, req).await?
        }
        Commands::ProjectRemove { name, assume_yes } => {
            commands::project_remove(config, &name, assume_yes).await?
        }
        Commands::ProjectList => commands::project_list(config).await?,
        Commands::ProjectInfo { name } => commands::project_info(config, &name).await?,
        Commands::ProjectEnvInfo(t) => commands::project_env_info(config, &t.name, &t.env).await?,
        Commands::ProjectDeploy {
            target,
            image,
            promote,
            files,
        } => {
            commands::project_deploy(config, &target.name, &target.env, files, image, promote)
                .await?
        }
        Commands::ProjectDeployList(t) => {
            commands::project_deploy_list(config, &t.name, &t.env).await?
        }
        Commands::ProjectLog {
            target,
            lines,
            follow,
            no_date,
            no_source,
        } => {
            let opts = relay_cloud::LogOptions {
                lines,
                follow,
                no_date,
                no_source,
            };
            commands::project_log(config, &target.name, &target.env, &opts).await?
        }
        Commands::EnvvarSet {
            scope,
            vars,
            private,
            no_restart,
        } => {
            commands::envvar_set(config, &scope.name, &scope.envs, &vars, private, no_restart)
                .await?
        }
        Commands::EnvvarGet(scope) => commands::envvar_get(config, &scope.name, &scope.envs).await?,
        Commands::EnvvarUnset {
            scope,
            names,
            no_restart,
        } => {
            commands::envvar_unset(config, &scope.name, &scope.envs, &names, no_restart).await?
        }
    }

    Ok(())
}
