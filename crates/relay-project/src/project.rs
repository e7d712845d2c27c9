use std::collections::BTreeMap;
use std::io::Write;

use relay_cloud::{
    AppGateway, AppOptions, Deploy, EnvVarDecl, EnvVarsUpdate, GatewayError, HttpTransport,
    Transport, models::AUTOGENERATED_PLAN,
};
use relay_core::{EnvRegistry, Environment, naming};

use crate::discover::{self, Grouping, Member};
use crate::error::ProjectError;
use crate::outcome::Outcome;

/// Variable recording which environment an application serves.
pub const ENV_NAME_VAR: &str = "RELAY_ENV_NAME";

/// Settings of `project-create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: String,
    pub platform: String,
    pub team: String,
    pub plan: String,
    pub description: String,
    /// Environments to create the project in; empty means all configured
    pub envs: Vec<String>,
}

/// Settings of `project-update`. Empty attributes are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    pub name: String,
    pub team: String,
    pub plan: String,
    pub description: String,
    pub add_envs: Vec<String>,
    pub remove_envs: Vec<String>,
}

impl UpdateRequest {
    fn changes_attributes(&self) -> bool {
        !(self.team.is_empty() && self.plan.is_empty() && self.description.is_empty())
    }
}

/// An application created for one environment of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedApp {
    pub name: String,
    pub env: Environment,
    /// String fields of the platform's create answer
    pub fields: BTreeMap<String, String>,
}

impl CreatedApp {
    pub fn repository_url(&self) -> Option<&str> {
        self.fields
            .get("repository_url")
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }
}

/// One row of `project-info`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvDetails {
    pub member: Member,
    /// Last deploy, if one is recorded and could be fetched
    pub deploy: Option<Deploy>,
}

/// Failures of a compensating delete pass.
///
/// Cleanup is best-effort: its failures are logged and never replace the
/// error that triggered it. Applications listed here may be left orphaned.
#[derive(Debug, Default)]
pub struct Cleanup {
    pub failures: Vec<(String, GatewayError)>,
}

impl Cleanup {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Applications the rollback could not delete.
    pub fn orphans(&self) -> Vec<&str> {
        self.failures.iter().map(|(app, _)| app.as_str()).collect()
    }
}

/// Project-level operations over one application per environment.
///
/// Calls are strictly sequential and follow registry order.
pub struct Projects<'a, T: Transport = HttpTransport> {
    gateway: &'a AppGateway<T>,
    registry: &'a EnvRegistry,
}

impl<'a, T: Transport> Projects<'a, T> {
    pub fn new(gateway: &'a AppGateway<T>, registry: &'a EnvRegistry) -> Self {
        Self { gateway, registry }
    }

    // ── Create ──

    /// Create one application per requested environment, then give each
    /// its cname.
    ///
    /// If an application fails to be created, the ones created before it
    /// are deleted. If a cname fails to be assigned, every created
    /// application is deleted.
    pub async fn create(&self, req: &CreateRequest) -> Result<Vec<CreatedApp>, ProjectError> {
        if req.name.is_empty() || req.platform.is_empty() {
            return Err(ProjectError::MissingNameOrPlatform);
        }
        let envs = self
            .registry
            .resolve(&req.envs)
            .map_err(ProjectError::Environments)?;

        let base = AppOptions {
            description: req.description.clone(),
            platform: req.platform.clone(),
            team: req.team.clone(),
            plan: req.plan.clone(),
            ..Default::default()
        };
        let created = self.create_apps(&req.name, &envs, &base).await?;

        if let Err(cause) = self.set_cnames(&req.name, &created).await {
            let names: Vec<String> = created.iter().map(|c| c.name.clone()).collect();
            let cleanup = self.rollback(&names).await;
            return Err(ProjectError::Configure {
                project: req.name.clone(),
                cause,
                cleanup,
            });
        }
        tracing::debug!(project = %req.name, envs = created.len(), "project created");
        Ok(created)
    }

    async fn create_apps(
        &self,
        project: &str,
        envs: &[Environment],
        base: &AppOptions,
    ) -> Result<Vec<CreatedApp>, ProjectError> {
        let mut created: Vec<CreatedApp> = Vec::with_capacity(envs.len());
        for env in envs {
            let opts = AppOptions {
                name: naming::app_name(project, env),
                pool: env.pool_name(),
                ..base.clone()
            };
            tracing::debug!(app = %opts.name, pool = %opts.pool, "creating application");

            let fields = match self.gateway.create_app(&opts).await {
                Ok(fields) => fields,
                Err(cause) => {
                    let names: Vec<String> = created.iter().map(|c| c.name.clone()).collect();
                    let cleanup = self.rollback(&names).await;
                    return Err(ProjectError::Create {
                        env: env.name.clone(),
                        cause,
                        cleanup,
                    });
                }
            };
            self.tag_env(&opts.name, env).await;
            created.push(CreatedApp {
                name: opts.name,
                env: env.clone(),
                fields,
            });
        }
        Ok(created)
    }

    /// Best-effort; the application works without it.
    async fn tag_env(&self, app: &str, env: &Environment) {
        let update = EnvVarsUpdate {
            envs: vec![EnvVarDecl::new(ENV_NAME_VAR, env.name.clone())],
            private: false,
            no_restart: false,
        };
        if let Err(e) = self.gateway.set_env_vars(app, &update).await {
            tracing::warn!(app, error = %e, "failed to record environment name");
        }
    }

    async fn set_cnames(&self, project: &str, apps: &[CreatedApp]) -> Result<(), GatewayError> {
        for app in apps {
            let cname = naming::address(project, &app.env);
            tracing::debug!(app = %app.name, %cname, "assigning cname");
            self.gateway.set_cname(&app.name, &cname).await?;
        }
        Ok(())
    }

    /// Delete `apps`, carrying on past failures.
    async fn rollback(&self, apps: &[String]) -> Cleanup {
        let mut cleanup = Cleanup::default();
        for app in apps {
            if let Err(e) = self.gateway.delete_app(app).await {
                tracing::warn!(app = %app, error = %e, "rollback failed, application left behind");
                cleanup.failures.push((app.clone(), e));
            }
        }
        if !cleanup.is_clean() {
            tracing::warn!(orphans = cleanup.failures.len(), "rollback incomplete");
        }
        cleanup
    }

    // ── Update ──

    /// Add and remove environments of an existing project, then apply
    /// attribute changes to the environments it keeps.
    ///
    /// Environments are added with the settings of the project's entry
    /// application. Steps run in order and the first failure stops the
    /// update; earlier steps are not undone.
    pub async fn update(
        &self,
        req: &UpdateRequest,
        out: &mut impl Write,
    ) -> Result<(), ProjectError> {
        if req.name.is_empty() {
            return Err(ProjectError::MissingName);
        }
        let members = self.find(&req.name).await?;

        self.registry.validate(&req.add_envs)?;
        if let Some(env) = req
            .add_envs
            .iter()
            .find(|name| members.iter().any(|m| &m.env.name == *name))
        {
            return Err(ProjectError::EnvAlreadyDefined(env.clone()));
        }
        let base = match members.first() {
            Some(entry) => base_options(entry, req),
            None => return Err(ProjectError::NotFound),
        };
        let (to_remove, to_keep) = split_members(members, &req.remove_envs)?;

        writeln!(out, "adding new environments...")?;
        let envs = self.registry.select(&req.add_envs);
        let created = self.create_apps(&req.name, &envs, &base).await?;
        self.set_cnames(&req.name, &created).await?;

        writeln!(out, "removing old environments...")?;
        let targets: Vec<(Environment, String)> = to_remove
            .iter()
            .map(|m| (m.env.clone(), m.app.name.clone()))
            .collect();
        let outcomes = self.delete_apps(&targets, out).await?;
        if let Some(e) = outcomes.into_iter().find_map(Outcome::into_failure) {
            return Err(e.into());
        }

        if req.changes_attributes() {
            for member in &to_keep {
                let opts = AppOptions {
                    name: member.app.name.clone(),
                    pool: member.app.pool.clone(),
                    ..base.clone()
                };
                tracing::debug!(app = %opts.name, "updating application");
                self.gateway.update_app(&opts.name, &opts).await?;
            }
        }
        Ok(())
    }

    // ── Remove ──

    /// Delete the project's application in every configured environment.
    ///
    /// Individual failures are reported but tolerated; the project only
    /// counts as missing when no environment had it.
    pub async fn remove(
        &self,
        project: &str,
        out: &mut impl Write,
    ) -> Result<Vec<Outcome>, ProjectError> {
        if project.is_empty() {
            return Err(ProjectError::MissingName);
        }
        let targets: Vec<(Environment, String)> = self
            .registry
            .all()
            .iter()
            .map(|env| (env.clone(), naming::app_name(project, env)))
            .collect();
        let outcomes = self.delete_apps(&targets, out).await?;
        if outcomes.iter().all(Outcome::is_not_found) {
            return Err(ProjectError::NotFound);
        }
        Ok(outcomes)
    }

    /// Delete each application, writing one status line per environment.
    async fn delete_apps(
        &self,
        targets: &[(Environment, String)],
        out: &mut impl Write,
    ) -> Result<Vec<Outcome>, std::io::Error> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for (env, app) in targets {
            write!(out, "Deleting from env {:?}... ", env.name)?;
            out.flush()?;
            let outcome = Outcome::from_result(self.gateway.delete_app(app).await);
            if let Outcome::Failed(e) = &outcome {
                tracing::warn!(app = %app, error = %e, "delete failed");
            }
            writeln!(out, "{outcome}")?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    // ── Discovery ──

    /// Every project visible through the configured environments.
    pub async fn list(&self) -> Result<Grouping, ProjectError> {
        let apps = self.gateway.list_apps(&[]).await?;
        Ok(discover::group_projects(&apps, self.registry)?)
    }

    /// Members of `project` in registry order, with full application details.
    /// The first member is the project's entry environment.
    pub async fn find(&self, project: &str) -> Result<Vec<Member>, ProjectError> {
        let prefix = format!("^{}", regex::escape(project));
        let apps = self.gateway.list_apps(&[("name", &prefix)]).await?;
        let mut grouping = discover::group_projects(&apps, self.registry)?;

        let members = grouping.remove(project).unwrap_or_default();
        if members.is_empty() {
            return Err(ProjectError::NotFound);
        }
        let mut detailed = Vec::with_capacity(members.len());
        for member in members {
            let app = self.gateway.get_app(&member.app.name).await?;
            detailed.push(Member { app, ..member });
        }
        Ok(detailed)
    }

    /// Members of `project` with their last deploy. Deploy lookup failures
    /// leave the deploy empty.
    pub async fn info(&self, project: &str) -> Result<Vec<EnvDetails>, ProjectError> {
        let members = self.find(project).await?;
        let mut details = Vec::with_capacity(members.len());
        for member in members {
            let deploy = match self.gateway.last_deploy(&member.app.name).await {
                Ok(deploy) if !deploy.image.is_empty() => Some(deploy),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(app = %member.app.name, error = %e, "deploy lookup failed");
                    None
                }
            };
            details.push(EnvDetails { member, deploy });
        }
        Ok(details)
    }
}

/// Split `members` into the ones named in `remove` and the rest.
fn split_members(
    members: Vec<Member>,
    remove: &[String],
) -> Result<(Vec<Member>, Vec<Member>), ProjectError> {
    if let Some(missing) = remove
        .iter()
        .find(|name| !members.iter().any(|m| &m.env.name == *name))
    {
        return Err(ProjectError::EnvNotDefined(missing.clone()));
    }
    Ok(members
        .into_iter()
        .partition(|m| remove.contains(&m.env.name)))
}

/// Settings for new environments: the entry application's, overridden by
/// whatever the request sets. An autogenerated plan is not inherited.
fn base_options(entry: &Member, req: &UpdateRequest) -> AppOptions {
    let app = &entry.app;
    let inherited_plan = if app.plan.name == AUTOGENERATED_PLAN {
        String::new()
    } else {
        app.plan.name.clone()
    };
    let pick = |explicit: &str, inherited: &str| {
        if explicit.is_empty() {
            inherited.to_owned()
        } else {
            explicit.to_owned()
        }
    };
    AppOptions {
        name: String::new(),
        description: pick(&req.description, &app.description),
        platform: app.platform.clone(),
        team: pick(&req.team, &app.team_owner),
        plan: pick(&req.plan, &inherited_plan),
        pool: app.pool.clone(),
    }
}
