use std::io::Write;

use relay_cloud::{AppGateway, EnvVarDecl, EnvVarsUpdate, GatewayError, HttpTransport, Transport};
use relay_core::{EnvRegistry, naming};

use crate::error::FanOutError;
use crate::outcome::Outcome;

/// Parse `NAME=value` arguments. The value may contain `=`.
///
/// # Errors
///
/// [`FanOutError::InvalidDeclarations`] when there are no arguments or any
/// one of them is malformed.
pub fn parse_declarations(args: &[String]) -> Result<Vec<EnvVarDecl>, FanOutError> {
    if args.is_empty() {
        return Err(FanOutError::InvalidDeclarations);
    }
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, value)) if is_var_name(name) && !value.is_empty() && !value.contains('\n') => {
                Ok(EnvVarDecl::new(name, value))
            }
            _ => Err(FanOutError::InvalidDeclarations),
        })
        .collect()
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Environment variable operations applied to a project in several
/// environments, one after the other.
pub struct EnvVars<'a, T: Transport = HttpTransport> {
    gateway: &'a AppGateway<T>,
    registry: &'a EnvRegistry,
}

impl<'a, T: Transport> EnvVars<'a, T> {
    pub fn new(gateway: &'a AppGateway<T>, registry: &'a EnvRegistry) -> Self {
        Self { gateway, registry }
    }

    /// Set `vars` in every selected environment, writing one status line
    /// per environment. A missing application is reported and skipped; any
    /// other failure is reported and returned once every environment has
    /// been tried.
    pub async fn set(
        &self,
        project: &str,
        envs: &[String],
        vars: EnvVarsUpdate,
        out: &mut impl Write,
    ) -> Result<(), FanOutError> {
        if project.is_empty() {
            return Err(FanOutError::MissingName);
        }
        let mut report = Report::default();
        for env in self.registry.resolve(envs)? {
            let app = naming::app_name(project, &env);
            write!(out, "setting variables in environment {:?}... ", env.name)?;
            out.flush()?;
            let result = self.gateway.set_env_vars(&app, &vars).await;
            report.record(&env.name, Outcome::from_result(result), out)?;
        }
        report.finish()
    }

    /// Remove the variables `names` in every selected environment, with the
    /// same reporting as [`set`](Self::set).
    pub async fn unset(
        &self,
        project: &str,
        envs: &[String],
        names: &[String],
        no_restart: bool,
        out: &mut impl Write,
    ) -> Result<(), FanOutError> {
        if project.is_empty() {
            return Err(FanOutError::MissingName);
        }
        let mut report = Report::default();
        for env in self.registry.resolve(envs)? {
            let app = naming::app_name(project, &env);
            write!(out, "unsetting variables from environment {:?}... ", env.name)?;
            out.flush()?;
            let result = self.gateway.unset_env_vars(&app, no_restart, names).await;
            report.record(&env.name, Outcome::from_result(result), out)?;
        }
        report.finish()
    }

    /// Print the variables of every selected environment. Environments
    /// without the project get a warning on `err`; any other failure stops
    /// immediately.
    pub async fn get(
        &self,
        project: &str,
        envs: &[String],
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<(), FanOutError> {
        if project.is_empty() {
            return Err(FanOutError::MissingName);
        }
        for env in self.registry.resolve(envs)? {
            let app = naming::app_name(project, &env);
            let vars = match self.gateway.get_env_vars(&app).await {
                Ok(vars) => vars,
                Err(e) if e.is_not_found() => {
                    writeln!(err, "WARNING: project not found in environment {:?}", env.name)?;
                    continue;
                }
                Err(cause) => {
                    return Err(FanOutError::Remote {
                        env: env.name,
                        cause,
                    });
                }
            };
            writeln!(out, "variables in {:?}:\n", env.name)?;
            for var in &vars {
                writeln!(out, " {var}")?;
            }
            write!(out, "\n\n")?;
        }
        Ok(())
    }
}

/// Status lines of a fan-out, keeping the first hard failure.
#[derive(Default)]
struct Report {
    first_failure: Option<(String, GatewayError)>,
}

impl Report {
    fn record(&mut self, env: &str, outcome: Outcome, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{outcome}")?;
        if let Outcome::Failed(e) = outcome {
            tracing::warn!(env, error = %e, "fan-out step failed");
            if self.first_failure.is_none() {
                self.first_failure = Some((env.to_owned(), e));
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<(), FanOutError> {
        match self.first_failure {
            Some((env, cause)) => Err(FanOutError::Remote { env, cause }),
            None => Ok(()),
        }
    }
}
