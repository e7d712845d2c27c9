use crate::error::ExecError;

/// Platform CLI invoked when no override is configured.
pub const DEFAULT_PROGRAM: &str = "tsuru";

/// Environment variable overriding the platform CLI binary.
pub const PROGRAM_ENV: &str = "RELAY_TSURU_BIN";

/// Abstraction over platform CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait TsuruExecutor: Send + Sync {
    /// Run a platform CLI command, streaming its output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), ExecError>;
}

/// Runs the real platform CLI binary.
#[derive(Debug, Clone)]
pub struct RealExecutor {
    program: String,
}

impl RealExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Binary from `RELAY_TSURU_BIN`, falling back to `tsuru`.
    pub fn from_env() -> Self {
        match std::env::var(PROGRAM_ENV) {
            Ok(program) if !program.trim().is_empty() => Self::new(program),
            _ => Self::new(DEFAULT_PROGRAM),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl TsuruExecutor for RealExecutor {
    async fn exec_streaming(&self, args: &[String]) -> Result<(), ExecError> {
        use std::process::Stdio;

        tracing::debug!(program = %self.program, ?args, "delegating to platform CLI");

        let status = tokio::process::Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ExecError::NotFound {
                program: self.program.clone(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::CommandFailed {
                program: self.program.clone(),
                args: args.to_vec(),
                status: format!("exit code: {status}"),
            })
        }
    }
}
