use crate::error::ExecError;
use crate::executor::{RealExecutor, TsuruExecutor};

/// Options of `app-log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub lines: u32,
    pub follow: bool,
    pub no_date: bool,
    pub no_source: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            lines: 10,
            follow: false,
            no_date: false,
            no_source: false,
        }
    }
}

/// Hands single-application commands over to the platform CLI.
///
/// relay only decides which application and flags to use; uploading,
/// building and log streaming stay with the platform's own tooling.
pub struct TsuruDelegate<E: TsuruExecutor = RealExecutor> {
    executor: E,
}

impl TsuruDelegate<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::from_env(),
        }
    }
}

impl Default for TsuruDelegate<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TsuruExecutor> TsuruDelegate<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// `app-deploy -a APP -i IMAGE`, or `app-deploy -a APP FILES...`.
    pub async fn deploy(
        &self,
        app: &str,
        image: Option<&str>,
        files: &[String],
    ) -> Result<(), ExecError> {
        let mut cmd = args(["app-deploy", "-a", app]);
        match image {
            Some(image) => cmd.extend(args(["-i", image])),
            None => cmd.extend(files.iter().cloned()),
        }
        self.executor.exec_streaming(&cmd).await
    }

    pub async fn deploy_list(&self, app: &str) -> Result<(), ExecError> {
        self.executor
            .exec_streaming(&args(["app-deploy-list", "-a", app]))
            .await
    }

    pub async fn app_info(&self, app: &str) -> Result<(), ExecError> {
        self.executor
            .exec_streaming(&args(["app-info", "-a", app]))
            .await
    }

    // ── Platform catalogue ──

    pub async fn platform_list(&self) -> Result<(), ExecError> {
        self.executor
            .exec_streaming(&args(["platform-list"]))
            .await
    }

    pub async fn plan_list(&self) -> Result<(), ExecError> {
        self.executor.exec_streaming(&args(["plan-list"])).await
    }

    pub async fn team_list(&self) -> Result<(), ExecError> {
        self.executor.exec_streaming(&args(["team-list"])).await
    }

    pub async fn team_create(&self, team: &str) -> Result<(), ExecError> {
        self.executor
            .exec_streaming(&args(["team-create", team]))
            .await
    }

    /// `team-remove TEAM`, with `-y` when the caller already confirmed.
    pub async fn team_remove(&self, team: &str, assume_yes: bool) -> Result<(), ExecError> {
        let mut cmd = args(["team-remove", team]);
        if assume_yes {
            cmd.push("-y".to_owned());
        }
        self.executor.exec_streaming(&cmd).await
    }

    pub async fn logs(&self, app: &str, opts: &LogOptions) -> Result<(), ExecError> {
        let lines = opts.lines.to_string();
        let mut cmd = args(["app-log", "-a", app, "--lines", &lines]);
        if opts.follow {
            cmd.push("--follow".to_owned());
        }
        if opts.no_date {
            cmd.push("--no-date".to_owned());
        }
        if opts.no_source {
            cmd.push("--no-source".to_owned());
        }
        self.executor.exec_streaming(&cmd).await
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
