//! Project operations for relay.
//!
//! A project is a name shared by one application per environment. This
//! crate turns project-level commands into sequences of per-application
//! gateway calls:
//!
//! - [`Projects`]: create (with rollback), update, remove, list and find
//! - [`EnvVars`]: environment variable fan-out with per-environment status
//! - [`Deployer`]: deploy and promotion planning

pub mod deploy;
pub mod discover;
pub mod envvar;
pub mod error;
pub mod outcome;
pub mod project;

pub use deploy::{DeployPlan, DeploySource, Deployer};
pub use discover::{Grouping, Member, group_projects};
pub use envvar::{EnvVars, parse_declarations};
pub use error::{DeployError, FanOutError, ProjectError};
pub use outcome::Outcome;
pub use project::{Cleanup, CreateRequest, CreatedApp, EnvDetails, Projects, UpdateRequest};
