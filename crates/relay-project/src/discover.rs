//! Reconstruction of projects from a snapshot of remote applications.
//!
//! Nothing about a project is stored server-side; membership is re-derived
//! from the current application list on every call.

use std::collections::BTreeMap;

use relay_cloud::App;
use relay_core::naming::{self, IdentityError};
use relay_core::{EnvRegistry, Environment};

/// One application of a project, with the environment it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub env: Environment,
    pub app: App,
    /// The cname that identified `app` as part of the project
    pub address: String,
}

/// Projects by name, members in registry order.
pub type Grouping = BTreeMap<String, Vec<Member>>;

/// Group `apps` into projects using every configured environment's naming
/// pattern. Applications that belong to no project are skipped.
///
/// # Errors
///
/// Only [`IdentityError::Pattern`]; mismatching applications are not errors.
pub fn group_projects(apps: &[App], registry: &EnvRegistry) -> Result<Grouping, IdentityError> {
    let mut projects = Grouping::new();
    for env in registry.all() {
        for app in apps.iter().filter(|a| !a.cnames.is_empty()) {
            match naming::extract_project_name(&app.name, &app.cnames, env) {
                Ok(id) => projects.entry(id.project).or_default().push(Member {
                    env: env.clone(),
                    app: app.clone(),
                    address: id.cname,
                }),
                Err(IdentityError::CNameNotDefined | IdentityError::NotAProject) => {}
                Err(e) => return Err(e),
            }
        }
    }
    Ok(projects)
}
