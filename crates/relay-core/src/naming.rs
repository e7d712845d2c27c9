//! Naming and identity convention.
//!
//! A project is never stored anywhere. Its application in environment `env`
//! is called `{project}-{env.name}` and answers on `{project}.{env.dns_suffix}`.
//! Recovering a project from an application requires both anchors to agree:
//! matching on the name alone would confuse `proj1-dev` with a `proj1` project
//! when it really belongs to something else, and the cname alone cannot tell
//! `myapp.dev.example.com` in `dev` from `myapp.dev` in an `example.com` env.

use regex::Regex;

use crate::config::Environment;

/// Application name of `project` in `env`.
///
/// ```
/// use relay_core::{naming, Environment};
///
/// let env = Environment::new("dev", "dev.example.com");
/// assert_eq!(naming::app_name("myapp", &env), "myapp-dev");
/// ```
pub fn app_name(project: &str, env: &Environment) -> String {
    format!("{project}-{}", env.name)
}

/// Public address (cname) of `project` in `env`.
pub fn address(project: &str, env: &Environment) -> String {
    format!("{project}.{}", env.dns_suffix)
}

/// `^(.+)-{env}$`; the capture is the candidate project name.
pub fn name_regex(env: &Environment) -> Result<Regex, IdentityError> {
    Ok(Regex::new(&format!("^(.+)-{}$", regex::escape(&env.name)))?)
}

/// `^(.+)\.{dns_suffix}$`; the capture is the candidate project name.
pub fn dns_regex(env: &Environment) -> Result<Regex, IdentityError> {
    Ok(Regex::new(&format!(
        r"^(.+)\.{}$",
        regex::escape(&env.dns_suffix)
    ))?)
}

/// A project recovered from one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub project: String,
    /// The cname that matched the environment's DNS suffix
    pub cname: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("cname not defined")]
    CNameNotDefined,

    #[error("not a project")]
    NotAProject,

    #[error("invalid naming pattern")]
    Pattern(#[from] regex::Error),
}

/// Recover the project an application belongs to in `env`.
///
/// The first cname matching the environment's DNS pattern is used. The
/// project name captured from it must equal the one captured from the
/// application name.
///
/// # Errors
///
/// - [`IdentityError::CNameNotDefined`] if no cname carries `env`'s suffix
/// - [`IdentityError::NotAProject`] if the name and cname disagree
pub fn extract_project_name(
    app_name: &str,
    cnames: &[String],
    env: &Environment,
) -> Result<ProjectIdentity, IdentityError> {
    let dns = dns_regex(env)?;
    let cname = cnames
        .iter()
        .find(|c| dns.is_match(c))
        .ok_or(IdentityError::CNameNotDefined)?;

    let from_name = name_regex(env)?
        .captures(app_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    let from_dns = dns
        .captures(cname)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    match (from_name, from_dns) {
        (Some(a), Some(b)) if a == b => Ok(ProjectIdentity {
            project: b.to_owned(),
            cname: cname.clone(),
        }),
        _ => Err(IdentityError::NotAProject),
    }
}
