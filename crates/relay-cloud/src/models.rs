use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan name the platform assigns when an app is created without one.
pub const AUTOGENERATED_PLAN: &str = "autogenerated";

/// An application as returned by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub name: String,
    #[serde(rename = "cname")]
    pub cnames: Vec<String>,
    pub description: String,
    #[serde(rename = "repository")]
    pub repository_url: String,
    pub platform: String,
    pub teams: Vec<String>,
    pub owner: String,
    pub pool: String,
    #[serde(rename = "teamowner")]
    pub team_owner: String,
    pub units: Vec<serde_json::Value>,
    pub plan: Plan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub name: String,
}

/// Settings sent when creating or updating an application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub name: String,
    pub description: String,
    pub platform: String,
    pub team: String,
    pub plan: String,
    pub pool: String,
}

impl AppOptions {
    /// Form body of `POST /apps`; every field is sent.
    pub fn create_form(&self) -> Vec<(String, String)> {
        [
            ("name", &self.name),
            ("description", &self.description),
            ("platform", &self.platform),
            ("plan", &self.plan),
            ("teamOwner", &self.team),
            ("pool", &self.pool),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.clone()))
        .collect()
    }

    /// Form body of `PUT /apps/{name}`; name and platform are never sent and
    /// empty fields are left untouched server-side.
    pub fn update_form(&self) -> Vec<(String, String)> {
        [
            ("description", &self.description),
            ("plan", &self.plan),
            ("teamOwner", &self.team),
            ("pool", &self.pool),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_owned(), v.clone()))
        .collect()
    }
}

/// An environment variable of one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    pub public: bool,
}

impl fmt::Display for EnvVar {
    /// `NAME=value`, with private values masked.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.public {
            write!(f, "{}={}", self.name, self.value)
        } else {
            write!(f, "{}=*** (private config)", self.name)
        }
    }
}

/// A `NAME=value` declaration to be set on an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVarDecl {
    pub name: String,
    pub value: String,
}

impl EnvVarDecl {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Body of `POST /apps/{name}/env`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVarsUpdate {
    pub envs: Vec<EnvVarDecl>,
    pub private: bool,
    pub no_restart: bool,
}

impl EnvVarsUpdate {
    pub fn form(&self) -> Vec<(String, String)> {
        let mut form = Vec::with_capacity(self.envs.len() * 2 + 2);
        for (i, decl) in self.envs.iter().enumerate() {
            form.push((format!("Envs.{i}.Name"), decl.name.clone()));
            form.push((format!("Envs.{i}.Value"), decl.value.clone()));
        }
        form.push(("NoRestart".to_owned(), self.no_restart.to_string()));
        form.push(("Private".to_owned(), self.private.to_string()));
        form
    }
}

/// One deployment of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deploy {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Commit")]
    pub commit: String,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}
