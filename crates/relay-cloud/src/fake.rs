//! In-memory implementation of the platform API.
//!
//! [`FakePlatform`] answers the same routes as the real platform from an
//! in-process store, so aggregate operations can be exercised end to end
//! without a network. Failures are injected per method and path, and every
//! request is recorded in order.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::Method;

use crate::error::TransportError;
use crate::models::{App, Deploy, EnvVar, Plan, AUTOGENERATED_PLAN};
use crate::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Debug, Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    apps: Vec<App>,
    env_vars: HashMap<String, Vec<EnvVar>>,
    deploys: HashMap<String, Vec<Deploy>>,
    failures: Vec<Failure>,
    requests: Vec<ApiRequest>,
}

#[derive(Debug)]
struct Failure {
    method: Method,
    path: String,
    status: u16,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Seeding ──

    pub fn add_app(&self, app: App) {
        self.state().apps.push(app);
    }

    /// Record a deploy; the latest one added is the most recent.
    pub fn add_deploy(&self, app: &str, deploy: Deploy) {
        self.state()
            .deploys
            .entry(app.to_owned())
            .or_default()
            .push(deploy);
    }

    pub fn add_env_var(&self, app: &str, var: EnvVar) {
        self.state()
            .env_vars
            .entry(app.to_owned())
            .or_default()
            .push(var);
    }

    /// Answer every `method path` request with `status` from now on.
    pub fn fail(&self, method: Method, path: &str, status: u16) {
        self.state().failures.push(Failure {
            method,
            path: path.to_owned(),
            status,
        });
    }

    // ── Inspection ──

    pub fn app(&self, name: &str) -> Option<App> {
        self.state().apps.iter().find(|a| a.name == name).cloned()
    }

    pub fn app_names(&self) -> Vec<String> {
        self.state().apps.iter().map(|a| a.name.clone()).collect()
    }

    pub fn env_vars(&self, app: &str) -> Vec<EnvVar> {
        self.state().env_vars.get(app).cloned().unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    /// Requests as `METHOD /path`, in the order they were received.
    pub fn calls(&self) -> Vec<String> {
        self.state()
            .requests
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    /// Requests matching `method` whose path ends with `suffix`.
    pub fn calls_matching(&self, method: Method, suffix: &str) -> Vec<ApiRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path.ends_with(suffix))
            .cloned()
            .collect()
    }

    fn handle(&self, request: ApiRequest) -> ApiResponse {
        let mut state = self.state();
        state.requests.push(request.clone());

        if let Some(failure) = state
            .failures
            .iter()
            .find(|f| f.method == request.method && f.path == request.path)
        {
            return ApiResponse::new(failure.status, "injected failure\n");
        }

        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["apps"]) => state.create_app(&request),
            ("GET", ["apps"]) => state.list_apps(&request),
            ("GET", ["apps", name]) => state.get_app(name),
            ("PUT", ["apps", name]) => state.update_app(name, &request),
            ("DELETE", ["apps", name]) => state.delete_app(name),
            ("POST", ["apps", name, "cname"]) => state.add_cname(name, &request),
            ("POST", ["apps", name, "env"]) => state.set_envs(name, &request),
            ("GET", ["apps", name, "env"]) => state.get_envs(name),
            ("DELETE", ["apps", name, "env"]) => state.unset_envs(name, &request),
            ("GET", ["deploys"]) => state.list_deploys(&request),
            _ => ApiResponse::new(405, "method not allowed\n"),
        }
    }
}

impl Transport for FakePlatform {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        Ok(self.handle(request))
    }
}

fn json(value: &impl serde::Serialize) -> ApiResponse {
    match serde_json::to_string(value) {
        Ok(body) => ApiResponse::new(200, body),
        Err(e) => ApiResponse::new(500, e.to_string()),
    }
}

fn app_not_found() -> ApiResponse {
    ApiResponse::new(404, "App not found.\n")
}

impl State {
    fn find(&self, name: &str) -> Option<usize> {
        self.apps.iter().position(|a| a.name == name)
    }

    fn create_app(&mut self, request: &ApiRequest) -> ApiResponse {
        let field = |key: &str| request.form_value(key).unwrap_or_default().to_owned();
        let name = field("name");
        let platform = field("platform");
        if name.is_empty() || platform.is_empty() {
            return ApiResponse::new(400, "invalid params\n");
        }
        if self.find(&name).is_some() {
            return ApiResponse::new(409, "app already exists\n");
        }
        let mut plan = field("plan");
        if plan.is_empty() {
            plan = AUTOGENERATED_PLAN.to_owned();
        }
        let team = field("teamOwner");
        let repository_url = format!("git@git.example.com:{name}.git");
        self.apps.push(App {
            name: name.clone(),
            description: field("description"),
            platform,
            teams: vec![team.clone()],
            team_owner: team,
            owner: "user@example.com".to_owned(),
            pool: field("pool"),
            plan: Plan { name: plan },
            repository_url: repository_url.clone(),
            ..Default::default()
        });
        self.env_vars.insert(
            name.clone(),
            vec![EnvVar {
                name: "TSURU_APPNAME".to_owned(),
                value: name,
                public: true,
            }],
        );

        let mut body = BTreeMap::new();
        body.insert("status", "success".to_owned());
        body.insert("repository_url", repository_url);
        json(&body)
    }

    fn list_apps(&self, request: &ApiRequest) -> ApiResponse {
        let filter = match request.query_value("name") {
            Some(pattern) => match regex::Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => return ApiResponse::new(400, e.to_string()),
            },
            None => None,
        };
        let apps: Vec<&App> = self
            .apps
            .iter()
            .filter(|a| filter.as_ref().is_none_or(|re| re.is_match(&a.name)))
            .collect();
        if apps.is_empty() {
            return ApiResponse::new(204, "");
        }
        json(&apps)
    }

    fn get_app(&self, name: &str) -> ApiResponse {
        match self.find(name) {
            Some(i) => json(&self.apps[i]),
            None => app_not_found(),
        }
    }

    fn update_app(&mut self, name: &str, request: &ApiRequest) -> ApiResponse {
        let Some(i) = self.find(name) else {
            return app_not_found();
        };
        let app = &mut self.apps[i];
        for (key, value) in &request.form {
            match key.as_str() {
                "description" => app.description = value.clone(),
                "plan" => app.plan.name = value.clone(),
                "teamOwner" => app.team_owner = value.clone(),
                "pool" => app.pool = value.clone(),
                _ => {}
            }
        }
        ApiResponse::new(200, r#"{"Message":"updated"}"#)
    }

    fn delete_app(&mut self, name: &str) -> ApiResponse {
        let Some(i) = self.find(name) else {
            return app_not_found();
        };
        self.apps.remove(i);
        self.env_vars.remove(name);
        self.deploys.remove(name);
        ApiResponse::new(200, r#"{"Message":"removed"}"#)
    }

    fn add_cname(&mut self, name: &str, request: &ApiRequest) -> ApiResponse {
        let Some(i) = self.find(name) else {
            return app_not_found();
        };
        let Some(cname) = request.form_value("cname") else {
            return ApiResponse::new(400, "missing cname\n");
        };
        self.apps[i].cnames.push(cname.to_owned());
        ApiResponse::new(200, "")
    }

    fn set_envs(&mut self, name: &str, request: &ApiRequest) -> ApiResponse {
        if self.find(name).is_none() {
            return app_not_found();
        }
        let private = request.form_value("Private") == Some("true");
        let mut index = 0;
        let vars = self.env_vars.entry(name.to_owned()).or_default();
        while let Some(var_name) = request.form_value(&format!("Envs.{index}.Name")) {
            let value = request
                .form_value(&format!("Envs.{index}.Value"))
                .unwrap_or_default();
            vars.retain(|v| v.name != var_name);
            vars.push(EnvVar {
                name: var_name.to_owned(),
                value: value.to_owned(),
                public: !private,
            });
            index += 1;
        }
        ApiResponse::new(200, r#"{"Message":"variables set"}"#)
    }

    fn get_envs(&self, name: &str) -> ApiResponse {
        if self.find(name).is_none() {
            return app_not_found();
        }
        json(&self.env_vars.get(name).cloned().unwrap_or_default())
    }

    fn unset_envs(&mut self, name: &str, request: &ApiRequest) -> ApiResponse {
        if self.find(name).is_none() {
            return app_not_found();
        }
        let names: Vec<&str> = request
            .query
            .iter()
            .filter(|(k, _)| k == "env")
            .map(|(_, v)| v.as_str())
            .collect();
        if let Some(vars) = self.env_vars.get_mut(name) {
            vars.retain(|v| !names.contains(&v.name.as_str()));
        }
        ApiResponse::new(200, r#"{"Message":"variables unset"}"#)
    }

    fn list_deploys(&self, request: &ApiRequest) -> ApiResponse {
        let app = request.query_value("app").unwrap_or_default();
        let limit = request
            .query_value("limit")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(usize::MAX);
        let deploys: Vec<&Deploy> = self
            .deploys
            .get(app)
            .map(|list| list.iter().rev().take(limit).collect())
            .unwrap_or_default();
        if deploys.is_empty() {
            return ApiResponse::new(204, "");
        }
        json(&deploys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_unknown_paths_to_405() {
        let fake = FakePlatform::new();
        let response = fake
            .send(ApiRequest::new(Method::PATCH, "/apps"))
            .await
            .unwrap();
        assert_eq!(response.status, 405);
        assert_eq!(fake.calls(), vec!["PATCH /apps"]);
    }

    #[tokio::test]
    async fn injected_failure_wins_over_routing() {
        let fake = FakePlatform::new();
        fake.add_app(App {
            name: "a-dev".to_owned(),
            ..Default::default()
        });
        fake.fail(Method::DELETE, "/apps/a-dev", 500);
        let response = fake
            .send(ApiRequest::new(Method::DELETE, "/apps/a-dev"))
            .await
            .unwrap();
        assert_eq!(response.status, 500);
        assert!(fake.app("a-dev").is_some());
    }
}
