use std::collections::BTreeMap;

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::GatewayError;
use crate::models::{App, AppOptions, Deploy, EnvVar, EnvVarsUpdate};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Typed platform operations, parameterized over the transport for testability.
///
/// Every operation is a single request with no retry. A non-2xx answer
/// becomes [`GatewayError::Http`], so callers can tell a 404 apart from any
/// other failure with [`GatewayError::is_not_found`].
pub struct AppGateway<T: Transport = HttpTransport> {
    transport: T,
}

impl AppGateway<HttpTransport> {
    pub fn new(target: &str, token: Option<String>) -> Self {
        Self {
            transport: HttpTransport::new(target, token),
        }
    }
}

impl<T: Transport> AppGateway<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Applications ──

    /// `POST /apps`. Returns the string fields of the platform's answer,
    /// which include `repository_url` when the platform assigned one.
    pub async fn create_app(
        &self,
        opts: &AppOptions,
    ) -> Result<BTreeMap<String, String>, GatewayError> {
        let mut req = ApiRequest::new(Method::POST, "/apps");
        req.form = opts.create_form();
        let response = self.call(req).await?;

        let fields: BTreeMap<String, serde_json::Value> = decode("/apps", &response.body)?;
        Ok(fields
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_owned())))
            .collect())
    }

    /// `PUT /apps/{name}` with the non-empty fields of `opts`.
    pub async fn update_app(&self, name: &str, opts: &AppOptions) -> Result<(), GatewayError> {
        let mut req = ApiRequest::new(Method::PUT, format!("/apps/{name}"));
        req.form = opts.update_form();
        let response = self.call(req).await?;
        check_stream(&response)
    }

    pub async fn get_app(&self, name: &str) -> Result<App, GatewayError> {
        let path = format!("/apps/{name}");
        let response = self.call(ApiRequest::new(Method::GET, path.as_str())).await?;
        decode(&path, &response.body)
    }

    /// `GET /apps` with the given query filters (e.g. `("name", "^myapp")`).
    /// "No content" is an empty list.
    pub async fn list_apps(&self, filters: &[(&str, &str)]) -> Result<Vec<App>, GatewayError> {
        let mut req = ApiRequest::new(Method::GET, "/apps");
        for (key, value) in filters {
            req = req.query(key, *value);
        }
        let response = self.call(req).await?;
        if response.is_no_content() || response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode("/apps", &response.body)
    }

    pub async fn delete_app(&self, name: &str) -> Result<(), GatewayError> {
        let response = self
            .call(ApiRequest::new(Method::DELETE, format!("/apps/{name}")))
            .await?;
        check_stream(&response)
    }

    pub async fn set_cname(&self, name: &str, cname: &str) -> Result<(), GatewayError> {
        let req = ApiRequest::new(Method::POST, format!("/apps/{name}/cname")).form("cname", cname);
        self.call(req).await?;
        Ok(())
    }

    // ── Environment variables ──

    pub async fn set_env_vars(&self, name: &str, vars: &EnvVarsUpdate) -> Result<(), GatewayError> {
        let mut req = ApiRequest::new(Method::POST, format!("/apps/{name}/env"));
        req.form = vars.form();
        let response = self.call(req).await?;
        check_stream(&response)
    }

    pub async fn get_env_vars(&self, name: &str) -> Result<Vec<EnvVar>, GatewayError> {
        let path = format!("/apps/{name}/env");
        let response = self.call(ApiRequest::new(Method::GET, path.as_str())).await?;
        if response.is_no_content() {
            return Ok(Vec::new());
        }
        decode(&path, &response.body)
    }

    pub async fn unset_env_vars(
        &self,
        name: &str,
        no_restart: bool,
        names: &[String],
    ) -> Result<(), GatewayError> {
        let mut req = ApiRequest::new(Method::DELETE, format!("/apps/{name}/env"))
            .query("noRestart", no_restart.to_string());
        for env in names {
            req = req.query("env", env.as_str());
        }
        let response = self.call(req).await?;
        check_stream(&response)
    }

    // ── Deploys ──

    /// Most recent deploy of `name`; a zero-value [`Deploy`] when there is none.
    pub async fn last_deploy(&self, name: &str) -> Result<Deploy, GatewayError> {
        let req = ApiRequest::new(Method::GET, "/deploys")
            .query("limit", "1")
            .query("app", name);
        let response = self.call(req).await?;
        if response.is_no_content() || response.body.trim().is_empty() {
            return Ok(Deploy::default());
        }
        let deploys: Vec<Deploy> = decode("/deploys", &response.body)?;
        Ok(deploys.into_iter().next().unwrap_or_default())
    }

    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        tracing::debug!(%method, %path, status = response.status, "gateway call");

        if response.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Http {
                status: response.status,
                body: response.body,
            })
        }
    }
}

fn decode<D: DeserializeOwned>(path: &str, body: &str) -> Result<D, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode {
        path: path.to_owned(),
        source: e,
    })
}

/// One message of a streamed JSON response.
#[derive(Deserialize)]
struct StreamMessage {
    #[serde(rename = "Error", default)]
    error: String,
}

/// Long-running operations answer 200 with a stream of JSON messages; a
/// failure shows up as a message carrying `Error`. Non-JSON output is
/// treated as plain progress text.
fn check_stream(response: &ApiResponse) -> Result<(), GatewayError> {
    let messages = serde_json::Deserializer::from_str(&response.body).into_iter::<StreamMessage>();
    for message in messages {
        match message {
            Ok(m) if !m.error.is_empty() => {
                return Err(GatewayError::Stream { message: m.error });
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_without_error_passes() {
        let response = ApiResponse::new(200, r#"{"Message":"restarting\n"}{"Message":"done\n"}"#);
        assert!(check_stream(&response).is_ok());
    }

    #[test]
    fn stream_error_is_reported() {
        let response = ApiResponse::new(200, r#"{"Message":"restarting"}{"Error":"unit failed"}"#);
        let err = check_stream(&response).unwrap_err();
        assert_eq!(err.to_string(), "unit failed");
    }

    #[test]
    fn plain_text_stream_passes() {
        let response = ApiResponse::new(200, "ok\n");
        assert!(check_stream(&response).is_ok());
    }
}
