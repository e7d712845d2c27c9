use mockall::mock;
use relay_cloud::error::{ExecError, GatewayError, TransportError};
use relay_cloud::executor::TsuruExecutor;
use relay_cloud::transport::{ApiRequest, ApiResponse, Transport};
use relay_cloud::{AppGateway, AppOptions, EnvVarDecl, EnvVarsUpdate, LogOptions, TsuruDelegate};
use reqwest::Method;

mock! {
    Transport {}

    impl Transport for Transport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
    }
}

mock! {
    Executor {}

    impl TsuruExecutor for Executor {
        async fn exec_streaming(&self, args: &[String]) -> Result<(), ExecError>;
    }
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

// ── Gateway Tests ──

#[tokio::test]
async fn create_app_posts_form_and_returns_fields() {
    let mut mock = MockTransport::new();
    mock.expect_send()
        .withf(|req| {
            req.method == Method::POST
                && req.path == "/apps"
                && req.form_value("name") == Some("myapp-dev")
                && req.form_value("pool") == Some(r"dev\dev.example.com")
        })
        .times(1)
        .returning(|_| {
            Ok(ApiResponse::new(
                200,
                r#"{"status":"success","repository_url":"git@git.example.com:myapp-dev.git","ip":""}"#,
            ))
        });

    let gateway = AppGateway::with_transport(mock);
    let opts = AppOptions {
        name: "myapp-dev".to_owned(),
        platform: "python".to_owned(),
        pool: r"dev\dev.example.com".to_owned(),
        ..Default::default()
    };
    let fields = gateway.create_app(&opts).await.unwrap();

    assert_eq!(fields["status"], "success");
    assert_eq!(
        fields["repository_url"],
        "git@git.example.com:myapp-dev.git"
    );
}

#[tokio::test]
async fn non_2xx_becomes_http_error() {
    let mut mock = MockTransport::new();
    mock.expect_send()
        .returning(|_| Ok(ApiResponse::new(404, "App not found.\n")));

    let gateway = AppGateway::with_transport(mock);
    let err = gateway.get_app("nope-dev").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "HTTP 404: App not found.");
}

#[tokio::test]
async fn list_apps_passes_filters_and_handles_no_content() {
    let mut mock = MockTransport::new();
    mock.expect_send()
        .withf(|req| req.method == Method::GET && req.query_value("name") == Some("^proj1"))
        .times(1)
        .returning(|_| Ok(ApiResponse::new(204, "")));

    let gateway = AppGateway::with_transport(mock);
    let apps = gateway.list_apps(&[("name", "^proj1")]).await.unwrap();

    assert!(apps.is_empty());
}

#[tokio::test]
async fn list_apps_decodes_payload() {
    let mut mock = MockTransport::new();
    mock.expect_send().returning(|_| {
        Ok(ApiResponse::new(
            200,
            r#"[{"name":"proj1-dev","cname":["proj1.dev.example.com"]},{"name":"proj1-prod"}]"#,
        ))
    });

    let gateway = AppGateway::with_transport(mock);
    let apps = gateway.list_apps(&[]).await.unwrap();

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].cnames, strings(&["proj1.dev.example.com"]));
}

#[tokio::test]
async fn undecodable_body_is_decode_error() {
    let mut mock = MockTransport::new();
    mock.expect_send()
        .returning(|_| Ok(ApiResponse::new(200, "<html>")));

    let gateway = AppGateway::with_transport(mock);
    let err = gateway.get_app("proj1-dev").await.unwrap_err();

    assert!(matches!(err, GatewayError::Decode { ref path, .. } if path == "/apps/proj1-dev"));
}

#[tokio::test]
async fn set_env_vars_sends_indexed_form() {
    let mut mock = MockTransport::new();
    mock.expect_send()
        .withf(|req| {
            req.path == "/apps/proj1-dev/env"
                && req.form_value("Envs.0.Name") == Some("A")
                && req.form_value("Envs.0.Value") == Some("1")
                && req.form_value("NoRestart") == Some("true")
                && req.form_value("Private") == Some("false")
        })
        .times(1)
        .returning(|_| Ok(ApiResponse::new(200, r#"{"Message":"ok"}"#)));

    let gateway = AppGateway::with_transport(mock);
    let update = EnvVarsUpdate {
        envs: vec![EnvVarDecl::new("A", "1")],
        private: false,
        no_restart: true,
    };
    gateway.set_env_vars("proj1-dev", &update).await.unwrap();
}

#[tokio::test]
async fn set_env_vars_reports_streamed_error() {
    let mut mock = MockTransport::new();
    mock.expect_send().returning(|_| {
        Ok(ApiResponse::new(
            200,
            r#"{"Message":"setting"}{"Error":"restart failed"}"#,
        ))
    });

    let gateway = AppGateway::with_transport(mock);
    let err = gateway
        .set_env_vars("proj1-dev", &EnvVarsUpdate::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Stream { .. }));
    assert_eq!(err.to_string(), "restart failed");
}

#[tokio::test]
async fn unset_env_vars_repeats_env_query() {
    let mut mock = MockTransport::new();
    mock.expect_send()
        .withf(|req| {
            req.method == Method::DELETE
                && req.query
                    == vec![
                        ("noRestart".to_owned(), "false".to_owned()),
                        ("env".to_owned(), "A".to_owned()),
                        ("env".to_owned(), "B".to_owned()),
                    ]
        })
        .times(1)
        .returning(|_| Ok(ApiResponse::new(200, "")));

    let gateway = AppGateway::with_transport(mock);
    gateway
        .unset_env_vars("proj1-dev", false, &strings(&["A", "B"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn last_deploy_without_deploys_is_zero_value() {
    let mut mock = MockTransport::new();
    mock.expect_send()
        .withf(|req| req.path == "/deploys" && req.query_value("limit") == Some("1"))
        .returning(|_| Ok(ApiResponse::new(204, "")));

    let gateway = AppGateway::with_transport(mock);
    let deploy = gateway.last_deploy("proj1-dev").await.unwrap();

    assert!(deploy.image.is_empty());
}

#[tokio::test]
async fn last_deploy_takes_first_entry() {
    let mut mock = MockTransport::new();
    mock.expect_send().returning(|_| {
        Ok(ApiResponse::new(
            200,
            r#"[{"ID":"2","Image":"v2"},{"ID":"1","Image":"v1"}]"#,
        ))
    });

    let gateway = AppGateway::with_transport(mock);
    let deploy = gateway.last_deploy("proj1-dev").await.unwrap();

    assert_eq!(deploy.image, "v2");
}

// ── Delegate Tests ──

#[tokio::test]
async fn deploy_with_image_passes_flag() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|args| {
            args == strings(&[
                "app-deploy",
                "-a",
                "myapp-qa",
                "-i",
                "localhost:5000/tsuru/app-myapp-dev:v3",
            ])
        })
        .times(1)
        .returning(|_| Ok(()));

    let delegate = TsuruDelegate::with_executor(mock);
    delegate
        .deploy("myapp-qa", Some("localhost:5000/tsuru/app-myapp-dev:v3"), &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn deploy_with_files_appends_them() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|args| args == strings(&["app-deploy", "-a", "myapp-dev", ".", "static"]))
        .times(1)
        .returning(|_| Ok(()));

    let delegate = TsuruDelegate::with_executor(mock);
    delegate
        .deploy("myapp-dev", None, &strings(&[".", "static"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn logs_pass_every_flag() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|args| {
            args == strings(&[
                "app-log",
                "-a",
                "myapp-dev",
                "--lines",
                "50",
                "--follow",
                "--no-source",
            ])
        })
        .times(1)
        .returning(|_| Ok(()));

    let delegate = TsuruDelegate::with_executor(mock);
    let opts = LogOptions {
        lines: 50,
        follow: true,
        no_source: true,
        ..Default::default()
    };
    delegate.logs("myapp-dev", &opts).await.unwrap();
}

#[tokio::test]
async fn delegate_failure_propagates() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming().returning(|args| {
        Err(ExecError::CommandFailed {
            program: "tsuru".to_owned(),
            args: args.to_vec(),
            status: "exit code: 1".to_owned(),
        })
    });

    let delegate = TsuruDelegate::with_executor(mock);
    let err = delegate.app_info("myapp-dev").await.unwrap_err();

    assert!(matches!(err, ExecError::CommandFailed { .. }));
}

#[tokio::test]
async fn catalogue_commands_pass_through() {
    let mut mock = MockExecutor::new();
    for command in ["platform-list", "plan-list", "team-list"] {
        mock.expect_exec_streaming()
            .withf(move |args| args == strings(&[command]))
            .times(1)
            .returning(|_| Ok(()));
    }

    let delegate = TsuruDelegate::with_executor(mock);
    delegate.platform_list().await.unwrap();
    delegate.plan_list().await.unwrap();
    delegate.team_list().await.unwrap();
}

#[tokio::test]
async fn team_create_passes_name() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|args| args == strings(&["team-create", "backend"]))
        .times(1)
        .returning(|_| Ok(()));

    let delegate = TsuruDelegate::with_executor(mock);
    delegate.team_create("backend").await.unwrap();
}

#[tokio::test]
async fn team_remove_confirms_only_when_asked() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|args| args == strings(&["team-remove", "backend", "-y"]))
        .times(1)
        .returning(|_| Ok(()));
    mock.expect_exec_streaming()
        .withf(|args| args == strings(&["team-remove", "frontend"]))
        .times(1)
        .returning(|_| Ok(()));

    let delegate = TsuruDelegate::with_executor(mock);
    delegate.team_remove("backend", true).await.unwrap();
    delegate.team_remove("frontend", false).await.unwrap();
}
