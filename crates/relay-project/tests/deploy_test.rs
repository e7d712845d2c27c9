use relay_cloud::fake::FakePlatform;
use relay_cloud::{App, AppGateway, Deploy};
use relay_core::{Environment, RelayConfig};
use relay_project::{DeployError, DeployPlan, DeploySource, Deployer, ProjectError};

fn config(registry: Option<&str>) -> RelayConfig {
    RelayConfig {
        target: "http://paas.example.com".to_owned(),
        registry: registry.map(str::to_owned),
        environments: vec![
            Environment::new("dev", "dev.example.com"),
            Environment::new("qa", "qa.example.com"),
            Environment::new("prod", "example.com"),
        ],
    }
}

/// `myapp` deployed in every configured environment.
fn platform(config: &RelayConfig) -> AppGateway<FakePlatform> {
    let fake = FakePlatform::new();
    for env in &config.environments {
        fake.add_app(App {
            name: format!("myapp-{}", env.name),
            cnames: vec![format!("myapp.{}", env.dns_suffix)],
            ..Default::default()
        });
    }
    AppGateway::with_transport(fake)
}

fn deploy(image: &str) -> Deploy {
    Deploy {
        id: "57ccc949".to_owned(),
        commit: String::new(),
        image: image.to_owned(),
        timestamp: None,
    }
}

#[tokio::test]
async fn direct_deploy_to_entry_env() {
    let config = config(None);
    let gateway = platform(&config);
    let deployer = Deployer::new(&gateway, &config);

    let plan = deployer
        .plan("myapp", "dev", DeploySource::Content(vec![".".to_owned()]))
        .await
        .unwrap();

    assert_eq!(
        plan,
        DeployPlan {
            app: "myapp-dev".to_owned(),
            image: None,
            files: vec![".".to_owned()],
        }
    );
}

#[tokio::test]
async fn direct_deploy_elsewhere_requires_promotion() {
    let config = config(None);
    let gateway = platform(&config);
    let deployer = Deployer::new(&gateway, &config);

    let err = deployer
        .plan("myapp", "prod", DeploySource::Image("myimage:v1".to_owned()))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"can only deploy directly to "dev", use promote to deploy to other environments"#
    );
}

#[tokio::test]
async fn promotion_uses_last_image_of_source_env() {
    let config = config(Some("localhost:5000"));
    let gateway = platform(&config);
    gateway.transport().add_deploy("myapp-dev", deploy("v2"));
    gateway.transport().add_deploy("myapp-dev", deploy("v3"));
    let deployer = Deployer::new(&gateway, &config);

    let plan = deployer
        .plan("myapp", "qa", DeploySource::Promote("dev".to_owned()))
        .await
        .unwrap();

    assert_eq!(plan.app, "myapp-qa");
    assert_eq!(
        plan.image.as_deref(),
        Some("localhost:5000/tsuru/app-myapp-dev:v3")
    );
    assert!(plan.files.is_empty());
}

#[tokio::test]
async fn promotion_without_registry() {
    let config = config(None);
    let gateway = platform(&config);
    gateway.transport().add_deploy("myapp-qa", deploy("v7"));
    let deployer = Deployer::new(&gateway, &config);

    let plan = deployer
        .plan("myapp", "prod", DeploySource::Promote("qa".to_owned()))
        .await
        .unwrap();

    assert_eq!(plan.image.as_deref(), Some("tsuru/app-myapp-qa:v7"));
}

#[tokio::test]
async fn promotion_with_no_deploy_fails() {
    let config = config(None);
    let gateway = platform(&config);
    let deployer = Deployer::new(&gateway, &config);

    let err = deployer
        .plan("myapp", "qa", DeploySource::Promote("dev".to_owned()))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::NoVersion(_)));
    assert_eq!(err.to_string(), r#"no version running in "dev""#);
}

#[tokio::test]
async fn unknown_project_fails_first() {
    let config = config(None);
    let gateway = platform(&config);
    let deployer = Deployer::new(&gateway, &config);

    let err = deployer
        .plan("ghost", "dev", DeploySource::Content(vec![".".to_owned()]))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Project(ProjectError::NotFound)));
}

#[tokio::test]
async fn unknown_env_is_rejected() {
    let config = config(None);
    let gateway = platform(&config);
    let deployer = Deployer::new(&gateway, &config);

    let err = deployer
        .plan("myapp", "staging", DeploySource::Content(vec![".".to_owned()]))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid values: staging (valid options are: dev, qa, prod)"
    );
}
