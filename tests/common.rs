use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use brewenv::config::{EnvironmentConfig, Loader};
use brewenv::routes::create_router;
use brewenv::state::AppState;
use figment::{
    providers::{Format, Yaml},
    Figment,
};

pub const TEST_CONFIG: &str = r#"
production: false
apiServerUrl: "http://127.0.0.1:5000"
auth0:
  url: "fullstack-nano-degree.us"
  audience: "Coffeeshp"
  clientId: "A1p6vlo5BMp9pPqPTP5ZWwBMWG31r0sw"
  callbackURL: "http://localhost:8100/tabs/user-page"
"#;

pub fn load_test_config(yaml: &str) -> EnvironmentConfig {
    Loader::from_figment(Figment::new().merge(Yaml::string(yaml)))
        .without_defaults()
        .load()
        .expect("Failed to load test config YAML")
}

pub fn build_app(environment: EnvironmentConfig) -> Router {
    create_router(AppState::new(environment))
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}
