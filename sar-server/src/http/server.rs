//! Axum server setup
//!
//! Every route lives under `/rest`. Layers, outermost first:
//! request id, tracing span, request id propagation, CORS, then the
//! optional bearer-token check.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::{middleware, Router};
use sar_core::{AppConfig, DatetimeFormatter};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::auth::{self, AuthSettings};
use super::{docs, routes};
use crate::cores::{CollectRequestCore, ParameterCore, WasteCore};
use crate::db::Stores;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000)
    pub bind_addr: SocketAddr,

    /// Serve the OpenAPI document under `/rest/docs/openapi.json`
    pub swagger_docs: bool,

    /// Bearer-token middleware settings, `None` when disabled
    pub authentication: Option<AuthSettings>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            swagger_docs: false,
            authentication: None,
        }
    }
}

impl ServerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        let app = &config.app;
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], app.server_port)),
            swagger_docs: app.swagger_docs,
            authentication: app
                .use_authentication_middleware
                .then(|| AuthSettings::new(app.authentication_exclude.clone())),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub collect_requests: CollectRequestCore,
    pub wastes: WasteCore,
    pub parameters: ParameterCore,
}

impl AppState {
    /// Wire the domain cores over one set of stores.
    pub fn new(stores: Stores, formatter: DatetimeFormatter) -> Self {
        let parameters = ParameterCore::new(stores.parameters);
        let wastes = WasteCore::new(stores.wastes, parameters.clone(), formatter);
        let collect_requests = CollectRequestCore::new(
            stores.collect_requests,
            parameters.clone(),
            wastes.clone(),
            formatter,
        );
        Self {
            collect_requests,
            wastes,
            parameters,
        }
    }
}

/// Build the application router with all routes and layers.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut api = Router::new()
        .merge(routes::heart_beat::router())
        .merge(routes::collect_requests::router())
        .merge(routes::wastes::router())
        .merge(routes::parameters::router());
    if config.swagger_docs {
        api = api.merge(docs::router());
    }

    let mut app = Router::new()
        .nest("/rest", api)
        .with_state(Arc::new(state));

    if let Some(settings) = &config.authentication {
        app = app.layer(middleware::from_fn_with_state(
            Arc::new(settings.clone()),
            auth::require_bearer,
        ));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CorsLayer::permissive()),
    )
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::db::memory::MemoryStores;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::Response;
    use sar_core::domains::{
        COLLECT_REQUEST_PROCESS_STATUS, WASTE_PACKAGING_TYPE, WASTE_PROCESS_STATUS, WASTE_STATE,
        WASTE_STORE_TYPE, WASTE_TYPE,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const CREATE_BODY: &str = r#"{
        "request": {"collectDate": "2024-01-01", "productionCenterId": 7},
        "waste": [
            {"type": 1, "packaging": 2, "weightInKg": 3.5, "volumeInL": 1.0, "description": "x"}
        ]
    }"#;

    async fn seeded() -> MemoryStores {
        let memory = MemoryStores::default();
        let parameters = &memory.parameters;
        parameters.insert_domain(WASTE_TYPE, &[1, 2]).await;
        parameters.insert_domain(WASTE_PACKAGING_TYPE, &[2, 3]).await;
        parameters
            .insert_domain(COLLECT_REQUEST_PROCESS_STATUS, &[9, 10])
            .await;
        parameters.insert_domain(WASTE_PROCESS_STATUS, &[9, 10]).await;
        parameters.insert_domain(WASTE_STATE, &[1]).await;
        parameters.insert_domain(WASTE_STORE_TYPE, &[1]).await;
        memory
    }

    fn app(memory: &MemoryStores, config: &ServerConfig) -> Router {
        let state = AppState::new(memory.stores(), DatetimeFormatter::default());
        build_router(state, config)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(!config.swagger_docs);
        assert!(config.authentication.is_none());
    }

    #[tokio::test]
    async fn heart_beat_sets_request_id() {
        let memory = seeded().await;
        let response = app(&memory, &ServerConfig::default())
            .oneshot(get("/rest/heart-beat"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn create_returns_201_with_wastes() {
        let memory = seeded().await;
        let response = app(&memory, &ServerConfig::default())
            .oneshot(json_request("POST", "/rest/collect-requests", CREATE_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["request"]["processStatus"], 9);
        assert_eq!(body["request"]["collectDate"], "2024-01-01");
        assert_eq!(body["waste"][0]["weightInKg"], 3.5);
        assert_eq!(body["waste"][0]["processStatus"], 9);
        assert_eq!(body["waste"][0]["type"], 1);
    }

    #[tokio::test]
    async fn create_with_unknown_packaging_is_400_and_writes_nothing() {
        let memory = seeded().await;
        let body = CREATE_BODY.replace(r#""packaging": 2"#, r#""packaging": 8"#);
        let response = app(&memory, &ServerConfig::default())
            .oneshot(json_request("POST", "/rest/collect-requests", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "packaging type 8 is not valid, valid types are 2,3");
        assert_eq!(memory.collect_requests.writes(), 0);
        assert_eq!(memory.wastes.writes(), 0);
    }

    #[tokio::test]
    async fn create_with_oversized_weight_is_400_and_writes_nothing() {
        let memory = seeded().await;
        let body = CREATE_BODY.replace(r#""weightInKg": 3.5"#, r#""weightInKg": 1e30"#);
        let response = app(&memory, &ServerConfig::default())
            .oneshot(json_request("POST", "/rest/collect-requests", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "validation_error");
        assert_eq!(memory.collect_requests.writes(), 0);
        assert_eq!(memory.wastes.writes(), 0);
    }

    #[tokio::test]
    async fn wrong_primitive_type_is_400() {
        let memory = seeded().await;
        let body = CREATE_BODY.replace(r#""type": 1"#, r#""type": "1""#);
        let response = app(&memory, &ServerConfig::default())
            .oneshot(json_request("POST", "/rest/collect-requests", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn search_and_status_update_round() {
        let memory = seeded().await;
        let router = app(&memory, &ServerConfig::default());

        let created = router
            .clone()
            .oneshot(json_request("POST", "/rest/collect-requests", CREATE_BODY))
            .await
            .unwrap();
        let id = body_json(created).await["request"]["id"]
            .as_str()
            .unwrap()
            .to_owned();

        let update = json!({"collectReqId": id, "processStatus": 10}).to_string();
        let response = router
            .clone()
            .oneshot(json_request("PUT", "/rest/collect-requests/status", &update))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["processStatus"], 10);

        let response = router
            .oneshot(json_request(
                "POST",
                "/rest/collect-requests/search",
                r#"{"processStatus": 10}"#,
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["values"].as_array().unwrap().len(), 1);
        assert_eq!(body["values"][0]["id"], id.as_str());
    }

    #[tokio::test]
    async fn status_update_of_missing_request_is_404() {
        let memory = seeded().await;
        let update = json!({
            "collectReqId": "6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b",
            "processStatus": 10
        })
        .to_string();
        let response = app(&memory, &ServerConfig::default())
            .oneshot(json_request("PUT", "/rest/collect-requests/status", &update))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }

    #[tokio::test]
    async fn waste_classification_over_http() {
        let memory = seeded().await;
        let router = app(&memory, &ServerConfig::default());

        let created = router
            .clone()
            .oneshot(json_request("POST", "/rest/collect-requests", CREATE_BODY))
            .await
            .unwrap();
        let waste_id = body_json(created).await["waste"][0]["id"]
            .as_str()
            .unwrap()
            .to_owned();

        let classify = json!({
            "wasteId": waste_id,
            "isotopesNumber": 4.0,
            "stateWaste": 1,
            "storeId": 1
        })
        .to_string();
        let response = router
            .oneshot(json_request("PUT", "/rest/wastes/classify", &classify))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["isotopesNumber"], 4.0);
        assert_eq!(body["storeType"], 1);
    }

    #[tokio::test]
    async fn lists_parameters_of_a_domain() {
        let memory = seeded().await;
        let response = app(&memory, &ServerConfig::default())
            .oneshot(get("/rest/parameters/wastePackagingType"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["values"][0]["id"], 2);
        assert_eq!(body["values"][1]["id"], 3);
    }

    #[tokio::test]
    async fn docs_route_follows_config() {
        let memory = seeded().await;

        let response = app(&memory, &ServerConfig::default())
            .oneshot(get("/rest/docs/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let config = ServerConfig {
            swagger_docs: true,
            ..ServerConfig::default()
        };
        let response = app(&memory, &config)
            .oneshot(get("/rest/docs/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn authentication_requires_bearer_outside_exclusions() {
        let memory = seeded().await;
        let config = ServerConfig {
            authentication: Some(AuthSettings::new(BTreeSet::from([
                "/rest/heart-beat".to_string()
            ]))),
            ..ServerConfig::default()
        };
        let router = app(&memory, &config);

        let response = router
            .clone()
            .oneshot(get("/rest/parameters/wasteType"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "unauthorized");

        let authorized = Request::builder()
            .uri("/rest/parameters/wasteType")
            .header("authorization", "Bearer token")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(authorized).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get("/rest/heart-beat")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
