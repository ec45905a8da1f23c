//! Integration tests driving the response writer from axum handlers.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use cc_response::{
    api::{JSON_SCHEMA_HEADER, VERSION_HEADER},
    Config, CorsConfig, ErrorReport, ResponseEnvelope, ResponseFormat, ResponseWriter, ServiceIdentity,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

#[derive(Debug, thiserror::Error)]
#[error("broker {0} is not alive")]
struct DeadBroker(u32);

fn test_config(cors: CorsConfig) -> Arc<Config> {
    Arc::new(Config {
        cors,
        identity: ServiceIdentity::new("2.5.142", "8c1e0f4"),
        ..Default::default()
    })
}

fn into_response(result: cc_response::Result<Response>) -> Response {
    result.unwrap_or_else(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
}

async fn load(State(config): State<Arc<Config>>) -> Response {
    let body = r#"{"version":1,"brokers":[{"id":1,"rack":"r1","alive":true},{"id":2}],"hosts":[]}"#;
    let writer = ResponseWriter::from_config(&config);
    into_response(writer.respond(StatusCode::OK, ResponseFormat::json().with_schema(), body))
}

async fn demote(State(config): State<Arc<Config>>) -> Response {
    let writer = ResponseWriter::from_config(&config);
    let report = ErrorReport::capture(&DeadBroker(7));
    into_response(writer.respond_error(
        Some(&report),
        Some("Cannot demote broker 7."),
        StatusCode::BAD_REQUEST,
        ResponseFormat::json(),
    ))
}

async fn broken(State(config): State<Arc<Config>>) -> Response {
    // Plain-text body wrongly marked as JSON
    let writer = ResponseWriter::from_config(&config);
    into_response(writer.respond(StatusCode::OK, ResponseFormat::json().with_schema(), "Demotion completed."))
}

async fn text(State(config): State<Arc<Config>>) -> Response {
    let writer = ResponseWriter::from_config(&config);
    into_response(writer.respond_message(StatusCode::OK, ResponseFormat::text(), "Déjà équilibré"))
}

fn router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/load", get(load))
        .route("/demote_broker", get(demote))
        .route("/broken", get(broken))
        .route("/text", get(text))
        .with_state(config)
}

async fn send(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).method("GET").body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn test_json_response_with_schema() {
    let response = send(router(test_config(CorsConfig::disabled())), "/load").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json; charset=utf-8");
    assert_eq!(response.headers()[VERSION_HEADER], "2.5.142");
    assert_eq!(
        response.headers()[JSON_SCHEMA_HEADER],
        r#"{"type":"object","properties":{"version":{"type":"number"},"brokers":{"type":"array","items":[{"type":"object","properties":{"id":{"type":"number"},"rack":{"type":"string"},"alive":{"type":"boolean"}}}]},"hosts":{"type":"array"}}}"#
    );
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_error_envelope_over_http() {
    let config = test_config(CorsConfig::allow("https://ui.example.com", "User-Task-ID"));
    let response = send(router(config), "/demote_broker").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://ui.example.com");
    assert_eq!(response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS], "User-Task-ID");
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let body = body_bytes(response).await;
    let envelope: ResponseEnvelope = serde_json::from_slice(&body).unwrap();
    match envelope {
        ResponseEnvelope::Error { version, stack_trace, error_message } => {
            assert_eq!(version, 1);
            assert!(stack_trace.contains("DeadBroker"));
            assert!(stack_trace.contains("broker 7 is not alive"));
            assert_eq!(error_message.as_deref(), Some("Cannot demote broker 7."));
        }
        other => panic!("expected error envelope, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_not_sent_as_success() {
    let response = send(router(test_config(CorsConfig::disabled())), "/broken").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(JSON_SCHEMA_HEADER).is_none());
}

#[tokio::test]
async fn test_content_length_is_byte_length() {
    let response = send(router(test_config(CorsConfig::disabled())), "/text").await;

    let expected = "Déjà équilibré".len();
    assert_eq!(response.headers()[header::CONTENT_LENGTH], expected.to_string().as_str());
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");

    let body = body_bytes(response).await;
    assert_eq!(body.len(), expected);
    assert_eq!(String::from_utf8(body).unwrap(), "Déjà équilibré");
}
