//! End-to-end tests for the `/contacts` resource through the full router

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use contact_service::config::{Config, JwtConfig};
use contact_service::prelude::*;
use contact_service::repository::RepositoryResult;

const SECRET: &[u8] = b"contacts-integration-secret";

async fn app_over(repository: Arc<dyn ContactRepository>, config: Config) -> Router {
    let auth = JwtAuth::from_key(
        SECRET,
        &JwtConfig {
            key_path: PathBuf::from("unused"),
            algorithm: "HS256".into(),
            issuer: None,
            audience: None,
        },
    )
    .unwrap();

    let state = AppState::builder()
        .config(config.clone())
        .auth(auth)
        .repository(repository)
        .build()
        .await
        .unwrap();

    Server::new(config).with_middleware(router(state))
}

async fn app_with(config: Config) -> Router {
    app_over(Arc::new(InMemoryContactRepository::new()), config).await
}

async fn app() -> Router {
    app_with(Config::default()).await
}

fn bearer() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "user:100".into(),
        name: Some("demo".into()),
        exp: now + 3600,
        iat: Some(now),
        iss: None,
        aud: None,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
    format!("Bearer {token}")
}

fn request(method: Method, uri: &str, body: Option<&str>, auth: bool) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if auth {
        builder = builder.header(header::AUTHORIZATION, bearer());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn create(app: &Router, name: &str) -> Value {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/contacts",
            Some(&json!({ "name": name }).to_string()),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn crud_lifecycle() {
    let app = app().await;

    let created = create(&app, "test").await;
    assert_eq!(created["name"], "test");
    assert_eq!(created["created_at"], created["updated_at"]);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("contact_"));

    let (status, body) = send(&app, request(Method::GET, "/contacts", None, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["id"], id.as_str());

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/contacts/{id}"), None, false),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/contacts/{id}"),
            Some(r#"{"name":"contactxyz"}"#),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "contactxyz");
    assert_eq!(body["created_at"], created["created_at"]);

    let (status, body) = send(
        &app,
        request(Method::DELETE, &format!("/contacts/{id}"), None, true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "contactxyz");

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/contacts/{id}"), None, false),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(
        &app,
        request(Method::DELETE, &format!("/contacts/{id}"), None, true),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_sets_location_header() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/contacts",
            Some(r#"{"name":"loc"}"#),
            true,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/contacts/contact_"));
}

#[tokio::test]
async fn mutating_routes_require_auth() {
    let app = app().await;
    let id = create(&app, "guarded").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let path = format!("/contacts/{id}");

    let cases = [
        request(Method::POST, "/contacts", Some(r#"{"name":"x"}"#), false),
        request(Method::PUT, &path, Some(r#"{"name":"x"}"#), false),
        request(Method::DELETE, &path, None, false),
    ];
    for req in cases {
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    let (status, _) = send(&app, request(Method::GET, &path, None, false)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let app = app().await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/contacts")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"x"}"#))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/contacts", Some(r#""name":"test"}"#), true),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");

    let id = create(&app, "test").await["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        request(Method::PUT, &format!("/contacts/{id}"), Some("{"), true),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validation_failures_are_unprocessable() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/contacts", Some(r#"{"name":""}"#), true),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"]["name"][0]["code"], "REQUIRED");

    let too_long = json!({ "name": "a".repeat(129) }).to_string();
    let (status, body) = send(
        &app,
        request(Method::POST, "/contacts", Some(&too_long), true),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["name"][0]["code"], "TOO_LONG");

    let (_, list) = send(&app, request(Method::GET, "/contacts", None, false)).await;
    assert_eq!(list["total_count"], 0);
}

#[tokio::test]
async fn update_missing_contact_is_not_found() {
    let app = app().await;
    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/contacts/contact_01h455vb4pex5vsknk084sn02q",
            Some(r#"{"name":"ghost"}"#),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_paginates() {
    let mut config = Config::default();
    config.pagination.default_page_size = 2;
    config.pagination.max_page_size = 3;
    let app = app_with(config).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let created = create(&app, &format!("c{i}")).await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    ids.sort();

    let (_, body) = send(&app, request(Method::GET, "/contacts", None, false)).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["total_count"], 5);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["items"][0]["id"], ids[0].as_str());

    let (_, body) = send(
        &app,
        request(Method::GET, "/contacts?page=2&per_page=2", None, false),
    )
    .await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["items"][0]["id"], ids[2].as_str());

    let (_, body) = send(
        &app,
        request(Method::GET, "/contacts?page=9&page_size=50", None, false),
    )
    .await;
    assert_eq!(body["page_size"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        request(Method::GET, "/contacts?page=abc", None, false),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);

    let (status, body) = send(
        &app,
        request(Method::GET, "/contacts?page=1&page=2", None, false),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"][0]["id"], ids[0].as_str());

    let (status, body) = send(
        &app,
        request(Method::GET, "/contacts?page_size=2&per_page=3", None, false),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["total_pages"], 3);
}

#[tokio::test]
async fn probes_are_public() {
    let app = app().await;

    let (status, body) = send(&app, request(Method::GET, "/health", None, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, request(Method::GET, "/ready", None, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(request(Method::GET, "/health", None, false))
        .await
        .unwrap();

    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(id.starts_with("req_"));
}

/// Store whose backend is unreachable
struct UnreachableRepository;

impl UnreachableRepository {
    fn error(operation: RepositoryOperation) -> RepositoryError {
        RepositoryError::new(
            operation,
            RepositoryErrorKind::ConnectionFailed,
            "connection refused (os error 111)",
        )
    }
}

#[async_trait]
impl ContactRepository for UnreachableRepository {
    async fn get(&self, _id: &str) -> RepositoryResult<Contact> {
        Err(Self::error(RepositoryOperation::Get))
    }
    async fn count(&self) -> RepositoryResult<u64> {
        Err(Self::error(RepositoryOperation::Count))
    }
    async fn query(&self, _offset: u64, _limit: u64) -> RepositoryResult<Vec<Contact>> {
        Err(Self::error(RepositoryOperation::Query))
    }
    async fn create(&self, _contact: &Contact) -> RepositoryResult<()> {
        Err(Self::error(RepositoryOperation::Create))
    }
    async fn update(&self, _contact: &Contact) -> RepositoryResult<()> {
        Err(Self::error(RepositoryOperation::Update))
    }
    async fn delete(&self, _id: &str) -> RepositoryResult<()> {
        Err(Self::error(RepositoryOperation::Delete))
    }
}

#[tokio::test]
async fn storage_failures_are_internal_errors() {
    let app = app_over(Arc::new(UnreachableRepository), Config::default()).await;

    let cases = [
        request(Method::GET, "/contacts/contact_x", None, false),
        request(Method::GET, "/contacts", None, false),
        request(Method::POST, "/contacts", Some(r#"{"name":"x"}"#), true),
        request(Method::DELETE, "/contacts/contact_x", None, true),
    ];
    for req in cases {
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("connection refused"));
    }
}
