#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use sitevault::db::VaultStorage;
use sitevault::router::{AppState, vault_router};
use sitevault::storage::LocalImageStore;
use sitevault::token::TokenKeys;

pub const TEST_SECRET: &str = "route-test-secret";
pub const BOUNDARY: &str = "sitevault-test-boundary";

/// Full application wired against a unique temp database and image root.
pub struct TestBackend {
    pub app: Router,
    pub image_root: PathBuf,
    db_path: PathBuf,
}

pub async fn spawn_backend(tag: &str) -> TestBackend {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "sitevault-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    let mut image_root = std::env::temp_dir();
    image_root.push(format!(
        "sitevault-images-{tag}-{}-{}",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let storage = VaultStorage::connect(&database_url)
        .await
        .expect("failed to open test database");
    storage.init_schema().await.expect("schema init failed");
    let images =
        Arc::new(LocalImageStore::new(image_root.clone()).expect("failed to create image root"));

    let state = AppState::new(storage, images, TokenKeys::new(TEST_SECRET));
    let app = vault_router(state, &image_root);

    TestBackend {
        app,
        image_root,
        db_path,
    }
}

impl TestBackend {
    pub fn cleanup(&self) {
        let _ = fs::remove_file(&self.db_path);
        let _ = fs::remove_dir_all(&self.image_root);
    }

    /// Register a user and return a live session token for them.
    pub async fn register_user(&self, email: &str) -> String {
        let (status, body) = self
            .post_json(
                "/register",
                None,
                json!({
                    "firstname": "Test",
                    "lastname": "User",
                    "email": email,
                    "password": "hunter2!",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {body}");
        body["token"]
            .as_str()
            .expect("registration response missing token")
            .to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json("/login", None, json!({"email": email, "password": password}))
            .await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let request = with_auth(Request::builder().method("POST").uri(uri), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let request = with_auth(Request::builder().method("GET").uri(uri), token)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let request = with_auth(Request::builder().method("DELETE").uri(uri), token)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(request).await
    }

    /// POST or PUT a multipart account form.
    pub async fn send_form(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .expect("failed to build request");
        self.send(request).await
    }

    /// Fetch a raw (non-JSON) resource, e.g. a stored image.
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build request");
        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        (status, bytes.to_vec())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn with_auth(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

/// Hand-rolled multipart encoding; `file` is `(filename, content_type, bytes)`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
