//! HTTP surface driven in-process with a stubbed contract service.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use keynua_gateway::{
    app::build_router,
    error::{GatewayError, UpstreamError},
    models::{ApiResponse, Contract, ContractRequest},
    services::ContractService,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct StubContracts {
    fail: bool,
    received: Mutex<Vec<ContractRequest>>,
}

fn contract(id: &str) -> Contract {
    serde_json::from_value(json!({
        "id": id,
        "accountId": "acc_123",
        "sentBy": "api@example.com",
        "templateId": "keynua-peru-default",
        "createdAt": "2025-11-01T15:00:00Z",
        "startedAt": null,
        "title": "Service Contract",
        "description": null,
        "language": "es",
        "timezone": "America/Lima",
        "metadata": {},
        "reference": null,
        "shortCode": "12345",
        "expirationInHours": 24,
        "expired": false,
        "itemsCount": 1,
        "status": "pending_input"
    }))
    .unwrap()
}

fn upstream_failure() -> UpstreamError {
    UpstreamError::Transport {
        status: Some(503),
        message: "Request failed with status code 503".to_string(),
        body: Some(json!({ "message": "maintenance window" })),
        source: None,
    }
}

#[async_trait]
impl ContractService for StubContracts {
    async fn create(
        &self,
        request: &ContractRequest,
    ) -> Result<ApiResponse<Contract>, GatewayError> {
        self.received.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(GatewayError::new(
                "Error creating contract in Keynua",
                upstream_failure(),
            ));
        }
        Ok(ApiResponse::new(contract("ctr_new"), "Contract created successfully", 201))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<ApiResponse<Contract>, GatewayError> {
        if self.fail {
            return Err(GatewayError::new(
                "Error finding contract in Keynua",
                upstream_failure(),
            ));
        }
        Ok(ApiResponse::new(contract(id), "Contract found successfully", 200))
    }
}

fn app(stub: Arc<StubContracts>) -> Router {
    build_router(stub, Some("http://localhost:3000"))
}

fn valid_body() -> Value {
    json!({
        "title": "Service Contract",
        "templateId": "keynua-peru-default",
        "chosenNotificationOptions": ["email"],
        "documents": [{ "name": "contract.pdf", "base64": "data:application/pdf;base64,JVBERi0x" }],
        "users": [{ "name": "Javier Rojas", "phone": "+51987654321", "groups": ["signers"] }]
    })
}

fn post_create(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api-v1/contracts/create")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_returns_201_with_outcome() {
    let stub = Arc::new(StubContracts::default());
    let response = app(stub.clone())
        .oneshot(post_create(valid_body().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get("x-robots-tag").unwrap(),
        "noindex, nofollow"
    );

    let body = json_body(response).await;
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["message"], "Contract created successfully");
    assert_eq!(body["data"]["id"], "ctr_new");
    assert_eq!(body["data"]["status"], "pending_input");

    // The handler forwards the request untouched; normalization is the gateway's job.
    let received = stub.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0].documents[0].base64.as_deref(),
        Some("data:application/pdf;base64,JVBERi0x")
    );
}

#[tokio::test]
async fn create_rejects_invalid_requests_before_calling_keynua() {
    let stub = Arc::new(StubContracts::default());
    let mut body = valid_body();
    body["title"] = json!("");
    body["users"] = json!([]);

    let response = app(stub.clone())
        .oneshot(post_create(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["statusCode"], 422);
    assert_eq!(body["error"], "Unprocessable Entity");
    assert_eq!(
        body["message"],
        json!(["title should not be empty", "users should not be empty"])
    );
    assert!(stub.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let stub = Arc::new(StubContracts::default());
    let mut body = valid_body();
    body["language"] = json!("fr");

    let response = app(stub.clone())
        .oneshot(post_create(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(stub.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn gateway_failures_surface_as_opaque_500() {
    let stub = Arc::new(StubContracts {
        fail: true,
        ..Default::default()
    });

    let response = app(stub)
        .oneshot(post_create(valid_body().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["message"], "Error creating contract in Keynua");
    assert_eq!(body["error"], "Internal Server Error");
    assert!(!body.to_string().contains("maintenance window"));
    assert!(!body.to_string().contains("503"));
}

#[tokio::test]
async fn find_returns_200_with_outcome() {
    let stub = Arc::new(StubContracts::default());
    let response = app(stub)
        .oneshot(
            Request::builder()
                .uri("/api-v1/contracts/ctr_42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "Contract found successfully");
    assert_eq!(body["data"]["id"], "ctr_42");
}

#[tokio::test]
async fn find_failure_uses_the_lookup_message() {
    let stub = Arc::new(StubContracts {
        fail: true,
        ..Default::default()
    });
    let response = app(stub)
        .oneshot(
            Request::builder()
                .uri("/api-v1/contracts/ctr_42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["message"],
        "Error finding contract in Keynua"
    );
}

#[tokio::test]
async fn health_does_not_touch_keynua() {
    let stub = Arc::new(StubContracts {
        fail: true,
        ..Default::default()
    });
    let response = app(stub)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn cors_preflight_allows_the_configured_origin() {
    let stub = Arc::new(StubContracts::default());
    let response = app(stub)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api-v1/contracts/create")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn wildcard_origin_is_ignored_instead_of_allowed() {
    let stub = Arc::new(StubContracts::default());
    let response = build_router(stub, Some("*"))
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api-v1/contracts/create")
                .header("origin", "https://anywhere.example")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}
