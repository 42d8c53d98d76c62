//! 管理后台 HTTP 接口测试
//!
//! 使用内存仓储组装完整路由，通过 oneshot 发送请求，无需外部依赖

use std::sync::Arc;

use axum::{Router, body::Body, http::StatusCode};
use http_body_util::BodyExt;
use loyalty_admin_service::{
    AdminCredentials, AppState,
    auth::{JwtConfig, hash_password_with_cost},
    routes,
};
use async_trait::async_trait;
use loyalty_card::{
    Customer, CustomerFilter, CustomerRepositoryTrait, InMemoryCustomerRepository, NewCustomer,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_USER: &str = "admin";
const ADMIN_PASSWORD: &str = "s3cret-pass";

// ==================== 辅助函数 ====================

/// 每次访问存储前让出执行权，使并发请求在读写之间交错
struct YieldingRepository {
    inner: InMemoryCustomerRepository,
}

#[async_trait]
impl CustomerRepositoryTrait for YieldingRepository {
    async fn insert(&self, customer: NewCustomer) -> loyalty_card::Result<Customer> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::insert(&self.inner, customer).await
    }

    async fn find_by_phone(&self, phone: &str) -> loyalty_card::Result<Option<Customer>> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::find_by_phone(&self.inner, phone).await
    }

    async fn find_by_card_code(&self, card_code: &str) -> loyalty_card::Result<Option<Customer>> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::find_by_card_code(&self.inner, card_code).await
    }

    async fn find_by_phone_or_card_code(&self, term: &str) -> loyalty_card::Result<Option<Customer>> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::find_by_phone_or_card_code(&self.inner, term).await
    }

    async fn increment_points(
        &self,
        card_code: &str,
        ceiling: i32,
    ) -> loyalty_card::Result<Option<Customer>> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::increment_points(&self.inner, card_code, ceiling).await
    }

    async fn set_points(&self, card_code: &str, points: i32) -> loyalty_card::Result<Option<Customer>> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::set_points(&self.inner, card_code, points).await
    }

    async fn reset_points_if(
        &self,
        card_code: &str,
        expected: i32,
    ) -> loyalty_card::Result<Option<Customer>> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::reset_points_if(&self.inner, card_code, expected).await
    }

    async fn list(&self, filter: &CustomerFilter) -> loyalty_card::Result<Vec<Customer>> {
        tokio::task::yield_now().await;
        CustomerRepositoryTrait::list(&self.inner, filter).await
    }
}

fn app() -> Router {
    app_with_repo(Arc::new(InMemoryCustomerRepository::new()))
}

fn app_with_repo(repo: Arc<dyn CustomerRepositoryTrait>) -> Router {
    let jwt_config = JwtConfig {
        secret: "integration-test-secret".to_string(),
        expires_in_secs: 3600,
        issuer: "loyalty-admin".to_string(),
    };
    let admin = AdminCredentials {
        username: ADMIN_USER.to_string(),
        password_hash: hash_password_with_cost(ADMIN_PASSWORD, 4).unwrap(),
    };

    routes::build_app(AppState::new(repo, jwt_config, admin))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/admin/auth/login",
        None,
        Some(json!({ "username": ADMIN_USER, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, token: &str, name: &str, phone: &str, card_code: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/admin/customers",
        Some(token),
        Some(json!({ "name": name, "phone": phone, "cardCode": card_code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

async fn add_points(app: &Router, token: &str, card_code: &str, times: usize) -> Value {
    let mut last = Value::Null;
    for _ in 0..times {
        let (status, body) = send(
            app,
            "POST",
            &format!("/api/admin/customers/{card_code}/points"),
            Some(token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        last = body["data"].clone();
    }
    last
}

// ==================== 健康检查 ====================

#[tokio::test]
async fn test_health_and_ready_are_public() {
    let app = app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["storage"], "memory");
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = app();
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

// ==================== 认证 ====================

#[tokio::test]
async fn test_login_success_and_me() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(&app, "GET", "/api/admin/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], ADMIN_USER);
}

#[tokio::test]
async fn test_login_rejects_wrong_credentials() {
    let app = app();

    for (username, password) in [(ADMIN_USER, "wrong"), ("other", ADMIN_PASSWORD)] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/admin/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/admin/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, "GET", "/api/admin/customers", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(&app, "POST", "/api/admin/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_object().unwrap().contains_key("data"), "{body}");
    assert!(body["data"].is_null());

    let (status, body) = send(&app, "GET", "/api/admin/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_refresh_issues_new_token_and_revokes_old() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(&app, "POST", "/api/admin/auth/refresh", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let refreshed = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(refreshed, token);

    let (status, _) = send(&app, "GET", "/api/admin/auth/me", Some(&refreshed), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/admin/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ==================== 客户登记 ====================

#[tokio::test]
async fn test_register_customer() {
    let app = app();
    let token = login(&app).await;

    let customer = register(&app, &token, "Ana", "555-0101", "ABC123").await;

    assert_eq!(customer["points"], 0);
    assert_eq!(customer["status"], "BUILDING");
    assert_eq!(customer["cardCode"], "ABC123");
    assert_eq!(customer["canRedeem"], false);
}

#[tokio::test]
async fn test_register_generates_card_code_when_blank() {
    let app = app();
    let token = login(&app).await;

    let customer = register(&app, &token, "Ana", "555-0101", "").await;

    let code = customer["cardCode"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_register_duplicates_conflict() {
    let app = app();
    let token = login(&app).await;
    register(&app, &token, "Ana", "111", "ABC").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers",
        Some(&token),
        Some(json!({ "name": "Bia", "phone": "111", "cardCode": "DEF" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_PHONE");

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers",
        Some(&token),
        Some(json!({ "name": "Bia", "phone": "222", "cardCode": "ABC" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_CARD_CODE");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers",
        Some(&token),
        Some(json!({ "name": "", "phone": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers",
        Some(&token),
        Some(json!({ "name": "   ", "phone": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers",
        Some(&token),
        Some(json!({ "phone": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ==================== 加点与兑奖 ====================

#[tokio::test]
async fn test_add_points_up_to_ceiling() {
    let app = app();
    let token = login(&app).await;
    register(&app, &token, "Ana", "111", "ABC").await;

    let customer = add_points(&app, &token, "ABC", 9).await;
    assert_eq!(customer["points"], 9);
    assert_eq!(customer["status"], "ONE_AWAY");

    let customer = add_points(&app, &token, "ABC", 1).await;
    assert_eq!(customer["points"], 10);
    assert_eq!(customer["status"], "ELIGIBLE");
    assert_eq!(customer["canRedeem"], true);
    assert_eq!(customer["canAddPoint"], false);

    let customer = add_points(&app, &token, "ABC", 1).await;
    assert_eq!(customer["points"], 10);
}

#[tokio::test]
async fn test_add_point_unknown_card() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers/NOPE/points",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");
}

#[tokio::test]
async fn test_reward_requires_full_card() {
    let app = app();
    let token = login(&app).await;
    register(&app, &token, "Ana", "111", "ABC").await;
    add_points(&app, &token, "ABC", 7).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers/ABC/reward",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "REWARD_NOT_AVAILABLE");

    let (_, body) = send(&app, "GET", "/api/admin/customers/ABC", Some(&token), None).await;
    assert_eq!(body["data"]["points"], 7);
}

#[tokio::test]
async fn test_reward_resets_full_card() {
    let app = app();
    let token = login(&app).await;
    register(&app, &token, "Ana", "111", "ABC").await;
    add_points(&app, &token, "ABC", 10).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers/ABC/reward",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["points"], 0);
    assert_eq!(body["data"]["status"], "BUILDING");
}

#[tokio::test]
async fn test_reward_unknown_card() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/customers/NOPE/reward",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");
}

#[tokio::test]
async fn test_concurrent_rewards_redeem_once() {
    let app = app_with_repo(Arc::new(YieldingRepository {
        inner: InMemoryCustomerRepository::new(),
    }));
    let token = login(&app).await;
    register(&app, &token, "Ana", "111", "ABC").await;
    add_points(&app, &token, "ABC", 10).await;

    let uri = "/api/admin/customers/ABC/reward";
    let ((first, first_body), (second, second_body)) = tokio::join!(
        send(&app, "POST", uri, Some(&token), None),
        send(&app, "POST", uri, Some(&token), None),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT], "{first_body} {second_body}");

    let rejected = if first == StatusCode::CONFLICT { &first_body } else { &second_body };
    assert_eq!(rejected["code"], "REWARD_NOT_AVAILABLE");

    let (_, body) = send(&app, "GET", "/api/admin/customers/ABC", Some(&token), None).await;
    assert_eq!(body["data"]["points"], 0);
}

// ==================== 查询 ====================

#[tokio::test]
async fn test_search_exact_match_only() {
    let app = app();
    let token = login(&app).await;
    register(&app, &token, "Ana", "555-0101", "ABC").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/customers/search?term=555-0101",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cardCode"], "ABC");

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/customers/search?term=555",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");

    let (status, _) = send(
        &app,
        "GET",
        "/api/admin/customers/search?term=",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_customers_with_filters() {
    let app = app();
    let token = login(&app).await;
    register(&app, &token, "Ana", "111", "C1").await;
    register(&app, &token, "Mariana", "222", "C2").await;
    register(&app, &token, "Joao", "333", "C3").await;
    add_points(&app, &token, "C3", 10).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/customers?name=ANA&phone=&cardCode=&points=",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/customers?points=10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["cardCode"], "C3");

    let (status, body) = send(&app, "GET", "/api/admin/customers", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/customers?points=11",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ==================== 公开查询 ====================

#[tokio::test]
async fn test_public_lookup_hides_private_fields() {
    let app = app();
    let token = login(&app).await;
    register(&app, &token, "Ana", "555-0101", "ABC").await;
    add_points(&app, &token, "ABC", 9).await;

    let (status, body) = send(&app, "GET", "/api/public/points?term=555-0101", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_object().unwrap();
    assert_eq!(data["firstName"], "Ana");
    assert_eq!(data["points"], 9);
    assert_eq!(data["status"], "ONE_AWAY");
    assert!(!data.contains_key("phone"));
    assert!(!data.contains_key("id"));
    assert!(!data.contains_key("cardCode"));
}

#[tokio::test]
async fn test_public_lookup_not_found_and_blank() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/public/points?term=999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body["message"].as_str().unwrap().contains("999"));

    let (status, _) = send(&app, "GET", "/api/public/points?term=%20%20", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
