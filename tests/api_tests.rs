use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use school_transit_api::config::EnvironmentConfig;
use school_transit_api::create_app;
use school_transit_api::database::Database;
use school_transit_api::state::AppState;

/// Postgres backend with no database behind it
fn unavailable_app() -> Router {
    let state = AppState::new(EnvironmentConfig::default(), Database::unavailable()).unwrap();
    create_app(state)
}

fn memory_app() -> Router {
    create_app(AppState::in_memory(EnvironmentConfig::default()).unwrap())
}

fn guarded_memory_app() -> Router {
    let config = EnvironmentConfig {
        require_auth_for_writes: true,
        ..EnvironmentConfig::default()
    };
    create_app(AppState::in_memory(config).unwrap())
}

struct TestResponse {
    status: StatusCode,
    set_cookies: Vec<String>,
    body: Value,
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookies = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        set_cookies,
        body,
    }
}

/// Log in and return the `Cookie` header a browser would send back
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    response
        .set_cookies
        .iter()
        .map(|c| c.split(';').next().unwrap().to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn complete_route() -> Value {
    json!({
        "number": "404",
        "name": "Hillside Connector",
        "frequency": "Every 25 min",
        "startPoint": "Hillside",
        "endPoint": "Lincoln Elementary",
        "stops": 9
    })
}

#[tokio::test]
async fn health_reports_an_unreachable_database() {
    let app = unavailable_app();
    let response = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "unavailable");
}

#[tokio::test]
async fn routes_list_falls_back_to_demo_data_when_the_store_is_down() {
    let app = unavailable_app();
    let response = send(&app, Method::GET, "/api/routes", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let routes = response.body.as_array().unwrap();
    assert!(!routes.is_empty());
    assert_eq!(routes[0]["number"], "101");
    assert!(routes[0].get("startPoint").is_some());
}

#[tokio::test]
async fn only_the_routes_list_falls_back() {
    let app = unavailable_app();

    let response = send(&app, Method::GET, "/api/alerts", None, None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Failed to load alerts");

    let response = send(&app, Method::GET, "/api/schedules", None, None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Failed to load schedules");

    let response = send(&app, Method::GET, "/api/routes/1", None, None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Failed to load route");
}

#[tokio::test]
async fn deletes_surface_the_store_failure() {
    let app = unavailable_app();

    let response = send(&app, Method::DELETE, "/api/routes/1", None, None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Failed to delete route");

    let response = send(&app, Method::DELETE, "/api/alerts/1", None, None).await;
    assert_eq!(response.body["error"], "Failed to delete alert");

    let response = send(&app, Method::DELETE, "/api/schedules/1", None, None).await;
    assert_eq!(response.body["error"], "Failed to delete schedule");
}

#[tokio::test]
async fn create_route_fails_without_fallback_when_the_store_is_down() {
    let app = unavailable_app();
    let response = send(&app, Method::POST, "/api/routes", Some(complete_route()), None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Failed to create route");
}

#[tokio::test]
async fn create_route_echoes_the_record() {
    let app = memory_app();
    let response = send(&app, Method::POST, "/api/routes", Some(complete_route()), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["number"], "404");
    assert_eq!(response.body["status"], "active");
    assert_eq!(response.body["isAccessible"], false);
    assert_eq!(response.body["isExpress"], false);
    let id = response.body["id"].as_i64().unwrap();

    let fetched = send(&app, Method::GET, &format!("/api/routes/{}", id), None, None).await;
    assert_eq!(fetched.body, response.body);
}

#[tokio::test]
async fn create_route_with_a_missing_field_is_rejected() {
    let app = memory_app();
    for field in ["number", "name", "frequency", "startPoint", "endPoint", "stops"] {
        let mut body = complete_route();
        body.as_object_mut().unwrap().remove(field);

        let response = send(&app, Method::POST, "/api/routes", Some(body), None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "without {}", field);
        assert_eq!(response.body, json!({ "error": "Missing required fields" }));
    }

    let mut blank = complete_route();
    blank["name"] = json!("  ");
    let response = send(&app, Method::POST, "/api/routes", Some(blank), None).await;
    assert_eq!(response.body["error"], "Missing required fields");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/routes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn route_update_merges_and_delete_reports_the_id() {
    let app = memory_app();

    let response = send(
        &app,
        Method::PUT,
        "/api/routes/2",
        Some(json!({ "status": "suspended" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "suspended");
    assert_eq!(response.body["number"], "202");

    let response = send(&app, Method::DELETE, "/api/routes/2", None, None).await;
    assert_eq!(response.body, json!({ "success": true, "id": 2 }));

    let response = send(&app, Method::DELETE, "/api/routes/2", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Route not found");
}

#[tokio::test]
async fn alerts_default_and_filter() {
    let app = memory_app();
    let response = send(
        &app,
        Method::POST,
        "/api/alerts",
        Some(json!({
            "title": "Snow day",
            "description": "All routes suspended",
            "type": "schedule",
            "severity": "high"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "active");
    assert_eq!(response.body["affectedRoutes"], json!([]));
    assert!(response.body["timestamp"].is_string());
    let id = response.body["id"].as_i64().unwrap();

    send(
        &app,
        Method::PUT,
        &format!("/api/alerts/{}", id),
        Some(json!({ "status": "resolved" })),
        None,
    )
    .await;

    let resolved = send(&app, Method::GET, "/api/alerts?status=resolved", None, None).await;
    let resolved = resolved.body.as_array().unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0]["title"], "Snow day");
}

#[tokio::test]
async fn alert_without_severity_is_rejected() {
    let app = memory_app();
    let response = send(
        &app,
        Method::POST,
        "/api/alerts",
        Some(json!({ "title": "t", "description": "d", "type": "delay" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Missing required fields");
}

#[tokio::test]
async fn schedules_validate_time_and_filter_by_day() {
    let app = memory_app();

    let response = send(
        &app,
        Method::POST,
        "/api/schedules",
        Some(json!({
            "time": "quarter past seven",
            "destination": "Lincoln Elementary",
            "route": "101",
            "day": "weekday"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"].is_object());

    let response = send(
        &app,
        Method::POST,
        "/api/schedules",
        Some(json!({
            "time": "08:05",
            "destination": "Lincoln Elementary",
            "route": "101",
            "day": "saturday"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "on-time");

    let saturday = send(&app, Method::GET, "/api/schedules?day=saturday", None, None).await;
    let saturday = saturday.body.as_array().unwrap();
    assert!(saturday.iter().all(|s| s["day"] == "saturday"));
    assert!(saturday.iter().any(|s| s["time"] == "08:05"));
}

#[tokio::test]
async fn login_sets_both_cookies() {
    let app = memory_app();
    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "username": "admin", "password": "123" })),
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["user"]["role"], "admin");
    assert!(response.body["user"].get("passwordHash").is_none());

    assert_eq!(response.set_cookies.len(), 2);
    let token = response
        .set_cookies
        .iter()
        .find(|c| c.starts_with("auth_token="))
        .unwrap();
    assert!(token.contains("HttpOnly"));
    assert!(token.contains("Max-Age=604800"));
    assert!(response.set_cookies.iter().any(|c| c.starts_with("user_id=1;")));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = memory_app();
    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "username": "admin", "password": "wrong" })),
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        json!({ "success": false, "error": "Invalid username or password" })
    );
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn me_and_permissions_follow_the_session() {
    let app = memory_app();
    let response = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "parent", "parent123").await;
    let me = send(&app, Method::GET, "/api/auth/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "parent");
    assert_eq!(me.body["children"], json!(["3"]));

    let permissions = send(&app, Method::GET, "/api/auth/permissions", None, Some(&cookie)).await;
    assert_eq!(permissions.body["role"], "parent");
    assert_eq!(permissions.body["permissions"].as_array().unwrap().len(), 6);

    let check = send(
        &app,
        Method::GET,
        "/api/auth/permissions/manage_routes",
        None,
        Some(&cookie),
    )
    .await;
    assert_eq!(check.body, json!({ "permission": "manage_routes", "allowed": false }));
}

#[tokio::test]
async fn logout_revokes_the_session_and_clears_cookies() {
    let app = memory_app();
    let cookie = login(&app, "admin", "123").await;

    let response = send(&app, Method::POST, "/api/auth/logout", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.set_cookies.len(), 2);
    assert!(response.set_cookies.iter().all(|c| c.contains("Max-Age=0")));

    let me = send(&app, Method::GET, "/api/auth/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_user_id_cookie_is_not_accepted() {
    let app = memory_app();
    let cookie = login(&app, "student", "student123").await;
    let forged = cookie.replace("user_id=3", "user_id=1");

    let me = send(&app, Method::GET, "/api/auth/me", None, Some(&forged)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn children_are_listed_for_parents_and_admins() {
    let app = memory_app();

    let parent = login(&app, "parent", "parent123").await;
    let response = send(&app, Method::GET, "/api/users/2/children", None, Some(&parent)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body[0]["username"], "student");
    assert_eq!(response.body[0]["parentId"], "2");

    let student = login(&app, "student", "student123").await;
    let response = send(&app, Method::GET, "/api/users/2/children", None, Some(&student)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, Method::GET, "/api/users/2/children", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn writes_are_open_by_default() {
    let app = memory_app();
    let response = send(&app, Method::DELETE, "/api/alerts/1", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn guarded_writes_need_the_manage_permission() {
    let app = guarded_memory_app();

    let response = send(&app, Method::POST, "/api/routes", Some(complete_route()), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let parent = login(&app, "parent", "parent123").await;
    let response =
        send(&app, Method::POST, "/api/routes", Some(complete_route()), Some(&parent)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let admin = login(&app, "admin", "123").await;
    let response =
        send(&app, Method::POST, "/api/routes", Some(complete_route()), Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);

    // reads stay open
    let response = send(&app, Method::GET, "/api/routes", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn updates_cannot_blank_required_text() {
    let app = memory_app();

    let response = send(
        &app,
        Method::PUT,
        "/api/routes/1",
        Some(json!({ "frequency": "", "startPoint": "  ", "endPoint": "" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid field values");

    let response = send(
        &app,
        Method::PUT,
        "/api/alerts/1",
        Some(json!({ "description": "" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let route = send(&app, Method::GET, "/api/routes/1", None, None).await;
    assert_ne!(route.body["frequency"], "");
    let alert = send(&app, Method::GET, "/api/alerts/1", None, None).await;
    assert_ne!(alert.body["description"], "");
}

#[tokio::test]
async fn bad_path_and_query_values_use_the_error_body() {
    let app = memory_app();

    let response = send(&app, Method::GET, "/api/routes/abc", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());

    let response = send(&app, Method::GET, "/api/schedules?day=monday", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());

    let response = send(&app, Method::GET, "/api/alerts?status=unknown", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}
