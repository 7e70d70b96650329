//! HTTP surface of the recipe proxy, driven through the router.

mod helpers;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use helpers::{Failure, FakeSource, structured_recipe, text_recipe};
use recipe_proxy::recipes::CacheSettings;
use recipe_proxy::state::AppState;
use recipe_proxy::web::create_router;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn setup() -> (Arc<FakeSource>, Router) {
    let source = Arc::new(FakeSource::with_catalog(vec![
        text_recipe(716429, "Chicken Fried Rice"),
        structured_recipe(638420, "Soft Scrambled Eggs"),
    ]));
    let state = AppState::new(source.clone(), CacheSettings::default());
    (source, create_router(state, None))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(router: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_healthy() {
    let (_, router) = setup();
    let (status, body) = get(&router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn popular_returns_normalized_recipes() {
    let (source, router) = setup();

    let (status, body) = get(&router, "/api/recipes/popular").await;
    assert_eq!(status, StatusCode::OK);

    let recipes = body.as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["id"], 716429);
    assert_eq!(recipes[0]["readyInMinutes"], 30);
    assert_eq!(
        recipes[0]["instructions"][1],
        json!({"number": 2, "step": "Brown the chicken."})
    );
    assert_eq!(recipes[1]["instructions"][0]["step"], "Whisk eggs.");

    get(&router, "/api/recipes/popular").await;
    assert_eq!(source.calls.random(), 1);
}

#[tokio::test]
async fn popular_without_cache_and_upstream_down_is_bad_gateway() {
    let (source, router) = setup();
    source.fail_with(Failure::Unavailable);

    let (status, body) = get(&router, "/api/recipes/popular").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn detail_responses_are_byte_identical_from_cache() {
    let (source, router) = setup();

    let request = || {
        Request::get("/api/recipes/716429")
            .body(Body::empty())
            .unwrap()
    };
    let (first_status, first) = send(&router, request()).await;
    let (second_status, second) = send(&router, request()).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(source.calls.detail(), 1);
}

#[tokio::test]
async fn detail_errors_map_to_statuses() {
    let (source, router) = setup();

    let (status, body) = get(&router, "/api/recipes/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = get(&router, "/api/recipes/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    source.fail_with(Failure::Rejected(402));
    let (status, body) = get(&router, "/api/recipes/638420").await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "UPSTREAM_REJECTED");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("daily points limit")
    );
}

#[tokio::test]
async fn search_passes_filters_and_returns_recipes() {
    let (source, router) = setup();

    let (status, body) = post_json(
        &router,
        "/api/recipes/search",
        r#"{"ingredients": ["chicken", "rice"], "diet": "", "cuisine": "chinese", "intolerances": "gluten", "type": "main course", "maxReadyTime": "45"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["usedIngredientCount"], 2);

    let query = source.last_query().unwrap();
    assert_eq!(query.include_ingredients, ["chicken", "rice"]);
    assert_eq!(query.diet, None);
    assert_eq!(query.cuisine.as_deref(), Some("chinese"));
    assert_eq!(query.meal_type.as_deref(), Some("main course"));
    assert_eq!(query.max_ready_time, Some(45));
}

#[tokio::test]
async fn search_rejects_bad_bodies_as_json_errors() {
    let (source, router) = setup();

    for body in [r#"{"ingredients": []}"#, r#"{"diet": "vegan"}"#, "not json"] {
        let (status, response) = post_json(&router, "/api/recipes/search", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["code"], "VALIDATION_ERROR", "{body}");
        assert!(response["error"].is_string(), "{body}");
    }
    assert_eq!(source.calls.search(), 0);
}

#[tokio::test]
async fn quota_reports_counters_uncached() {
    let (source, router) = setup();

    let request = Request::get("/api/recipes/quota").body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

    let (_, body) = get(&router, "/api/recipes/quota").await;
    assert_eq!(body, json!({"used": "12.5", "remaining": "137.5"}));
    assert_eq!(source.calls.quota(), 2);
}

#[tokio::test]
async fn status_reports_cache_contents() {
    let (_, router) = setup();

    post_json(&router, "/api/recipes/search", r#"{"ingredients": ["egg"]}"#).await;
    let (status, body) = get(&router, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache"]["cachedRecipes"], 2);
    assert_eq!(body["cache"]["popularCached"], false);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (_, router) = setup();

    let request = Request::get("/api/health")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me");
}
