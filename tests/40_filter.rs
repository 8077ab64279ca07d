mod common;

use axum::http::{Method, StatusCode};
use serde_json::Value;

use common::{call, create_expense, register, test_router};

fn amounts(body: &Value) -> Vec<f64> {
    body["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn pages_follow_ceil_of_total_over_limit() {
    let app = test_router();
    let token = register(&app, "ada@example.com").await;
    for day in 1..=25 {
        create_expense(&app, &token, day as f64, "Food", &format!("2024-01-{:02}", day)).await;
    }

    let (status, first) = call(&app, Method::GET, "/api/expenses?page=1&limit=10", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total"], 25);
    assert_eq!(first["totalPages"], 3);
    assert_eq!(first["currentPage"], 1);
    // Newest date first.
    assert_eq!(amounts(&first), (16..=25).rev().map(f64::from).collect::<Vec<_>>());

    let (_, last) = call(&app, Method::GET, "/api/expenses?page=3&limit=10", Some(&token), None).await;
    assert_eq!(amounts(&last), vec![5.0, 4.0, 3.0, 2.0, 1.0]);

    let (status, beyond) = call(&app, Method::GET, "/api/expenses?page=4&limit=10", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(beyond["expenses"].as_array().unwrap().is_empty());
    assert_eq!(beyond["total"], 25);
    assert_eq!(beyond["currentPage"], 4);
}

#[tokio::test]
async fn empty_listing_has_zero_pages() {
    let app = test_router();
    let token = register(&app, "ada@example.com").await;

    let (status, body) = call(&app, Method::GET, "/api/expenses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["currentPage"], 1);
}

#[tokio::test]
async fn category_filter_and_all_sentinel() {
    let app = test_router();
    let token = register(&app, "ada@example.com").await;
    create_expense(&app, &token, 10.0, "Food", "2024-01-01").await;
    create_expense(&app, &token, 20.0, "Transport", "2024-01-02").await;
    create_expense(&app, &token, 30.0, "Food", "2024-01-03").await;

    let (_, food) = call(&app, Method::GET, "/api/expenses?category=Food", Some(&token), None).await;
    assert_eq!(amounts(&food), vec![30.0, 10.0]);

    let (_, all) = call(&app, Method::GET, "/api/expenses?category=all", Some(&token), None).await;
    assert_eq!(all["total"], 3);

    let (_, blank) = call(&app, Method::GET, "/api/expenses?category=", Some(&token), None).await;
    assert_eq!(blank["total"], 3);
}

#[tokio::test]
async fn date_bounds_are_inclusive() {
    let app = test_router();
    let token = register(&app, "ada@example.com").await;
    create_expense(&app, &token, 1.0, "Food", "2024-01-31T00:00:00Z").await;
    create_expense(&app, &token, 2.0, "Food", "2024-02-01T00:00:00Z").await;
    create_expense(&app, &token, 3.0, "Food", "2024-02-15T00:00:00Z").await;
    create_expense(&app, &token, 4.0, "Food", "2024-03-01T00:00:00Z").await;

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/expenses?startDate=2024-02-01&endDate=2024-03-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amounts(&body), vec![4.0, 3.0, 2.0]);

    let (_, open_end) = call(&app, Method::GET, "/api/expenses?startDate=2024-02-15", Some(&token), None).await;
    assert_eq!(amounts(&open_end), vec![4.0, 3.0]);
}

#[tokio::test]
async fn invalid_query_values_are_field_errors() {
    let app = test_router();
    let token = register(&app, "ada@example.com").await;

    for (query, field) in [
        ("page=0", "page"),
        ("page=abc", "page"),
        ("limit=-5", "limit"),
        ("startDate=not-a-date", "startDate"),
    ] {
        let (status, body) = call(&app, Method::GET, &format!("/api/expenses?{}", query), Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        assert!(body["field_errors"][field].is_string(), "query {} -> {}", query, body);
    }
}

#[tokio::test]
async fn limit_is_clamped_to_configured_maximum() {
    let app = test_router();
    let token = register(&app, "ada@example.com").await;
    create_expense(&app, &token, 1.0, "Food", "2024-01-01").await;

    let (status, body) = call(&app, Method::GET, "/api/expenses?limit=100000", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPages"], 1);
}
