//! Store behavior against a real Postgres database.
//!
//! Runs only when `DATABASE_URL` is set, e.g.
//! `DATABASE_URL=postgres://postgres@localhost/expense_test cargo test --test 60_postgres`.
//! Every test registers fresh users, so the database does not need to be empty.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::Router;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{call, create_expense, register};
use expense_api::config::{AppConfig, StoreBackend};
use expense_api::database::models::{NewExpense, NewUser};
use expense_api::database::{DatabaseError, DatabaseManager, Store};
use expense_api::{app, AppState};

async fn pg_store() -> Option<(AppConfig, Arc<dyn Store>)> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };

    let mut config = AppConfig::development();
    config.store.backend = StoreBackend::Postgres;
    config.database.url = Some(url);
    config.database.run_migrations = true;

    let store = DatabaseManager::open(&config).await.expect("failed to open Postgres store");
    assert_eq!(store.backend(), "postgres");
    Some((config, store))
}

async fn pg_router() -> Option<Router> {
    let (config, store) = pg_store().await?;
    Some(app(AppState::new(config, store)))
}

fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

fn amounts(body: &Value) -> Vec<f64> {
    body["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn crud_round_trip_with_partial_update_and_ownership() {
    let Some(app) = pg_router().await else { return };
    let ada = register(&app, &unique_email()).await;
    let bob = register(&app, &unique_email()).await;

    let created = create_expense(&app, &ada, 12.5, "Food", "2024-03-10T12:00:00Z").await;
    let uri = format!("/api/expenses/{}", created["_id"].as_str().unwrap());

    let (status, fetched) = call(&app, Method::GET, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["amount"].as_f64(), Some(12.5));
    assert_eq!(fetched["category"], "Food");
    assert_eq!(fetched["date"], created["date"]);

    // Only the amount changes, the COALESCE keeps the rest.
    let (status, updated) = call(&app, Method::PUT, &uri, Some(&ada), Some(json!({"amount": 20}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"].as_f64(), Some(20.0));
    assert_eq!(updated["description"], created["description"]);
    assert_eq!(updated["category"], "Food");
    assert_eq!(updated["date"], created["date"]);

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let body = (method == Method::PUT).then(|| json!({"amount": 1}));
        let (status, response) = call(&app, method.clone(), &uri, Some(&bob), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} as other user", method);
        assert_eq!(response["message"], "Expense not found");
    }

    let (_, still_there) = call(&app, Method::GET, &uri, Some(&ada), None).await;
    assert_eq!(still_there["amount"].as_f64(), Some(20.0));

    let (status, removed) = call(&app, Method::DELETE, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["message"], "Expense removed");
    let (status, _) = call(&app, Method::GET, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn paging_and_filters_run_in_sql() {
    let Some(app) = pg_router().await else { return };
    let token = register(&app, &unique_email()).await;
    for day in 1..=25 {
        let category = if day % 5 == 0 { "Transport" } else { "Food" };
        create_expense(&app, &token, day as f64, category, &format!("2024-01-{:02}", day)).await;
    }

    let (status, first) = call(&app, Method::GET, "/api/expenses?page=1&limit=10", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total"], 25);
    assert_eq!(first["totalPages"], 3);
    assert_eq!(amounts(&first), (16..=25).rev().map(f64::from).collect::<Vec<_>>());

    let (_, last) = call(&app, Method::GET, "/api/expenses?page=3&limit=10", Some(&token), None).await;
    assert_eq!(amounts(&last), vec![5.0, 4.0, 3.0, 2.0, 1.0]);

    let (_, beyond) = call(&app, Method::GET, "/api/expenses?page=4&limit=10", Some(&token), None).await;
    assert!(beyond["expenses"].as_array().unwrap().is_empty());
    assert_eq!(beyond["total"], 25);

    let (_, transport) = call(&app, Method::GET, "/api/expenses?category=Transport", Some(&token), None).await;
    assert_eq!(amounts(&transport), vec![25.0, 20.0, 15.0, 10.0, 5.0]);

    let (_, window) = call(
        &app,
        Method::GET,
        "/api/expenses?startDate=2024-01-10&endDate=2024-01-12",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(amounts(&window), vec![12.0, 11.0, 10.0]);
}

#[tokio::test]
async fn summary_groups_and_sorts_in_sql() {
    let Some(app) = pg_router().await else { return };
    let token = register(&app, &unique_email()).await;

    let (_, empty) = call(&app, Method::GET, "/api/expenses/summary/stats", Some(&token), None).await;
    assert_eq!(empty["overall"]["count"], 0);
    assert_eq!(empty["overall"]["totalExpenses"].as_f64(), Some(0.0));
    assert_eq!(empty["byCategory"], json!([]));

    for amount in [10.0, 20.0, 30.0] {
        create_expense(&app, &token, amount, "Food", "2024-05-01").await;
    }
    create_expense(&app, &token, 5.0, "Transport", "2024-05-02").await;
    create_expense(&app, &token, 5.0, "Books", "2024-05-03").await;

    let (status, body) = call(&app, Method::GET, "/api/expenses/summary/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"]["totalExpenses"].as_f64(), Some(70.0));
    assert_eq!(body["overall"]["averageExpense"].as_f64(), Some(14.0));
    assert_eq!(body["overall"]["count"], 5);

    let order: Vec<&str> = body["byCategory"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["_id"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["Food", "Books", "Transport"]);
    assert_eq!(body["byCategory"][0]["total"].as_f64(), Some(60.0));
    assert_eq!(body["byCategory"][0]["count"], 3);

    let (_, ranged) = call(
        &app,
        Method::GET,
        "/api/expenses/summary/stats?startDate=2024-05-02&endDate=2024-05-03",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(ranged["overall"]["count"], 2);
    assert_eq!(ranged["overall"]["totalExpenses"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict_at_the_store() {
    let Some((_, store)) = pg_store().await else { return };
    let email = unique_email();
    let new_user = || NewUser {
        name: "Ada".to_string(),
        email: email.clone(),
        password_hash: "not-a-real-hash".to_string(),
    };

    store.insert_user(new_user()).await.unwrap();
    let err = store.insert_user(new_user()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "{:?}", err);
}

#[tokio::test]
async fn amount_ceiling_is_enforced_by_the_table() {
    let Some((_, store)) = pg_store().await else { return };
    let user = store
        .insert_user(NewUser {
            name: "Ada".to_string(),
            email: unique_email(),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .unwrap();

    let expense = |amount: Decimal| NewExpense {
        user: user.id,
        amount,
        description: "Island".to_string(),
        category: "Other".to_string(),
        date: Utc::now(),
    };

    store
        .insert_expense(expense(Decimal::new(99_999_999_999_999, 2)))
        .await
        .unwrap();
    assert!(store.insert_expense(expense(Decimal::from(1_000_000_000_000i64))).await.is_err());
}

#[tokio::test]
async fn health_reports_postgres() {
    let Some(app) = pg_router().await else { return };
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "postgres");
}
