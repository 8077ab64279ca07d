mod common;

use anyhow::Result;
use rust_decimal::Decimal;

use common::TestServer;
use expense_api::client::{
    ApiClient, CategoryManager, ClientError, ExpenseFilters, ExpenseInput, ExpenseState, ExpenseUpdate,
};
use expense_api::filter::parse_timestamp;

fn input(amount: i64, category: &str, date: &str) -> ExpenseInput {
    ExpenseInput {
        amount: Decimal::from(amount),
        description: format!("{} spend", category),
        category: category.to_string(),
        date: parse_timestamp(date),
    }
}

#[tokio::test]
async fn expense_state_round_trip_against_running_server() -> Result<()> {
    let server = TestServer::start().await?;
    let anonymous = ApiClient::new(&server.base_url)?;

    let health = anonymous.health().await?;
    assert_eq!(health["store"], "memory");

    let auth = anonymous.register("Ada", "ada@example.com", "secret-pass").await?;
    let mut state = ExpenseState::new(anonymous.clone().with_token(auth.token));

    state.fetch_expenses(1, ExpenseFilters::default()).await?;
    assert!(state.expenses().is_empty());
    assert_eq!(state.total_pages(), 0);

    for (amount, day) in [(10, 1), (20, 2), (30, 3)] {
        let banner = state.add_expense(&input(amount, "Food", &format!("2024-04-0{}", day))).await;
        assert!(banner.success, "{}", banner.message);
    }
    let banner = state.add_expense(&input(5, "Transport", "2024-04-04")).await;
    assert!(banner.success);

    // Each mutation re-fetched the current page.
    assert_eq!(state.total(), 4);
    assert_eq!(state.expenses()[0].category, "Transport");

    state
        .fetch_expenses(
            1,
            ExpenseFilters {
                category: Some("Food".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(state.total(), 3);

    let newest_food = state.expenses()[0].id;
    let banner = state
        .update_expense(
            newest_food,
            &ExpenseUpdate {
                amount: Some(Decimal::from(35)),
                ..Default::default()
            },
        )
        .await;
    assert!(banner.success);
    assert_eq!(state.expenses()[0].amount, Decimal::from(35));
    // Filters survive the refresh.
    assert!(state.expenses().iter().all(|e| e.category == "Food"));

    let summary = state.expense_summary(None, None).await?;
    assert_eq!(summary.overall.total_expenses, Decimal::from(70));
    assert_eq!(summary.by_category[0].category, "Food");

    let banner = state.delete_expense(newest_food).await;
    assert!(banner.success);
    assert_eq!(state.total(), 2);

    let banner = state.delete_expense(newest_food).await;
    assert!(!banner.success);
    assert_eq!(banner.message, "Expense not found");

    Ok(())
}

#[tokio::test]
async fn failed_fetch_keeps_previous_page() -> Result<()> {
    let server = TestServer::start().await?;
    let client = ApiClient::new(&server.base_url)?;
    let auth = client.register("Ada", "ada@example.com", "secret-pass").await?;
    let mut state = ExpenseState::new(client.with_token(auth.token));

    assert!(state.add_expense(&input(12, "Food", "2024-04-01")).await.success);
    assert_eq!(state.expenses().len(), 1);

    let err = state
        .fetch_expenses(
            1,
            ExpenseFilters {
                start_date: Some("garbage".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { ref field_errors, .. } if field_errors.contains_key("startDate")));
    assert_eq!(state.expenses().len(), 1);
    assert!(state.error().is_some());
    assert!(state.filters().start_date.is_none());

    state.refresh().await?;
    assert!(state.error().is_none());
    Ok(())
}

#[tokio::test]
async fn category_manager_updates_after_server_accepts() -> Result<()> {
    let server = TestServer::start().await?;
    let anonymous = ApiClient::new(&server.base_url)?;
    let auth = anonymous.register("Ada", "ada@example.com", "secret-pass").await?;
    let client = anonymous.with_token(auth.token);

    let mut manager = CategoryManager::new(auth.user.categories);
    assert_eq!(manager.effective().len(), 7);

    manager.add_category(&client, "Rent", Some("#111111")).await?;
    manager.add_category(&client, "Pets", None).await?;
    assert_eq!(manager.categories().len(), 2);
    assert_eq!(manager.color_for("Pets"), "#007bff");

    let removed = manager.remove_category(&client, 0).await?;
    assert_eq!(removed.name, "Rent");

    let user = client.me().await?;
    assert_eq!(user.categories, manager.categories());

    // Expenses keep category names that are no longer in the list.
    let expense = client.create_expense(&input(40, "Rent", "2024-04-01")).await?;
    assert_eq!(client.get_expense(expense.id).await?.category, "Rent");
    Ok(())
}

#[tokio::test]
async fn unauthenticated_client_gets_401() -> Result<()> {
    let server = TestServer::start().await?;
    let client = ApiClient::new(&server.base_url)?;

    let err = client.list_expenses(1, 10, &ExpenseFilters::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
    Ok(())
}
