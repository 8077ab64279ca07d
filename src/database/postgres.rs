use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::summary::sort_by_total;
use super::models::{
    Category, CategoryTotal, Expense, ExpensePage, ExpensePatch, ExpenseSummary, NewExpense, NewUser, OverallSummary,
    User,
};
use super::repository::{ExpenseRepository, Store, UserRepository};
use crate::filter::{DateRange, ExpenseFilter, Pagination};

const EXPENSE_COLUMNS: &str = "id, user_id, amount, description, category, date, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, categories, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    categories: Json<Vec<Category>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            categories: row.categories.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Appends the owner scope plus optional category and inclusive date bounds.
fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, owner: Uuid, category: Option<&str>, range: &DateRange) {
    qb.push(" WHERE user_id = ").push_bind(owner);
    if let Some(category) = category {
        qb.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(start) = range.start {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = range.end {
        qb.push(" AND date <= ").push_bind(end);
    }
}

#[async_trait]
impl ExpenseRepository for PgStore {
    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, DatabaseError> {
        let sql = format!(
            "INSERT INTO expenses (id, user_id, amount, description, category, date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            EXPENSE_COLUMNS
        );
        let row = sqlx::query_as::<_, Expense>(&sql)
            .bind(Uuid::new_v4())
            .bind(expense.user)
            .bind(expense.amount)
            .bind(&expense.description)
            .bind(&expense.category)
            .bind(expense.date)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_expense(&self, owner: Uuid, id: Uuid) -> Result<Option<Expense>, DatabaseError> {
        let sql = format!("SELECT {} FROM expenses WHERE id = $1 AND user_id = $2", EXPENSE_COLUMNS);
        let row = sqlx::query_as::<_, Expense>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_expense(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, DatabaseError> {
        // Ownership is part of the WHERE clause, so a foreign row is never touched.
        let sql = format!(
            "UPDATE expenses SET \
               amount = COALESCE($3, amount), \
               description = COALESCE($4, description), \
               category = COALESCE($5, category), \
               date = COALESCE($6, date), \
               updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {}",
            EXPENSE_COLUMNS
        );
        let row = sqlx::query_as::<_, Expense>(&sql)
            .bind(id)
            .bind(owner)
            .bind(patch.amount)
            .bind(patch.description)
            .bind(patch.category)
            .bind(patch.date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_expense(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_expenses(
        &self,
        owner: Uuid,
        filter: &ExpenseFilter,
        pagination: &Pagination,
    ) -> Result<ExpensePage, DatabaseError> {
        let mut rows_qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM expenses", EXPENSE_COLUMNS));
        push_scope(&mut rows_qb, owner, filter.category.as_deref(), &filter.range);
        rows_qb
            .push(" ORDER BY date DESC, created_at DESC, id DESC LIMIT ")
            .push_bind(pagination.limit)
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS count FROM expenses");
        push_scope(&mut count_qb, owner, filter.category.as_deref(), &filter.range);

        let (expenses, count_row) = futures::try_join!(
            rows_qb.build_query_as::<Expense>().fetch_all(&self.pool),
            count_qb.build().fetch_one(&self.pool),
        )?;
        let total: i64 = count_row.try_get("count")?;

        Ok(ExpensePage { expenses, total })
    }

    async fn summarize_expenses(&self, owner: Uuid, range: &DateRange) -> Result<ExpenseSummary, DatabaseError> {
        let mut overall_qb =
            QueryBuilder::<Postgres>::new("SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count FROM expenses");
        push_scope(&mut overall_qb, owner, None, range);

        let mut category_qb =
            QueryBuilder::<Postgres>::new("SELECT category, SUM(amount) AS total, COUNT(*) AS count FROM expenses");
        push_scope(&mut category_qb, owner, None, range);
        category_qb.push(" GROUP BY category");

        let (overall_row, mut by_category) = futures::try_join!(
            overall_qb.build().fetch_one(&self.pool),
            category_qb.build_query_as::<CategoryTotal>().fetch_all(&self.pool),
        )?;

        let total: Decimal = overall_row.try_get("total")?;
        let count: i64 = overall_row.try_get("count")?;
        sort_by_total(&mut by_category);

        Ok(ExpenseSummary {
            overall: OverallSummary::from_totals(total, count),
            by_category,
        })
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DatabaseError::Conflict(format!("email {} already registered", user.email)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn replace_categories(&self, id: Uuid, categories: Vec<Category>) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET categories = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(Json(categories))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
