use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::expense::Expense;
use crate::database::repository::Repository;
use crate::query::ResourceQuery;

pub struct ExpenseService {
    pool: PgPool,
    repo: Repository<Expense>,
}

impl ExpenseService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let repo = Repository::new(pool.clone());
        Ok(Self { pool, repo })
    }

    pub async fn list(&self, query: &ResourceQuery) -> Result<Vec<Expense>, DatabaseError> {
        self.repo.select(query).await
    }

    pub async fn count(&self, query: &ResourceQuery) -> Result<i64, DatabaseError> {
        self.repo.count(query).await
    }

    pub async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Expense>, DatabaseError> {
        let expense =
            sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(expense)
    }

    /// All of one customer's expenses, newest first.
    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Expense>, DatabaseError> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses
             WHERE customer_id = $1 AND user_id = $2
             ORDER BY date DESC",
        )
        .bind(customer_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        item: &str,
        description: Option<&str>,
        amount: f64,
        date: Option<DateTime<Utc>>,
        customer_id: Option<Uuid>,
    ) -> Result<Expense, DatabaseError> {
        let expense = sqlx::query_as::<_, Expense>(
            "INSERT INTO expenses (item, description, amount, date, user_id, customer_id)
             VALUES ($1, $2, $3, COALESCE($4, now()), $5, $6)
             RETURNING *",
        )
        .bind(item)
        .bind(description)
        .bind(amount)
        .bind(date)
        .bind(user_id)
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Conditional partial update; absent fields keep their current value.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        item: Option<&str>,
        description: Option<&str>,
        amount: Option<f64>,
        date: Option<DateTime<Utc>>,
        customer_id: Option<Uuid>,
    ) -> Result<Option<Expense>, DatabaseError> {
        let expense = sqlx::query_as::<_, Expense>(
            "UPDATE expenses SET
                 item = COALESCE($3, item),
                 description = COALESCE($4, description),
                 amount = COALESCE($5, amount),
                 date = COALESCE($6, date),
                 customer_id = COALESCE($7, customer_id),
                 updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(item)
        .bind(description)
        .bind(amount)
        .bind(date)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Conditional delete; false when nothing matched the id + owner pair.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let removed = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(removed > 0)
    }
}
