use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::customer::Customer;
use crate::database::repository::Repository;
use crate::query::ResourceQuery;

pub struct CustomerService {
    pool: PgPool,
    repo: Repository<Customer>,
}

impl CustomerService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let repo = Repository::new(pool.clone());
        Ok(Self { pool, repo })
    }

    pub async fn list(&self, query: &ResourceQuery) -> Result<Vec<Customer>, DatabaseError> {
        self.repo.select(query).await
    }

    pub async fn count(&self, query: &ResourceQuery) -> Result<i64, DatabaseError> {
        self.repo.count(query).await
    }

    pub async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Customer>, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        organization_id: Option<Uuid>,
    ) -> Result<Customer, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (name, user_id, organization_id)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(name)
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Conditional partial update; absent fields keep their current value.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        name: Option<&str>,
        organization_id: Option<Uuid>,
    ) -> Result<Option<Customer>, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(
            "UPDATE customers SET
                 name = COALESCE($3, name),
                 organization_id = COALESCE($4, organization_id),
                 updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Delete a customer and every expense referencing it, atomically.
    /// Returns the number of expenses removed, or None when the customer is
    /// absent or owned by someone else (nothing is deleted in that case).
    pub async fn delete_cascade(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<u64>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let deleted_expenses =
            sqlx::query("DELETE FROM expenses WHERE customer_id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        let removed = sqlx::query("DELETE FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(deleted_expenses))
    }
}
