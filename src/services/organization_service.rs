use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::organization::Organization;
use crate::database::repository::Repository;
use crate::query::ResourceQuery;

pub struct OrganizationService {
    pool: PgPool,
    repo: Repository<Organization>,
}

impl OrganizationService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let repo = Repository::new(pool.clone());
        Ok(Self { pool, repo })
    }

    pub async fn list(&self, query: &ResourceQuery) -> Result<Vec<Organization>, DatabaseError> {
        self.repo.select(query).await
    }

    pub async fn count(&self, query: &ResourceQuery) -> Result<i64, DatabaseError> {
        self.repo.count(query).await
    }

    pub async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Organization>, DatabaseError> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    pub async fn create(&self, user_id: Uuid, name: &str) -> Result<Organization, DatabaseError> {
        let organization = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Conditional rename: the owner check is part of the statement, so a
    /// foreign-owned or vanished row yields None rather than a lost update.
    pub async fn update_name(
        &self,
        id: Uuid,
        user_id: Uuid,
        name: &str,
    ) -> Result<Option<Organization>, DatabaseError> {
        let organization = sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET name = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Delete an organization, detaching its customers in the same
    /// transaction. Customers themselves are kept. Returns false when the
    /// organization is absent or owned by someone else.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE customers SET organization_id = NULL, updated_at = now()
             WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let removed = sqlx::query("DELETE FROM organizations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
