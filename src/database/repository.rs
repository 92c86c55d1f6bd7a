use serde::Serialize;
use sqlx::{self, postgres::PgArguments, postgres::PgRow, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::query::{BindValue, ResourceQuery};

/// Typed read access for one resource table. Writes carry entity-specific
/// SQL and live in the services.
pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select(&self, query: &ResourceQuery) -> Result<Vec<T>, DatabaseError> {
        let sql = query.to_select_sql();
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in &sql.params {
            q = bind_query_as(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(&self, query: &ResourceQuery) -> Result<Option<T>, DatabaseError> {
        let sql = query.to_select_sql();
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in &sql.params {
            q = bind_query_as(q, p);
        }
        let row = q.fetch_optional(&self.pool).await?;
        Ok(row)
    }

    pub async fn count(&self, query: &ResourceQuery) -> Result<i64, DatabaseError> {
        let sql = query.to_count_sql();
        let mut q = sqlx::query(&sql.query);
        for p in &sql.params {
            q = bind_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn bind_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &BindValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        BindValue::Uuid(u) => q.bind(*u),
        BindValue::Text(s) => q.bind(s.clone()),
        BindValue::Float(f) => q.bind(*f),
        BindValue::Int(i) => q.bind(*i),
        BindValue::Timestamp(t) => q.bind(*t),
    }
}

fn bind_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &BindValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        BindValue::Uuid(u) => q.bind(*u),
        BindValue::Text(s) => q.bind(s.clone()),
        BindValue::Float(f) => q.bind(*f),
        BindValue::Int(i) => q.bind(*i),
        BindValue::Timestamp(t) => q.bind(*t),
    }
}
