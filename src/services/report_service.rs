use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::query::dates::DateFilter;

/// Aggregate reporting over a user's expenses. Sums are best-effort `f64`
/// reporting totals, not ledger balances.
pub struct ReportService {
    pool: PgPool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyTotal {
    pub day: String,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportPeriod {
    /// A `[now - days, now]` window. `now` is injected by the caller so the
    /// window is reproducible under test.
    pub fn lookback(days: i64, now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }
}

impl ReportService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Sum of all matching expenses; zero when nothing matches.
    pub async fn total(
        &self,
        user_id: Uuid,
        filter: Option<&DateFilter>,
    ) -> Result<f64, DatabaseError> {
        let (start, end_exclusive) = match filter {
            Some(f) => f.bounds(),
            None => (None, None),
        };

        let mut sql =
            String::from("SELECT COALESCE(SUM(amount), 0) AS total FROM expenses WHERE user_id = $1");
        let mut next_param = 2;
        if start.is_some() {
            sql.push_str(&format!(" AND date >= ${}", next_param));
            next_param += 1;
        }
        if end_exclusive.is_some() {
            sql.push_str(&format!(" AND date < ${}", next_param));
        }

        let mut q = sqlx::query_scalar::<_, f64>(&sql).bind(user_id);
        if let Some(start) = start {
            q = q.bind(start);
        }
        if let Some(end) = end_exclusive {
            q = q.bind(end);
        }

        let total = q.fetch_one(&self.pool).await?;
        Ok(total)
    }

    /// Per-day totals over a period, ascending by calendar day.
    pub async fn daily_totals(
        &self,
        user_id: Uuid,
        period: &ReportPeriod,
    ) -> Result<Vec<DailyTotal>, DatabaseError> {
        let totals = sqlx::query_as::<_, DailyTotal>(
            "SELECT to_char(date AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS day,
                    SUM(amount) AS total
             FROM expenses
             WHERE user_id = $1 AND date >= $2 AND date <= $3
             GROUP BY day
             ORDER BY day",
        )
        .bind(user_id)
        .bind(period.start)
        .bind(period.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Overall total for a daily breakdown, computed from the grouped rows
    /// rather than re-queried.
    pub fn breakdown_total(daily: &[DailyTotal]) -> f64 {
        daily.iter().map(|d| d.total).sum()
    }

    /// Organization roll-up: the sum and count of the user's expenses whose
    /// customer belongs to the organization. An organization with no
    /// customers short-circuits to zero without touching expenses.
    pub async fn organization_total(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<(f64, i64), DatabaseError> {
        let customer_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM customers WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if customer_ids.is_empty() {
            return Ok((0.0, 0));
        }

        let row: (f64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
             FROM expenses
             WHERE user_id = $1 AND customer_id = ANY($2)",
        )
        .bind(user_id)
        .bind(&customer_ids[..])
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_period_spans_the_requested_days() {
        let now = DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let period = ReportPeriod::lookback(7, now);
        assert_eq!(period.end, now);
        assert_eq!(period.start.to_rfc3339(), "2024-06-08T12:00:00+00:00");
    }

    #[test]
    fn breakdown_total_sums_daily_rows() {
        let daily = vec![
            DailyTotal { day: "2024-06-01".into(), total: 10.5 },
            DailyTotal { day: "2024-06-02".into(), total: 4.5 },
        ];
        assert_eq!(ReportService::breakdown_total(&daily), 15.0);
        assert_eq!(ReportService::breakdown_total(&[]), 0.0);
    }
}
