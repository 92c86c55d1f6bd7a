use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::conditions::{Condition, ConditionRenderer};
use super::dates::DateFilter;
use super::order;
use super::schema::ResourceSchema;
use super::types::{BindValue, CmpOp, OrderInfo, SqlQuery};
use crate::pagination::PageWindow;

/// An owner-scoped query against one resource table.
///
/// The constructor takes the authenticated user's id and renders it as the
/// first WHERE condition; nothing added later can displace it, so every
/// select and count this builder produces is bound to the owner.
#[derive(Debug)]
pub struct ResourceQuery {
    schema: &'static ResourceSchema,
    conditions: Vec<Condition>,
    order: Vec<OrderInfo>,
    window: Option<PageWindow>,
}

impl ResourceQuery {
    pub fn owned(schema: &'static ResourceSchema, user_id: Uuid) -> Self {
        let owner = Condition::eq(schema.owner_column, BindValue::Uuid(user_id));
        Self {
            schema,
            conditions: vec![owner],
            order: vec![],
            window: None,
        }
    }

    pub fn push(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    pub fn extend(&mut self, conditions: impl IntoIterator<Item = Condition>) -> &mut Self {
        self.conditions.extend(conditions);
        self
    }

    /// Apply a day-granular date filter as typed timestamp comparisons:
    /// inclusive lower bound, exclusive bound at the start of the next day.
    pub fn date_filter(&mut self, column: &str, filter: &DateFilter) -> &mut Self {
        let (start, end_exclusive) = filter.bounds();
        if let Some(start) = start {
            self.push(Condition::compare(
                column,
                CmpOp::Gte,
                BindValue::Timestamp(start),
            ));
        }
        if let Some(end) = end_exclusive {
            self.push(Condition::compare(
                column,
                CmpOp::Lt,
                BindValue::Timestamp(end),
            ));
        }
        self
    }

    /// Timestamp range with both bounds inclusive, for report windows.
    pub fn timestamp_range(
        &mut self,
        column: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> &mut Self {
        self.push(Condition::compare(
            column,
            CmpOp::Gte,
            BindValue::Timestamp(start),
        ));
        self.push(Condition::compare(
            column,
            CmpOp::Lte,
            BindValue::Timestamp(end),
        ));
        self
    }

    pub fn order(&mut self, order: Vec<OrderInfo>) -> &mut Self {
        self.order = order;
        self
    }

    pub fn window(&mut self, window: PageWindow) -> &mut Self {
        self.window = Some(window);
        self
    }

    pub fn table(&self) -> &'static str {
        self.schema.table
    }

    pub fn to_select_sql(&self) -> SqlQuery {
        let (where_clause, params) = ConditionRenderer::render(&self.conditions);
        let order_clause = order::generate(&self.order);
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT * FROM \"{}\"", self.schema.table),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlQuery { query, params }
    }

    pub fn to_count_sql(&self) -> SqlQuery {
        let (where_clause, params) = ConditionRenderer::render(&self.conditions);
        let query = format!(
            "SELECT COUNT(*) as count FROM \"{}\" WHERE {}",
            self.schema.table, where_clause
        );
        SqlQuery { query, params }
    }

    fn build_limit_clause(&self) -> String {
        match &self.window {
            Some(w) if w.skip > 0 => format!("LIMIT {} OFFSET {}", w.limit, w.skip),
            Some(w) => format!("LIMIT {}", w.limit),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::expense::EXPENSE_SCHEMA;
    use crate::query::types::SortDirection;

    #[test]
    fn owner_condition_is_always_first() {
        let user = Uuid::new_v4();
        let query = ResourceQuery::owned(&EXPENSE_SCHEMA, user);
        let sql = query.to_select_sql();
        assert!(sql.query.starts_with("SELECT * FROM \"expenses\" WHERE \"user_id\" = $1"));
        assert_eq!(sql.params[0], BindValue::Uuid(user));
    }

    #[test]
    fn full_query_renders_in_clause_order() {
        let user = Uuid::new_v4();
        let mut query = ResourceQuery::owned(&EXPENSE_SCHEMA, user);
        query.push(Condition::contains("item", "coffee"));
        query.order(vec![OrderInfo {
            column: "date".to_string(),
            sort: SortDirection::Desc,
        }]);
        query.window(PageWindow { skip: 20, limit: 10 });

        let sql = query.to_select_sql();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"expenses\" WHERE \"user_id\" = $1 AND \"item\" ILIKE $2 ESCAPE '\\' \
             ORDER BY \"date\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn count_ignores_order_and_window() {
        let user = Uuid::new_v4();
        let mut query = ResourceQuery::owned(&EXPENSE_SCHEMA, user);
        query.order(vec![OrderInfo {
            column: "date".to_string(),
            sort: SortDirection::Desc,
        }]);
        query.window(PageWindow { skip: 10, limit: 10 });

        let sql = query.to_count_sql();
        assert_eq!(
            sql.query,
            "SELECT COUNT(*) as count FROM \"expenses\" WHERE \"user_id\" = $1"
        );
    }

    #[test]
    fn first_page_omits_offset() {
        let user = Uuid::new_v4();
        let mut query = ResourceQuery::owned(&EXPENSE_SCHEMA, user);
        query.window(PageWindow { skip: 0, limit: 10 });
        assert!(query.to_select_sql().query.ends_with("LIMIT 10"));
    }
}
