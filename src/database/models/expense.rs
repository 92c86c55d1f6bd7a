use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::query::{ColumnType, FieldSpec, ResourceSchema, SortDirection};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub item: String,
    pub description: Option<String>,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub user_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub static EXPENSE_SCHEMA: ResourceSchema = ResourceSchema {
    table: "expenses",
    owner_column: "user_id",
    fields: &[
        FieldSpec { column: "id", ty: ColumnType::Uuid },
        FieldSpec { column: "item", ty: ColumnType::Text },
        FieldSpec { column: "description", ty: ColumnType::Text },
        FieldSpec { column: "amount", ty: ColumnType::Float },
        FieldSpec { column: "date", ty: ColumnType::Timestamp },
        FieldSpec { column: "customer_id", ty: ColumnType::Uuid },
        FieldSpec { column: "created_at", ty: ColumnType::Timestamp },
        FieldSpec { column: "updated_at", ty: ColumnType::Timestamp },
    ],
    default_sort: ("date", SortDirection::Desc),
};

/// Control keys the expense list endpoint consumes itself
pub static EXPENSE_RESERVED: &[&str] = &[
    "select",
    "sort",
    "page",
    "limit",
    "startDate",
    "endDate",
    "week",
    "month",
    "year",
    "amountEquals",
    "amountGreaterThan",
    "amountLessThan",
    "itemSearch",
    "customerId",
];
