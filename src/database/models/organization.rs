use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::query::{ColumnType, FieldSpec, ResourceSchema, SortDirection};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub static ORGANIZATION_SCHEMA: ResourceSchema = ResourceSchema {
    table: "organizations",
    owner_column: "user_id",
    fields: &[
        FieldSpec { column: "id", ty: ColumnType::Uuid },
        FieldSpec { column: "name", ty: ColumnType::Text },
        FieldSpec { column: "created_at", ty: ColumnType::Timestamp },
        FieldSpec { column: "updated_at", ty: ColumnType::Timestamp },
    ],
    default_sort: ("name", SortDirection::Asc),
};

/// Control keys the organization list endpoint consumes itself
pub static ORGANIZATION_RESERVED: &[&str] = &["select", "sort", "page", "limit", "nameSearch"];
