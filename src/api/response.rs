use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::pagination::Pagination;

/// Wrapper for API responses that automatically adds the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            data,
            status_code: Some(StatusCode::CREATED),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = json!({
            "success": true,
            "data": data_value
        });

        (status, Json(envelope)).into_response()
    }
}

/// List envelope: `{success, count, total, pagination, data}` where `count`
/// is the page size returned and `total` the number of matching records.
#[derive(Debug)]
pub struct ListResponse {
    pub total: i64,
    pub pagination: Pagination,
    pub data: Vec<Value>,
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        let envelope = json!({
            "success": true,
            "count": self.data.len(),
            "pagination": self.pagination,
            "total": self.total,
            "data": self.data,
        });
        (StatusCode::OK, Json(envelope)).into_response()
    }
}

/// Serialize rows for a list body, applying the optional `select` projection.
/// `id` is always kept, mirroring the store's identifier behavior.
pub fn project_rows<T: Serialize>(
    rows: &[T],
    select: &Option<Vec<String>>,
) -> Result<Vec<Value>, serde_json::Error> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let value = serde_json::to_value(row)?;
        out.push(match select {
            Some(fields) => project_value(value, fields),
            None => value,
        });
    }
    Ok(out)
}

fn project_value(value: Value, fields: &[String]) -> Value {
    match value {
        Value::Object(map) => {
            let mut projected = Map::new();
            for (k, v) in map {
                if k == "id" || fields.iter().any(|f| f == &k) {
                    projected.insert(k, v);
                }
            }
            Value::Object(projected)
        }
        other => other,
    }
}
