use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::response::project_rows;
use crate::api::{ApiResponse, ListResponse};
use crate::config;
use crate::database::models::expense::{EXPENSE_RESERVED, EXPENSE_SCHEMA};
use crate::error::ApiError;
use crate::handlers::parse_path_id;
use crate::middleware::AuthUser;
use crate::query::conditions::Condition;
use crate::query::dates::date_filter;
use crate::query::params::{
    amount_conditions, parse_list_options, parse_uuid, passthrough_conditions, RawParams,
};
use crate::query::{BindValue, ResourceQuery};
use crate::services::report_service::{ReportPeriod, ReportService};
use crate::services::{CustomerService, ExpenseService};

#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    pub item: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub customer_id: Option<Uuid>,
}

/// The referenced customer must exist and belong to the caller.
async fn check_customer_reference(
    customer_id: Option<Uuid>,
    user_id: Uuid,
) -> Result<(), ApiError> {
    if let Some(id) = customer_id {
        let customers = CustomerService::new().await?;
        if customers.find_owned(id, user_id).await?.is_none() {
            return Err(ApiError::field_error("customer_id", "Customer not found"));
        }
    }
    Ok(())
}

/// GET /api/expenses - List with date windows, amount bounds, text search,
/// reference filters, sort, and pagination
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ListResponse, ApiError> {
    let raw = RawParams::new(params);
    let options = parse_list_options(&raw, &EXPENSE_SCHEMA)?;

    let mut query = ResourceQuery::owned(&EXPENSE_SCHEMA, user.user_id);
    if let Some(window) = date_filter(&raw)? {
        query.date_filter("date", &window);
    }
    query.extend(amount_conditions(&raw, "amount")?);
    if let Some(needle) = raw.get("itemSearch") {
        query.push(Condition::contains("item", needle));
    }
    if let Some(customer) = raw.get("customerId") {
        let customer_id = parse_uuid("customerId", customer)?;
        query.push(Condition::eq("customer_id", BindValue::Uuid(customer_id)));
    }
    query.extend(passthrough_conditions(
        &raw,
        &EXPENSE_SCHEMA,
        EXPENSE_RESERVED,
    )?);

    let service = ExpenseService::new().await?;
    let total = service.count(&query).await?;

    query.order(options.sort.clone());
    query.window(options.page.window());
    let expenses = service.list(&query).await?;

    let data = project_rows(&expenses, &options.select)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(ListResponse {
        total,
        pagination: options.page.describe(total),
        data,
    })
}

/// POST /api/expenses
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut field_errors = HashMap::new();

    let item = payload.item.as_deref().map(str::trim).unwrap_or_default();
    if item.is_empty() {
        field_errors.insert("item".to_string(), "Item name is required".to_string());
    }
    let amount = match payload.amount {
        Some(amount) if amount.is_finite() => Some(amount),
        Some(_) => {
            field_errors.insert("amount".to_string(), "Amount must be a number".to_string());
            None
        }
        None => {
            field_errors.insert("amount".to_string(), "Amount is required".to_string());
            None
        }
    };

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Missing required fields",
            Some(field_errors),
        ));
    }

    check_customer_reference(payload.customer_id, user.user_id).await?;

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let service = ExpenseService::new().await?;
    let expense = service
        .create(
            user.user_id,
            item,
            description,
            amount.unwrap_or_default(),
            payload.date,
            payload.customer_id,
        )
        .await?;

    Ok(ApiResponse::created(expense))
}

/// GET /api/expenses/:id
pub async fn get(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Expense")?;

    let service = ExpenseService::new().await?;
    let expense = service
        .find_owned(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense not found"))?;

    Ok(ApiResponse::success(expense))
}

/// PUT /api/expenses/:id
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Expense")?;

    let item = match payload.item.as_deref().map(str::trim) {
        Some("") => return Err(ApiError::field_error("item", "Item name is required")),
        other => other,
    };
    if let Some(amount) = payload.amount {
        if !amount.is_finite() {
            return Err(ApiError::field_error("amount", "Amount must be a number"));
        }
    }
    check_customer_reference(payload.customer_id, user.user_id).await?;

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let service = ExpenseService::new().await?;
    let expense = service
        .update(
            id,
            user.user_id,
            item,
            description,
            payload.amount,
            payload.date,
            payload.customer_id,
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Expense not found"))?;

    Ok(ApiResponse::success(expense))
}

/// DELETE /api/expenses/:id
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Expense")?;

    let service = ExpenseService::new().await?;
    if !service.delete(id, user.user_id).await? {
        return Err(ApiError::not_found("Expense not found"));
    }

    Ok(Json(json!({ "success": true, "data": {} })))
}

/// GET /api/expenses/summary - Total over an optional date window
pub async fn summary(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let raw = RawParams::new(params);
    let window = date_filter(&raw)?;

    let service = ReportService::new().await?;
    let total = service.total(user.user_id, window.as_ref()).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "total": total },
    })))
}

/// GET /api/expenses/weekly - Daily totals over the trailing week
pub async fn weekly(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse, ApiError> {
    let days = config::config().reports.weekly_lookback_days;
    lookback_report(user.user_id, days).await
}

/// GET /api/expenses/monthly - Daily totals over the trailing 30 days
pub async fn monthly(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse, ApiError> {
    let days = config::config().reports.monthly_lookback_days;
    lookback_report(user.user_id, days).await
}

async fn lookback_report(user_id: Uuid, days: i64) -> Result<Json<serde_json::Value>, ApiError> {
    let period = ReportPeriod::lookback(days, Utc::now());

    let service = ReportService::new().await?;
    let daily_totals = service.daily_totals(user_id, &period).await?;
    let total = ReportService::breakdown_total(&daily_totals);

    Ok(Json(json!({
        "success": true,
        "data": {
            "period": period,
            "total": total,
            "dailyTotals": daily_totals,
        },
    })))
}

#[derive(Debug, Deserialize)]
pub struct OrganizationTotalQuery {
    #[serde(rename = "organizationId")]
    pub organization_id: Option<String>,
}

/// GET /api/expenses/total?organizationId= - Roll-up across an
/// organization's customers
pub async fn organization_total(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<OrganizationTotalQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let raw_id = params
        .organization_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::field_error("organizationId", "organizationId is required"))?;
    let organization_id = parse_uuid("organizationId", raw_id)?;

    let service = ReportService::new().await?;
    let (total, count) = service
        .organization_total(user.user_id, organization_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": { "total": total, "count": count },
    })))
}
