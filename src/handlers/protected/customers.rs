use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::response::project_rows;
use crate::api::{ApiResponse, ListResponse};
use crate::database::models::customer::{CUSTOMER_RESERVED, CUSTOMER_SCHEMA};
use crate::error::ApiError;
use crate::handlers::parse_path_id;
use crate::middleware::AuthUser;
use crate::query::conditions::Condition;
use crate::query::params::{parse_list_options, parse_uuid, passthrough_conditions, RawParams};
use crate::query::{BindValue, ResourceQuery};
use crate::services::{CustomerService, ExpenseService, OrganizationService};

#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub organization_id: Option<Uuid>,
}

/// The referenced organization must exist and belong to the caller;
/// anything else reads as a malformed reference.
async fn check_organization_reference(
    organization_id: Option<Uuid>,
    user_id: Uuid,
) -> Result<(), ApiError> {
    if let Some(org_id) = organization_id {
        let organizations = OrganizationService::new().await?;
        if organizations.find_owned(org_id, user_id).await?.is_none() {
            return Err(ApiError::field_error(
                "organization_id",
                "Organization not found",
            ));
        }
    }
    Ok(())
}

/// GET /api/customers - List with filtering, sort, and pagination
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ListResponse, ApiError> {
    let raw = RawParams::new(params);
    let options = parse_list_options(&raw, &CUSTOMER_SCHEMA)?;

    let mut query = ResourceQuery::owned(&CUSTOMER_SCHEMA, user.user_id);
    if let Some(needle) = raw.get("nameSearch") {
        query.push(Condition::contains("name", needle));
    }
    if let Some(org) = raw.get("organization") {
        let org_id = parse_uuid("organization", org)?;
        query.push(Condition::eq("organization_id", BindValue::Uuid(org_id)));
    }
    query.extend(passthrough_conditions(
        &raw,
        &CUSTOMER_SCHEMA,
        CUSTOMER_RESERVED,
    )?);

    let service = CustomerService::new().await?;
    let total = service.count(&query).await?;

    query.order(options.sort.clone());
    query.window(options.page.window());
    let customers = service.list(&query).await?;

    let data = project_rows(&customers, &options.select)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(ListResponse {
        total,
        pagination: options.page.describe(total),
        data,
    })
}

/// POST /api/customers
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::field_error("name", "Customer name is required"));
    }
    check_organization_reference(payload.organization_id, user.user_id).await?;

    let service = CustomerService::new().await?;
    let customer = service
        .create(user.user_id, name, payload.organization_id)
        .await?;

    Ok(ApiResponse::created(customer))
}

/// GET /api/customers/:id
pub async fn get(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Customer")?;

    let service = CustomerService::new().await?;
    let customer = service
        .find_owned(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    Ok(ApiResponse::success(customer))
}

/// PUT /api/customers/:id
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Customer")?;

    let name = match payload.name.as_deref().map(str::trim) {
        Some("") => {
            return Err(ApiError::field_error("name", "Customer name is required"))
        }
        other => other,
    };
    check_organization_reference(payload.organization_id, user.user_id).await?;

    let service = CustomerService::new().await?;
    let customer = service
        .update(id, user.user_id, name, payload.organization_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    Ok(ApiResponse::success(customer))
}

/// DELETE /api/customers/:id - Removes the customer and all of its expenses
/// in one transaction; the response reports how many expenses went with it.
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Customer")?;

    let service = CustomerService::new().await?;
    let deleted_expenses = service
        .delete_cascade(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": {},
        "deletedExpenses": deleted_expenses,
    })))
}

/// GET /api/customers/:id/expenses - The customer's expenses, newest first
pub async fn expenses(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Customer")?;

    let customers = CustomerService::new().await?;
    customers
        .find_owned(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    let expenses = ExpenseService::new().await?;
    let records = expenses.list_for_customer(id, user.user_id).await?;

    Ok(Json(json!({
        "success": true,
        "count": records.len(),
        "data": records,
    })))
}

/// GET /api/customers/organization/:organizationId - Customers attached to
/// one organization
pub async fn by_organization(
    Extension(user): Extension<AuthUser>,
    Path(organization_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let organization_id = parse_path_id(&organization_id, "Organization")?;

    let organizations = OrganizationService::new().await?;
    organizations
        .find_owned(organization_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    let mut query = ResourceQuery::owned(&CUSTOMER_SCHEMA, user.user_id);
    query.push(Condition::eq(
        "organization_id",
        BindValue::Uuid(organization_id),
    ));
    query.order(crate::query::order::default_sort(&CUSTOMER_SCHEMA));

    let service = CustomerService::new().await?;
    let customers = service.list(&query).await?;

    Ok(Json(json!({
        "success": true,
        "count": customers.len(),
        "data": customers,
    })))
}
