use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::api::response::project_rows;
use crate::api::{ApiResponse, ListResponse};
use crate::database::models::organization::{ORGANIZATION_RESERVED, ORGANIZATION_SCHEMA};
use crate::error::ApiError;
use crate::handlers::parse_path_id;
use crate::middleware::AuthUser;
use crate::query::conditions::Condition;
use crate::query::params::{parse_list_options, passthrough_conditions, RawParams};
use crate::query::ResourceQuery;
use crate::services::OrganizationService;

#[derive(Debug, Deserialize)]
pub struct OrganizationPayload {
    pub name: Option<String>,
}

fn required_name(payload: &OrganizationPayload) -> Result<&str, ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::field_error(
            "name",
            "Organization name is required",
        ));
    }
    Ok(name)
}

/// GET /api/organizations - List the caller's organizations
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ListResponse, ApiError> {
    let raw = RawParams::new(params);
    let options = parse_list_options(&raw, &ORGANIZATION_SCHEMA)?;

    let mut query = ResourceQuery::owned(&ORGANIZATION_SCHEMA, user.user_id);
    if let Some(needle) = raw.get("nameSearch") {
        query.push(Condition::contains("name", needle));
    }
    query.extend(passthrough_conditions(
        &raw,
        &ORGANIZATION_SCHEMA,
        ORGANIZATION_RESERVED,
    )?);

    let service = OrganizationService::new().await?;
    let total = service.count(&query).await?;

    query.order(options.sort.clone());
    query.window(options.page.window());
    let organizations = service.list(&query).await?;

    let data = project_rows(&organizations, &options.select)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(ListResponse {
        total,
        pagination: options.page.describe(total),
        data,
    })
}

/// POST /api/organizations - Create an organization
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<OrganizationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let name = required_name(&payload)?;

    let service = OrganizationService::new().await?;
    let organization = service.create(user.user_id, name).await?;

    Ok(ApiResponse::created(organization))
}

/// GET /api/organizations/:id
pub async fn get(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Organization")?;

    let service = OrganizationService::new().await?;
    let organization = service
        .find_owned(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    Ok(ApiResponse::success(organization))
}

/// PUT /api/organizations/:id
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<OrganizationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Organization")?;
    let name = required_name(&payload)?;

    let service = OrganizationService::new().await?;
    let organization = service
        .update_name(id, user.user_id, name)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    Ok(ApiResponse::success(organization))
}

/// DELETE /api/organizations/:id - Customers keep their rows but lose the
/// organization reference.
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id(&id, "Organization")?;

    let service = OrganizationService::new().await?;
    if !service.delete(id, user.user_id).await? {
        return Err(ApiError::not_found("Organization not found"));
    }

    Ok(Json(json!({ "success": true, "data": {} })))
}
