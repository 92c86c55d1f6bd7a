use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::error::ApiError;
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

const MIN_PASSWORD_LENGTH: usize = 6;

/// POST /api/users/register - Create an account and return a bearer token
pub async fn register(
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut field_errors = HashMap::new();

    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        field_errors.insert("name".to_string(), "Name is required".to_string());
    }

    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    if email.is_empty() {
        field_errors.insert("email".to_string(), "Email is required".to_string());
    } else if !email.contains('@') {
        field_errors.insert("email".to_string(), "Invalid email address".to_string());
    }

    let password = payload.password.as_deref().unwrap_or_default();
    if password.len() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Missing required fields",
            Some(field_errors),
        ));
    }

    let service = UserService::new().await?;
    let password_hash = hash_password(password)?;
    let user = service.create(name, &email, &password_hash).await?;

    let token = generate_jwt(&Claims::new(user.id, user.email.clone()))?;

    tracing::info!(user_id = %user.id, "registered new user");

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "data": user,
        })),
    ))
}

/// POST /api/users/login - Exchange credentials for a bearer token
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    let password = payload.password.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Please provide email and password"));
    }

    let service = UserService::new().await?;

    // Same failure message for unknown email and bad password
    let user = service
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = generate_jwt(&Claims::new(user.id, user.email.clone()))?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "data": user,
    })))
}
