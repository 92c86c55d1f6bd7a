use axum::Extension;

use crate::api::ApiResponse;
use crate::database::models::user::User;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::UserService;

/// GET /api/users/me - The authenticated user's own record
pub async fn me(Extension(user): Extension<AuthUser>) -> Result<ApiResponse<User>, ApiError> {
    let service = UserService::new().await?;
    let record = service
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(record))
}
