use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::repository::{PgStaffRepository, StaffRepository};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub staff_id: i64,
}

/// POST /auth/login - exchange an upstream-verified staff identity for an
/// API token. Credential verification itself lives in the SSO gateway in
/// front of this service; this endpoint only resolves the staff record and
/// signs the claims the middleware later reads back.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let staff_repo = PgStaffRepository::new(pool);

    let staff = staff_repo
        .find_by_id(payload.staff_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unknown staff member"))?;

    let claims = Claims::new(staff.id, staff.role);
    let token = generate_jwt(claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "staff": {
                "id": staff.id,
                "name": staff.name,
                "role": staff.role,
            },
            "expires_in": expires_in
        }
    })))
}
