use axum::{
    extract::Path,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::authz::{ActorContext, Role};
use crate::error::ApiError;
use crate::services::StaffService;

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// GET /api/staff - list active staff accounts
pub async fn list(Extension(actor): Extension<ActorContext>) -> Result<Json<Value>, ApiError> {
    let service = StaffService::new().await?;
    let staff = service.list(&actor).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// GET /api/staff/:staff_id
pub async fn get(
    Extension(actor): Extension<ActorContext>,
    Path(staff_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let service = StaffService::new().await?;
    let staff = service.get(&actor, staff_id).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// POST /api/staff - create a staff account (admin only)
pub async fn create(
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Staff name must not be empty"));
    }

    let service = StaffService::new().await?;
    let staff = service.create(&actor, payload.name.trim(), payload.role).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// PUT /api/staff/:staff_id - update name and/or role (admin only)
pub async fn update(
    Extension(actor): Extension<ActorContext>,
    Path(staff_id): Path<i64>,
    Json(payload): Json<UpdateStaffRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.name.is_none() && payload.role.is_none() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let service = StaffService::new().await?;
    let staff = service
        .update(&actor, staff_id, payload.name.as_deref(), payload.role)
        .await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// DELETE /api/staff/:staff_id - soft delete (admin only)
pub async fn delete(
    Extension(actor): Extension<ActorContext>,
    Path(staff_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let service = StaffService::new().await?;
    service.delete(&actor, staff_id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": staff_id } })))
}
