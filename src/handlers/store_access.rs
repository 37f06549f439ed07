use axum::{extract::Path, response::Json, Extension};
use serde_json::{json, Value};

use crate::authz::ActorContext;
use crate::error::ApiError;
use crate::services::StoreAccessService;

/// GET /api/staff/:staff_id/stores - list the target's active grants
pub async fn list(
    Extension(actor): Extension<ActorContext>,
    Path(staff_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let service = StoreAccessService::new().await?;
    let grants = service.list_grants(&actor, staff_id).await?;
    Ok(Json(json!({ "success": true, "data": grants })))
}

/// PUT /api/staff/:staff_id/stores/:store_id - grant store access.
/// Idempotent: re-granting an existing pair returns the current list.
pub async fn grant(
    Extension(actor): Extension<ActorContext>,
    Path((staff_id, store_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let service = StoreAccessService::new().await?;
    let grants = service.grant(&actor, staff_id, store_id).await?;
    Ok(Json(json!({ "success": true, "data": grants })))
}

/// DELETE /api/staff/:staff_id/stores/:store_id - revoke store access
pub async fn revoke(
    Extension(actor): Extension<ActorContext>,
    Path((staff_id, store_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let service = StoreAccessService::new().await?;
    let grants = service.revoke(&actor, staff_id, store_id).await?;
    Ok(Json(json!({ "success": true, "data": grants })))
}
