use axum::{extract::Path, response::Json, Extension};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::authz::ActorContext;
use crate::error::ApiError;
use crate::scheduling::SlotInterval;
use crate::services::TemplateService;

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
}

/// Times arrive as "HH:MM" or "HH:MM:SS" strings.
#[derive(Debug, Deserialize)]
pub struct SlotItemRequest {
    pub start_time: String,
    pub end_time: String,
}

impl SlotItemRequest {
    fn interval(&self) -> Result<SlotInterval, ApiError> {
        Ok(SlotInterval::new(
            parse_time_of_day(&self.start_time)?,
            parse_time_of_day(&self.end_time)?,
        ))
    }
}

fn parse_time_of_day(value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ApiError::bad_request(format!("Invalid time of day: {}", value)))
}

/// GET /api/stores/:store_id/templates
pub async fn list_templates(
    Extension(actor): Extension<ActorContext>,
    Path(store_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let service = TemplateService::new().await?;
    let templates = service.list_templates(&actor, store_id).await?;
    Ok(Json(json!({ "success": true, "data": templates })))
}

/// POST /api/stores/:store_id/templates
pub async fn create_template(
    Extension(actor): Extension<ActorContext>,
    Path(store_id): Path<i64>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Template name must not be empty"));
    }

    let service = TemplateService::new().await?;
    let template = service
        .create_template(&actor, store_id, payload.name.trim())
        .await?;
    Ok(Json(json!({ "success": true, "data": template })))
}

/// DELETE /api/stores/:store_id/templates/:template_id
pub async fn delete_template(
    Extension(actor): Extension<ActorContext>,
    Path((store_id, template_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let service = TemplateService::new().await?;
    service.delete_template(&actor, store_id, template_id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": template_id } })))
}

/// GET /api/stores/:store_id/templates/:template_id/items
pub async fn list_items(
    Extension(actor): Extension<ActorContext>,
    Path((store_id, template_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let service = TemplateService::new().await?;
    let items = service.list_items(&actor, store_id, template_id).await?;
    Ok(Json(json!({ "success": true, "data": items })))
}

/// POST /api/stores/:store_id/templates/:template_id/items
pub async fn create_item(
    Extension(actor): Extension<ActorContext>,
    Path((store_id, template_id)): Path<(i64, i64)>,
    Json(payload): Json<SlotItemRequest>,
) -> Result<Json<Value>, ApiError> {
    let candidate = payload.interval()?;
    let service = TemplateService::new().await?;
    let item = service
        .create_item(&actor, store_id, template_id, candidate)
        .await?;
    Ok(Json(json!({ "success": true, "data": item })))
}

/// PUT /api/stores/:store_id/templates/:template_id/items/:item_id
pub async fn update_item(
    Extension(actor): Extension<ActorContext>,
    Path((store_id, template_id, item_id)): Path<(i64, i64, i64)>,
    Json(payload): Json<SlotItemRequest>,
) -> Result<Json<Value>, ApiError> {
    let candidate = payload.interval()?;
    let service = TemplateService::new().await?;
    let item = service
        .update_item(&actor, store_id, template_id, item_id, candidate)
        .await?;
    Ok(Json(json!({ "success": true, "data": item })))
}

/// DELETE /api/stores/:store_id/templates/:template_id/items/:item_id
pub async fn delete_item(
    Extension(actor): Extension<ActorContext>,
    Path((store_id, template_id, item_id)): Path<(i64, i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let service = TemplateService::new().await?;
    service
        .delete_item(&actor, store_id, template_id, item_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": item_id } })))
}
