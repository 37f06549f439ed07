use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::Claims;
use crate::authz::ActorContext;
use crate::cache::{shared_cache, AuthContextCache};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::repository::{PgStoreAccessRepository, StoreAccessRepository};
use crate::error::ApiError;

/// JWT authentication middleware. Validates the bearer token, resolves the
/// actor's granted store set (cache first, grants table on miss) and injects
/// a read-only [`ActorContext`] for the handlers and evaluators downstream.
pub async fn actor_context_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token).map_err(ApiError::unauthorized)?;

    let granted = resolve_granted_stores(claims.staff_id).await?;
    let actor = ActorContext::new(claims.staff_id, claims.role, granted);
    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

async fn resolve_granted_stores(staff_id: i64) -> Result<Vec<i64>, ApiError> {
    let cache = shared_cache();
    // A cache read failure is not fatal; fall through to the grants table
    if let Ok(Some(store_ids)) = cache.get(staff_id).await {
        return Ok(store_ids);
    }

    let pool = DatabaseManager::pool().await?;
    let grants = PgStoreAccessRepository::new(pool);
    let store_ids = grants.granted_store_ids(staff_id).await?;

    if let Err(e) = cache.put(staff_id, store_ids.clone()).await {
        tracing::warn!("failed to cache auth context for staff {}: {}", staff_id, e);
    }
    Ok(store_ids)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
