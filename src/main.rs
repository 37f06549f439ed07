use axum::{middleware, routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use salon_admin_api::handlers::{login, staff, store_access, templates};
use salon_admin_api::middleware::actor_context_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = salon_admin_api::config::config();
    tracing::info!("Starting salon admin API in {:?} mode", config.environment);

    tracing_subscriber::fmt::init();

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("SALON_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Salon admin API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(login::login))
        // Protected API
        .merge(staff_routes())
        .merge(template_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn staff_routes() -> Router {
    use axum::routing::put;

    Router::new()
        // Staff accounts
        .route("/api/staff", get(staff::list).post(staff::create))
        .route(
            "/api/staff/:staff_id",
            get(staff::get).put(staff::update).delete(staff::delete),
        )
        // Store access grants
        .route("/api/staff/:staff_id/stores", get(store_access::list))
        .route(
            "/api/staff/:staff_id/stores/:store_id",
            put(store_access::grant).delete(store_access::revoke),
        )
        .layer(middleware::from_fn(actor_context_middleware))
}

fn template_routes() -> Router {
    Router::new()
        // Per-store time-slot templates
        .route(
            "/api/stores/:store_id/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/stores/:store_id/templates/:template_id",
            axum::routing::delete(templates::delete_template),
        )
        // Template items
        .route(
            "/api/stores/:store_id/templates/:template_id/items",
            get(templates::list_items).post(templates::create_item),
        )
        .route(
            "/api/stores/:store_id/templates/:template_id/items/:item_id",
            axum::routing::put(templates::update_item).delete(templates::delete_item),
        )
        .layer(middleware::from_fn(actor_context_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Salon Admin API",
            "version": version,
            "description": "Administrative backend for a multi-store nail salon chain",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public - token acquisition)",
                "staff": "/api/staff[/:staff_id] (protected)",
                "store_access": "/api/staff/:staff_id/stores[/:store_id] (protected)",
                "templates": "/api/stores/:store_id/templates[/:template_id] (protected)",
                "template_items": "/api/stores/:store_id/templates/:template_id/items[/:item_id] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match salon_admin_api::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
