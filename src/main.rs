use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use expense_tracker_api::database::manager::DatabaseManager;
use expense_tracker_api::handlers;
use expense_tracker_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = expense_tracker_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Expense Tracker API in {:?} mode", config.environment);

    // Apply schema migrations; a failure leaves the server degraded rather
    // than down, and /health reports it
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::error!("Failed to apply migrations: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("EXPENSE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Expense Tracker API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(user_public_routes())
        // Protected API
        .merge(protected_routes());

    if expense_tracker_api::config::config().security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(TraceLayer::new_for_http())
}

fn user_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::users;

    Router::new()
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
}

fn protected_routes() -> Router {
    Router::new()
        .merge(user_routes())
        .merge(organization_routes())
        .merge(customer_routes())
        .merge(expense_routes())
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn user_routes() -> Router {
    use handlers::protected::users;

    Router::new().route("/api/users/me", get(users::me))
}

fn organization_routes() -> Router {
    use handlers::protected::organizations;

    Router::new()
        .route(
            "/api/organizations",
            get(organizations::list).post(organizations::create),
        )
        .route(
            "/api/organizations/:id",
            get(organizations::get)
                .put(organizations::update)
                .delete(organizations::delete),
        )
}

fn customer_routes() -> Router {
    use handlers::protected::customers;

    Router::new()
        .route("/api/customers", get(customers::list).post(customers::create))
        .route(
            "/api/customers/:id",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/api/customers/:id/expenses", get(customers::expenses))
        .route(
            "/api/customers/organization/:organizationId",
            get(customers::by_organization),
        )
}

fn expense_routes() -> Router {
    use handlers::protected::expenses;

    Router::new()
        // Summary and report routes before the id capture
        .route("/api/expenses/summary", get(expenses::summary))
        .route("/api/expenses/weekly", get(expenses::weekly))
        .route("/api/expenses/monthly", get(expenses::monthly))
        .route("/api/expenses/total", get(expenses::organization_total))
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/expenses/:id",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Expense Tracker API (Rust)",
            "version": version,
            "description": "Multi-tenant expense tracking REST API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "users": "/api/users/register, /api/users/login (public), /api/users/me (protected)",
                "organizations": "/api/organizations[/:id] (protected)",
                "customers": "/api/customers[/:id], /api/customers/:id/expenses, /api/customers/organization/:organizationId (protected)",
                "expenses": "/api/expenses[/:id], /api/expenses/{summary,weekly,monthly}, /api/expenses/total?organizationId= (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
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
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
