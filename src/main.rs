use axum::{middleware, routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use gym_api::config;
use gym_api::database::migrations;
use gym_api::handlers;
use gym_api::middleware::{jwt_auth_middleware, resolve_tenant_middleware};
use gym_api::services::GymService;
use gym_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, GYM_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Gym API in {:?} mode", config.environment);

    let state = match AppState::bootstrap(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("invalid database configuration: {e}");
            std::process::exit(1);
        }
    };

    // Control-plane schema first, then the per-gym registry/migration pass.
    // Neither aborts startup: the process must come up even when some or all
    // databases are unreachable, and /health reports the degraded state.
    if let Err(e) = migrations::migrate_control_schema(&state.control).await {
        tracing::error!("Control-plane migration failed: {}", e);
    }
    match GymService::from_state(&state).load_all().await {
        Ok(report) => {
            tracing::info!(
                "Loaded {}/{} gym databases at startup",
                report.activated,
                report.attempted
            );
        }
        Err(e) => tracing::error!("Could not load gym registry from control plane: {}", e),
    }

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Gym API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    // Tenant-scoped routes resolve the gym after authentication; the jwt
    // layer is added last so it runs first.
    let tenant_scoped = tenant_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_tenant_middleware,
        ))
        .route_layer(middleware::from_fn(jwt_auth_middleware));

    let management = management_routes().route_layer(middleware::from_fn(jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected API
        .merge(management)
        .merge(tenant_scoped)
        .with_state(state)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/token/refresh", post(auth::refresh))
}

fn management_routes() -> Router<AppState> {
    use handlers::gyms;

    Router::new()
        .route("/api/gyms", get(gyms::list).post(gyms::create))
        .route("/api/gyms/:id", get(gyms::retrieve))
}

fn tenant_routes() -> Router<AppState> {
    use handlers::{classes, entries, members, payments, trainers};

    Router::new()
        .route("/api/members", get(members::list).post(members::create))
        .route(
            "/api/members/:id",
            get(members::retrieve)
                .put(members::update)
                .delete(members::destroy),
        )
        .route("/api/member-entries", get(entries::list).post(entries::create))
        .route(
            "/api/member-entries/:id",
            get(entries::retrieve)
                .put(entries::update)
                .delete(entries::destroy),
        )
        .route("/api/trainers", get(trainers::list).post(trainers::create))
        .route(
            "/api/trainers/:id",
            get(trainers::retrieve)
                .put(trainers::update)
                .delete(trainers::destroy),
        )
        .route("/api/gym-classes", get(classes::list).post(classes::create))
        .route(
            "/api/gym-classes/:id",
            get(classes::retrieve)
                .put(classes::update)
                .delete(classes::destroy),
        )
        .route("/api/payments", get(payments::list).post(payments::create))
        .route(
            "/api/payments/:id",
            get(payments::retrieve)
                .put(payments::update)
                .delete(payments::destroy),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Gym API",
            "version": version,
            "description": "Multi-tenant gym management backend",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/login, /api/logout, /api/token/refresh (public)",
                "gyms": "/api/gyms[/:id] (protected, staff create)",
                "members": "/api/members[/:id]?gym=<key> (protected)",
                "member_entries": "/api/member-entries[/:id]?gym=<key> (protected)",
                "trainers": "/api/trainers[/:id]?gym=<key> (protected)",
                "gym_classes": "/api/gym-classes[/:id]?gym=<key> (protected)",
                "payments": "/api/payments[/:id]?gym=<key> (protected)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();
    let gyms_registered = state.registry.len().await;

    match sqlx::query("SELECT 1").execute(&state.control).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "gyms_registered": gyms_registered,
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
                    "database_error": e.to_string(),
                    "gyms_registered": gyms_registered,
                }
            })),
        ),
    }
}
