//! Bella Web Server
//!
//! Axum-based REST API for the Bella Design Hub.

pub mod error;
pub mod routes;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{get, patch},
    Router,
};
use bella_db::DbPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Listener and CORS settings for [`run_server`].
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    /// Allowed browser origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

/// Create the application router.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        // Orders
        .route(
            "/orders",
            get(routes::orders::list_orders).post(routes::orders::create_order),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get_order)
                .put(routes::orders::update_order)
                .delete(routes::orders::delete_order),
        )
        // Service orders
        .route(
            "/serviceOrders",
            get(routes::service_orders::list_service_orders)
                .post(routes::service_orders::create_service_order),
        )
        .route(
            "/serviceOrders/{id}",
            get(routes::service_orders::get_service_order)
                .put(routes::service_orders::update_service_order)
                .delete(routes::service_orders::delete_service_order),
        )
        .route(
            "/serviceOrders/{id}/status",
            patch(routes::service_orders::update_status),
        )
        // Customers
        .route(
            "/customers",
            get(routes::customers::list_customers).post(routes::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(routes::customers::get_customer)
                .put(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        // Products
        .route(
            "/products",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/products/{id}",
            get(routes::products::get_product)
                .put(routes::products::update_product)
                .delete(routes::products::delete_product),
        )
        // Expenses
        .route(
            "/expenses",
            get(routes::expenses::list_expenses).post(routes::expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            get(routes::expenses::get_expense)
                .put(routes::expenses::update_expense)
                .delete(routes::expenses::delete_expense),
        )
        // Production
        .route(
            "/productionSchedules",
            get(routes::production::list_schedules).post(routes::production::create_schedule),
        )
        .route(
            "/productionSchedules/{id}",
            get(routes::production::get_schedule).delete(routes::production::delete_schedule),
        )
        .route(
            "/productionSchedules/{id}/status",
            patch(routes::production::update_status),
        )
        // Finance
        .route("/finance/summary", get(routes::finance::summary));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Run the web server until the process is stopped.
pub async fn run_server(db: Arc<DbPool>, options: ServerOptions) -> anyhow::Result<()> {
    let state = AppState::new(db);
    let app = create_router(state, &options.cors_origins);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
