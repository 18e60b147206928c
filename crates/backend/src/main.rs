pub mod api;
pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{delete, get, post, put},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    use api::handlers::{analytics, orders, products, sales, users};
    use system::auth::middleware::{require_admin, require_admin_or_manager, require_auth};
    use system::handlers::auth;

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, quiet the SQL layer
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = next.run(req).await;

        tracing::info!(
            "{} {} -> {} in {}ms",
            method,
            path,
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
        response
    }

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    shared::data::db::initialize_database(db_path.to_str())
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Provision the JWT secret up front so the first login does not race
    // two generations of it.
    system::auth::jwt::get_jwt_secret().await?;

    system::initialization::ensure_admin_user_exists().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    // Per-method authorization is stacked innermost-first: a method router
    // layer only wraps the methods added before it, so the most restricted
    // method goes first and picks up every outer check as well.
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // Auth (public)
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        // Auth (protected)
        .route(
            "/api/auth/me",
            get(auth::me).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/auth/profile",
            put(auth::update_profile).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/auth/change-password",
            put(auth::change_password).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/auth/login-logs",
            get(auth::login_logs).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/auth/login-logs/user/:id",
            get(auth::login_logs_for_user).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/auth/login-stats",
            get(auth::login_stats).layer(middleware::from_fn(require_admin_or_manager)),
        )
        .route(
            "/api/auth/registration-stats",
            get(auth::registration_stats).layer(middleware::from_fn(require_admin_or_manager)),
        )
        .route(
            "/api/registration-logs",
            get(auth::registration_logs).layer(middleware::from_fn(require_admin_or_manager)),
        )
        // Products: reads for any authenticated caller, writes for Admin/Manager
        .route(
            "/api/products",
            post(products::create)
                .layer(middleware::from_fn(require_admin_or_manager))
                .get(products::list)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/products/stats",
            get(products::stats).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/products/:id",
            put(products::update)
                .delete(products::delete)
                .layer(middleware::from_fn(require_admin_or_manager))
                .get(products::get_by_id)
                .layer(middleware::from_fn(require_auth)),
        )
        // Orders: read/create for any authenticated caller (Customers are
        // scoped to their own), update Admin/Manager, delete Admin
        .route(
            "/api/orders",
            get(orders::list)
                .post(orders::create)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/orders/stats",
            get(orders::stats).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/orders/:id",
            delete(orders::delete)
                .layer(middleware::from_fn(require_admin))
                .put(orders::update)
                .layer(middleware::from_fn(require_admin_or_manager))
                .get(orders::get_by_id)
                .layer(middleware::from_fn(require_auth)),
        )
        // Users: Admin/Manager only
        .route(
            "/api/users",
            get(users::list)
                .post(users::create)
                .layer(middleware::from_fn(require_admin_or_manager)),
        )
        .route(
            "/api/users/stats",
            get(users::stats).layer(middleware::from_fn(require_admin_or_manager)),
        )
        .route(
            "/api/users/:id",
            delete(users::delete)
                .layer(middleware::from_fn(require_admin))
                .get(users::get_by_id)
                .put(users::update)
                .layer(middleware::from_fn(require_admin_or_manager)),
        )
        // Sales: read-only, scoped for Customers
        .route(
            "/api/sales",
            get(sales::list).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/sales/stats",
            get(sales::stats).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/sales/:id",
            get(sales::get_by_id).layer(middleware::from_fn(require_auth)),
        )
        // Analytics
        .route(
            "/api/analytics/overview",
            get(analytics::overview).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/analytics/top-products",
            get(analytics::top_products).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/analytics/sales-by-category",
            get(analytics::sales_by_category).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/analytics/revenue",
            get(analytics::revenue).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/analytics/user-growth",
            get(analytics::user_growth).layer(middleware::from_fn(require_admin_or_manager)),
        )
        .route(
            "/api/analytics/channel-performance",
            get(analytics::channel_performance).layer(middleware::from_fn(require_auth)),
        )
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
