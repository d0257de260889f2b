use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::database::dao::{
    CategoryDao, PgCategoryDao, PgProductDao, PgProfileDao, PgUserDao, ProductDao, ProfileDao,
    UserDao,
};
use crate::database::ConnectionProvider;
use crate::handlers::{categories, products, profile, system};
use crate::middleware::jwt_auth_middleware;

/// Shared handler state: the connection provider and one DAO per entity
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn ConnectionProvider>,
    pub categories: Arc<dyn CategoryDao>,
    pub products: Arc<dyn ProductDao>,
    pub profiles: Arc<dyn ProfileDao>,
    pub users: Arc<dyn UserDao>,
}

impl AppState {
    /// Postgres-backed DAOs sharing one connection provider
    pub fn postgres(db: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            categories: Arc::new(PgCategoryDao::new(db.clone())),
            products: Arc::new(PgProductDao::new(db.clone())),
            profiles: Arc::new(PgProfileDao::new(db.clone())),
            users: Arc::new(PgUserDao::new(db.clone())),
            db,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(category_routes())
        .merge(product_routes())
        .merge(profile_routes())
        // Global middleware
        .layer(middleware::from_fn(jwt_auth_middleware))
        .layer(CorsLayer::permissive());

    let router = if config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list).post(categories::post))
        .route(
            "/categories/:id",
            get(categories::get)
                .put(categories::put)
                .delete(categories::delete),
        )
        .route("/categories/:id/products", get(categories::products))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::search).post(products::post))
        .route(
            "/products/:id",
            get(products::get).put(products::put).delete(products::delete),
        )
}

fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(profile::get).post(profile::post).put(profile::put),
    )
}
