pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod types;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::state::AppState;

/// Build the full router: public and token-protected routes plus global layers.
pub fn app(state: AppState) -> Router {
    let api = state.config.api.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&state.config.security))
                .layer(DefaultBodyLimit::max(api.max_request_size_bytes)),
        );

    if api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        // Service
        .route("/", get(public::service::root))
        .route("/health", get(public::service::health))
        // Token acquisition
        .route("/register", post(public::auth::register_post))
        .route("/login", post(public::auth::login_post))
        // Read-only views
        .route("/articles", get(public::articles::list))
        .route("/articles/search", get(public::articles::search))
        .route("/articles/:id", get(public::articles::get))
        .route("/articles/:id/categories", get(public::categories::for_article))
        .route("/articles/:id/comments", get(public::comments::list))
        .route("/articles/category/:id", get(public::articles::by_category))
        .route("/user/:id/articles", get(public::articles::by_user))
        .route(
            "/categories",
            get(public::categories::list).post(public::categories::create),
        )
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(protected::auth::profile))
        .route("/articles", post(protected::articles::create))
        .route(
            "/articles/:id",
            put(protected::articles::update).delete(protected::articles::delete),
        )
        .route("/articles/:id/categories", post(protected::categories::attach))
        .route("/articles/:id/comments", post(protected::comments::create))
        .route("/categories/:id", delete(protected::categories::delete))
        .route("/comments/:id", delete(protected::comments::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::jwt_auth_middleware,
        ))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
