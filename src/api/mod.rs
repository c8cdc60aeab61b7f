use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{MovieService, SeaOrmMovieService};

mod error;
pub mod movies;
mod observability;
mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub movie_service: Arc<dyn MovieService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn movie_service(&self) -> &Arc<dyn MovieService> {
        &self.movie_service
    }
}

pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let movie_service: Arc<dyn MovieService> = Arc::new(SeaOrmMovieService::new(store));

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        movie_service,
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let movie_routes = Router::new()
        .route(
            "/movies/",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route(
            "/movies/{id}/",
            get(movies::get_movie)
                .patch(movies::update_movie)
                .delete(movies::delete_movie),
        );

    let prefix = server.api_prefix.trim_end_matches('/');
    let api_router = if prefix.is_empty() {
        Router::new().merge(movie_routes)
    } else {
        Router::new().nest(prefix, movie_routes)
    };

    api_router
        .route("/metrics", get(observability::get_metrics))
        .with_state(state.clone())
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}
