mod api;
mod auth;
mod config;
mod db;
mod error;
mod models;
mod raw_sql;
mod schema;
mod store;
mod telemetry;

use std::env;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, MatchedPath};
use axum::http::Request;
use axum::Router;
use potluck_core::{
    AuthService, BlobStore, IdentityProvider, RecipeAccess, RecipeActions, RecipeStore,
};
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::store::{PgBlobStore, PgIdentityProvider, PgRecipeStore};

/// Room for the non-image multipart parts of a recipe submission.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Read-side queries, memoized for one request.
    pub fn access(&self) -> RecipeAccess {
        RecipeAccess::new(self.recipes.clone())
    }

    pub fn actions(&self) -> RecipeActions {
        RecipeActions::new(self.recipes.clone(), self.blobs.clone())
            .with_max_image_bytes(self.config.max_image_bytes)
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.identity.clone())
    }
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_image_bytes + FORM_OVERHEAD_BYTES;
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::router())
        .merge(swagger_ui)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    telemetry::init_telemetry();

    let config = Config::load()?;
    let pool = db::create_pool(&config.database_url)?;

    let state = AppState {
        recipes: Arc::new(PgRecipeStore::new(pool.clone())),
        blobs: Arc::new(PgBlobStore::new(pool.clone(), &config.public_base_url)),
        identity: Arc::new(PgIdentityProvider::new(pool, config.session_ttl)),
        config: Arc::new(config.clone()),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI available at {}/swagger-ui/", config.public_base_url);
    tracing::info!(
        "OpenAPI spec available at {}/api-docs/openapi.json",
        config.public_base_url
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}
