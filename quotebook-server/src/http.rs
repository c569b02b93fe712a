//! Quotebook HTTP REST API
//!
//! Axum-based HTTP server exposing quote and thinker records as JSON.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a
//! function in `subsystems`, which works on a `Store` and is testable without
//! axum dispatch machinery.
//!
//! Endpoints:
//! - `POST/GET /quotes`, `GET /quotes/random`
//! - `GET/PATCH/DELETE /quotes/:quote_id`
//! - `GET /quotes/<category>` and `GET /quotes/<category>/random`
//! - `POST/GET /thinkers`, `GET/PATCH/DELETE /thinkers/:thinker_id`
//! - `POST/GET /thinkers/:thinker_id/quotes`
//! - `GET /health`, `GET /version`
//!
//! Every failure, including body and method rejections, answers with a JSON
//! `{ "error": ... }` body.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use quotebook_core::{
    Category, NewQuote, NewThinker, Quote, QuotePatch, QuotebookConfig, Store, Thinker,
    ThinkerPatch,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;
use crate::extract::RawId;
use crate::subsystems::{quotes, thinkers};

/// Shared state for all HTTP handlers
#[derive(Clone, Debug)]
pub struct HttpState {
    pub store: Store,
    pub config: QuotebookConfig,
}

type Route = MethodRouter<Arc<HttpState>>;

/// Unsupported methods answer a JSON 405 instead of an empty body.
fn with_json_405(route: Route) -> Route {
    route.fallback(method_not_allowed_handler)
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    let mut router: Router<Arc<HttpState>> = Router::new()
        .route("/health", with_json_405(get(health_handler)))
        .route("/version", with_json_405(get(version_handler)))
        .route(
            "/quotes",
            with_json_405(post(create_quote_handler).get(list_quotes_handler)),
        )
        .route(
            "/quotes/random",
            with_json_405(
                get(random_quote_handler)
                    .patch(update_quote_handler)
                    .delete(delete_quote_handler),
            ),
        )
        .route(
            "/quotes/:quote_id",
            with_json_405(
                get(find_quote_handler)
                    .patch(update_quote_handler)
                    .delete(delete_quote_handler),
            ),
        )
        .route(
            "/thinkers",
            with_json_405(post(create_thinker_handler).get(list_thinkers_handler)),
        )
        .route(
            "/thinkers/:thinker_id",
            with_json_405(
                get(find_thinker_handler)
                    .patch(update_thinker_handler)
                    .delete(delete_thinker_handler),
            ),
        )
        .route(
            "/thinkers/:thinker_id/quotes",
            with_json_405(
                post(create_thinker_quote_handler).get(list_thinker_quotes_handler),
            ),
        );

    // Static segments take priority over `/quotes/:quote_id`. PATCH and
    // DELETE on them still address a quote id and end in the quote 404.
    for category in Category::ALL {
        router = router
            .route(
                &format!("/quotes/{}", category.slug()),
                with_json_405(
                    get(move |state: State<Arc<HttpState>>| category_handler(state, category))
                        .patch(update_quote_handler)
                        .delete(delete_quote_handler),
                ),
            )
            .route(
                &format!("/quotes/{}/random", category.slug()),
                with_json_405(get(move |state: State<Arc<HttpState>>| {
                    random_category_handler(state, category)
                })),
            );
    }

    router = router.fallback(route_not_found_handler);

    if state.config.http.cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    store: Store,
    config: QuotebookConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = config.http.bind_addr();
    let state = Arc::new(HttpState { store, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Quotebook HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Probe the store and return (status_code, json_body).
pub async fn health_inner(store: &Store) -> (StatusCode, serde_json::Value) {
    match store.health().await {
        Ok(storage) => (
            StatusCode::OK,
            serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "storage": storage,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "status": "unhealthy",
                "error": e.to_string(),
            }),
        ),
    }
}

/// Service name and crate version.
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "quotebook",
    })
}

/// 200 with the record, or 204 with an empty body when nothing was drawn.
fn random_response(quote: Option<Quote>) -> Response {
    match quote {
        Some(quote) => (StatusCode::OK, Json(quote)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

// ============================================================================
// Axum handlers
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.store).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn route_not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn create_quote_handler(
    State(state): State<Arc<HttpState>>,
    body: Result<Json<NewQuote>, JsonRejection>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    let Json(new) = body?;
    let quote = quotes::create(&state.store, new).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn list_quotes_handler(
    State(state): State<Arc<HttpState>>,
) -> Result<Json<Vec<Quote>>, ApiError> {
    Ok(Json(quotes::list(&state.store).await?))
}

pub async fn random_quote_handler(
    State(state): State<Arc<HttpState>>,
) -> Result<Response, ApiError> {
    let mut rng = StdRng::from_entropy();
    Ok(random_response(quotes::random(&state.store, &mut rng).await?))
}

pub async fn find_quote_handler(
    State(state): State<Arc<HttpState>>,
    RawId(quote_id): RawId,
) -> Result<Json<Quote>, ApiError> {
    Ok(Json(quotes::find(&state.store, &quote_id).await?))
}

/// The id is resolved before the body is read, so an unknown quote is a 404
/// whatever the payload looks like.
pub async fn update_quote_handler(
    State(state): State<Arc<HttpState>>,
    RawId(quote_id): RawId,
    body: Result<Json<QuotePatch>, JsonRejection>,
) -> Result<Json<Quote>, ApiError> {
    quotes::find(&state.store, &quote_id).await?;
    let Json(patch) = body?;
    Ok(Json(quotes::update(&state.store, &quote_id, patch).await?))
}

pub async fn delete_quote_handler(
    State(state): State<Arc<HttpState>>,
    RawId(quote_id): RawId,
) -> Result<StatusCode, ApiError> {
    quotes::delete(&state.store, &quote_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn category_handler(
    State(state): State<Arc<HttpState>>,
    category: Category,
) -> Result<Json<Vec<Quote>>, ApiError> {
    Ok(Json(
        quotes::list_by_category(&state.store, category.name()).await?,
    ))
}

pub async fn random_category_handler(
    State(state): State<Arc<HttpState>>,
    category: Category,
) -> Result<Response, ApiError> {
    let mut rng = StdRng::from_entropy();
    let quote = quotes::random_by_category(&state.store, category.name(), &mut rng).await?;
    Ok(random_response(quote))
}

pub async fn create_thinker_handler(
    State(state): State<Arc<HttpState>>,
    body: Result<Json<NewThinker>, JsonRejection>,
) -> Result<(StatusCode, Json<Thinker>), ApiError> {
    let Json(new) = body?;
    let thinker = thinkers::create(&state.store, new).await?;
    Ok((StatusCode::CREATED, Json(thinker)))
}

pub async fn list_thinkers_handler(
    State(state): State<Arc<HttpState>>,
) -> Result<Json<Vec<Thinker>>, ApiError> {
    Ok(Json(thinkers::list(&state.store).await?))
}

pub async fn find_thinker_handler(
    State(state): State<Arc<HttpState>>,
    RawId(thinker_id): RawId,
) -> Result<Json<Thinker>, ApiError> {
    Ok(Json(thinkers::find(&state.store, &thinker_id).await?))
}

pub async fn update_thinker_handler(
    State(state): State<Arc<HttpState>>,
    RawId(thinker_id): RawId,
    body: Result<Json<ThinkerPatch>, JsonRejection>,
) -> Result<Json<Thinker>, ApiError> {
    thinkers::find(&state.store, &thinker_id).await?;
    let Json(patch) = body?;
    Ok(Json(
        thinkers::update(&state.store, &thinker_id, patch).await?,
    ))
}

pub async fn delete_thinker_handler(
    State(state): State<Arc<HttpState>>,
    RawId(thinker_id): RawId,
) -> Result<StatusCode, ApiError> {
    thinkers::delete(&state.store, &thinker_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_thinker_quote_handler(
    State(state): State<Arc<HttpState>>,
    RawId(thinker_id): RawId,
    body: Result<Json<NewQuote>, JsonRejection>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    thinkers::find_parent(&state.store, &thinker_id).await?;
    let Json(new) = body?;
    let quote = thinkers::create_quote(&state.store, &thinker_id, new).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn list_thinker_quotes_handler(
    State(state): State<Arc<HttpState>>,
    RawId(thinker_id): RawId,
) -> Result<Json<Vec<Quote>>, ApiError> {
    Ok(Json(thinkers::list_quotes(&state.store, &thinker_id).await?))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_inner_pure() {
        let v = version_inner();
        assert!(v["version"].is_string(), "version must be string");
        assert_eq!(v["service"], "quotebook");
    }

    #[tokio::test]
    async fn test_health_inner_in_memory() {
        let (status, body) = health_inner(&Store::in_memory()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage"], "in-memory");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_random_response_empty_is_no_content() {
        let response = random_response(None);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
