//! # pinnote-api
//!
//! REST surface over a [`NoteRepository`]: five note operations, a health
//! check, and the OpenAPI document. Listing runs the shared query engine
//! server-side so clients never filter or sort on their own.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use pinnote_core::NoteRepository;

pub use config::{ApiConfig, StoreBackend};
pub use error::ApiError;

use handlers::notes::{create_note, delete_note, get_note, list_notes, replace_note};
use middleware::{cors_layer, MakeRequestUuidV7};

/// Collection paths the note routes are mounted under.
pub const NOTE_PREFIXES: [&str; 2] = ["/notes", "/api/notes"];

/// Shared handler state: only the repository handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoteRepository>,
}

impl AppState {
    pub fn new(store: impl NoteRepository + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the application router with its middleware stack.
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(handlers::openapi_json));

    for prefix in NOTE_PREFIXES {
        router = router
            .route(prefix, get(list_notes).post(create_note))
            .route(
                &format!("{}/:id", prefix),
                get(get_note).put(replace_note).delete(delete_note),
            );
    }

    // Outermost first: the request id exists before tracing starts.
    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(&config.allowed_origins))
                .map_response(axum::response::IntoResponse::into_response)
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes)),
        )
        .with_state(state)
}
