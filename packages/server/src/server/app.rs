use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::jobs::JobsDatabase;
use crate::kernel::BaseDocumentStore;
use crate::server::routes::{
    delete_job_handler, get_job_handler, health_handler, interested_jobs_handler,
    job_listings_handler, new_job_handler, update_interested_list_handler, update_job_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub jobs_database: JobsDatabase,
    pub store: Arc<dyn BaseDocumentStore>,
    /// Longest a handler waits on a database call
    pub request_timeout: Duration,
}

impl AxumAppState {
    pub fn new(store: Arc<dyn BaseDocumentStore>, request_timeout: Duration) -> Self {
        Self {
            jobs_database: JobsDatabase::new(Arc::clone(&store)),
            store,
            request_timeout,
        }
    }
}

/// Build the Axum application router
pub fn build_app(store: Arc<dyn BaseDocumentStore>, config: &Config) -> Router {
    let app_state = AxumAppState::new(store, config.request_timeout);

    // CORS configuration - any origin unless ALLOWED_ORIGINS narrows it
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin(&config.allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route(
            "/jobs",
            get(get_job_handler)
                .post(new_job_handler)
                .patch(update_job_handler),
        )
        .route("/jobs/listings", get(job_listings_handler))
        .route("/jobs/delete", post(delete_job_handler))
        .route(
            "/my-interested-list",
            get(interested_jobs_handler).post(update_interested_list_handler),
        )
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn allowed_origin(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() {
        return Any.into();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}
