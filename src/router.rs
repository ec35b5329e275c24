use axum::{Router, routing::get};
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    LatencyUnit,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

use crate::config::RowScanPolicy;
use crate::error::BlogError;
use crate::handlers::blog::list_titles_handler;
use crate::service::connection::ConnectionFactory;

#[derive(Clone)]
pub struct BlogState {
    pub factory: Arc<ConnectionFactory>,
    pub row_scan: RowScanPolicy,
}

impl BlogState {
    pub fn new(factory: ConnectionFactory, row_scan: RowScanPolicy) -> Self {
        Self {
            factory: Arc::new(factory),
            row_scan,
        }
    }
}

/// The public router: one route plus an access log line per request
/// (method and path on the span, status and latency on the response event).
pub fn blog_router(state: BlogState) -> Router {
    Router::new()
        .route("/", get(list_titles_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

/// Bind `addr` and serve `app` until `shutdown` resolves.
pub async fn serve<F>(addr: &str, app: Router, shutdown: F) -> Result<(), BlogError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("Listening {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
