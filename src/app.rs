use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::controllers::AppState;
use crate::logger::EventLogger;
use crate::routing;
use crate::store::ContentStore;

/// The decoy console application.
pub struct App {
    pub config: Config,
    pub store: ContentStore,
    pub logger: EventLogger,
}

impl App {
    /// Create the application from environment configuration.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::from_env()?;
        Self::with_config(config).await
    }

    /// Create the application with a given config.
    ///
    /// The event sink is attempted exactly once here; an unreachable
    /// store downgrades capture to a no-op but never blocks startup.
    pub async fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let store = ContentStore::new(&config.upload_dir, config.max_upload_size);
        store.ensure_dir().await?;

        let logger = EventLogger::new();
        logger.connect(&config).await;

        Ok(App {
            config,
            store,
            logger,
        })
    }

    /// Build the Axum router.
    pub fn router(&self) -> Router {
        let is_dev = self.config.is_dev();

        let state = AppState {
            config: Arc::new(self.config.clone()),
            store: self.store.clone(),
            logger: self.logger.clone(),
        };

        // Let bodies through comfortably past the upload ceiling so the
        // store's own PayloadTooLarge check is the one that fires.
        let body_limit = usize::try_from(
            self.config
                .max_upload_size
                .saturating_mul(2)
                .saturating_add(64 * 1024),
        )
        .unwrap_or(usize::MAX);

        let mut router = routing::build_routes()
            .with_state(state)
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(CatchPanicLayer::custom(handle_panic));

        // Only add request-id/tracing middleware in development mode.
        if is_dev {
            use tower_http::trace::DefaultMakeSpan;
            use tower_http::trace::DefaultOnRequest;
            use tower_http::trace::DefaultOnResponse;
            use tower_http::LatencyUnit;

            let x_request_id = axum::http::HeaderName::from_static("x-request-id");
            router = router
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                );
        }

        router
    }

    /// Run the console server until ctrl-c.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.server_addr();
        let sink_ready = self.logger.is_ready().await;
        let router = self.router();

        println!("\n🪤 canarygate decoy console is running!");
        println!("   → Server: http://{}", addr);
        println!("   → Uploads: {}", self.config.upload_dir);
        println!(
            "   → Event sink: {}",
            if sink_ready { "attached" } else { "unreachable (capture disabled)" }
        );
        println!();

        tracing::info!("decoy console listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

/// Supervisory boundary: a panicking handler is logged and answered with
/// an inert page, never allowed to take the process down.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("request handler panicked: {}", detail);

    (
        StatusCode::OK,
        Html("<!doctype html><html><body><p>Operation completed.</p></body></html>".to_string()),
    )
        .into_response()
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutting down decoy console...");
}
