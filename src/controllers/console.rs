//! The decoy console's route handlers.
//!
//! Every handler is infallible from the client's point of view: whatever
//! happens, the response is a rendered view with a believable message.
//! Per-request failures are recorded as their own event types, never
//! surfaced as raw errors.

use std::net::SocketAddr;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::FormRejection;
use axum::extract::{ConnectInfo, Multipart, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::{Form, Json};
use bytes::Bytes;
use serde::Deserialize;

use crate::controllers::AppState;
use crate::error::TrapError;
use crate::ident;
use crate::logger::EventRecord;
use crate::store::{ContentStore, StoredFile};
use crate::views::{self, DashboardView, LoginView, UploadView};

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET `/` — the login page.
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    views::render(LoginView {
        brand: state.config.brand_name.clone(),
        slogan: state.config.app_slogan.clone(),
        host: advertised_host(&state, &headers),
    })
}

/// POST `/login` — accepts any credentials, records them verbatim, and
/// renders the dashboard as if the login succeeded.
///
/// A body that isn't even form-encoded is treated as empty credentials;
/// the attempt is still recorded.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Html<String> {
    let creds = form.map(|Form(f)| f).unwrap_or_default();
    let ip = ident::client_ip(&headers, Some(peer));

    tracing::info!(%ip, username = %creds.username, "captured login attempt");
    state
        .logger
        .record(EventRecord::login(ip, creds.username, creds.password))
        .await;

    render_dashboard(&state, &headers, None).await
}

/// GET `/dashboard` — the status view.
pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    render_dashboard(&state, &headers, None).await
}

/// GET `/upload` — minimal upload form.
pub async fn upload_page(State(state): State<AppState>) -> Html<String> {
    views::render(UploadView {
        brand: state.config.brand_name.clone(),
    })
}

/// POST `/upload` — stage the file, hash it, record the outcome.
///
/// Exactly one of `file_upload`, `upload_error`, or `upload_exception`
/// is recorded per request, and the dashboard is rendered either way.
/// A body that isn't multipart at all is an `upload_error` like any
/// other unreadable upload, never a bare extractor rejection.
pub async fn upload(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Html<String> {
    let ip = ident::client_ip(&headers, Some(peer));

    let outcome = match multipart {
        Ok(multipart) => ingest_upload(&state.store, multipart).await,
        Err(rejection) => Err(TrapError::Multipart(rejection.body_text())),
    };

    let msg = match outcome {
        Ok(file) => {
            tracing::info!(%ip, filename = %file.original_name, sha256 = %file.sha256, "captured upload");
            let msg = format!("Uploaded: {} (sha256={})", file.original_name, file.sha256);
            state.logger.record(EventRecord::file_upload(ip, &file)).await;
            msg
        }
        Err(e) => {
            tracing::warn!(%ip, "upload failed: {}", e);
            let record = match e.event_type() {
                "upload_error" => EventRecord::upload_error(ip, e.to_string()),
                _ => EventRecord::upload_exception(ip, e.to_string()),
            };
            state.logger.record(record).await;
            e.operator_message().to_string()
        }
    };

    render_dashboard(&state, &headers, Some(msg)).await
}

/// GET `/healthz` — liveness.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// Pull the file part out of the multipart body and stage it.
///
/// Only parts carrying a filename count as files, whatever they are
/// named. Prefers the one named `file`; falls back to the first file
/// part. No file part at all is `MissingPayload`.
async fn ingest_upload(
    store: &ContentStore,
    mut multipart: Multipart,
) -> Result<StoredFile, TrapError> {
    let mut fallback: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TrapError::Multipart(e.to_string()))?
    {
        let named_file = field.name() == Some("file");
        let Some(original) = field.file_name().map(|s| s.to_string()) else {
            // Plain form field; not an upload.
            continue;
        };

        let mime = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| TrapError::Multipart(e.to_string()))?;

        if named_file {
            return store.ingest(&original, mime.as_deref(), &data).await;
        }
        if fallback.is_none() {
            fallback = Some((original, mime, data));
        }
    }

    match fallback {
        Some((original, mime, data)) => store.ingest(&original, mime.as_deref(), &data).await,
        None => Err(TrapError::MissingPayload),
    }
}

async fn render_dashboard(state: &AppState, headers: &HeaderMap, msg: Option<String>) -> Html<String> {
    views::render(DashboardView::new(
        state.config.brand_name.clone(),
        state.config.app_slogan.clone(),
        advertised_host(state, headers),
        state.logger.is_ready().await,
        msg,
    ))
}

fn advertised_host(state: &AppState, headers: &HeaderMap) -> String {
    state
        .config
        .brand_host
        .clone()
        .or_else(|| ident::forwarded_host(headers))
        .unwrap_or_else(|| "appliance.local".to_string())
}
