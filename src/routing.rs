use axum::routing::{get, post};
use axum::Router;

use crate::controllers::{console, AppState};

/// Build the console's route table.
pub fn build_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(console::login_page))
        .route("/login", post(console::login))
        .route("/dashboard", get(console::dashboard))
        .route("/upload", get(console::upload_page).post(console::upload))
        .route("/healthz", get(console::healthz))
}
