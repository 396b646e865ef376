//! View models for the rendered console pages.
//!
//! Everything here is set dressing: the dashboard's sessions, firewall
//! flag, and "last failed login" are fabricated to make the console look
//! inhabited. Only the `connected` flag reflects real state (the event
//! sink), and even that is presented as appliance telemetry.

use askama::Template;
use axum::response::Html;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginView {
    pub brand: String,
    pub slogan: String,
    pub host: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardView {
    pub brand: String,
    pub slogan: String,
    pub host: String,
    pub msg: Option<String>,
    pub system_ok: bool,
    pub firewall_enabled: bool,
    pub connected: bool,
    pub sessions: Vec<String>,
    pub last_failed: String,
}

impl DashboardView {
    pub fn new(
        brand: String,
        slogan: String,
        host: String,
        connected: bool,
        msg: Option<String>,
    ) -> Self {
        DashboardView {
            brand,
            slogan,
            host,
            msg,
            system_ok: true,
            firewall_enabled: true,
            connected,
            sessions: vec![
                "admin@192.168.0.101 - Session #3145".to_string(),
                "root@10.10.10.1 - Session #2988".to_string(),
            ],
            last_failed: "12 mins ago".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadView {
    pub brand: String,
}

/// Render a template into an HTML response.
///
/// A render failure would only come from a broken template shipped with
/// the binary; fall back to an inert page rather than an error.
pub fn render<T: Template>(view: T) -> Html<String> {
    match view.render() {
        Ok(body) => Html(body),
        Err(e) => {
            tracing::error!("template render failed: {}", e);
            Html("<!doctype html><html><body><p>Loading…</p></body></html>".to_string())
        }
    }
}
