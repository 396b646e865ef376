//! Best-effort, append-only event sink.
//!
//! The sink has an explicit lifecycle — `Uninitialized → Ready →
//! Unreachable` — entered once at startup. There is no reconnect logic:
//! a connection that dies later simply shows up as failed inserts, which
//! are swallowed. A logging failure must never alter the HTTP response
//! or take the process down.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db;
use crate::migrations::Migrator;
use crate::models::event;
use crate::store::StoredFile;

/// Fixed tag stamped on every event this service emits.
pub const SOURCE: &str = "canarygate";

enum SinkState {
    Uninitialized,
    Ready(DatabaseConnection),
    Unreachable,
}

/// Handle to the event store, shared across all request tasks.
#[derive(Clone)]
pub struct EventLogger {
    state: Arc<RwLock<SinkState>>,
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLogger {
    /// Create a logger with no backing store attached yet.
    pub fn new() -> Self {
        EventLogger {
            state: Arc::new(RwLock::new(SinkState::Uninitialized)),
        }
    }

    /// Wrap an already-established connection (test harness).
    pub fn with_connection(conn: DatabaseConnection) -> Self {
        EventLogger {
            state: Arc::new(RwLock::new(SinkState::Ready(conn))),
        }
    }

    /// One-shot connection attempt, made at startup.
    ///
    /// On success the events table is migrated into place and the sink
    /// becomes `Ready`. On failure the sink becomes `Unreachable` and
    /// the service keeps serving — capture is best-effort.
    pub async fn connect(&self, config: &Config) {
        let next = match db::connect(config).await {
            Ok(conn) => match Migrator::up(&conn, None).await {
                Ok(()) => {
                    tracing::info!("event sink connected: {}", config.database_url);
                    SinkState::Ready(conn)
                }
                Err(e) => {
                    tracing::warn!("event sink migration failed, capture disabled: {}", e);
                    SinkState::Unreachable
                }
            },
            Err(e) => {
                tracing::warn!("event sink unreachable, capture disabled: {}", e);
                SinkState::Unreachable
            }
        };

        *self.state.write().await = next;
    }

    /// Whether the sink is currently attached.
    pub async fn is_ready(&self) -> bool {
        matches!(*self.state.read().await, SinkState::Ready(_))
    }

    /// Clone out the underlying connection, if any (test harness).
    pub async fn connection(&self) -> Option<DatabaseConnection> {
        match &*self.state.read().await {
            SinkState::Ready(conn) => Some(conn.clone()),
            _ => None,
        }
    }

    /// Attempt a single insert of a fully-populated record.
    ///
    /// No retry, no buffering. An unattached sink is a silent no-op; a
    /// failed insert is traced and swallowed.
    pub async fn record(&self, record: EventRecord) {
        let state = self.state.read().await;
        let conn = match &*state {
            SinkState::Ready(conn) => conn,
            _ => {
                tracing::debug!(event_type = %record.event_type, "event sink not attached, dropping event");
                return;
            }
        };

        if let Err(e) = record.into_active_model().insert(conn).await {
            tracing::warn!("event insert failed: {}", e);
        }
    }
}

/// A fully-populated event document, timestamped at construction.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub timestamp: NaiveDateTime,
    pub event_type: &'static str,
    pub ip: String,
    pub method: &'static str,
    pub uri: &'static str,
    pub username: Option<String>,
    pub password: Option<String>,
    pub filename: Option<String>,
    pub stored_as: Option<String>,
    pub size: Option<i64>,
    pub mimetype: Option<String>,
    pub sha256: Option<String>,
    pub error: Option<String>,
    pub raw_log: Option<String>,
}

impl EventRecord {
    fn base(event_type: &'static str, ip: String, method: &'static str, uri: &'static str) -> Self {
        EventRecord {
            timestamp: Utc::now().naive_utc(),
            event_type,
            ip,
            method,
            uri,
            username: None,
            password: None,
            filename: None,
            stored_as: None,
            size: None,
            mimetype: None,
            sha256: None,
            error: None,
            raw_log: None,
        }
    }

    /// Credentials are recorded exactly as submitted — no normalization,
    /// no validation, no redaction. That is the point of the service.
    pub fn login(ip: String, username: String, password: String) -> Self {
        let mut rec = Self::base("login_attempt", ip, "POST", "/login");
        rec.raw_log = Some(format!(
            "Login attempt from {} with username={} & password={}",
            rec.ip, username, password
        ));
        rec.username = Some(username);
        rec.password = Some(password);
        rec
    }

    pub fn file_upload(ip: String, file: &StoredFile) -> Self {
        let mut rec = Self::base("file_upload", ip, "POST", "/upload");
        rec.raw_log = Some(format!(
            "Upload from {} of {} ({}, {} bytes)",
            rec.ip, file.original_name, file.mime_type, file.size
        ));
        rec.filename = Some(file.original_name.clone());
        rec.stored_as = Some(file.stored_name.clone());
        rec.size = Some(file.size as i64);
        rec.mimetype = Some(file.mime_type.clone());
        rec.sha256 = Some(file.sha256.clone());
        rec
    }

    pub fn upload_error(ip: String, error: String) -> Self {
        let mut rec = Self::base("upload_error", ip, "POST", "/upload");
        rec.error = Some(error);
        rec
    }

    pub fn upload_exception(ip: String, error: String) -> Self {
        let mut rec = Self::base("upload_exception", ip, "POST", "/upload");
        rec.error = Some(error);
        rec
    }

    fn into_active_model(self) -> event::ActiveModel {
        event::ActiveModel {
            timestamp: Set(self.timestamp),
            source: Set(SOURCE.to_string()),
            event_type: Set(self.event_type.to_string()),
            ip: Set(self.ip),
            method: Set(self.method.to_string()),
            uri: Set(self.uri.to_string()),
            username: Set(self.username),
            password: Set(self.password),
            filename: Set(self.filename),
            stored_as: Set(self.stored_as),
            size: Set(self.size),
            mimetype: Set(self.mimetype),
            sha256: Set(self.sha256),
            error: Set(self.error),
            raw_log: Set(self.raw_log),
            ..Default::default()
        }
    }
}
