use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One captured interaction. Rows are append-only: the service inserts
/// and never updates or deletes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Server-assigned capture time, never client-supplied
    pub timestamp: NaiveDateTime,

    /// Fixed tag identifying the emitting service
    pub source: String,

    /// login_attempt | file_upload | upload_error | upload_exception
    pub event_type: String,

    /// Best-effort client address ("unknown" when unresolvable)
    pub ip: String,

    pub method: String,
    pub uri: String,

    /// Login attempts: credentials exactly as submitted
    pub username: Option<String>,
    pub password: Option<String>,

    /// Uploads: metadata derived from the bytes on disk
    pub filename: Option<String>,
    pub stored_as: Option<String>,
    pub size: Option<i64>,
    pub mimetype: Option<String>,
    pub sha256: Option<String>,

    /// Failure events: short description of what went wrong
    pub error: Option<String>,

    /// Human-readable summary, redundant with the structured fields
    pub raw_log: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
