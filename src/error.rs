use axum::http::StatusCode;
use thiserror::Error;

/// Failure taxonomy for the decoy console.
///
/// Every variant is caught at the handler boundary and converted into a
/// rendered view with a short operator-facing message; raw error text is
/// never shown to the client.
#[derive(Debug, Error)]
pub enum TrapError {
    #[error("No file provided (missing multipart form-data)")]
    MissingPayload,

    #[error("File exceeds maximum size of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Storage failure: {0}")]
    StorageWrite(#[from] std::io::Error),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("Log sink failure: {0}")]
    LogSink(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Unexpected(String),
}

impl TrapError {
    /// Get the HTTP status code this error would map to.
    ///
    /// The console almost never uses these — handlers render a 200
    /// dashboard on failure to keep the illusion intact — but the
    /// mapping is kept for diagnostics and the panic boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrapError::MissingPayload => StatusCode::BAD_REQUEST,
            TrapError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            TrapError::Multipart(_) => StatusCode::BAD_REQUEST,
            TrapError::StorageWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TrapError::LogSink(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TrapError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Which event type a failed upload is recorded as.
    pub fn event_type(&self) -> &'static str {
        match self {
            TrapError::MissingPayload | TrapError::PayloadTooLarge { .. } | TrapError::Multipart(_) => {
                "upload_error"
            }
            _ => "upload_exception",
        }
    }

    /// Short generic message rendered in the dashboard view.
    pub fn operator_message(&self) -> &'static str {
        match self {
            TrapError::MissingPayload => "No file uploaded. Choose a file and submit.",
            TrapError::PayloadTooLarge { .. } => "File too large for this appliance.",
            TrapError::Multipart(_) => "Upload could not be read. Try again.",
            _ => "Server error while handling upload.",
        }
    }
}
