use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::TrapError;
use crate::hash;

/// Metadata about a stored upload.
///
/// `size` and `sha256` describe the bytes actually on disk, read back
/// after the write — never the client-supplied values.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    /// Original filename from the upload (untrusted)
    pub original_name: String,
    /// Time-prefixed, sanitized on-disk name
    pub stored_name: String,
    /// MIME content type (declared by the client, or guessed from the name)
    pub mime_type: String,
    /// Byte length of the file as written
    pub size: u64,
    /// Hex SHA-256 of the file as written
    pub sha256: String,
    /// Full path of the stored file
    pub path: PathBuf,
}

/// Durable staging area for uploaded bytes.
///
/// Files are written to `upload_dir` under a name of the form
/// `<arrival-epoch-millis>__<sanitized-original-name>`, which avoids both
/// collisions and path traversal. Files are never mutated or deleted
/// here; retention is an external concern.
#[derive(Clone)]
pub struct ContentStore {
    pub upload_dir: PathBuf,
    pub max_size: u64,
}

impl ContentStore {
    pub fn new(upload_dir: impl Into<PathBuf>, max_size: u64) -> Self {
        ContentStore {
            upload_dir: upload_dir.into(),
            max_size,
        }
    }

    /// Ensure the upload directory exists. Idempotent.
    pub async fn ensure_dir(&self) -> Result<(), TrapError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        Ok(())
    }

    /// Stage an uploaded byte buffer on disk and describe what was written.
    ///
    /// Rejects payloads over the configured ceiling before touching disk.
    /// Size and hash are taken from a read-back of the stored file so the
    /// recorded identity always matches the artifact on disk.
    pub async fn ingest(
        &self,
        original_name: &str,
        declared_mime: Option<&str>,
        data: &[u8],
    ) -> Result<StoredFile, TrapError> {
        if data.len() as u64 > self.max_size {
            return Err(TrapError::PayloadTooLarge {
                limit: self.max_size,
            });
        }

        self.ensure_dir().await?;

        let stored_name = format!(
            "{}__{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_name(original_name)
        );
        let file_path = self.upload_dir.join(&stored_name);

        tokio::fs::write(&file_path, data).await?;

        // Hash what actually landed on disk, not the upload buffer.
        let written = tokio::fs::read(&file_path).await?;
        let size = tokio::fs::metadata(&file_path).await?.len();
        let sha256 = hash::sha256_hex(&written);

        let mime_type = declared_mime
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                mime_guess::from_path(original_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        Ok(StoredFile {
            original_name: original_name.to_string(),
            stored_name,
            mime_type,
            size,
            sha256,
            path: file_path,
        })
    }
}

/// Reduce an untrusted filename to `[A-Za-z0-9._-]`.
///
/// Every other character (path separators, null bytes, control codes,
/// anything unicode) becomes `_`. Empty input falls back to
/// `upload.bin`. Total and idempotent.
pub fn sanitize_name(original: &str) -> String {
    if original.is_empty() {
        return "upload.bin".to_string();
    }
    original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
