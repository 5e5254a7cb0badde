use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{DocumentRecord, DocumentStatus};

/// Stores uploaded bytes as `{upload_dir}/{id}.pdf` and keeps the record
/// index in memory, oldest first.
#[derive(Clone)]
pub struct DocumentRepository {
    upload_dir: PathBuf,
    records: Arc<RwLock<Vec<DocumentRecord>>>,
}

impl DocumentRepository {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.upload_dir.join(format!("{id}.pdf"))
    }

    pub async fn find_all(&self) -> Vec<DocumentRecord> {
        self.records.read().await.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<DocumentRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn save(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<DocumentRecord, AppError> {
        tokio::fs::create_dir_all(&self.upload_dir).await.map_err(|e| {
            error!("Failed to create upload directory {}: {e}", self.upload_dir.display());
            AppError::storage(filename, e)
        })?;

        let record = DocumentRecord {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes: bytes.len(),
            upload_date: Utc::now(),
            status: DocumentStatus::Stored,
        };

        tokio::fs::write(self.path_for(&record.id), bytes).await.map_err(|e| {
            error!("Failed to write document {}: {e}", record.id);
            AppError::storage(filename, e)
        })?;

        info!(
            document_id = %record.id,
            filename = %record.filename,
            size_bytes = record.size_bytes,
            "document stored"
        );
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    pub async fn read_bytes(&self, id: &str) -> Result<Vec<u8>, AppError> {
        if self.find_by_id(id).await.is_none() {
            return Err(AppError::DocumentNotFound { id: id.to_string() });
        }
        tokio::fs::read(self.path_for(id)).await.map_err(|e| {
            error!("Failed to read document {id}: {e}");
            AppError::StorageReadFailed { id: id.to_string(), source: e }
        })
    }
}
