use tracing::warn;

use crate::db::document_repository::DocumentRepository;
use crate::errors::AppError;
use crate::models::DocumentRecord;

const PDF_EXTENSION: &str = ".pdf";

#[derive(Clone)]
pub struct DocumentService {
    repo: DocumentRepository,
    max_upload_bytes: usize,
}

impl DocumentService {
    pub fn new(repo: DocumentRepository, max_upload_bytes: usize) -> Self {
        Self { repo, max_upload_bytes }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Only the filename is checked here; browsers are inconsistent about
    /// the part's declared content type.
    pub fn check_filename(&self, filename: &str) -> Result<(), AppError> {
        if filename.to_lowercase().ends_with(PDF_EXTENSION) {
            Ok(())
        } else {
            warn!(filename = %filename, "rejected non-PDF upload");
            Err(AppError::NotPdf { filename: filename.to_string() })
        }
    }

    pub fn check_size(&self, received: usize) -> Result<(), AppError> {
        if received > self.max_upload_bytes {
            Err(AppError::FileTooLarge { max_bytes: self.max_upload_bytes })
        } else {
            Ok(())
        }
    }

    pub async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<DocumentRecord, AppError> {
        self.check_filename(filename)?;
        self.check_size(bytes.len())?;
        self.repo.save(filename, content_type, bytes).await
    }

    pub async fn list(&self) -> Vec<DocumentRecord> {
        self.repo.find_all().await
    }

    pub async fn read(&self, id: &str) -> Result<Vec<u8>, AppError> {
        self.repo.read_bytes(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &std::path::Path, max: usize) -> DocumentService {
        DocumentService::new(DocumentRepository::new(dir), max)
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), 1024);
        assert!(svc.check_filename("Annual-Report.PDF").is_ok());
        assert!(svc.check_filename("notes.txt").is_err());
        assert!(svc.check_filename("pdf").is_err());
    }

    #[test]
    fn size_limit_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), 1024);
        assert!(svc.check_size(1024).is_ok());
        assert!(svc.check_size(1025).unwrap_err().is_too_large());
    }

    #[tokio::test]
    async fn store_rejects_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), 4);
        let err = svc.store("big.pdf", "application/pdf", b"12345").await.unwrap_err();
        assert!(err.is_too_large());
        assert!(svc.list().await.is_empty());
    }

    #[tokio::test]
    async fn stored_document_is_listed_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), 1024);
        let record = svc.store("report.pdf", "application/pdf", b"%PDF").await.unwrap();

        let listed = svc.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, "report.pdf");
        assert_eq!(svc.read(&record.id).await.unwrap(), b"%PDF");
        assert_eq!(record.file_url(), format!("/api/documents/{}/file", record.id));
    }
}
