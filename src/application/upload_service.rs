// Upload service - validates a workbook locally, then sends it for ingestion
use crate::application::dashboard_api::DashboardApi;
use crate::application::errors::ServiceError;
use crate::application::notifications::Notifier;
use crate::domain::upload::{UploadFile, UploadRejection, UploadResult, check_upload};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct UploadService {
    api: Arc<dyn DashboardApi>,
    notifier: Notifier,
}

impl UploadService {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    /// Runs the name and size checks before reading the file into memory.
    pub async fn prepare(path: &Path) -> Result<UploadFile, ServiceError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(UploadRejection::Missing)?
            .to_string();

        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(UploadRejection::Missing.into()),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(UploadRejection::Missing.into()),
            Err(source) => {
                return Err(ServiceError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        check_upload(&file_name, metadata.len())?;

        let content = tokio::fs::read(path).await.map_err(|source| ServiceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(UploadFile {
            file_name,
            content: Bytes::from(content),
        })
    }

    pub async fn upload(&self, token: &str, path: &Path) -> Result<UploadResult, ServiceError> {
        let file = match Self::prepare(path).await {
            Ok(file) => file,
            Err(e) => {
                self.notifier.error(e.to_string());
                return Err(e);
            }
        };

        tracing::info!(file = %file.file_name, size_mb = file.size_mb(), "uploading workbook");

        match self.api.upload(token, file).await {
            Ok(result) => {
                let message = if result.message.is_empty() {
                    "Data uploaded and ingested successfully"
                } else {
                    result.message.as_str()
                };
                self.notifier.success(message);
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "upload failed");
                let detail = if e.detail().is_empty() { "Upload failed" } else { e.detail() };
                self.notifier.error(detail);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::ValidationError;
    use crate::application::test_support::FakeApi;
    use std::sync::atomic::Ordering;

    fn service(api: Arc<FakeApi>) -> UploadService {
        let (notifier, _rx) = Notifier::channel();
        UploadService::new(api, notifier)
    }

    #[tokio::test]
    async fn test_non_excel_rejected_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant_data.csv");
        std::fs::write(&path, "Date,Plant\n").unwrap();
        let api = Arc::new(FakeApi::new());

        let err = service(api.clone()).upload("t", &path).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Invalid(ValidationError::Upload(UploadRejection::NotExcel))
        ));
        assert_eq!(api.calls.upload.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::new());

        let err = service(api.clone())
            .upload("t", &dir.path().join("absent.xlsx"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please select a file first");
        assert_eq!(api.calls.upload.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_excel_file_is_sent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Plant_Data.xlsx");
        std::fs::write(&path, b"PK\x03\x04workbook").unwrap();
        let api = Arc::new(FakeApi::new());

        let result = service(api.clone()).upload("t", &path).await.unwrap();

        assert_eq!(result.message, "Data uploaded and ingested successfully");
        assert_eq!(*api.uploaded.lock().unwrap(), vec!["Plant_Data.xlsx".to_string()]);
    }

    #[tokio::test]
    async fn test_upper_case_extension_rejected_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PLANT_DATA.XLSX");
        std::fs::write(&path, b"PK\x03\x04workbook").unwrap();
        let api = Arc::new(FakeApi::new());

        let err = service(api.clone()).upload("t", &path).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Invalid(ValidationError::Upload(UploadRejection::NotExcel))
        ));
        assert_eq!(api.calls.upload.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prepare_reads_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xls");
        std::fs::write(&path, b"abc").unwrap();

        let file = UploadService::prepare(&path).await.unwrap();

        assert_eq!(file.file_name, "data.xls");
        assert_eq!(file.content, Bytes::from_static(b"abc"));
    }
}
