// Service-level errors
use super::dashboard_api::ApiError;
use crate::domain::comparison::SelectionError;
use crate::domain::filters::InvertedRange;
use crate::domain::upload::UploadRejection;
use std::path::PathBuf;

/// Problems caught on the client before anything is sent.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Upload(#[from] UploadRejection),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Range(#[from] InvertedRange),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a question")]
    BlankQuestion,
    #[error("Not logged in")]
    NotLoggedIn,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not access session storage: {0}")]
    Storage(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Invalid(_))
    }

    /// Services toast every failure they return, except session storage errors.
    pub fn was_notified(&self) -> bool {
        !matches!(self, ServiceError::Storage(_))
    }
}

impl From<UploadRejection> for ServiceError {
    fn from(value: UploadRejection) -> Self {
        ServiceError::Invalid(value.into())
    }
}

impl From<SelectionError> for ServiceError {
    fn from(value: SelectionError) -> Self {
        ServiceError::Invalid(value.into())
    }
}
