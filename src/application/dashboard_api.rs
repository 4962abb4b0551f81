// Backend API trait - the REST seam every service talks through
use crate::domain::charts::{ChartBundle, KpiResponse};
use crate::domain::filters::DashboardFilters;
use crate::domain::insight::{InsightRequest, InsightResponse};
use crate::domain::report::{ReportAck, ReportRequest};
use crate::domain::session::UserInfo;
use crate::domain::upload::{UploadFile, UploadResult};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 401 from the backend; carries its `detail`.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{detail} (HTTP {status})")]
    Status { status: u16, detail: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response from backend: {0}")]
    Decode(String),
    /// 2xx insight answer whose `status` was not `success`.
    #[error("{0}")]
    InsightFailed(String),
}

impl ApiError {
    /// Message fit for a toast: the backend's own wording when it sent one.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Unauthorized(detail) => detail,
            ApiError::Status { detail, .. } => detail,
            ApiError::Network(msg) | ApiError::Decode(msg) | ApiError::InsightFailed(msg) => msg,
        }
    }
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError>;

    /// Who the token belongs to
    async fn me(&self, token: &str) -> Result<UserInfo, ApiError>;

    async fn upload(&self, token: &str, file: UploadFile) -> Result<UploadResult, ApiError>;

    /// KPI values, trend series and plant comparisons for a filter set
    async fn kpis(&self, token: &str, filters: &DashboardFilters) -> Result<KpiResponse, ApiError>;

    /// Chart series for a filter set
    async fn charts(&self, token: &str, filters: &DashboardFilters) -> Result<ChartBundle, ApiError>;

    /// Sample questions for the insight prompt (no auth)
    async fn insight_prompts(&self) -> Result<Vec<String>, ApiError>;

    async fn insights(&self, token: &str, request: &InsightRequest) -> Result<InsightResponse, ApiError>;

    async fn send_report(&self, token: &str, request: &ReportRequest) -> Result<ReportAck, ApiError>;
}
