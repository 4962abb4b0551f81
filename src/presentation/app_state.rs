// Application state shared by the command handlers
use crate::application::comparison_service::ComparisonService;
use crate::application::dashboard_service::DashboardService;
use crate::application::insight_service::InsightService;
use crate::application::notifications::Notifier;
use crate::application::report_service::ReportService;
use crate::application::session_service::SessionGate;
use crate::application::upload_service::UploadService;
use crate::infrastructure::config::AppConfig;
use std::path::PathBuf;

pub struct AppState {
    pub config: AppConfig,
    /// Resolved backend root, including `/api`.
    pub api_base: String,
    pub token_path: PathBuf,
    pub notifier: Notifier,
    pub session_gate: SessionGate,
    pub dashboard_service: DashboardService,
    pub upload_service: UploadService,
    pub insight_service: InsightService,
    pub comparison_service: ComparisonService,
    pub report_service: ReportService,
}
