// In-memory fakes of the backend and token storage for service tests
use super::dashboard_api::{ApiError, DashboardApi};
use super::token_store::TokenStore;
use crate::domain::charts::{ChartBundle, ChartRow, ChartSource, KpiResponse};
use crate::domain::filters::DashboardFilters;
use crate::domain::insight::{InsightRequest, InsightResponse};
use crate::domain::kpi::KpiSet;
use crate::domain::report::{ReportAck, ReportRequest};
use crate::domain::role::Role;
use crate::domain::session::UserInfo;
use crate::domain::upload::{UploadFile, UploadResult};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct Scripted<T> {
    delay: Duration,
    result: Result<T, ApiError>,
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result
    }
}

#[derive(Default)]
pub struct Calls {
    pub login: AtomicUsize,
    pub me: AtomicUsize,
    pub upload: AtomicUsize,
    pub kpis: AtomicUsize,
    pub charts: AtomicUsize,
    pub insights: AtomicUsize,
    pub send_report: AtomicUsize,
}

pub struct FakeApi {
    pub calls: Calls,
    login: Mutex<Result<String, ApiError>>,
    me: Mutex<Result<UserInfo, ApiError>>,
    kpi_script: Mutex<VecDeque<Scripted<KpiResponse>>>,
    chart_script: Mutex<VecDeque<Scripted<ChartBundle>>>,
    plant_kpis: Mutex<HashMap<String, KpiSet>>,
    plant_charts: Mutex<HashMap<String, ChartBundle>>,
    prompts: Mutex<Result<Vec<String>, ApiError>>,
    insight: Mutex<Result<InsightResponse, ApiError>>,
    report: Mutex<Result<ReportAck, ApiError>>,
    pub requested: Mutex<Vec<DashboardFilters>>,
    pub uploaded: Mutex<Vec<String>>,
    pub insight_requests: Mutex<Vec<InsightRequest>>,
    pub report_requests: Mutex<Vec<ReportRequest>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: Calls::default(),
            login: Mutex::new(Ok("token-123".to_string())),
            me: Mutex::new(Ok(UserInfo {
                email: "demo@starcement.com".to_string(),
                role: Role::Cxo,
            })),
            kpi_script: Mutex::new(VecDeque::new()),
            chart_script: Mutex::new(VecDeque::new()),
            plant_kpis: Mutex::new(HashMap::new()),
            plant_charts: Mutex::new(HashMap::new()),
            prompts: Mutex::new(Ok(vec!["Why did EBITDA drop last month?".to_string()])),
            insight: Mutex::new(Ok(InsightResponse {
                status: "success".to_string(),
                summary: "Power consumption drove costs up".to_string(),
                ..InsightResponse::default()
            })),
            report: Mutex::new(Ok(ReportAck {
                status: Some("success".to_string()),
                message: Some("Report sent".to_string()),
            })),
            requested: Mutex::new(Vec::new()),
            uploaded: Mutex::new(Vec::new()),
            insight_requests: Mutex::new(Vec::new()),
            report_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_login(&self, result: Result<String, ApiError>) {
        *self.login.lock().unwrap() = result;
    }

    pub fn set_me(&self, result: Result<UserInfo, ApiError>) {
        *self.me.lock().unwrap() = result;
    }

    pub fn set_prompts(&self, result: Result<Vec<String>, ApiError>) {
        *self.prompts.lock().unwrap() = result;
    }

    pub fn set_insight(&self, result: Result<InsightResponse, ApiError>) {
        *self.insight.lock().unwrap() = result;
    }

    pub fn set_report(&self, result: Result<ReportAck, ApiError>) {
        *self.report.lock().unwrap() = result;
    }

    /// Queues the answer for the next `kpis` call; unscripted calls use the per-plant table.
    pub fn script_kpis(&self, delay: Duration, result: Result<KpiResponse, ApiError>) {
        self.kpi_script
            .lock()
            .unwrap()
            .push_back(Scripted { delay, result });
    }

    pub fn script_charts(&self, delay: Duration, result: Result<ChartBundle, ApiError>) {
        self.chart_script
            .lock()
            .unwrap()
            .push_back(Scripted { delay, result });
    }

    pub fn set_plant_kpis(&self, plant: &str, kpis: KpiSet) {
        self.plant_kpis
            .lock()
            .unwrap()
            .insert(plant.to_string(), kpis);
    }

    pub fn set_plant_charts(&self, plant: &str, charts: ChartBundle) {
        self.plant_charts
            .lock()
            .unwrap()
            .insert(plant.to_string(), charts);
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<String, ApiError> {
        self.calls.login.fetch_add(1, Ordering::SeqCst);
        self.login.lock().unwrap().clone()
    }

    async fn me(&self, _token: &str) -> Result<UserInfo, ApiError> {
        self.calls.me.fetch_add(1, Ordering::SeqCst);
        self.me.lock().unwrap().clone()
    }

    async fn upload(&self, _token: &str, file: UploadFile) -> Result<UploadResult, ApiError> {
        self.calls.upload.fetch_add(1, Ordering::SeqCst);
        self.uploaded.lock().unwrap().push(file.file_name);
        Ok(UploadResult {
            status: Some("ok".to_string()),
            message: "Data uploaded and ingested successfully".to_string(),
            ..UploadResult::default()
        })
    }

    async fn kpis(&self, _token: &str, filters: &DashboardFilters) -> Result<KpiResponse, ApiError> {
        self.calls.kpis.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(filters.clone());
        let scripted = self.kpi_script.lock().unwrap().pop_front();
        match scripted {
            Some(step) => step.resolve().await,
            None => {
                let kpis = self
                    .plant_kpis
                    .lock()
                    .unwrap()
                    .get(filters.plant.as_str())
                    .cloned()
                    .unwrap_or_default();
                Ok(KpiResponse {
                    kpis,
                    ..KpiResponse::default()
                })
            }
        }
    }

    async fn charts(&self, _token: &str, filters: &DashboardFilters) -> Result<ChartBundle, ApiError> {
        self.calls.charts.fetch_add(1, Ordering::SeqCst);
        let scripted = self.chart_script.lock().unwrap().pop_front();
        match scripted {
            Some(step) => step.resolve().await,
            None => {
                let charts = self
                    .plant_charts
                    .lock()
                    .unwrap()
                    .get(filters.plant.as_str())
                    .cloned()
                    .unwrap_or_default();
                Ok(charts)
            }
        }
    }

    async fn insight_prompts(&self) -> Result<Vec<String>, ApiError> {
        self.prompts.lock().unwrap().clone()
    }

    async fn insights(&self, _token: &str, request: &InsightRequest) -> Result<InsightResponse, ApiError> {
        self.calls.insights.fetch_add(1, Ordering::SeqCst);
        self.insight_requests.lock().unwrap().push(request.clone());
        self.insight.lock().unwrap().clone()
    }

    async fn send_report(&self, _token: &str, request: &ReportRequest) -> Result<ReportAck, ApiError> {
        self.calls.send_report.fetch_add(1, Ordering::SeqCst);
        self.report_requests.lock().unwrap().push(request.clone());
        self.report.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.current())
    }

    fn save(&self, token: &str) -> anyhow::Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

pub fn kpis(pairs: &[(&str, f64)]) -> KpiSet {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn kpi_response(pairs: &[(&str, f64)]) -> KpiResponse {
    KpiResponse {
        kpis: kpis(pairs),
        ..KpiResponse::default()
    }
}

pub fn monthly_finance(rows: &[(&str, f64)]) -> ChartBundle {
    let mut bundle = ChartBundle::default();
    bundle.insert(
        ChartSource::MonthlyFinance,
        rows.iter()
            .map(|(month, ebitda)| {
                [("month", serde_json::json!(month)), ("ebitda", serde_json::json!(ebitda))]
                    .into_iter()
                    .collect::<ChartRow>()
            })
            .collect(),
    );
    bundle
}
