// REST client for the KPI backend
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::charts::{ChartBundle, ChartsResponse, KpiResponse};
use crate::domain::filters::DashboardFilters;
use crate::domain::insight::{InsightRequest, InsightResponse, PromptList};
use crate::domain::report::{ReportAck, ReportRequest};
use crate::domain::session::UserInfo;
use crate::domain::upload::{UploadFile, UploadResult};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

impl HttpDashboardApi {
    /// `base_url` may be given with or without the trailing `/api`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.ends_with("/api") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/api")
        };

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn filtered_url(&self, path: &str, filters: &DashboardFilters) -> String {
        let query = filters
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url(path), query)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Network("request timed out".to_string())
                } else {
                    ApiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(status, &body);
            tracing::debug!(status = status.as_u16(), %detail, "backend returned an error");
            return Err(if status == StatusCode::UNAUTHORIZED {
                ApiError::Unauthorized(detail)
            } else {
                ApiError::Status {
                    status: status.as_u16(),
                    detail,
                }
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pulls a readable message out of an error body: `{detail}`, then `{message}`.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        match value.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            // Validation errors arrive as a list of {msg}
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() && body.len() <= 200 && !body.starts_with('<') {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.send(request).await?;
        Ok(response.access_token)
    }

    async fn me(&self, token: &str) -> Result<UserInfo, ApiError> {
        self.send(self.client.get(self.url("/auth/me")).bearer_auth(token))
            .await
    }

    async fn upload(&self, token: &str, file: UploadFile) -> Result<UploadResult, ApiError> {
        let part = Part::bytes(file.content.to_vec()).file_name(file.file_name);
        let form = Form::new().part("file", part);
        let request = self
            .client
            .post(self.url("/upload"))
            .bearer_auth(token)
            .multipart(form);
        self.send(request).await
    }

    async fn kpis(&self, token: &str, filters: &DashboardFilters) -> Result<KpiResponse, ApiError> {
        let request = self
            .client
            .get(self.filtered_url("/kpis", filters))
            .bearer_auth(token);
        self.send(request).await
    }

    async fn charts(&self, token: &str, filters: &DashboardFilters) -> Result<ChartBundle, ApiError> {
        let request = self
            .client
            .get(self.filtered_url("/charts", filters))
            .bearer_auth(token);
        let response: ChartsResponse = self.send(request).await?;
        Ok(response.charts)
    }

    async fn insight_prompts(&self) -> Result<Vec<String>, ApiError> {
        let response: PromptList = self
            .send(self.client.get(self.url("/insights/prompts")))
            .await?;
        Ok(response.prompts)
    }

    async fn insights(&self, token: &str, request: &InsightRequest) -> Result<InsightResponse, ApiError> {
        let request = self
            .client
            .post(self.url("/insights"))
            .bearer_auth(token)
            .json(request);
        self.send(request).await
    }

    async fn send_report(&self, token: &str, request: &ReportRequest) -> Result<ReportAck, ApiError> {
        let request = self
            .client
            .post(self.url("/send-report"))
            .bearer_auth(token)
            .json(request);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charts::ChartSource;
    use crate::domain::filters::{DateRange, PlantFilter};
    use crate::domain::role::Role;
    use axum::extract::{Multipart, Query};
    use axum::http::HeaderMap;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use bytes::Bytes;
    use serde_json::json;
    use std::collections::HashMap;

    const TOKEN: &str = "stub-token";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {TOKEN}"))
            .unwrap_or(false)
    }

    fn unauthorized() -> Response {
        (axum::http::StatusCode::UNAUTHORIZED, Json(json!({"detail": "Not authenticated"}))).into_response()
    }

    async fn login(Json(body): Json<Value>) -> Response {
        if body["password"] == "Demo1234!" {
            Json(json!({"access_token": TOKEN, "token_type": "bearer"})).into_response()
        } else {
            (axum::http::StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid credentials"}))).into_response()
        }
    }

    async fn me(headers: HeaderMap) -> Response {
        if !authorized(&headers) {
            return unauthorized();
        }
        Json(json!({"email": "plant@starcement.com", "role": "Plant Head"})).into_response()
    }

    async fn kpis(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
        if !authorized(&headers) {
            return unauthorized();
        }
        Json(json!({
            "kpis": {"total_cement_mt": 1000.5, "avg_margin_pct": null},
            "series": {"trends": [{"date": "2024-07", "ebitda": 1100}]},
            "comparisons": [{"plant_name": query.get("plant"), "role": query.get("role"), "start": query.get("start")}]
        }))
        .into_response()
    }

    async fn charts(headers: HeaderMap) -> Response {
        if !authorized(&headers) {
            return unauthorized();
        }
        Json(json!({"charts": {"plant_production": [{"plant_name": "Sonapur", "cement": 600}]}})).into_response()
    }

    async fn upload(headers: HeaderMap, mut multipart: Multipart) -> Response {
        if !authorized(&headers) {
            return unauthorized();
        }
        let mut received = Vec::new();
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.unwrap_or_default();
            received.push(format!("{name}:{file_name}:{}", data.len()));
        }
        Json(json!({
            "status": "ok",
            "message": received.join(","),
            "stats": {"plants": ["Sonapur"], "rowsPerSheet": {"Production": 12}}
        }))
        .into_response()
    }

    async fn prompts() -> Json<Value> {
        Json(json!({"prompts": ["Why did EBITDA drop?", "Which plant has the best OTIF?"]}))
    }

    async fn insights(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        if !authorized(&headers) {
            return unauthorized();
        }
        Json(json!({
            "status": "success",
            "summary": format!("Answer for {}", body["contextFilters"]["plant"].as_str().unwrap_or("?")),
            "causes": ["Kiln downtime"],
            "recommendedActions": ["Schedule maintenance"],
            "evidence": {"computed_metrics": {"downtime": 12}}
        }))
        .into_response()
    }

    async fn send_report() -> Response {
        (axum::http::StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "SMTP unavailable"}))).into_response()
    }

    async fn stub_backend() -> HttpDashboardApi {
        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/kpis", get(kpis))
            .route("/api/charts", get(charts))
            .route("/api/upload", post(upload))
            .route("/api/insights/prompts", get(prompts))
            .route("/api/insights", post(insights))
            .route("/api/send-report", post(send_report));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        HttpDashboardApi::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_normalisation() {
        let api = HttpDashboardApi::new("http://localhost:8001/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8001/api");
        let api = HttpDashboardApi::new("https://kpi.example.com/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "https://kpi.example.com/api");
    }

    #[test]
    fn test_filtered_url_encoding() {
        let api = HttpDashboardApi::new("http://localhost:8001", Duration::from_secs(1)).unwrap();
        let filters = DashboardFilters::new(Role::EnergyManager, PlantFilter::All, DateRange::default());
        assert_eq!(
            api.filtered_url("/kpis", &filters),
            "http://localhost:8001/api/kpis?role=Energy%20Manager&start=2024-07-01&end=2025-12-31&plant=all"
        );
    }

    #[test]
    fn test_error_detail_extraction() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(error_detail(status, r#"{"detail": "Bad file"}"#), "Bad file");
        assert_eq!(error_detail(status, r#"{"message": "SMTP down"}"#), "SMTP down");
        assert_eq!(
            error_detail(status, r#"{"detail": [{"msg": "field required"}, {"msg": "bad date"}]}"#),
            "field required; bad date"
        );
        assert_eq!(error_detail(status, "<html>oops</html>"), "Bad Request");
        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let api = stub_backend().await;

        let token = api.login("plant@starcement.com", "Demo1234!").await.unwrap();
        assert_eq!(token, TOKEN);

        let user = api.me(&token).await.unwrap();
        assert_eq!(user.email, "plant@starcement.com");
        assert_eq!(user.role, Role::PlantHead);

        assert_eq!(
            api.me("wrong").await.unwrap_err(),
            ApiError::Unauthorized("Not authenticated".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_login_carries_detail() {
        let api = stub_backend().await;
        let err = api.login("demo@starcement.com", "nope").await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    #[tokio::test]
    async fn test_kpis_and_charts_round_trip_filters() {
        let api = stub_backend().await;
        let filters = DashboardFilters::new(
            Role::PlantHead,
            PlantFilter::Named("Sonapur".to_string()),
            DateRange::default(),
        );

        let (kpis, charts) = futures::try_join!(api.kpis(TOKEN, &filters), api.charts(TOKEN, &filters)).unwrap();

        assert_eq!(kpis.kpis.get("total_cement_mt"), 1000.5);
        assert_eq!(kpis.kpis.get("avg_margin_pct"), 0.0);
        assert_eq!(kpis.series.trends.len(), 1);
        let echoed = &kpis.comparisons[0];
        assert_eq!(echoed.label("plant_name").as_deref(), Some("Sonapur"));
        assert_eq!(echoed.label("role").as_deref(), Some("Plant Head"));
        assert_eq!(echoed.label("start").as_deref(), Some("2024-07-01"));

        let production = charts.series(ChartSource::PlantProduction).unwrap();
        assert_eq!(production[0].number("cement"), 600.0);
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_field() {
        let api = stub_backend().await;
        let file = UploadFile {
            file_name: "plant_data.xlsx".to_string(),
            content: Bytes::from_static(b"0123456789"),
        };

        let result = api.upload(TOKEN, file).await.unwrap();

        assert_eq!(result.message, "file:plant_data.xlsx:10");
        assert_eq!(result.total_rows(), 12);
    }

    #[tokio::test]
    async fn test_prompts_and_insights() {
        let api = stub_backend().await;
        assert_eq!(api.insight_prompts().await.unwrap().len(), 2);

        let request = InsightRequest {
            question: "Why is downtime up?".to_string(),
            context_filters: (&DashboardFilters::new(
                Role::Cxo,
                PlantFilter::Named("Guwahati".to_string()),
                DateRange::default(),
            ))
                .into(),
        };
        let response = api.insights(TOKEN, &request).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.summary, "Answer for Guwahati");
        assert_eq!(response.recommended_actions, vec!["Schedule maintenance"]);
    }

    #[tokio::test]
    async fn test_report_error_uses_message_field() {
        let api = stub_backend().await;
        let request = ReportRequest {
            recipient_email: "cfo@starcement.com".to_string(),
            role: Role::Cxo,
            plant: PlantFilter::All,
        };

        let err = api.send_report(TOKEN, &request).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                detail: "SMTP unavailable".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let api = HttpDashboardApi::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        assert!(matches!(api.insight_prompts().await, Err(ApiError::Network(_))));
    }
}
