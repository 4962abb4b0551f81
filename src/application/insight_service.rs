// Insight service - natural-language questions over the current filters
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::application::errors::{ServiceError, ValidationError};
use crate::application::notifications::Notifier;
use crate::domain::filters::DashboardFilters;
use crate::domain::insight::{InsightRequest, InsightResponse};
use std::sync::Arc;

#[derive(Clone)]
pub struct InsightService {
    api: Arc<dyn DashboardApi>,
    notifier: Notifier,
}

impl InsightService {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    /// Sample prompts; an unreachable backend just means no suggestions.
    pub async fn prompts(&self) -> Vec<String> {
        match self.api.insight_prompts().await {
            Ok(prompts) => prompts,
            Err(e) => {
                tracing::warn!(error = %e, "could not load sample prompts");
                Vec::new()
            }
        }
    }

    pub async fn ask(
        &self,
        token: &str,
        question: &str,
        filters: &DashboardFilters,
    ) -> Result<InsightResponse, ServiceError> {
        let question = question.trim();
        if question.is_empty() {
            let e = ValidationError::BlankQuestion;
            self.notifier.error(e.to_string());
            return Err(e.into());
        }

        let request = InsightRequest {
            question: question.to_string(),
            context_filters: filters.into(),
        };
        tracing::info!(role = filters.role.as_str(), plant = filters.plant.as_str(), "asking for insight");

        let result = match self.api.insights(token, &request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(ApiError::InsightFailed(
                response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Failed to generate insights".to_string()),
            )),
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            tracing::error!(error = %e, "insight request failed");
            self.notifier.error(e.detail());
            e.into()
        })
    }
}
