// Report service - emails the current dashboard
use crate::application::dashboard_api::DashboardApi;
use crate::application::errors::{ServiceError, ValidationError};
use crate::application::notifications::Notifier;
use crate::domain::filters::PlantFilter;
use crate::domain::report::{ReportAck, ReportRequest, is_valid_email};
use crate::domain::role::Role;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReportService {
    api: Arc<dyn DashboardApi>,
    notifier: Notifier,
}

impl ReportService {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    pub async fn send(
        &self,
        token: &str,
        recipient: &str,
        role: Role,
        plant: &PlantFilter,
    ) -> Result<ReportAck, ServiceError> {
        let recipient = recipient.trim();
        if !is_valid_email(recipient) {
            let e = ValidationError::InvalidEmail;
            self.notifier.error(e.to_string());
            return Err(e.into());
        }

        let request = ReportRequest {
            recipient_email: recipient.to_string(),
            role,
            plant: plant.clone(),
        };

        match self.api.send_report(token, &request).await {
            Ok(ack) => {
                tracing::info!(recipient, role = role.as_str(), "report sent");
                self.notifier
                    .success(format!("Report sent successfully to {recipient}"));
                Ok(ack)
            }
            Err(e) => {
                tracing::error!(error = %e, "sending report failed");
                let detail = if e.detail().is_empty() {
                    "Failed to send report"
                } else {
                    e.detail()
                };
                self.notifier.error(detail);
                Err(e.into())
            }
        }
    }
}
