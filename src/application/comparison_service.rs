// Comparison service - fetches 2-3 plants side by side
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::application::errors::ServiceError;
use crate::application::notifications::Notifier;
use crate::domain::comparison::{PlantComparison, PlantSelection, PlantSnapshot};
use crate::domain::filters::{DashboardFilters, DateRange, PlantFilter};
use crate::domain::role::Role;
use futures::future::try_join_all;
use std::sync::Arc;

#[derive(Clone)]
pub struct ComparisonService {
    api: Arc<dyn DashboardApi>,
    notifier: Notifier,
}

impl ComparisonService {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    pub async fn compare(
        &self,
        token: &str,
        selection: &PlantSelection,
        range: &DateRange,
    ) -> Result<PlantComparison, ServiceError> {
        let plants = match selection.ready() {
            Ok(plants) => plants,
            Err(e) => {
                self.notifier.error(e.to_string());
                return Err(e.into());
            }
        };

        tracing::info!(plants = ?plants, "comparing plants");

        let snapshots = try_join_all(plants.iter().map(|plant| self.snapshot(token, plant, range)))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "plant comparison fetch failed");
                self.notifier.error(format!("Failed to load comparison data: {}", e.detail()));
                ServiceError::from(e)
            })?;

        Ok(PlantComparison::build(&snapshots))
    }

    async fn snapshot(&self, token: &str, plant: &str, range: &DateRange) -> Result<PlantSnapshot, ApiError> {
        let filters = DashboardFilters::new(Role::Cxo, PlantFilter::Named(plant.to_string()), *range);
        let (kpis, charts) = futures::try_join!(self.api.kpis(token, &filters), self.api.charts(token, &filters))?;

        Ok(PlantSnapshot {
            plant: plant.to_string(),
            kpis: kpis.kpis,
            charts,
        })
    }
}
