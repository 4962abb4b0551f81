// Dashboard domain model
use super::charts::ChartData;
use super::filters::DashboardFilters;
use super::kpi::{BulletGauge, KpiCard, KpiSet};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub subtitle: String,
    pub filters: DashboardFilters,
    pub focus_areas: Vec<String>,
    pub tiles: Vec<KpiCard>,
    pub secondary_title: String,
    pub secondary_tiles: Vec<KpiCard>,
    pub charts: Vec<ChartData>,
    pub bullets_title: String,
    pub bullets: Vec<BulletGauge>,
    /// Raw KPI values the cards were built from.
    pub kpis: KpiSet,
}

#[cfg(test)]
impl Dashboard {
    pub fn tile(&self, key: &str) -> Option<&KpiCard> {
        self.tiles
            .iter()
            .chain(self.secondary_tiles.iter())
            .find(|t| t.key == key)
    }

    pub fn chart(&self, id: &str) -> Option<&ChartData> {
        self.charts.iter().find(|c| c.id == id)
    }
}
