// Side-by-side plant comparison
use super::charts::{ChartBundle, ChartSource};
use super::kpi::{KpiSet, format_indian};
use super::palette::Palette;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MIN_PLANTS: usize = 2;
pub const MAX_PLANTS: usize = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Maximum 3 plants can be compared")]
    TooMany,
    #[error("Select at least 2 plants to compare")]
    TooFew,
    #[error("{0} is listed more than once")]
    Duplicate(String),
}

/// Plants picked for comparison, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantSelection {
    plants: Vec<String>,
}

impl PlantSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the plant, or removes it if already selected. A fourth plant is refused.
    pub fn toggle(&mut self, plant: &str) -> Result<(), SelectionError> {
        if let Some(idx) = self.plants.iter().position(|p| p == plant) {
            self.plants.remove(idx);
            return Ok(());
        }
        if self.plants.len() >= MAX_PLANTS {
            return Err(SelectionError::TooMany);
        }
        self.plants.push(plant.to_string());
        Ok(())
    }

    /// Builds a selection from a fixed list, where naming a plant twice is a mistake
    /// rather than a toggle.
    pub fn from_names<I, S>(names: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for name in names {
            let name = name.as_ref();
            if selection.plants.iter().any(|p| p == name) {
                return Err(SelectionError::Duplicate(name.to_string()));
            }
            selection.toggle(name)?;
        }
        Ok(selection)
    }

    #[cfg(test)]
    pub fn plants(&self) -> &[String] {
        &self.plants
    }

    pub fn ready(&self) -> Result<&[String], SelectionError> {
        if self.plants.len() < MIN_PLANTS {
            return Err(SelectionError::TooFew);
        }
        Ok(&self.plants)
    }
}

/// What was fetched for one plant.
#[derive(Debug, Clone)]
pub struct PlantSnapshot {
    pub plant: String,
    pub kpis: KpiSet,
    pub charts: ChartBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSummary {
    pub plant: String,
    pub color: String,
    pub kpis: KpiSet,
}

impl PlantSummary {
    pub fn display(&self, key: &str) -> String {
        format_indian(self.kpis.get(key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    /// One value per plant, in selection order.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantComparison {
    pub plants: Vec<String>,
    pub summaries: Vec<PlantSummary>,
    pub radar: Vec<MetricRow>,
    pub production: Vec<MetricRow>,
    pub financial: Vec<MetricRow>,
    pub energy: Vec<MetricRow>,
    /// Monthly EBITDA per plant; `None` where a plant has no figure for the month.
    pub trend: Vec<(String, Vec<Option<f64>>)>,
}

struct RadarAxis {
    key: &'static str,
    label: &'static str,
    max: f64,
    scale: Option<f64>,
}

const RADAR_AXES: [RadarAxis; 5] = [
    RadarAxis { key: "avg_capacity_util", label: "Capacity", max: 100.0, scale: None },
    RadarAxis { key: "avg_margin_pct", label: "Margin", max: 40.0, scale: None },
    RadarAxis { key: "avg_otif_pct", label: "OTIF", max: 100.0, scale: None },
    RadarAxis { key: "avg_afr_pct", label: "AFR", max: 20.0, scale: None },
    RadarAxis { key: "avg_clinker_factor", label: "Clinker Factor", max: 1.0, scale: Some(100.0) },
];

fn metric_rows(snapshots: &[PlantSnapshot], metrics: &[(&str, &str)]) -> Vec<MetricRow> {
    metrics
        .iter()
        .map(|(label, key)| MetricRow {
            metric: label.to_string(),
            values: snapshots.iter().map(|s| s.kpis.get(key)).collect(),
        })
        .collect()
}

impl PlantComparison {
    pub fn build(snapshots: &[PlantSnapshot]) -> Self {
        let plants: Vec<String> = snapshots.iter().map(|s| s.plant.clone()).collect();

        let summaries = snapshots
            .iter()
            .enumerate()
            .map(|(idx, s)| PlantSummary {
                plant: s.plant.clone(),
                color: Palette::Vibrant.color(idx).to_string(),
                kpis: s.kpis.clone(),
            })
            .collect();

        let radar = RADAR_AXES
            .iter()
            .map(|axis| MetricRow {
                metric: axis.label.to_string(),
                values: snapshots
                    .iter()
                    .map(|s| {
                        let value = s.kpis.get(axis.key);
                        match axis.scale {
                            Some(scale) => value * scale,
                            None => value / axis.max * 100.0,
                        }
                    })
                    .collect(),
            })
            .collect();

        let production = metric_rows(
            snapshots,
            &[("Cement (MT)", "total_cement_mt"), ("Capacity Util (%)", "avg_capacity_util")],
        );
        let financial = metric_rows(
            snapshots,
            &[
                ("EBITDA (₹/MT)", "avg_ebitda_ton"),
                ("Margin (%)", "avg_margin_pct"),
                ("Cost (₹/MT)", "avg_cost_ton"),
            ],
        );
        let energy = metric_rows(
            snapshots,
            &[("Power (kWh/T)", "avg_power_kwh_ton"), ("AFR (%)", "avg_afr_pct")],
        );

        Self {
            plants,
            summaries,
            radar,
            production,
            financial,
            energy,
            trend: merge_monthly_ebitda(snapshots),
        }
    }
}

/// Merges each plant's `monthly_finance` EBITDA into one month-sorted table.
fn merge_monthly_ebitda(snapshots: &[PlantSnapshot]) -> Vec<(String, Vec<Option<f64>>)> {
    let mut months: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();

    for (idx, snapshot) in snapshots.iter().enumerate() {
        let rows = snapshot
            .charts
            .series(ChartSource::MonthlyFinance)
            .unwrap_or_default();
        for row in rows {
            let Some(month) = row.label("month") else {
                continue;
            };
            let entry = months
                .entry(month)
                .or_insert_with(|| vec![None; snapshots.len()]);
            entry[idx] = Some(row.number("ebitda"));
        }
    }

    months.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charts::ChartRow;
    use serde_json::json;

    fn snapshot(plant: &str, kpis: &[(&str, f64)], months: &[(&str, f64)]) -> PlantSnapshot {
        let mut charts = ChartBundle::default();
        charts.insert(
            ChartSource::MonthlyFinance,
            months
                .iter()
                .map(|(m, e)| [("month", json!(m)), ("ebitda", json!(e))].into_iter().collect::<ChartRow>())
                .collect(),
        );
        PlantSnapshot {
            plant: plant.to_string(),
            kpis: kpis.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            charts,
        }
    }

    #[test]
    fn test_selection_bounds() {
        let mut selection = PlantSelection::new();
        selection.toggle("Sonapur").unwrap();
        assert_eq!(selection.ready(), Err(SelectionError::TooFew));

        selection.toggle("Siliguri").unwrap();
        selection.toggle("Guwahati").unwrap();
        assert_eq!(selection.toggle("Lumshnong"), Err(SelectionError::TooMany));
        assert_eq!(selection.plants().len(), 3);

        // toggling an already selected plant removes it
        selection.toggle("Siliguri").unwrap();
        assert_eq!(selection.plants(), ["Sonapur", "Guwahati"]);
        assert!(selection.ready().is_ok());
    }

    #[test]
    fn test_selection_from_names_rejects_duplicates() {
        assert_eq!(
            PlantSelection::from_names(["Sonapur", "Siliguri", "Sonapur"]),
            Err(SelectionError::Duplicate("Sonapur".to_string()))
        );
        assert_eq!(
            PlantSelection::from_names(["Sonapur", "Siliguri", "Guwahati", "Lumshnong"]),
            Err(SelectionError::TooMany)
        );

        let selection = PlantSelection::from_names(["Sonapur", "Siliguri"]).unwrap();
        assert_eq!(selection.plants(), ["Sonapur", "Siliguri"]);
    }

    #[test]
    fn test_radar_normalisation() {
        let comparison = PlantComparison::build(&[
            snapshot(
                "Sonapur",
                &[
                    ("avg_capacity_util", 80.0),
                    ("avg_margin_pct", 20.0),
                    ("avg_afr_pct", 10.0),
                    ("avg_clinker_factor", 0.72),
                ],
                &[],
            ),
            snapshot("Siliguri", &[], &[]),
        ]);

        let by_metric: BTreeMap<&str, &MetricRow> =
            comparison.radar.iter().map(|r| (r.metric.as_str(), r)).collect();
        assert_eq!(by_metric["Capacity"].values, vec![80.0, 0.0]);
        assert_eq!(by_metric["Margin"].values, vec![50.0, 0.0]);
        assert_eq!(by_metric["AFR"].values, vec![50.0, 0.0]);
        assert!((by_metric["Clinker Factor"].values[0] - 72.0).abs() < 1e-9);
        assert_eq!(comparison.summaries[1].color, "#4ECDC4");
    }

    #[test]
    fn test_monthly_trend_merge_sorted_by_month() {
        let comparison = PlantComparison::build(&[
            snapshot("Sonapur", &[], &[("2025-02", 900.0), ("2025-01", 850.0)]),
            snapshot("Guwahati", &[], &[("2025-01", 700.0), ("2025-03", 720.0)]),
        ]);

        let months: Vec<&str> = comparison.trend.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(months, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(comparison.trend[0].1, vec![Some(850.0), Some(700.0)]);
        assert_eq!(comparison.trend[1].1, vec![Some(900.0), None]);
        assert_eq!(comparison.trend[2].1, vec![None, Some(720.0)]);
    }
}
