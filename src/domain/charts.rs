// Chart payload and chart view models
use super::kpi::KpiSet;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One row of a chart series: an x-label plus one or more named values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartRow(Map<String, Value>);

impl ChartRow {
    pub fn label(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric field; missing, null or non-numeric values read as zero.
    pub fn number(&self, key: &str) -> f64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ChartRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Reads an explicit `null` the same way as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSeries {
    #[serde(default, deserialize_with = "null_as_default")]
    pub trends: Vec<ChartRow>,
}

/// Body of `GET /kpis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub kpis: KpiSet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub series: KpiSeries,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comparisons: Vec<ChartRow>,
}

/// Named series carried by `GET /charts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSource {
    PlantProduction,
    CostWaterfall,
    MonthlyFinance,
    MonthlyProduction,
    EnergyByPlant,
    QualityByPlant,
    MaintenanceByPlant,
    SalesByRegion,
    WeeklyTrend,
    PerformanceRadar,
}

impl ChartSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartSource::PlantProduction => "plant_production",
            ChartSource::CostWaterfall => "cost_waterfall",
            ChartSource::MonthlyFinance => "monthly_finance",
            ChartSource::MonthlyProduction => "monthly_production",
            ChartSource::EnergyByPlant => "energy_by_plant",
            ChartSource::QualityByPlant => "quality_by_plant",
            ChartSource::MaintenanceByPlant => "maintenance_by_plant",
            ChartSource::SalesByRegion => "sales_by_region",
            ChartSource::WeeklyTrend => "weekly_trend",
            ChartSource::PerformanceRadar => "performance_radar",
        }
    }
}

/// `charts` object of `GET /charts`. Series that are null or not an array of
/// rows are dropped, so their panels are skipped like absent ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChartBundle(BTreeMap<String, Vec<ChartRow>>);

impl ChartBundle {
    pub fn series(&self, source: ChartSource) -> Option<&[ChartRow]> {
        self.0.get(source.as_str()).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn insert(&mut self, source: ChartSource, rows: Vec<ChartRow>) {
        self.0.insert(source.as_str().to_string(), rows);
    }
}

impl<'de> Deserialize<'de> for ChartBundle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, Value> = null_as_default(deserializer)?;
        let series = raw
            .into_iter()
            .filter_map(|(name, value)| {
                serde_json::from_value::<Vec<ChartRow>>(value)
                    .ok()
                    .map(|rows| (name, rows))
            })
            .collect();
        Ok(Self(series))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartsResponse {
    #[serde(default)]
    pub charts: ChartBundle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Area,
    Composed,
    Radar,
    HorizontalBar,
    Waterfall,
    Donut,
    GroupedBar,
    MultiLine,
    Combo,
    StackedArea,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: String, value: f64) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<SeriesPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, color: Option<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            id,
            name,
            color,
            points,
        }
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Per-point share of the series total in percent (donut slices).
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total();
        self.points
            .iter()
            .map(|p| if total == 0.0 { 0.0 } else { p.value / total * 100.0 })
            .collect()
    }

    /// Relative change from first to last point in percent.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.points.first()?.value;
        let last = self.points.last()?.value;
        if first == 0.0 || self.points.len() < 2 {
            return None;
        }
        Some((last - first) / first.abs() * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub kind: ChartKind,
    pub palette: Vec<String>,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn new(
        id: String,
        title: String,
        subtitle: Option<String>,
        kind: ChartKind,
        palette: Vec<String>,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            id,
            title,
            subtitle,
            kind,
            palette,
            series,
        }
    }

    /// X-axis labels, taken from the first series.
    pub fn labels(&self) -> Vec<&str> {
        self.series
            .first()
            .map(|s| s.points.iter().map(|p| p.label.as_str()).collect())
            .unwrap_or_default()
    }
}
