// Dashboard service - Use case for building role dashboards
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::application::notifications::Notifier;
use crate::domain::charts::{ChartBundle, ChartData, ChartRow, KpiResponse, SeriesData, SeriesPoint};
use crate::domain::dashboard::Dashboard;
use crate::domain::filters::{DashboardFilters, FilterChange};
use crate::domain::kpi::{BulletGauge, KpiCard, KpiSet};
use crate::domain::palette::role_gradients;
use crate::domain::profile::{ChartSpec, PanelSource, RoleProfile, profile};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};

#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn DashboardApi>,
}

impl DashboardService {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }

    /// Fetches KPIs and charts concurrently; either failing fails the pair.
    pub async fn get_dashboard(&self, token: &str, filters: &DashboardFilters) -> Result<Dashboard, ApiError> {
        let (kpis, charts) = futures::try_join!(self.api.kpis(token, filters), self.api.charts(token, filters))?;
        Ok(build_dashboard(filters, &kpis, &charts))
    }
}

pub fn build_dashboard(filters: &DashboardFilters, kpis: &KpiResponse, charts: &ChartBundle) -> Dashboard {
    let layout = profile(filters.role);
    let (tiles, secondary_tiles) = build_tiles(layout, &kpis.kpis);

    Dashboard {
        title: layout.title.to_string(),
        subtitle: layout.subtitle.to_string(),
        filters: filters.clone(),
        focus_areas: layout.focus_areas.iter().map(|f| f.to_string()).collect(),
        tiles,
        secondary_title: layout.secondary_title.to_string(),
        secondary_tiles,
        charts: build_charts(layout, kpis, charts),
        bullets_title: layout.bullets_title.to_string(),
        bullets: build_bullets(layout, &kpis.kpis),
        kpis: kpis.kpis.clone(),
    }
}

fn build_tiles(layout: &RoleProfile, kpis: &KpiSet) -> (Vec<KpiCard>, Vec<KpiCard>) {
    let gradients = role_gradients(layout.role);

    let primary = layout
        .primary
        .iter()
        .zip(gradients)
        .map(|(spec, gradient)| {
            KpiCard::new(spec.key, spec.label, kpis.get(spec.key), spec.unit)
                .with_target(spec.target)
                .with_accent(Some(gradient))
        })
        .collect();

    let secondary = layout
        .secondary
        .iter()
        .map(|spec| KpiCard::new(spec.key, spec.label, kpis.get(spec.key), spec.unit).with_target(spec.target))
        .collect();

    (primary, secondary)
}

fn build_charts(layout: &RoleProfile, kpis: &KpiResponse, charts: &ChartBundle) -> Vec<ChartData> {
    let mut built = Vec::new();

    for spec in layout.charts {
        let rows: &[ChartRow] = match spec.source {
            PanelSource::Trends => &kpis.series.trends,
            PanelSource::Comparisons => &kpis.comparisons,
            PanelSource::Chart(source) => charts.series(source).unwrap_or_default(),
        };

        // Panels without rows are left out rather than drawn empty
        if rows.is_empty() {
            tracing::debug!(chart = spec.id, "no rows for chart, skipping");
            continue;
        }

        built.push(build_chart(spec, rows));
    }

    built
}

fn build_chart(spec: &ChartSpec, rows: &[ChartRow]) -> ChartData {
    let series = spec
        .series
        .iter()
        .map(|s| {
            let points = rows
                .iter()
                .map(|row| {
                    let label = row
                        .label(spec.label_key)
                        .unwrap_or_else(|| spec.label_fallback.to_string());
                    SeriesPoint::new(label, row.number(s.key))
                })
                .collect();
            SeriesData::new(s.key.to_string(), s.name.to_string(), s.color.map(str::to_string), points)
        })
        .collect();

    let palette = spec
        .palette
        .map(|p| p.colors().iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    let subtitle = (!spec.subtitle.is_empty()).then(|| spec.subtitle.to_string());

    ChartData::new(spec.id.to_string(), spec.title.to_string(), subtitle, spec.kind, palette, series)
}

fn build_bullets(layout: &RoleProfile, kpis: &KpiSet) -> Vec<BulletGauge> {
    layout
        .bullets
        .iter()
        .map(|b| BulletGauge {
            title: b.title.to_string(),
            actual: b.metric.value(kpis),
            target: b.target,
            max: b.max,
            lower_is_better: b.lower_is_better,
            color: b.color.to_string(),
        })
        .collect()
}

/// What the controller currently shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    /// Filters as last selected, even while their data is still loading.
    pub filters: DashboardFilters,
    pub loading: bool,
    /// Last successfully committed view; survives failed fetches.
    pub view: Option<Dashboard>,
    /// Generation of the most recently started fetch.
    pub generation: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The filter change did not change anything; nothing was fetched.
    Unchanged,
    /// A newer fetch started while this one was in flight; its result was dropped.
    Stale,
    Failed,
}

/// Owns the filter state of one dashboard session and sequences its fetches.
///
/// Every fetch takes the next generation number. A response is committed only
/// if its generation is still the latest one when it arrives, and only when
/// both the KPI and chart requests succeeded.
pub struct DashboardController {
    service: DashboardService,
    token: String,
    notifier: Notifier,
    filters: Mutex<DashboardFilters>,
    generations: AtomicU64,
    state: watch::Sender<DashboardState>,
}

impl DashboardController {
    pub fn new(service: DashboardService, token: String, filters: DashboardFilters, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(DashboardState {
            filters: filters.clone(),
            ..DashboardState::default()
        });

        Self {
            service,
            token,
            notifier,
            filters: Mutex::new(filters),
            generations: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Re-fetches for the current filters.
    pub async fn refresh(&self) -> FetchOutcome {
        let (generation, filters) = {
            let filters = self.filters.lock().await;
            self.begin(&filters)
        };
        self.fetch(generation, filters).await
    }

    /// Applies a filter change; a real change triggers exactly one fetch pair.
    pub async fn apply(&self, change: FilterChange) -> FetchOutcome {
        let (generation, filters) = {
            let mut filters = self.filters.lock().await;
            if !filters.apply(change) {
                return FetchOutcome::Unchanged;
            }
            self.begin(&filters)
        };
        self.fetch(generation, filters).await
    }

    // Called with the filter lock held so generations follow filter order
    fn begin(&self, filters: &DashboardFilters) -> (u64, DashboardFilters) {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.filters = filters.clone();
            state.loading = true;
            state.generation = generation;
        });
        tracing::debug!(generation, role = filters.role.as_str(), plant = filters.plant.as_str(), "fetching dashboard");
        (generation, filters.clone())
    }

    async fn fetch(&self, generation: u64, filters: DashboardFilters) -> FetchOutcome {
        let result = self.service.get_dashboard(&self.token, &filters).await;

        let mut outcome = FetchOutcome::Stale;
        let mut failure = None;
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.loading = false;
            match &result {
                Ok(view) => {
                    state.view = Some(view.clone());
                    state.error = None;
                    outcome = FetchOutcome::Applied;
                }
                Err(e) => {
                    state.error = Some(e.detail().to_string());
                    failure = Some(e.detail().to_string());
                    outcome = FetchOutcome::Failed;
                }
            }
            true
        });

        match outcome {
            FetchOutcome::Stale => tracing::debug!(generation, "discarding stale dashboard response"),
            FetchOutcome::Failed => {
                let detail = failure.unwrap_or_default();
                tracing::error!(generation, error = %detail, "dashboard fetch failed");
                self.notifier.error(format!("Failed to load dashboard: {detail}"));
            }
            _ => tracing::info!(generation, "dashboard updated"),
        }

        outcome
    }
}
