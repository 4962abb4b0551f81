// Per-role dashboard layouts: which KPIs, charts and gauges each role sees
use super::charts::{ChartKind, ChartSource};
use super::kpi::KpiSet;
use super::palette::Palette;
use super::role::Role;

#[derive(Debug, Clone, Copy)]
pub struct TileSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub target: Option<&'static str>,
}

const fn tile(key: &'static str, label: &'static str, unit: &'static str) -> TileSpec {
    TileSpec {
        key,
        label,
        unit,
        target: None,
    }
}

const fn tile_with_target(
    key: &'static str,
    label: &'static str,
    unit: &'static str,
    target: &'static str,
) -> TileSpec {
    TileSpec {
        key,
        label,
        unit,
        target: Some(target),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSource {
    Trends,
    Comparisons,
    Chart(ChartSource),
}

#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub color: Option<&'static str>,
}

const fn series(key: &'static str, name: &'static str, color: &'static str) -> SeriesSpec {
    SeriesSpec {
        key,
        name,
        color: Some(color),
    }
}

const fn plain(key: &'static str, name: &'static str) -> SeriesSpec {
    SeriesSpec {
        key,
        name,
        color: None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub kind: ChartKind,
    pub source: PanelSource,
    pub label_key: &'static str,
    /// Label used when a row has no value under `label_key`.
    pub label_fallback: &'static str,
    pub series: &'static [SeriesSpec],
    pub palette: Option<Palette>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BulletMetric {
    Kpi(&'static str),
    /// 100 - ((power - 65) / 25 * 100)
    EnergyScore,
    /// realization / 60
    RealizationIndex,
    /// net realization as a share of realization
    NetRealizationPct,
}

impl BulletMetric {
    pub fn value(&self, kpis: &KpiSet) -> f64 {
        match self {
            BulletMetric::Kpi(key) => kpis.get(key),
            BulletMetric::EnergyScore => 100.0 - ((kpis.get("avg_power_kwh_ton") - 65.0) / 25.0 * 100.0),
            BulletMetric::RealizationIndex => kpis.get("avg_realization_ton") / 60.0,
            BulletMetric::NetRealizationPct => {
                let realization = kpis.get("avg_realization_ton");
                if realization == 0.0 {
                    0.0
                } else {
                    kpis.get("net_realization") / realization * 100.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BulletSpec {
    pub title: &'static str,
    pub metric: BulletMetric,
    pub target: f64,
    pub max: f64,
    pub lower_is_better: bool,
    pub color: &'static str,
}

#[derive(Debug)]
pub struct RoleProfile {
    pub role: Role,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub focus_areas: [&'static str; 4],
    pub primary: [TileSpec; 4],
    pub secondary_title: &'static str,
    pub secondary: [TileSpec; 6],
    pub charts: &'static [ChartSpec],
    pub bullets_title: &'static str,
    pub bullets: &'static [BulletSpec],
}

pub fn profile(role: Role) -> &'static RoleProfile {
    match role {
        Role::Cxo => &CXO,
        Role::PlantHead => &PLANT_HEAD,
        Role::EnergyManager => &ENERGY_MANAGER,
        Role::Sales => &SALES,
    }
}

static CXO: RoleProfile = RoleProfile {
    role: Role::Cxo,
    title: "Executive Dashboard",
    subtitle: "Strategic KPIs & Financial Performance",
    focus_areas: [
        "Financial Performance",
        "Operational Efficiency",
        "Market Position",
        "Value Creation",
    ],
    primary: [
        tile("total_cement_mt", "Total Production", "MT"),
        tile("avg_ebitda_ton", "EBITDA/Ton", "₹"),
        tile("avg_margin_pct", "Margin", "%"),
        tile("avg_cost_ton", "Cost/Ton", "₹"),
    ],
    secondary_title: "Strategic Metrics",
    secondary: [
        tile("revenue_per_ton", "Revenue/Ton", "₹"),
        tile_with_target("avg_capacity_util", "Capacity Util", "%", "90%"),
        tile_with_target("avg_power_kwh_ton", "Power kWh/T", "", "70"),
        tile_with_target("avg_afr_pct", "AFR %", "%", "15%"),
        tile_with_target("avg_otif_pct", "OTIF %", "%", "95%"),
        tile("avg_clinker_factor", "Clinker Factor", ""),
    ],
    charts: &[
        ChartSpec {
            id: "financial_trend",
            title: "Financial Performance Trend",
            subtitle: "EBITDA and margin over time",
            kind: ChartKind::Area,
            source: PanelSource::Trends,
            label_key: "date",
            label_fallback: "",
            series: &[
                series("ebitda", "EBITDA ₹/MT", "#3B82F6"),
                series("margin", "Margin %", "#F59E0B"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "business_scorecard",
            title: "Business Scorecard",
            subtitle: "Performance vs targets",
            kind: ChartKind::Radar,
            source: PanelSource::Chart(ChartSource::PerformanceRadar),
            label_key: "metric",
            label_fallback: "",
            series: &[
                series("current", "Current", "#0EA5E9"),
                series("target", "Target", "#10B981"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "plant_profitability",
            title: "Plant Profitability",
            subtitle: "EBITDA ₹/MT by plant",
            kind: ChartKind::HorizontalBar,
            source: PanelSource::Comparisons,
            label_key: "plant_name",
            label_fallback: "",
            series: &[plain("ebitda_ton", "EBITDA ₹/MT")],
            palette: Some(Palette::Primary),
        },
        ChartSpec {
            id: "cost_bridge",
            title: "Cost Bridge Analysis",
            subtitle: "Realization to EBITDA",
            kind: ChartKind::Waterfall,
            source: PanelSource::Chart(ChartSource::CostWaterfall),
            label_key: "name",
            label_fallback: "",
            series: &[plain("value", "Value")],
            palette: None,
        },
        ChartSpec {
            id: "production_mix",
            title: "Production Mix",
            subtitle: "Share by plant",
            kind: ChartKind::Donut,
            source: PanelSource::Chart(ChartSource::PlantProduction),
            label_key: "plant_name",
            label_fallback: "",
            series: &[plain("cement", "Cement MT")],
            palette: Some(Palette::Vibrant),
        },
        ChartSpec {
            id: "monthly_finance",
            title: "Monthly Financial Trend",
            subtitle: "Cost, EBITDA and margin",
            kind: ChartKind::MultiLine,
            source: PanelSource::Chart(ChartSource::MonthlyFinance),
            label_key: "month",
            label_fallback: "",
            series: &[plain("ebitda", "EBITDA"), plain("cost", "Cost"), plain("margin", "Margin %")],
            palette: Some(Palette::Vibrant),
        },
        ChartSpec {
            id: "regional_revenue_mix",
            title: "Regional Revenue Mix",
            subtitle: "Dispatch by region",
            kind: ChartKind::Donut,
            source: PanelSource::Chart(ChartSource::SalesByRegion),
            label_key: "region",
            label_fallback: "Unknown",
            series: &[plain("dispatch", "Dispatch MT")],
            palette: Some(Palette::Default),
        },
    ],
    bullets_title: "",
    bullets: &[],
};

static PLANT_HEAD: RoleProfile = RoleProfile {
    role: Role::PlantHead,
    title: "Operations Dashboard",
    subtitle: "Production, Quality & Equipment Performance",
    focus_areas: [
        "Production Volume",
        "Capacity Utilization",
        "Equipment Reliability",
        "Quality Control",
    ],
    primary: [
        tile("total_cement_mt", "Total Production", "MT"),
        tile("avg_capacity_util", "Capacity Util", "%"),
        tile("uptime_pct", "Uptime", "%"),
        tile("avg_downtime_hrs", "Avg Downtime", "hrs"),
    ],
    secondary_title: "Production & Quality Metrics",
    secondary: [
        tile("avg_daily_cement", "Daily Production", "MT"),
        tile("avg_clinker_factor", "Clinker Factor", ""),
        tile("avg_blaine", "Blaine", "cm²/g"),
        tile("avg_strength_28d", "28d Strength", "MPa"),
        tile("avg_mtbf_hrs", "MTBF", "hrs"),
        tile("avg_mttr_hrs", "MTTR", "hrs"),
    ],
    charts: &[
        ChartSpec {
            id: "production_performance",
            title: "Production Performance",
            subtitle: "Capacity utilization and downtime trends",
            kind: ChartKind::Composed,
            source: PanelSource::Trends,
            label_key: "date",
            label_fallback: "",
            series: &[
                series("capacity", "Capacity %", "#14B8A6"),
                series("downtime", "Downtime hrs", "#EF4444"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "operations_scorecard",
            title: "Operations Scorecard",
            subtitle: "Current vs target",
            kind: ChartKind::Radar,
            source: PanelSource::Chart(ChartSource::PerformanceRadar),
            label_key: "metric",
            label_fallback: "",
            series: &[
                series("current", "Current", "#0EA5E9"),
                series("target", "Target", "#10B981"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "plant_production",
            title: "Plant Production",
            subtitle: "Cement output by plant",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::PlantProduction),
            label_key: "plant_name",
            label_fallback: "",
            series: &[series("cement", "Cement MT", "#14B8A6")],
            palette: None,
        },
        ChartSpec {
            id: "quality_metrics",
            title: "Quality Metrics",
            subtitle: "Blaine and strength by plant",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::QualityByPlant),
            label_key: "plant_name",
            label_fallback: "",
            series: &[
                series("blaine", "Blaine", "#F59E0B"),
                series("strength", "28d Strength", "#8B5CF6"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "equipment_reliability",
            title: "Equipment Reliability",
            subtitle: "MTBF, MTTR by plant",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::MaintenanceByPlant),
            label_key: "plant_name",
            label_fallback: "",
            series: &[
                series("mtbf", "MTBF hrs", "#10B981"),
                series("mttr", "MTTR hrs", "#EF4444"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "monthly_production",
            title: "Monthly Production & Capacity",
            subtitle: "Volume vs utilization",
            kind: ChartKind::Combo,
            source: PanelSource::Chart(ChartSource::MonthlyProduction),
            label_key: "month",
            label_fallback: "",
            series: &[plain("cement", "Cement MT"), plain("capacity", "Capacity %")],
            palette: Some(Palette::Vibrant),
        },
        ChartSpec {
            id: "weekly_production",
            title: "Weekly Production Trend",
            subtitle: "Last 12 weeks",
            kind: ChartKind::StackedArea,
            source: PanelSource::Chart(ChartSource::WeeklyTrend),
            label_key: "week",
            label_fallback: "",
            series: &[series("cement", "Cement MT", "#14B8A6")],
            palette: None,
        },
    ],
    bullets_title: "Performance vs Target",
    bullets: &[
        BulletSpec {
            title: "Capacity %",
            metric: BulletMetric::Kpi("avg_capacity_util"),
            target: 90.0,
            max: 100.0,
            lower_is_better: false,
            color: "#14B8A6",
        },
        BulletSpec {
            title: "Uptime %",
            metric: BulletMetric::Kpi("uptime_pct"),
            target: 95.0,
            max: 100.0,
            lower_is_better: false,
            color: "#3B82F6",
        },
        BulletSpec {
            title: "28d Strength",
            metric: BulletMetric::Kpi("avg_strength_28d"),
            target: 53.0,
            max: 60.0,
            lower_is_better: false,
            color: "#8B5CF6",
        },
        BulletSpec {
            title: "MTBF hrs",
            metric: BulletMetric::Kpi("avg_mtbf_hrs"),
            target: 200.0,
            max: 250.0,
            lower_is_better: false,
            color: "#10B981",
        },
    ],
};

static ENERGY_MANAGER: RoleProfile = RoleProfile {
    role: Role::EnergyManager,
    title: "Energy Dashboard",
    subtitle: "Power Consumption, Thermal Efficiency & Sustainability",
    focus_areas: [
        "Power Optimization",
        "Thermal Efficiency",
        "Alternative Fuels",
        "Cost Savings",
    ],
    primary: [
        tile("avg_power_kwh_ton", "Power Consumption", "kWh/T"),
        tile("avg_heat_kcal_kg", "Heat Consumption", "kcal/kg"),
        tile("avg_afr_pct", "AFR Usage", "%"),
        tile("savings_potential", "Savings Potential", "₹"),
    ],
    secondary_title: "Energy Performance Metrics",
    secondary: [
        tile("min_power_kwh_ton", "Best Power", "kWh/T"),
        tile("max_power_kwh_ton", "Worst Power", "kWh/T"),
        tile("power_variance", "Power Variance", "kWh/T"),
        tile("min_heat_kcal_kg", "Best Heat", "kcal/kg"),
        tile("max_heat_kcal_kg", "Worst Heat", "kcal/kg"),
        tile("avg_fuel_cost_ton", "Fuel Cost", "₹/T"),
    ],
    charts: &[
        ChartSpec {
            id: "energy_trend",
            title: "Energy Consumption Trend",
            subtitle: "Power and AFR% over time",
            kind: ChartKind::Composed,
            source: PanelSource::Trends,
            label_key: "date",
            label_fallback: "",
            series: &[
                series("power", "Power kWh/T", "#10B981"),
                series("afr", "AFR %", "#F59E0B"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "energy_scorecard",
            title: "Energy Scorecard",
            subtitle: "Efficiency metrics",
            kind: ChartKind::Radar,
            source: PanelSource::Chart(ChartSource::PerformanceRadar),
            label_key: "metric",
            label_fallback: "",
            series: &[
                series("current", "Current", "#0EA5E9"),
                series("target", "Target", "#10B981"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "power_by_plant",
            title: "Power by Plant",
            subtitle: "kWh/Ton comparison",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::EnergyByPlant),
            label_key: "plant_name",
            label_fallback: "",
            series: &[series("power", "Power kWh/T", "#10B981")],
            palette: None,
        },
        ChartSpec {
            id: "heat_by_plant",
            title: "Heat by Plant",
            subtitle: "kcal/kg comparison",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::EnergyByPlant),
            label_key: "plant_name",
            label_fallback: "",
            series: &[series("heat", "Heat kcal/kg", "#F59E0B")],
            palette: None,
        },
        ChartSpec {
            id: "afr_usage",
            title: "AFR Usage",
            subtitle: "Alternative fuel rate %",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::EnergyByPlant),
            label_key: "plant_name",
            label_fallback: "",
            series: &[series("afr", "AFR %", "#8B5CF6")],
            palette: None,
        },
        ChartSpec {
            id: "energy_summary",
            title: "Energy Performance Summary",
            subtitle: "Detailed metrics by plant",
            kind: ChartKind::Table,
            source: PanelSource::Chart(ChartSource::EnergyByPlant),
            label_key: "plant_name",
            label_fallback: "",
            series: &[
                plain("power", "Power kWh/T"),
                plain("heat", "Heat kcal/kg"),
                plain("afr", "AFR %"),
            ],
            palette: None,
        },
    ],
    bullets_title: "Energy Optimization Targets",
    bullets: &[
        BulletSpec {
            title: "Power kWh/T (Lower is better)",
            metric: BulletMetric::Kpi("avg_power_kwh_ton"),
            target: 70.0,
            max: 90.0,
            lower_is_better: true,
            color: "#10B981",
        },
        BulletSpec {
            title: "Heat kcal/kg (Lower is better)",
            metric: BulletMetric::Kpi("avg_heat_kcal_kg"),
            target: 720.0,
            max: 800.0,
            lower_is_better: true,
            color: "#F59E0B",
        },
        BulletSpec {
            title: "AFR % (Higher is better)",
            metric: BulletMetric::Kpi("avg_afr_pct"),
            target: 15.0,
            max: 25.0,
            lower_is_better: false,
            color: "#8B5CF6",
        },
        BulletSpec {
            title: "Energy Score",
            metric: BulletMetric::EnergyScore,
            target: 80.0,
            max: 100.0,
            lower_is_better: false,
            color: "#3B82F6",
        },
    ],
};

static SALES: RoleProfile = RoleProfile {
    role: Role::Sales,
    title: "Sales Dashboard",
    subtitle: "Revenue, Pricing & Logistics Performance",
    focus_areas: [
        "Dispatch Volume",
        "Price Realization",
        "Delivery Performance",
        "Revenue Growth",
    ],
    primary: [
        tile("total_dispatch_mt", "Total Dispatch", "MT"),
        tile("avg_realization_ton", "Realization", "₹/MT"),
        tile("avg_otif_pct", "OTIF %", "%"),
        tile("total_revenue", "Total Revenue", "₹"),
    ],
    secondary_title: "Sales & Pricing Metrics",
    secondary: [
        tile("max_realization_ton", "Best Price", "₹/MT"),
        tile("min_realization_ton", "Worst Price", "₹/MT"),
        tile("price_variance", "Price Variance", "₹"),
        tile("avg_freight_ton", "Freight Cost", "₹/MT"),
        tile("net_realization", "Net Realization", "₹/MT"),
        tile("revenue_per_day", "Daily Revenue", "₹"),
    ],
    charts: &[
        ChartSpec {
            id: "sales_trend",
            title: "Sales Performance Trend",
            subtitle: "Realization and OTIF over time",
            kind: ChartKind::Composed,
            source: PanelSource::Trends,
            label_key: "date",
            label_fallback: "",
            series: &[
                series("realization", "Realization ₹/MT", "#EC4899"),
                series("otif", "OTIF %", "#10B981"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "sales_scorecard",
            title: "Sales Scorecard",
            subtitle: "Performance metrics",
            kind: ChartKind::Radar,
            source: PanelSource::Chart(ChartSource::PerformanceRadar),
            label_key: "metric",
            label_fallback: "",
            series: &[
                series("current", "Current", "#0EA5E9"),
                series("target", "Target", "#10B981"),
            ],
            palette: None,
        },
        ChartSpec {
            id: "regional_dispatch_mix",
            title: "Regional Dispatch Mix",
            subtitle: "Volume by region",
            kind: ChartKind::Donut,
            source: PanelSource::Chart(ChartSource::SalesByRegion),
            label_key: "region",
            label_fallback: "Unknown",
            series: &[plain("dispatch", "Dispatch MT")],
            palette: Some(Palette::Vibrant),
        },
        ChartSpec {
            id: "regional_pricing",
            title: "Regional Pricing",
            subtitle: "Realization by region",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::SalesByRegion),
            label_key: "region",
            label_fallback: "Unknown",
            series: &[series("realization", "Realization ₹/MT", "#EC4899")],
            palette: None,
        },
        ChartSpec {
            id: "delivery_performance",
            title: "Delivery Performance",
            subtitle: "OTIF % by region",
            kind: ChartKind::GroupedBar,
            source: PanelSource::Chart(ChartSource::SalesByRegion),
            label_key: "region",
            label_fallback: "Unknown",
            series: &[series("otif", "OTIF %", "#10B981")],
            palette: None,
        },
        ChartSpec {
            id: "regional_summary",
            title: "Regional Sales Summary",
            subtitle: "Detailed performance by region",
            kind: ChartKind::Table,
            source: PanelSource::Chart(ChartSource::SalesByRegion),
            label_key: "region",
            label_fallback: "Unknown",
            series: &[
                plain("dispatch", "Dispatch MT"),
                plain("realization", "Realization ₹/MT"),
                plain("otif", "OTIF %"),
            ],
            palette: None,
        },
    ],
    bullets_title: "Sales Targets",
    bullets: &[
        BulletSpec {
            title: "OTIF %",
            metric: BulletMetric::Kpi("avg_otif_pct"),
            target: 95.0,
            max: 100.0,
            lower_is_better: false,
            color: "#10B981",
        },
        BulletSpec {
            title: "Realization Index",
            metric: BulletMetric::RealizationIndex,
            target: 90.0,
            max: 100.0,
            lower_is_better: false,
            color: "#EC4899",
        },
        BulletSpec {
            title: "Margin %",
            metric: BulletMetric::Kpi("avg_margin_pct"),
            target: 25.0,
            max: 40.0,
            lower_is_better: false,
            color: "#3B82F6",
        },
        BulletSpec {
            title: "Net Realization %",
            metric: BulletMetric::NetRealizationPct,
            target: 85.0,
            max: 100.0,
            lower_is_better: false,
            color: "#F59E0B",
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_four_headline_tiles_and_a_trend() {
        for role in Role::ALL {
            let p = profile(role);
            assert_eq!(p.role, role);
            assert!(p.charts.iter().any(|c| c.source == PanelSource::Trends));
            assert_eq!(p.primary.len(), 4);
        }
    }

    #[test]
    fn test_derived_bullet_metrics() {
        let kpis: KpiSet = [
            ("avg_power_kwh_ton".to_string(), 70.0),
            ("avg_realization_ton".to_string(), 5400.0),
            ("net_realization".to_string(), 4860.0),
        ]
        .into_iter()
        .collect();

        assert!((BulletMetric::EnergyScore.value(&kpis) - 80.0).abs() < 1e-9);
        assert!((BulletMetric::RealizationIndex.value(&kpis) - 90.0).abs() < 1e-9);
        assert!((BulletMetric::NetRealizationPct.value(&kpis) - 90.0).abs() < 1e-9);
        assert_eq!(BulletMetric::NetRealizationPct.value(&KpiSet::default()), 0.0);
    }
}
