// Text and JSON renderers for terminal output
use crate::application::notifications::{Level, Notification};
use crate::domain::charts::{ChartData, ChartKind, SeriesData};
use crate::domain::comparison::{MetricRow, PlantComparison};
use crate::domain::dashboard::Dashboard;
use crate::domain::insight::InsightResponse;
use crate::domain::kpi::{BulletGauge, KpiCard, format_change, format_indian};
use crate::domain::session::DEMO_ACCOUNTS;
use crate::domain::upload::{EXPECTED_SHEETS, UploadResult};
use crate::presentation::routes::NavBar;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

const BAR_WIDTH: usize = 24;
const PREVIEW_ROWS: usize = 5;
const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Chooses between JSON and text for everything printed on stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }
}

pub fn notification(note: &Notification) -> String {
    let marker = match note.level {
        Level::Info => "i",
        Level::Success => "✓",
        Level::Error => "✗",
    };
    format!("[{marker}] {}", note.message)
}

pub fn navbar(nav: &NavBar) -> String {
    let items: Vec<String> = nav
        .items
        .iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.label)
            } else {
                item.label.to_string()
            }
        })
        .collect();
    format!("{}    {} ({})\n", items.join("  "), nav.email, nav.role)
}

pub fn login_view() -> String {
    let mut out = String::from("Sign in to continue:\n  kpi-dash login --email <email> --password <password>\n\nDemo accounts:\n");
    for account in DEMO_ACCOUNTS {
        let _ = writeln!(
            out,
            "  {:<15} {:<24} kpi-dash login --demo {}",
            account.role.as_str(),
            account.email,
            account.role.as_str().to_lowercase().replace(' ', "-")
        );
    }
    out
}

fn card(card: &KpiCard) -> String {
    let mut line = format!("  {:<24} {:>16} {}", card.label, card.display, card.unit);
    if let Some(target) = &card.target {
        let _ = write!(line, "  (target {target})");
    }
    line.trim_end().to_string()
}

fn bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn sparkline(series: &SeriesData) -> String {
    let (min, max) = series
        .points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.value), hi.max(p.value)));
    let span = max - min;
    series
        .points
        .iter()
        .map(|p| {
            if span <= 0.0 || !span.is_finite() {
                SPARKS[SPARKS.len() / 2]
            } else {
                let idx = ((p.value - min) / span * (SPARKS.len() - 1) as f64).round() as usize;
                SPARKS[idx.min(SPARKS.len() - 1)]
            }
        })
        .collect()
}

pub fn bullet(gauge: &BulletGauge) -> String {
    let mut cells: Vec<char> = bar(gauge.fill_ratio(), BAR_WIDTH).chars().collect();
    let marker = ((gauge.target_ratio() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH - 1);
    cells[marker] = '│';
    let status = if gauge.meets_target() { "on target" } else { "off target" };
    format!(
        "  {:<28} {} {} / {} ({status})",
        gauge.title,
        cells.into_iter().collect::<String>(),
        format_indian(gauge.actual),
        format_indian(gauge.target)
    )
}

pub fn chart(chart: &ChartData) -> String {
    let mut out = String::new();
    let _ = write!(out, "\n▸ {}", chart.title);
    if let Some(subtitle) = &chart.subtitle {
        let _ = write!(out, " - {subtitle}");
    }
    out.push('\n');

    match chart.kind {
        ChartKind::Area | ChartKind::Composed | ChartKind::MultiLine | ChartKind::StackedArea | ChartKind::Combo => {
            let labels = chart.labels();
            if let (Some(first), Some(last)) = (labels.first(), labels.last()) {
                let _ = writeln!(out, "  {first} .. {last}");
            }
            for series in &chart.series {
                let change = series
                    .change_pct()
                    .map(|c| format!("  {}", format_change(c, 1)))
                    .unwrap_or_default();
                let latest = series.points.last().map(|p| format_indian(p.value)).unwrap_or_default();
                let _ = writeln!(out, "  {:<22} {}  {}{}", series.name, sparkline(series), latest, change);
            }
        }
        ChartKind::Donut => {
            if let Some(series) = chart.series.first() {
                for (point, share) in series.points.iter().zip(series.shares()) {
                    let _ = writeln!(
                        out,
                        "  {:<18} {} {:>5.1}%  {}",
                        point.label,
                        bar(share / 100.0, BAR_WIDTH),
                        share,
                        format_indian(point.value)
                    );
                }
            }
        }
        ChartKind::Table => {
            let _ = write!(out, "  {:<18}", "");
            for series in &chart.series {
                let _ = write!(out, "{:>16}", series.name);
            }
            out.push('\n');
            for (idx, label) in chart.labels().iter().enumerate() {
                let _ = write!(out, "  {label:<18}");
                for series in &chart.series {
                    let value = series.points.get(idx).map(|p| format_indian(p.value)).unwrap_or_default();
                    let _ = write!(out, "{value:>16}");
                }
                out.push('\n');
            }
        }
        ChartKind::Radar | ChartKind::HorizontalBar | ChartKind::Waterfall | ChartKind::GroupedBar => {
            let max = chart
                .series
                .iter()
                .flat_map(|s| s.points.iter().map(|p| p.value.abs()))
                .fold(0.0_f64, f64::max);
            for (idx, label) in chart.labels().iter().enumerate() {
                for series in &chart.series {
                    let Some(point) = series.points.get(idx) else {
                        continue;
                    };
                    let ratio = if max > 0.0 { point.value.abs() / max } else { 0.0 };
                    let name = if chart.series.len() > 1 { series.name.as_str() } else { "" };
                    let _ = writeln!(
                        out,
                        "  {:<18} {:<12} {} {}",
                        label,
                        name,
                        bar(ratio, BAR_WIDTH),
                        format_indian(point.value)
                    );
                }
            }
        }
    }
    out
}

pub fn dashboard(view: &Dashboard) -> String {
    let mut out = String::new();
    let filters = &view.filters;
    let _ = writeln!(out, "{} - {}", view.title, view.subtitle);
    let _ = writeln!(
        out,
        "Role: {} | Plant: {} | {} to {}",
        filters.role.as_str(),
        filters.plant.label(),
        filters.range.start_param(),
        filters.range.end_param()
    );
    let _ = writeln!(out, "Focus: {}\n", view.focus_areas.join(", "));

    for tile in &view.tiles {
        let _ = writeln!(out, "{}", card(tile));
    }

    if !view.secondary_tiles.is_empty() {
        let _ = writeln!(out, "\n{}", view.secondary_title);
        for tile in &view.secondary_tiles {
            let _ = writeln!(out, "{}", card(tile));
        }
    }

    for c in &view.charts {
        out.push_str(&chart(c));
    }

    if !view.bullets.is_empty() {
        let _ = writeln!(out, "\n{}", view.bullets_title);
        for gauge in &view.bullets {
            let _ = writeln!(out, "{}", bullet(gauge));
        }
    }
    out
}

pub fn upload_result(result: &UploadResult) -> String {
    let mut out = format!("{}\n", result.message);
    if !result.stats.plants.is_empty() {
        let _ = writeln!(out, "Plants: {}", result.stats.plants.join(", "));
    }
    for (sheet, rows) in &result.stats.rows_per_sheet {
        let _ = writeln!(out, "  {sheet:<18} {rows:>8} rows");
    }
    let _ = writeln!(out, "  {:<18} {:>8} rows", "Total", result.total_rows());
    if !result.preview.is_empty() {
        out.push_str("Data preview:\n");
        for (sheet, rows) in &result.preview {
            let _ = writeln!(out, "  {sheet}");
            let rows = rows.as_array().map(Vec::as_slice).unwrap_or_default();
            for row in rows.iter().take(PREVIEW_ROWS) {
                let _ = writeln!(out, "    {}", preview_row(row));
            }
            if rows.len() > PREVIEW_ROWS {
                let _ = writeln!(out, "    ... {} more", rows.len() - PREVIEW_ROWS);
            }
        }
    }
    out
}

fn preview_row(row: &Value) -> String {
    let cell = |value: &Value| match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    };
    match row {
        Value::Object(fields) => fields
            .iter()
            .map(|(k, v)| format!("{k}={}", cell(v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => cell(other),
    }
}

pub fn expected_sheets() -> String {
    let mut out = String::from("Expected sheets:\n");
    for (sheet, columns) in EXPECTED_SHEETS {
        let _ = writeln!(out, "  {sheet:<16} {columns}");
    }
    out
}

pub fn prompts(list: &[String]) -> String {
    let mut out = String::from("Try asking:\n");
    for prompt in list {
        let _ = writeln!(out, "  - {prompt}");
    }
    out
}

pub fn insight(response: &InsightResponse) -> String {
    let mut out = format!("{}\n", response.summary);
    if !response.causes.is_empty() {
        out.push_str("\nLikely causes:\n");
        for cause in &response.causes {
            let _ = writeln!(out, "  - {cause}");
        }
    }
    if !response.recommended_actions.is_empty() {
        out.push_str("\nRecommended actions:\n");
        for (idx, action) in response.recommended_actions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {action}", idx + 1);
        }
    }
    if let Some(evidence) = &response.evidence {
        if !evidence.computed_metrics.is_empty() {
            out.push_str("\nEvidence:\n");
            for (metric, value) in &evidence.computed_metrics {
                let _ = writeln!(out, "  {metric}: {value}");
            }
        }
    }
    out
}

fn metric_table(out: &mut String, title: &str, plants: &[String], rows: &[MetricRow]) {
    let _ = write!(out, "\n{title}\n  {:<20}", "");
    for plant in plants {
        let _ = write!(out, "{plant:>14}");
    }
    out.push('\n');
    for row in rows {
        let _ = write!(out, "  {:<20}", row.metric);
        for value in &row.values {
            let _ = write!(out, "{:>14}", format_indian(*value));
        }
        out.push('\n');
    }
}

pub fn comparison(view: &PlantComparison) -> String {
    let mut out = format!("Plant comparison: {}\n", view.plants.join(" vs "));

    for summary in &view.summaries {
        let _ = writeln!(
            out,
            "  {:<14} production {} MT, EBITDA ₹{}/MT, margin {}%",
            summary.plant,
            summary.display("total_cement_mt"),
            summary.display("avg_ebitda_ton"),
            summary.display("avg_margin_pct")
        );
    }

    metric_table(&mut out, "Performance radar (% of scale)", &view.plants, &view.radar);
    metric_table(&mut out, "Production", &view.plants, &view.production);
    metric_table(&mut out, "Financial", &view.plants, &view.financial);
    metric_table(&mut out, "Energy", &view.plants, &view.energy);

    if !view.trend.is_empty() {
        let _ = write!(out, "\nMonthly EBITDA (₹/MT)\n  {:<20}", "");
        for plant in &view.plants {
            let _ = write!(out, "{plant:>14}");
        }
        out.push('\n');
        for (month, values) in &view.trend {
            let _ = write!(out, "  {month:<20}");
            for value in values {
                let cell = value.map(format_indian).unwrap_or_else(|| "-".to_string());
                let _ = write!(out, "{cell:>14}");
            }
            out.push('\n');
        }
    }
    out
}
