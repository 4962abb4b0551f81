// KPI domain models
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat metric name -> value mapping as returned under `kpis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiSet(BTreeMap<String, Option<f64>>);

impl KpiSet {
    /// Missing or null metrics read as zero, like the cards have always shown them.
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().flatten().unwrap_or(0.0)
    }
}

impl FromIterator<(String, f64)> for KpiSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub display: String,
    pub unit: String,
    pub target: Option<String>,
    pub accent: Option<String>,
}

impl KpiCard {
    pub fn new(key: &str, label: &str, value: f64, unit: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value,
            display: format_indian(value),
            unit: unit.to_string(),
            target: None,
            accent: None,
        }
    }

    pub fn with_target(mut self, target: Option<&str>) -> Self {
        self.target = target.map(str::to_string);
        self
    }

    pub fn with_accent(mut self, accent: Option<&str>) -> Self {
        self.accent = accent.map(str::to_string);
        self
    }
}

/// Actual-vs-target gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletGauge {
    pub title: String,
    pub actual: f64,
    pub target: f64,
    pub max: f64,
    pub lower_is_better: bool,
    pub color: String,
}

impl BulletGauge {
    /// Share of the bar to fill, clamped to [0, 1].
    pub fn fill_ratio(&self) -> f64 {
        if self.max <= 0.0 || !self.actual.is_finite() {
            return 0.0;
        }
        (self.actual / self.max).clamp(0.0, 1.0)
    }

    pub fn target_ratio(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.target / self.max).clamp(0.0, 1.0)
    }

    pub fn meets_target(&self) -> bool {
        if self.lower_is_better {
            self.actual <= self.target
        } else {
            self.actual >= self.target
        }
    }
}

/// Percentage change with sign, e.g. `+1.25%`.
pub fn format_change(change: f64, fraction_digits: usize) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{}{:.*}%", sign, fraction_digits, change)
}

/// Formats a number the en-IN way: lakh/crore grouping and at most two
/// fraction digits with trailing zeros dropped (`1234567.891` -> `12,34,567.89`).
pub fn format_indian(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let frac = cents % 100;
    let negative = value < 0.0 && cents != 0;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let fraction = match frac {
        0 => String::new(),
        f if f % 10 == 0 => format!(".{}", f / 10),
        f => format!(".{:02}", f),
    };

    format!("{}{}{}", if negative { "-" } else { "" }, grouped, fraction)
}
