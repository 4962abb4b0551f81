// Dashboard filter dimensions: role, plant and date range
use super::role::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const KNOWN_PLANTS: [&str; 5] = ["Lumshnong", "Sonapur", "Siliguri", "Jalpaiguri", "Guwahati"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PlantFilter {
    #[default]
    All,
    Named(String),
}

impl PlantFilter {
    pub fn as_str(&self) -> &str {
        match self {
            PlantFilter::All => "all",
            PlantFilter::Named(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PlantFilter::All => "All Plants",
            PlantFilter::Named(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        match self {
            PlantFilter::All => true,
            PlantFilter::Named(name) => KNOWN_PLANTS.contains(&name.as_str()),
        }
    }
}

impl From<String> for PlantFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("all plants") {
            return PlantFilter::All;
        }
        // Snap to the canonical spelling when the plant is one we know.
        match KNOWN_PLANTS.iter().find(|p| p.eq_ignore_ascii_case(trimmed)) {
            Some(known) => PlantFilter::Named(known.to_string()),
            None => PlantFilter::Named(trimmed.to_string()),
        }
    }
}

impl From<PlantFilter> for String {
    fn from(value: PlantFilter) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for PlantFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PlantFilter::from(s.to_string()))
    }
}

impl fmt::Display for PlantFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("date range start {start} is after end {end}")]
pub struct InvertedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvertedRange> {
        if start > end {
            return Err(InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl Default for DateRange {
    /// The window the dashboards are built for.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardFilters {
    pub role: Role,
    pub plant: PlantFilter,
    pub range: DateRange,
}

impl DashboardFilters {
    pub fn new(role: Role, plant: PlantFilter, range: DateRange) -> Self {
        Self { role, plant, range }
    }

    /// Query pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("role", self.role.as_str().to_string()),
            ("start", self.range.start_param()),
            ("end", self.range.end_param()),
            ("plant", self.plant.as_str().to_string()),
        ]
    }

    /// Applies a change and reports whether anything actually moved.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        match change {
            FilterChange::Role(role) if role != self.role => {
                self.role = role;
                true
            }
            FilterChange::Plant(plant) if plant != self.plant => {
                self.plant = plant;
                true
            }
            FilterChange::Range(range) if range != self.range => {
                self.range = range;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Role(Role),
    Plant(PlantFilter),
    Range(DateRange),
}
