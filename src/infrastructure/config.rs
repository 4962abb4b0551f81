use crate::domain::filters::{DashboardFilters, DateRange, InvertedRange, PlantFilter};
use crate::domain::role::Role;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend used when nothing else is configured; may be baked in at build time.
pub const DEFAULT_BACKEND_URL: &str = match option_env!("KPI_DASH_BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:8001",
};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SessionSettings {
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

impl SessionSettings {
    pub fn token_path(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(default_token_path)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DashboardSettings {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub plant: String,
}

impl DashboardSettings {
    /// Starting filters for a role.
    pub fn filters(&self, role: Role) -> Result<DashboardFilters, InvertedRange> {
        let range = DateRange::new(self.start, self.end)?;
        Ok(DashboardFilters::new(role, PlantFilter::from(self.plant.clone()), range))
    }
}

pub fn default_token_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kpi-dash")
        .join("session.json")
}

/// Defaults, then `config/dashboard.*`, then `user_file`, then `KPI_DASH__*` env vars.
pub fn load_config(user_file: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut builder = config::Config::builder()
        .set_default("api.base_url", DEFAULT_BACKEND_URL)?
        .set_default("api.timeout_secs", 30)?
        .set_default("dashboard.start", "2024-07-01")?
        .set_default("dashboard.end", "2025-12-31")?
        .set_default("dashboard.plant", "all")?
        .add_source(config::File::with_name("config/dashboard").required(false));

    if let Some(path) = user_file {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("KPI_DASH")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .context("Failed to load configuration")?;

    let config: AppConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;

    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");
    Ok(config)
}
