use serde::Deserialize;

use crate::history_repo::resample::{StepRule, StepTable, default_step_rules};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub resampling: ResamplingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// History file (JSON list of samples).
    pub path: String,
    #[serde(default = "default_persist_interval_secs")]
    pub persist_interval_secs: u64,
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,
}

fn default_persist_interval_secs() -> u64 {
    300
}

fn default_retention_hours() -> u32 {
    168
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (retained/recorded samples) at INFO level.
    pub stats_log_interval_secs: u64,
}

/// Period (hours) → chunk size used by `/data`. Lookup is by exact period value.
#[derive(Debug, Clone, Deserialize)]
pub struct ResamplingConfig {
    #[serde(default = "default_step_rules")]
    pub steps: Vec<StepRule>,
}

impl Default for ResamplingConfig {
    fn default() -> Self {
        Self {
            steps: default_step_rules(),
        }
    }
}

impl StorageConfig {
    pub fn retention(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.retention_hours) * 3600)
    }
}

impl ResamplingConfig {
    pub fn step_table(&self) -> StepTable {
        StepTable::new(self.steps.clone())
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.storage.path.is_empty(),
            "storage.path must be non-empty"
        );
        anyhow::ensure!(
            self.storage.persist_interval_secs > 0,
            "storage.persist_interval_secs must be > 0, got {}",
            self.storage.persist_interval_secs
        );
        anyhow::ensure!(
            self.storage.retention_hours > 0,
            "storage.retention_hours must be > 0, got {}",
            self.storage.retention_hours
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        for (i, rule) in self.resampling.steps.iter().enumerate() {
            anyhow::ensure!(
                rule.period_hours.is_finite() && rule.period_hours > 0.0,
                "resampling.steps[{}].period_hours must be a positive number, got {}",
                i,
                rule.period_hours
            );
            anyhow::ensure!(
                rule.step > 0,
                "resampling.steps[{}].step must be > 0, got {}",
                i,
                rule.step
            );
            anyhow::ensure!(
                !self.resampling.steps[..i]
                    .iter()
                    .any(|r| r.period_hours == rule.period_hours),
                "resampling.steps has duplicate period_hours {}",
                rule.period_hours
            );
        }
        Ok(())
    }
}
