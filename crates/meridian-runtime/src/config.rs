//! Dashboard configuration

use serde::{Deserialize, Serialize};

use meridian_core::{MeridianError, MeridianResult, TimeFormat};
use meridian_state::{TransitionConfig, ZONES_KEY};
use meridian_time::OffsetClockConfig;

/// Log output configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `MERIDIAN_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Dashboard configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Store key the zone list is persisted under
    pub storage_key: String,
    /// Initial clock format
    pub format: TimeFormat,
    /// Offset bounds, step and tick interval
    pub offset: OffsetClockConfig,
    /// Minute-change highlight window
    pub transition: TransitionConfig,
    /// Viewer zone override; detected from the host when unset
    pub viewer_zone: Option<String>,
    pub logging: LoggingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            storage_key: ZONES_KEY.to_string(),
            format: TimeFormat::H12,
            offset: OffsetClockConfig::default(),
            transition: TransitionConfig::default(),
            viewer_zone: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Month-wide time travel in 24-hour format
    pub fn planner() -> Self {
        DashboardConfig {
            format: TimeFormat::H24,
            offset: OffsetClockConfig::extended(),
            ..DashboardConfig::default()
        }
    }

    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(text: &str) -> MeridianResult<Self> {
        let config: DashboardConfig = serde_json::from_str(text)
            .map_err(|e| MeridianError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MeridianResult<()> {
        if self.storage_key.is_empty() {
            return Err(MeridianError::InvalidConfig(
                "storage_key must not be empty".to_string(),
            ));
        }
        self.offset.validate()
    }
}
