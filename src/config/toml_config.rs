use crate::core::clock::{FixedClock, SystemClock};
use crate::core::format::{patterns, DateTimeFormatter};
use crate::core::resolve::Disambiguation;
use crate::domain::ports::Clock;
use crate::domain::timestamp::Instant;
use crate::domain::zone::ZoneId;
use crate::utils::error::{DateTimeError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTimeConfig {
    pub clock: ClockConfig,
    pub format: FormatConfig,
    pub zone: ZoneConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub zone: String,
    pub fixed_instant: Option<String>, // 設定後改用 FixedClock
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            zone: "system".to_string(),
            fixed_instant: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub date_pattern: String,
    pub time_pattern: String,
    pub date_time_pattern: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            date_pattern: patterns::ISO_LOCAL_DATE.to_string(),
            time_pattern: patterns::ISO_LOCAL_TIME.to_string(),
            date_time_pattern: patterns::ISO_LOCAL_DATE_TIME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub disambiguation: String,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            disambiguation: "compatible".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl DateTimeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DateTimeError::IoError)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded date-time configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DateTimeError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${APP_TZ})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("clock.zone", &self.clock.zone)?;
        self.zone_id().map_err(|e| DateTimeError::ConfigError {
            field: "clock.zone".to_string(),
            message: e.to_string(),
        })?;

        if let Some(instant) = &self.clock.fixed_instant {
            Instant::parse(instant).map_err(|e| DateTimeError::ConfigError {
                field: "clock.fixed_instant".to_string(),
                message: e.to_string(),
            })?;
        }

        for (field, pattern) in [
            ("format.date_pattern", &self.format.date_pattern),
            ("format.time_pattern", &self.format.time_pattern),
            ("format.date_time_pattern", &self.format.date_time_pattern),
        ] {
            validate_non_empty_string(field, pattern)?;
            DateTimeFormatter::of_pattern(pattern).map_err(|e| DateTimeError::ConfigError {
                field: field.to_string(),
                message: e.to_string(),
            })?;
        }

        self.disambiguation()?;
        validate_one_of(
            "logging.level",
            &self.logging.level.to_ascii_lowercase(),
            &["trace", "debug", "info", "warn", "error"],
        )?;

        Ok(())
    }

    pub fn zone_id(&self) -> Result<ZoneId> {
        ZoneId::of(&self.clock.zone)
    }

    pub fn disambiguation(&self) -> Result<Disambiguation> {
        self.zone.disambiguation.parse()
    }

    /// 依設定建立時鐘：有 fixed_instant 就用 FixedClock
    pub fn clock(&self) -> Result<Arc<dyn Clock>> {
        let zone = self.zone_id()?;
        match &self.clock.fixed_instant {
            Some(instant) => {
                let instant = Instant::parse(instant)?;
                tracing::debug!("Using fixed clock at {} in {}", instant, zone);
                Ok(Arc::new(FixedClock::new(instant, zone)))
            }
            None => Ok(Arc::new(SystemClock::new(zone))),
        }
    }

    pub fn date_formatter(&self) -> Result<DateTimeFormatter> {
        Ok(DateTimeFormatter::of_pattern(&self.format.date_pattern)?.with_zone(self.zone_id()?))
    }

    pub fn time_formatter(&self) -> Result<DateTimeFormatter> {
        Ok(DateTimeFormatter::of_pattern(&self.format.time_pattern)?.with_zone(self.zone_id()?))
    }

    pub fn date_time_formatter(&self) -> Result<DateTimeFormatter> {
        Ok(DateTimeFormatter::of_pattern(&self.format.date_time_pattern)?
            .with_zone(self.zone_id()?))
    }
}

impl Validate for DateTimeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
