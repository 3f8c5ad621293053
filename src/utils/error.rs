use thiserror::Error;

#[derive(Error, Debug)]
pub enum DateTimeError {
    #[error("Invalid {field}: {value} ({reason})")]
    InvalidDateComponent {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cannot resolve {local} in zone {zone}: {reason}")]
    ZoneResolution {
        zone: String,
        local: String,
        reason: String,
    },

    #[error("Unknown time zone: {zone}")]
    UnknownZone { zone: String },

    #[error("Invalid UTC offset '{offset}': {reason}")]
    InvalidOffset { offset: String, reason: String },

    #[error("Text '{input}' does not match pattern '{pattern}': {reason}")]
    FormatMismatch {
        input: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Pattern '{pattern}' needs {field}, which this value does not have")]
    UnsupportedField { field: String, pattern: String },

    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    #[error("System clock unavailable: {message}")]
    ClockUnavailable { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Construction,
    TimeZone,
    Formatting,
    Arithmetic,
    System,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DateTimeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DateTimeError::InvalidDateComponent { .. } => ErrorCategory::Construction,
            DateTimeError::ZoneResolution { .. }
            | DateTimeError::UnknownZone { .. }
            | DateTimeError::InvalidOffset { .. } => ErrorCategory::TimeZone,
            DateTimeError::FormatMismatch { .. }
            | DateTimeError::InvalidPattern { .. }
            | DateTimeError::UnsupportedField { .. } => ErrorCategory::Formatting,
            DateTimeError::Overflow { .. } => ErrorCategory::Arithmetic,
            DateTimeError::ClockUnavailable { .. } | DateTimeError::IoError(_) => {
                ErrorCategory::System
            }
            DateTimeError::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 呼叫端可以換一個值重試
            DateTimeError::FormatMismatch { .. } | DateTimeError::ZoneResolution { .. } => {
                ErrorSeverity::Low
            }
            DateTimeError::InvalidDateComponent { .. }
            | DateTimeError::UnknownZone { .. }
            | DateTimeError::InvalidOffset { .. }
            | DateTimeError::Overflow { .. } => ErrorSeverity::Medium,
            DateTimeError::InvalidPattern { .. }
            | DateTimeError::UnsupportedField { .. }
            | DateTimeError::ConfigError { .. }
            | DateTimeError::IoError(_) => ErrorSeverity::High,
            DateTimeError::ClockUnavailable { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the same call can succeed with different caller input.
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DateTimeError::FormatMismatch { .. } | DateTimeError::ZoneResolution { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DateTimeError::InvalidDateComponent { field, .. } => {
                format!("Check that {} is within its calendar range", field)
            }
            DateTimeError::ZoneResolution { .. } => {
                "Use the compatible disambiguation policy or pick a local time outside the DST transition".to_string()
            }
            DateTimeError::UnknownZone { .. } => {
                "Use an IANA zone id such as 'Europe/Paris' or an offset such as '+05:30'".to_string()
            }
            DateTimeError::InvalidOffset { .. } => {
                "Write offsets as Z, +hh, +hh:mm or +hh:mm:ss within ±18:00".to_string()
            }
            DateTimeError::FormatMismatch { pattern, .. } => {
                format!("Make the input follow the pattern '{}' exactly", pattern)
            }
            DateTimeError::InvalidPattern { .. } => {
                "Quote literal letters with single quotes, e.g. 'T'".to_string()
            }
            DateTimeError::UnsupportedField { .. } => {
                "Format a value that carries the field, or drop it from the pattern".to_string()
            }
            DateTimeError::Overflow { .. } => {
                "Keep the result within the supported year range".to_string()
            }
            DateTimeError::ClockUnavailable { .. } => {
                "Check the host clock, or inject a FixedClock".to_string()
            }
            DateTimeError::ConfigError { field, .. } => {
                format!("Fix the value of '{}' in the configuration file", field)
            }
            DateTimeError::IoError(_) => "Check that the file exists and is readable".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DateTimeError::InvalidDateComponent { field, value, .. } => {
                format!("{} is not a valid {}", value, field)
            }
            DateTimeError::ZoneResolution { zone, local, .. } => {
                format!("{} does not exist exactly once in {}", local, zone)
            }
            DateTimeError::UnknownZone { zone } => format!("Unknown time zone '{}'", zone),
            DateTimeError::InvalidOffset { offset, .. } => {
                format!("'{}' is not a valid UTC offset", offset)
            }
            DateTimeError::FormatMismatch { input, pattern, .. } => {
                format!("Could not read '{}' as '{}'", input, pattern)
            }
            DateTimeError::InvalidPattern { pattern, .. } => {
                format!("'{}' is not a valid date pattern", pattern)
            }
            DateTimeError::UnsupportedField { field, .. } => {
                format!("This value has no {}", field)
            }
            DateTimeError::Overflow { .. } => "Date is out of range".to_string(),
            DateTimeError::ClockUnavailable { .. } => "The system clock cannot be read".to_string(),
            DateTimeError::ConfigError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            DateTimeError::IoError(e) => format!("File error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DateTimeError>;
