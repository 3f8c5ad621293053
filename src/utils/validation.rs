use crate::utils::error::{DateTimeError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 檢查日期/時間欄位是否落在 [min, max] 範圍內
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DateTimeError::InvalidDateComponent {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 檢查日期在該月份是否存在 (考慮閏年)
pub fn validate_day_of_month(year: i32, month: u32, day: u32) -> Result<()> {
    validate_range("month", month, 1, 12)?;
    let max_day = crate::core::calendar::days_in_month(year, month);
    if day < 1 || day > max_day {
        return Err(DateTimeError::InvalidDateComponent {
            field: "day".to_string(),
            value: day.to_string(),
            reason: format!("{}-{:02} has {} days", year, month, max_day),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DateTimeError::ConfigError {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(DateTimeError::ConfigError {
            field: field_name.to_string(),
            message: format!(
                "Unsupported value '{}'. Valid values: {}",
                value,
                allowed.join(", ")
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range("hour", 0u32, 0, 23).is_ok());
        assert!(validate_range("hour", 23u32, 0, 23).is_ok());
        assert!(validate_range("hour", 24u32, 0, 23).is_err());
        assert!(validate_range("month", 0u32, 1, 12).is_err());
    }

    #[test]
    fn test_validate_day_of_month() {
        assert!(validate_day_of_month(2024, 2, 29).is_ok());
        assert!(validate_day_of_month(2023, 2, 29).is_err());
        assert!(validate_day_of_month(2023, 4, 31).is_err());
        assert!(validate_day_of_month(2023, 13, 1).is_err());
        assert!(validate_day_of_month(2023, 1, 0).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("zone.disambiguation", "strict", &["strict", "compatible"]).is_ok());
        assert!(validate_one_of("zone.disambiguation", "later", &["strict", "compatible"]).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("format.date_pattern", "yyyy").is_ok());
        assert!(validate_non_empty_string("format.date_pattern", "  ").is_err());
    }
}
