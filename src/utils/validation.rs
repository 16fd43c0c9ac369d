use crate::domain::model::BirthInfo;
use crate::utils::error::{Result, SajuError};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SajuError::invalid_value(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SajuError::invalid_value(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(SajuError::invalid_value(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SajuError::invalid_value(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(SajuError::invalid_value(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SajuError::invalid_value(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SajuError::invalid_value(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Field ranges for every birth record; calendar legality for solar dates only.
/// Lunar dates are checked by the converter.
pub fn validate_birth_info(birth: &BirthInfo) -> Result<()> {
    validate_range("month", birth.month, 1, 12)?;
    validate_range("day", birth.day, 1, 31)?;
    if let Some(hour) = birth.hour {
        validate_range("hour", hour, 0, 23)?;
    }
    if let Some(minute) = birth.minute {
        validate_range("minute", minute, 0, 59)?;
    }

    if !birth.is_lunar && NaiveDate::from_ymd_opt(birth.year, birth.month, birth.day).is_none() {
        return Err(SajuError::InvalidDate {
            year: birth.year,
            month: birth.month,
            day: birth.day,
        });
    }

    Ok(())
}
