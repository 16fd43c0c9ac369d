use crate::domain::ports::LunarConverter;
use crate::utils::error::{Result, SajuError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One lunar year: its first day in the Gregorian calendar and month lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarYear {
    pub year: i32,
    pub new_year: NaiveDate,
    pub month_days: Vec<u32>,
    #[serde(default)]
    pub leap_month: Option<u32>,
    #[serde(default)]
    pub leap_days: Option<u32>,
}

impl LunarYear {
    fn validate(&self) -> Result<()> {
        if self.month_days.len() != 12 {
            return Err(SajuError::Config {
                message: format!(
                    "lunar year {} must list 12 month lengths, found {}",
                    self.year,
                    self.month_days.len()
                ),
            });
        }
        let lengths = self.month_days.iter().chain(self.leap_days.iter());
        if let Some(bad) = lengths.into_iter().find(|d| !(29..=30).contains(*d)) {
            return Err(SajuError::Config {
                message: format!("lunar year {} has a {}-day month", self.year, bad),
            });
        }
        match (self.leap_month, self.leap_days) {
            (Some(m), Some(_)) if (1..=12).contains(&m) => Ok(()),
            (None, None) => Ok(()),
            _ => Err(SajuError::Config {
                message: format!(
                    "lunar year {} needs both leap_month (1-12) and leap_days, or neither",
                    self.year
                ),
            }),
        }
    }
}

/// Table-driven lunar-to-solar conversion.
#[derive(Debug, Clone, Default)]
pub struct TableLunarConverter {
    years: BTreeMap<i32, LunarYear>,
}

impl TableLunarConverter {
    pub fn from_years(years: Vec<LunarYear>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for year in years {
            year.validate()?;
            table.insert(year.year, year);
        }
        Ok(Self { years: table })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let years: Vec<LunarYear> = serde_json::from_str(content)?;
        Self::from_years(years)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let converter = Self::from_json_str(&content)?;
        tracing::info!(
            "🌙 Loaded lunar table with {} years from {}",
            converter.years.len(),
            path.as_ref().display()
        );
        Ok(converter)
    }

    pub fn covers(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }
}

impl LunarConverter for TableLunarConverter {
    fn to_solar(&self, year: i32, month: u32, day: u32, is_leap_month: bool) -> Result<NaiveDate> {
        let entry = self.years.get(&year).ok_or_else(|| SajuError::LunarConversion {
            message: format!("lunar year {} is not in the conversion table", year),
        })?;

        if !(1..=12).contains(&month) {
            return Err(SajuError::LunarConversion {
                message: format!("lunar month {} is out of range", month),
            });
        }
        if is_leap_month && entry.leap_month != Some(month) {
            return Err(SajuError::LunarConversion {
                message: format!("lunar year {} has no leap month {}", year, month),
            });
        }

        let month_length = if is_leap_month {
            entry.leap_days.unwrap_or(0)
        } else {
            entry.month_days[month as usize - 1]
        };
        if day == 0 || day > month_length {
            return Err(SajuError::LunarConversion {
                message: format!(
                    "lunar {}-{}{} has {} days, got day {}",
                    year,
                    month,
                    if is_leap_month { " (leap)" } else { "" },
                    month_length,
                    day
                ),
            });
        }

        // 閏月緊接在同號的平月之後
        let mut offset: u32 = entry.month_days[..month as usize - 1].iter().sum();
        if let (Some(leap), Some(leap_days)) = (entry.leap_month, entry.leap_days) {
            if leap < month {
                offset += leap_days;
            }
        }
        if is_leap_month {
            offset += entry.month_days[month as usize - 1];
        }
        offset += day - 1;

        let solar = entry.new_year + Duration::days(offset as i64);
        tracing::debug!(
            "Lunar {}-{:02}-{:02}{} -> solar {}",
            year,
            month,
            day,
            if is_leap_month { " (leap)" } else { "" },
            solar
        );
        Ok(solar)
    }
}
