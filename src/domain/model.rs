use crate::domain::tables::{Branch, Element, Stem};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Birth data as supplied by the caller; may be lunar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub is_lunar: bool,
    #[serde(default)]
    pub is_leap_month: Option<bool>,
    pub gender: Gender,
}

impl BirthInfo {
    pub fn solar(year: i32, month: u32, day: u32, gender: Gender) -> Self {
        Self {
            year,
            month,
            day,
            hour: None,
            minute: None,
            is_lunar: false,
            is_leap_month: None,
            gender,
        }
    }

    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn with_minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn lunar(mut self, is_leap_month: bool) -> Self {
        self.is_lunar = true;
        self.is_leap_month = Some(is_leap_month);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// Headline element, taken from the stem.
    pub fn element(&self) -> Element {
        self.stem.element()
    }

    /// Position in the 60-cycle (甲子 = 0), or `None` when stem and branch
    /// parities differ and the pair is not a member of the cycle.
    pub fn sexagenary_index(&self) -> Option<usize> {
        let s = self.stem.ordinal() as i64;
        let b = self.branch.ordinal() as i64;
        if (s - b) % 2 != 0 {
            return None;
        }
        Some((6 * s - 5 * b).rem_euclid(60) as usize)
    }

    pub fn korean(&self) -> String {
        format!("{}{}", self.stem.korean(), self.branch.korean())
    }

    pub fn romanized(&self) -> String {
        format!("{}-{}", self.stem.romanized(), self.branch.romanized())
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem.hanja(), self.branch.hanja())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl fmt::Display for PillarPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PillarPosition::Year => "year",
            PillarPosition::Month => "month",
            PillarPosition::Day => "day",
            PillarPosition::Hour => "hour",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Option<Pillar>,
}

impl Chart {
    /// Present pillars in year, month, day, hour order.
    pub fn pillars(&self) -> Vec<(PillarPosition, Pillar)> {
        let mut pillars = vec![
            (PillarPosition::Year, self.year),
            (PillarPosition::Month, self.month),
            (PillarPosition::Day, self.day),
        ];
        if let Some(hour) = self.hour {
            pillars.push((PillarPosition::Hour, hour));
        }
        pillars
    }

    pub fn pillar_count(&self) -> usize {
        if self.hour.is_some() {
            4
        } else {
            3
        }
    }

    pub fn day_master(&self) -> Stem {
        self.day.stem
    }
}

/// Weighted element counts; stems weigh 2, branches 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBalance {
    weights: BTreeMap<Element, u32>,
}

impl Default for ElementBalance {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementBalance {
    pub fn new() -> Self {
        let weights = Element::ALL.into_iter().map(|e| (e, 0)).collect();
        Self { weights }
    }

    pub fn add(&mut self, element: Element, weight: u32) {
        *self.weights.entry(element).or_insert(0) += weight;
    }

    pub fn weight(&self, element: Element) -> u32 {
        self.weights.get(&element).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.weights.values().sum()
    }

    /// Share of `element` in percent; 0 for an empty balance.
    pub fn percentage(&self, element: Element) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.weight(element) as f64 / total as f64 * 100.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::ALL.into_iter().map(move |e| (e, self.weight(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMaster {
    pub stem: Stem,
    pub element: Element,
}

/// A detected symbolic marker (신살).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sal {
    pub name: String,
    pub korean: String,
    pub hanja: String,
    pub positive: bool,
    pub locations: Vec<String>,
    pub origin: String,
    pub keywords: Vec<String>,
    pub effect: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementShare {
    pub element: Element,
    pub weight: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SajuAnalysis {
    pub birth: BirthInfo,
    /// Gregorian date the pillars were computed from.
    pub solar_date: NaiveDate,
    pub chart: Chart,
    pub balance: ElementBalance,
    pub shares: Vec<ElementShare>,
    pub day_master: DayMaster,
    pub strong_elements: Vec<Element>,
    pub weak_elements: Vec<Element>,
    pub personality: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub sals: Vec<Sal>,
}
