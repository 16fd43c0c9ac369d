//! Pillar calculator: year, month, day and hour pillars from a Gregorian date.
//!
//! All arithmetic is fixed-offset and modular. The month rule is the simplified
//! `(2 * yearStem + month, month + 1)` approximation rather than solar-term
//! boundaries, so month pillars may pair stems and branches of different parity.

use crate::domain::model::{Chart, Pillar};
use crate::domain::ports::HourConvention;
use crate::domain::tables::{Branch, Stem};
use chrono::{Datelike, NaiveDate};

/// `NaiveDate::num_days_from_ce` of 1900-01-01.
const DAY_EPOCH_FROM_CE: i64 = 693_596;
const DAY_STEM_OFFSET: i64 = 36;
const DAY_BRANCH_OFFSET: i64 = 48;
const YEAR_EPOCH: i64 = 4;

/// Hour stem ordinals indexed by `[day stem][hour branch]` (五鼠遁).
/// Rows for stems five apart are identical.
pub const HOUR_STEM_TABLE: [[u8; 12]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1], // 甲
    [2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3], // 乙
    [4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5], // 丙
    [6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6, 7], // 丁
    [8, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9], // 戊
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1], // 己
    [2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3], // 庚
    [4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5], // 辛
    [6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6, 7], // 壬
    [8, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9], // 癸
];

pub fn year_pillar(year: i32) -> Pillar {
    let offset = year as i64 - YEAR_EPOCH;
    Pillar::new(Stem::from_ordinal(offset), Branch::from_ordinal(offset))
}

pub fn month_pillar(year_stem: Stem, month: u32) -> Pillar {
    let month = month as i64;
    Pillar::new(
        Stem::from_ordinal(2 * year_stem.ordinal() as i64 + month),
        Branch::from_ordinal(month + 1),
    )
}

/// Signed number of days from 1900-01-01 to `date`.
pub fn day_count(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - DAY_EPOCH_FROM_CE
}

pub fn day_pillar(date: NaiveDate) -> Pillar {
    let count = day_count(date);
    Pillar::new(
        Stem::from_ordinal(count + DAY_STEM_OFFSET),
        Branch::from_ordinal(count + DAY_BRANCH_OFFSET),
    )
}

/// Buckets a time of day into one of the twelve two-hour branch slots.
/// `hour` is expected in 0..24 and `minute` in 0..60.
pub fn hour_branch(hour: u32, minute: u32, convention: HourConvention) -> Branch {
    let minutes = (hour * 60 + minute) as i64;
    let slot = match convention {
        HourConvention::Standard => (hour as i64 + 1) / 2,
        HourConvention::HalfHourOffset => (minutes + 30) / 120,
    };
    Branch::from_ordinal(slot)
}

pub fn hour_pillar(day_stem: Stem, branch: Branch) -> Pillar {
    let stem = HOUR_STEM_TABLE[day_stem.ordinal()][branch.ordinal()];
    Pillar::new(Stem::from_ordinal(stem as i64), branch)
}

/// Builds the full chart. `time` is `(hour, minute)`; without it the hour
/// pillar is omitted.
pub fn compute_chart(date: NaiveDate, time: Option<(u32, u32)>, convention: HourConvention) -> Chart {
    let year = year_pillar(date.year());
    let month = month_pillar(year.stem, date.month());
    let day = day_pillar(date);
    let hour = time.map(|(h, m)| hour_pillar(day.stem, hour_branch(h, m, convention)));

    tracing::debug!(
        "Chart for {}: year={} month={} day={} hour={}",
        date,
        year,
        month,
        day,
        hour.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
    );

    Chart {
        year,
        month,
        day,
        hour,
    }
}
