use crate::domain::model::{Chart, ElementBalance};

pub const STEM_WEIGHT: u32 = 2;
pub const BRANCH_WEIGHT: u32 = 1;

pub fn element_balance(chart: &Chart) -> ElementBalance {
    let mut balance = ElementBalance::new();
    for (_, pillar) in chart.pillars() {
        balance.add(pillar.stem.element(), STEM_WEIGHT);
        balance.add(pillar.branch.element(), BRANCH_WEIGHT);
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pillars::compute_chart;
    use crate::domain::ports::HourConvention;
    use crate::domain::tables::Element;
    use chrono::NaiveDate;

    #[test]
    fn test_balance_for_known_chart() {
        // 壬申 / 甲巳 / 癸巳
        let date = NaiveDate::from_ymd_opt(1992, 4, 21).unwrap();
        let chart = compute_chart(date, None, HourConvention::Standard);
        let balance = element_balance(&chart);

        assert_eq!(balance.weight(Element::Water), 4);
        assert_eq!(balance.weight(Element::Metal), 1);
        assert_eq!(balance.weight(Element::Wood), 2);
        assert_eq!(balance.weight(Element::Fire), 2);
        assert_eq!(balance.weight(Element::Earth), 0);
        assert_eq!(balance.total(), 9);
    }

    #[test]
    fn test_balance_sums_to_three_per_pillar() {
        let date = NaiveDate::from_ymd_opt(2001, 9, 11).unwrap();
        let with_hour = compute_chart(date, Some((8, 0)), HourConvention::Standard);
        let without_hour = compute_chart(date, None, HourConvention::Standard);
        assert_eq!(element_balance(&with_hour).total(), 12);
        assert_eq!(element_balance(&without_hour).total(), 9);
    }
}
