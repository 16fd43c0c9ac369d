use crate::domain::tables::Element;
use crate::utils::error::{Result, SajuError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DECK_SIZE: usize = 78;
pub const ADVICE_CARD_LABEL: &str = "advice card";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Major,
    Wands,
    Cups,
    Swords,
    Pentacles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TarotCard {
    pub id: String,
    pub name: String,
    pub name_ko: String,
    pub number: u8,
    pub suit: Suit,
    #[serde(default)]
    pub element: Option<Element>,
    pub upright_meaning: String,
    pub reversed_meaning: String,
    pub upright_keywords: Vec<String>,
    pub reversed_keywords: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl TarotCard {
    pub fn meaning(&self, is_reversed: bool) -> &str {
        if is_reversed {
            &self.reversed_meaning
        } else {
            &self.upright_meaning
        }
    }

    pub fn keywords(&self, is_reversed: bool) -> &[String] {
        if is_reversed {
            &self.reversed_keywords
        } else {
            &self.upright_keywords
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub card: TarotCard,
    pub position: usize,
    pub is_reversed: bool,
    pub position_meaning: String,
}

impl DrawnCard {
    pub fn orientation(&self) -> &'static str {
        if self.is_reversed {
            "reversed"
        } else {
            "upright"
        }
    }

    pub fn is_advice_card(&self) -> bool {
        self.position_meaning == ADVICE_CARD_LABEL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpreadType {
    OneCard,
    TwoCard,
    ThreeCard,
    CelticCross,
    SajuCustom,
    SixMonths,
    YesNo,
    ProblemSolution,
    Compatibility,
}

/// Named, ordered position labels for one spread type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpreadLayout {
    pub spread: SpreadType,
    pub positions: &'static [&'static str],
}

impl SpreadLayout {
    pub fn card_count(&self) -> usize {
        self.positions.len()
    }
}

impl SpreadType {
    pub const ALL: [SpreadType; 9] = [
        SpreadType::OneCard,
        SpreadType::TwoCard,
        SpreadType::ThreeCard,
        SpreadType::CelticCross,
        SpreadType::SajuCustom,
        SpreadType::SixMonths,
        SpreadType::YesNo,
        SpreadType::ProblemSolution,
        SpreadType::Compatibility,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SpreadType::OneCard => "one-card",
            SpreadType::TwoCard => "two-card",
            SpreadType::ThreeCard => "three-card",
            SpreadType::CelticCross => "celtic-cross",
            SpreadType::SajuCustom => "saju-custom",
            SpreadType::SixMonths => "six-months",
            SpreadType::YesNo => "yes-no",
            SpreadType::ProblemSolution => "problem-solution",
            SpreadType::Compatibility => "compatibility",
        }
    }

    pub fn layout(self) -> SpreadLayout {
        let positions: &'static [&'static str] = match self {
            SpreadType::OneCard => &["Present Guidance"],
            SpreadType::TwoCard => &["Current Situation", "Likely Outcome"],
            SpreadType::ThreeCard => &["Past", "Present", "Future"],
            SpreadType::CelticCross => &[
                "Present Situation",
                "Challenge",
                "Distant Past",
                "Recent Past",
                "Best Outcome",
                "Near Future",
                "Self",
                "Environment",
                "Hopes and Fears",
                "Final Outcome",
            ],
            SpreadType::SajuCustom => &[
                "Innate Nature",
                "Current Fortune",
                "Relationships",
                "Career and Wealth",
                "Guidance",
            ],
            SpreadType::SixMonths => &[
                "Month 1", "Month 2", "Month 3", "Month 4", "Month 5", "Month 6",
            ],
            SpreadType::YesNo => &["Answer"],
            SpreadType::ProblemSolution => &["Problem", "Solution"],
            SpreadType::Compatibility => &[
                "You",
                "The Other Person",
                "Relationship Now",
                "Relationship Future",
            ],
        };
        SpreadLayout {
            spread: self,
            positions,
        }
    }
}

impl fmt::Display for SpreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SpreadType {
    type Err = SajuError;

    fn from_str(s: &str) -> Result<Self> {
        SpreadType::ALL
            .into_iter()
            .find(|spread| spread.id() == s.trim())
            .ok_or_else(|| SajuError::UnknownSpread(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_card_counts() {
        let counts: Vec<(&str, usize)> = SpreadType::ALL
            .iter()
            .map(|s| (s.id(), s.layout().card_count()))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("one-card", 1),
                ("two-card", 2),
                ("three-card", 3),
                ("celtic-cross", 10),
                ("saju-custom", 5),
                ("six-months", 6),
                ("yes-no", 1),
                ("problem-solution", 2),
                ("compatibility", 4),
            ]
        );
    }

    #[test]
    fn test_spread_parse_round_trips_ids() {
        for spread in SpreadType::ALL {
            assert_eq!(spread.id().parse::<SpreadType>().unwrap(), spread);
        }
        assert!(matches!(
            "seven-card".parse::<SpreadType>(),
            Err(SajuError::UnknownSpread(_))
        ));
    }

    #[test]
    fn test_spread_serializes_as_kebab_case() {
        let json = serde_json::to_string(&SpreadType::ProblemSolution).unwrap();
        assert_eq!(json, "\"problem-solution\"");
    }
}
