//! Template-based reading used when no interpreter is available.
//! Output depends only on the analysis and the drawn cards.

use crate::core::classifier::{activity_for, affinity_notes, card_affinity};
use crate::domain::model::SajuAnalysis;
use crate::domain::tables::Element;
use crate::domain::tarot::DrawnCard;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedReading {
    pub harmony: String,
    pub interpretation: String,
    pub advice: String,
}

impl ComposedReading {
    pub fn to_text(&self) -> String {
        format!(
            "[Elemental Harmony]\n{}\n\n[Card Interpretation]\n{}\n\n[Advice]\n{}",
            self.harmony, self.interpretation, self.advice
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
}

/// Yes when the first non-advice card is upright.
pub fn yes_no_verdict(cards: &[DrawnCard]) -> Option<Verdict> {
    cards.iter().find(|c| !c.is_advice_card()).map(|c| {
        if c.is_reversed {
            Verdict::No
        } else {
            Verdict::Yes
        }
    })
}

pub fn compose(analysis: &SajuAnalysis, cards: &[DrawnCard]) -> ComposedReading {
    ComposedReading {
        harmony: harmony(analysis, cards),
        interpretation: interpretation(cards),
        advice: advice(analysis, cards),
    }
}

fn join_elements(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| format!("{} ({})", e, e.hanja()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn harmony(analysis: &SajuAnalysis, cards: &[DrawnCard]) -> String {
    let dm = analysis.day_master.element;
    let mut lines = vec![format!(
        "Your day master is {} {} ({}). Strong elements: {}. Weak elements: {}.",
        analysis.day_master.stem,
        analysis.day_master.stem.romanized(),
        dm,
        join_elements(&analysis.strong_elements),
        join_elements(&analysis.weak_elements),
    )];

    for drawn in cards {
        let line = match drawn.card.element {
            None => format!(
                "{} - {}: carries no elemental tag, so read it on its own terms.",
                drawn.position_meaning, drawn.card.name
            ),
            Some(element) => {
                let balance_note = if analysis.weak_elements.contains(&element) {
                    format!("brings in {}, one of your weakest elements, restoring balance", element)
                } else if analysis.strong_elements.contains(&element) {
                    format!("adds more {}, already among your strongest, so watch for excess", element)
                } else {
                    format!("touches {}, which sits mid-range in your chart", element)
                };
                format!(
                    "{} - {}: {}. Its {} {} your {} day master.",
                    drawn.position_meaning,
                    drawn.card.name,
                    balance_note,
                    element,
                    card_affinity(dm, element),
                    dm
                )
            }
        };
        lines.push(line);
    }

    let card_elements: Vec<_> = cards.iter().filter_map(|c| c.card.element).collect();
    lines.extend(affinity_notes(dm, &card_elements));
    lines.join("\n")
}

fn interpretation(cards: &[DrawnCard]) -> String {
    cards
        .iter()
        .map(|drawn| {
            let element = drawn
                .card
                .element
                .map(|e| e.to_string())
                .unwrap_or_else(|| "none".to_string());
            format!(
                "{}. {}: {} ({}) - {} [element: {}; keywords: {}]",
                drawn.position + 1,
                drawn.position_meaning,
                drawn.card.name,
                drawn.orientation(),
                drawn.card.meaning(drawn.is_reversed),
                element,
                drawn.card.keywords(drawn.is_reversed).join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn advice(analysis: &SajuAnalysis, cards: &[DrawnCard]) -> String {
    let mut lines: Vec<String> = analysis
        .weak_elements
        .iter()
        .map(|&e| format!("Care for {} ({}): {}.", e, e.hanja(), activity_for(e)))
        .collect();

    let reversed = cards.iter().filter(|c| c.is_reversed).count();
    let upright = cards.len() - reversed;
    let direction = match reversed.cmp(&upright) {
        Ordering::Greater => {
            "Most cards are reversed: this is a time for introspection. Slow down, look inward \
             and resolve what is blocked before pushing ahead."
        }
        Ordering::Less => {
            "Most cards are upright: maintain your current direction and keep building on what \
             already works."
        }
        Ordering::Equal => {
            "Upright and reversed cards are balanced: move forward, but pause to reflect at each \
             step."
        }
    };
    lines.push(direction.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::catalog::TarotCatalog;
    use crate::core::classifier::analyze_chart;
    use crate::core::pillars::compute_chart;
    use crate::domain::model::{BirthInfo, Gender};
    use crate::domain::ports::HourConvention;
    use chrono::NaiveDate;

    fn analysis() -> SajuAnalysis {
        let date = NaiveDate::from_ymd_opt(1992, 4, 21).unwrap();
        let chart = compute_chart(date, None, HourConvention::Standard);
        analyze_chart(BirthInfo::solar(1992, 4, 21, Gender::Female), date, chart)
    }

    fn drawn(index: usize, position: usize, label: &str, is_reversed: bool) -> DrawnCard {
        let catalog = TarotCatalog::embedded().unwrap();
        DrawnCard {
            card: catalog.card(index).unwrap().clone(),
            position,
            is_reversed,
            position_meaning: label.to_string(),
        }
    }

    #[test]
    fn test_compose_is_idempotent() {
        let analysis = analysis();
        let cards = vec![
            drawn(4, 0, "Past", false),
            drawn(64, 1, "Present", true),
            drawn(0, 2, "Future", false),
        ];
        assert_eq!(compose(&analysis, &cards), compose(&analysis, &cards));
    }

    #[test]
    fn test_harmony_mentions_weak_element_card() {
        // 1992-04-21: weak elements are Earth and Metal
        let analysis = analysis();
        let cards = vec![drawn(64, 0, "Present Guidance", false)];
        let reading = compose(&analysis, &cards);
        assert!(reading
            .harmony
            .contains("brings in Earth, one of your weakest elements"));
        // 土剋水
        assert!(reading.harmony.contains("Its Earth overcomes your Water day master"));
    }

    #[test]
    fn test_interpretation_lists_orientation() {
        let cards = vec![drawn(0, 0, "Answer", true)];
        let text = compose(&analysis(), &cards).interpretation;
        assert!(text.starts_with("1. Answer: The Fool (reversed)"));
        assert!(text.contains("[element: none;"));
    }

    #[test]
    fn test_direction_note_follows_majority() {
        let analysis = analysis();
        let reversed = vec![drawn(1, 0, "Problem", true), drawn(2, 1, "Solution", true)];
        assert!(compose(&analysis, &reversed).advice.contains("introspection"));

        let upright = vec![drawn(1, 0, "Problem", false), drawn(2, 1, "Solution", false)];
        assert!(compose(&analysis, &upright)
            .advice
            .contains("maintain your current direction"));

        let mixed = vec![drawn(1, 0, "Problem", false), drawn(2, 1, "Solution", true)];
        assert!(compose(&analysis, &mixed).advice.contains("balanced"));
    }

    #[test]
    fn test_advice_has_one_line_per_weak_element() {
        let advice = compose(&analysis(), &[drawn(3, 0, "Answer", false)]).advice;
        assert!(advice.starts_with("Care for Earth (土)"));
        assert_eq!(advice.lines().filter(|l| l.starts_with("Care for")).count(), 2);
    }

    #[test]
    fn test_yes_no_verdict_uses_first_card() {
        let mut advice_card = drawn(9, 1, "", true);
        advice_card.position_meaning = crate::domain::tarot::ADVICE_CARD_LABEL.to_string();
        assert_eq!(
            yes_no_verdict(&[drawn(5, 0, "Answer", false), advice_card]),
            Some(Verdict::Yes)
        );
        assert_eq!(yes_no_verdict(&[drawn(5, 0, "Answer", true)]), Some(Verdict::No));
        assert_eq!(yes_no_verdict(&[]), None);
    }
}
