//! Personality classifier: element rankings, day-master templates,
//! recommendations and card affinities.

use crate::core::{balance, sal};
use crate::domain::model::{BirthInfo, Chart, DayMaster, ElementBalance, ElementShare, SajuAnalysis};
use crate::domain::tables::Element;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGH_SHARE_THRESHOLD: f64 = 30.0;
pub const LOW_SHARE_THRESHOLD: f64 = 15.0;

struct Temperament {
    personality: &'static str,
    strengths: [&'static str; 3],
    weaknesses: [&'static str; 2],
    excess: &'static str,
    excess_remedy: &'static str,
    deficiency: &'static str,
    deficiency_remedy: &'static str,
}

// 依日干五行排列，順序與 Element::ALL 相同
const TEMPERAMENTS: [Temperament; 5] = [
    Temperament {
        personality: "Wood day masters grow steadily toward the light: principled, idealistic and \
                      driven to build something that lasts.",
        strengths: ["Strong sense of purpose", "Generous and protective", "Keeps growing after setbacks"],
        weaknesses: ["Can be stubborn once a direction is chosen", "Takes on too much for others"],
        excess: "Too much Wood turns conviction into rigidity",
        excess_remedy: "Practise letting plans bend; trim commitments before adding new ones",
        deficiency: "Thin Wood leaves ideas without the drive to start them",
        deficiency_remedy: "Set one small daily goal and finish it before noon",
    },
    Temperament {
        personality: "Fire day masters radiate warmth and enthusiasm; expressive, sociable and quick \
                      to inspire the people around them.",
        strengths: ["Charismatic and expressive", "Optimistic under pressure", "Acts decisively"],
        weaknesses: ["Impatient with slow progress", "Burns out after intense bursts"],
        excess: "Too much Fire makes enthusiasm flare into impulsiveness",
        excess_remedy: "Pause a full day before major decisions and schedule real rest",
        deficiency: "Weak Fire dims motivation and self-expression",
        deficiency_remedy: "Seek sunlight, movement and people who energise you",
    },
    Temperament {
        personality: "Earth day masters are the centre that holds: dependable, patient and attentive \
                      to the needs of others.",
        strengths: ["Reliable and trustworthy", "Practical problem solver", "Calm mediator"],
        weaknesses: ["Resists change", "Worries over details"],
        excess: "Too much Earth settles into inertia and overthinking",
        excess_remedy: "Introduce one new routine or place each week",
        deficiency: "Light Earth leaves plans without a stable footing",
        deficiency_remedy: "Keep regular meals and sleep; write plans down before acting",
    },
    Temperament {
        personality: "Metal day masters are clear and decisive; they value fairness, structure and \
                      doing things properly.",
        strengths: ["Decisive and disciplined", "Strong sense of justice", "Sees what matters quickly"],
        weaknesses: ["Can sound harsh or critical", "Slow to forgive mistakes"],
        excess: "Too much Metal sharpens judgement into severity",
        excess_remedy: "Soften feedback and make room for other people's pace",
        deficiency: "Weak Metal blurs boundaries and follow-through",
        deficiency_remedy: "Declutter one space and keep a written list of commitments",
    },
    Temperament {
        personality: "Water day masters flow around obstacles; intuitive, adaptable and thoughtful, \
                      with a talent for reading people.",
        strengths: ["Insightful and perceptive", "Adapts easily", "Good listener"],
        weaknesses: ["Drifts without a clear goal", "Keeps feelings hidden"],
        excess: "Too much Water floods the mind with doubt and restlessness",
        excess_remedy: "Anchor the week with fixed commitments and physical work",
        deficiency: "Little Water dries up flexibility and reflection",
        deficiency_remedy: "Make time for quiet reflection, journaling and enough hydration",
    },
];

const ELEMENT_ACTIVITIES: [&str; 5] = [
    "Walk among trees, tend plants, or start learning something new",
    "Get sunlight, exercise vigorously, and spend time with lively company",
    "Keep a regular routine, cook at home, and garden or hike on soil",
    "Tidy and organise your space, practise breathing, wear metal accents",
    "Swim or sit by water, rest well, and journal before sleep",
];

/// Relation of a tarot card's element to the day master element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affinity {
    /// Same element.
    Amplifies,
    /// Card element generates the day master.
    Nourishes,
    /// Card element controls the day master.
    Overcomes,
    /// Day master generates the card element.
    Drains,
    /// Day master controls the card element.
    Tamed,
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Affinity::Amplifies => "amplifies",
            Affinity::Nourishes => "nourishes",
            Affinity::Overcomes => "overcomes",
            Affinity::Drains => "draws on",
            Affinity::Tamed => "is tamed by",
        };
        write!(f, "{}", text)
    }
}

pub fn card_affinity(day_master: Element, card_element: Element) -> Affinity {
    if card_element == day_master {
        Affinity::Amplifies
    } else if card_element.generates() == day_master {
        Affinity::Nourishes
    } else if card_element.controls() == day_master {
        Affinity::Overcomes
    } else if day_master.generates() == card_element {
        Affinity::Drains
    } else {
        Affinity::Tamed
    }
}

/// One sentence per distinct card element explaining its pull on the day master.
pub fn affinity_notes(day_master: Element, card_elements: &[Element]) -> Vec<String> {
    let mut seen = Vec::new();
    card_elements
        .iter()
        .filter(|e| {
            if seen.contains(*e) {
                false
            } else {
                seen.push(**e);
                true
            }
        })
        .map(|&element| {
            let affinity = card_affinity(day_master, element);
            let detail = match affinity {
                Affinity::Amplifies => "doubling your own nature",
                Affinity::Nourishes => "feeding your core energy",
                Affinity::Overcomes => "pressing on your core energy, so pace yourself",
                Affinity::Drains => "asking you to give energy out",
                Affinity::Tamed => "something you can shape with effort",
            };
            format!(
                "{} in the cards {} your {} day master: {}",
                element, affinity, day_master, detail
            )
        })
        .collect()
}

pub fn activity_for(element: Element) -> &'static str {
    ELEMENT_ACTIVITIES[element.index()]
}

/// Two highest-weighted elements; ties keep declaration order.
pub fn strong_elements(balance: &ElementBalance) -> Vec<Element> {
    let mut ranked: Vec<Element> = Element::ALL.to_vec();
    ranked.sort_by(|a, b| balance.weight(*b).cmp(&balance.weight(*a)));
    ranked.truncate(2);
    ranked
}

/// Two lowest-weighted elements; ties keep declaration order.
pub fn weak_elements(balance: &ElementBalance) -> Vec<Element> {
    let mut ranked: Vec<Element> = Element::ALL.to_vec();
    ranked.sort_by_key(|e| balance.weight(*e));
    ranked.truncate(2);
    ranked
}

pub fn element_shares(balance: &ElementBalance) -> Vec<ElementShare> {
    balance
        .iter()
        .map(|(element, weight)| ElementShare {
            element,
            weight,
            percentage: balance.percentage(element),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub personality: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn profile(day_master: Element, balance: &ElementBalance) -> Profile {
    let temperament = &TEMPERAMENTS[day_master.index()];
    let mut weaknesses: Vec<String> = temperament.weaknesses.iter().map(|s| s.to_string()).collect();
    let mut recommendations: Vec<String> = weak_elements(balance)
        .into_iter()
        .map(|e| format!("Strengthen {} ({}): {}", e, e.hanja(), activity_for(e)))
        .collect();

    let share = balance.percentage(day_master);
    if share > HIGH_SHARE_THRESHOLD {
        weaknesses.push(temperament.excess.to_string());
        recommendations.push(temperament.excess_remedy.to_string());
    } else if share < LOW_SHARE_THRESHOLD {
        weaknesses.push(temperament.deficiency.to_string());
        recommendations.push(temperament.deficiency_remedy.to_string());
    }

    Profile {
        personality: temperament.personality.to_string(),
        strengths: temperament.strengths.iter().map(|s| s.to_string()).collect(),
        weaknesses,
        recommendations,
    }
}

/// Aggregates a computed chart into the full analysis record.
pub fn analyze_chart(birth: BirthInfo, solar_date: NaiveDate, chart: Chart) -> SajuAnalysis {
    let balance = balance::element_balance(&chart);
    let day_master = DayMaster {
        stem: chart.day_master(),
        element: chart.day_master().element(),
    };
    let Profile {
        personality,
        strengths,
        weaknesses,
        recommendations,
    } = profile(day_master.element, &balance);
    let sals = sal::detect_sals(&chart);

    tracing::debug!(
        "Day master {} ({}), {} sal markers",
        day_master.stem,
        day_master.element,
        sals.len()
    );

    SajuAnalysis {
        birth,
        solar_date,
        chart,
        shares: element_shares(&balance),
        strong_elements: strong_elements(&balance),
        weak_elements: weak_elements(&balance),
        balance,
        day_master,
        personality,
        strengths,
        weaknesses,
        recommendations,
        sals,
    }
}
