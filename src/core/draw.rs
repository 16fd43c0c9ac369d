//! Spread/card draw engine.

use crate::adapters::catalog::TarotCatalog;
use crate::domain::tarot::{DrawnCard, SpreadType, ADVICE_CARD_LABEL, DECK_SIZE};
use crate::utils::error::{Result, SajuError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_REVERSAL_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSelection {
    Random,
    /// Deck indices the user picked, in position order.
    Explicit(Vec<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub spread: SpreadType,
    pub selection: CardSelection,
    #[serde(default)]
    pub include_advice_card: bool,
}

impl DrawRequest {
    pub fn random(spread: SpreadType) -> Self {
        Self {
            spread,
            selection: CardSelection::Random,
            include_advice_card: false,
        }
    }

    pub fn explicit(spread: SpreadType, indices: Vec<usize>) -> Self {
        Self {
            spread,
            selection: CardSelection::Explicit(indices),
            include_advice_card: false,
        }
    }

    pub fn with_advice_card(mut self) -> Self {
        self.include_advice_card = true;
        self
    }

    /// Cards this request yields, advice card included.
    pub fn card_count(&self) -> usize {
        self.spread.layout().card_count() + usize::from(self.include_advice_card)
    }

    /// Rejects explicit selections of the wrong size or with out-of-range indices.
    pub fn validate(&self) -> Result<()> {
        if let CardSelection::Explicit(indices) = &self.selection {
            let expected = self.card_count();
            if indices.len() != expected {
                return Err(SajuError::CardCountMismatch {
                    spread: self.spread.to_string(),
                    expected,
                    actual: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= DECK_SIZE) {
                return Err(SajuError::InvalidCardIndex {
                    index,
                    deck_size: DECK_SIZE,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DrawEngine {
    catalog: Arc<TarotCatalog>,
    reversal_probability: f64,
}

impl DrawEngine {
    pub fn new(catalog: Arc<TarotCatalog>) -> Self {
        Self {
            catalog,
            reversal_probability: DEFAULT_REVERSAL_PROBABILITY,
        }
    }

    /// Probability outside [0, 1] is clamped; NaN falls back to the default.
    pub fn with_reversal_probability(mut self, probability: f64) -> Self {
        self.reversal_probability = if probability.is_nan() {
            DEFAULT_REVERSAL_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn reversal_probability(&self) -> f64 {
        self.reversal_probability
    }

    pub fn draw<R: Rng>(&self, request: &DrawRequest, rng: &mut R) -> Result<Vec<DrawnCard>> {
        request.validate()?;

        let count = request.card_count();
        let indices: Vec<usize> = match &request.selection {
            CardSelection::Random => {
                let mut deck: Vec<usize> = (0..DECK_SIZE).collect();
                deck.shuffle(rng);
                deck.truncate(count);
                deck
            }
            CardSelection::Explicit(indices) => {
                let mut seen = Vec::with_capacity(indices.len());
                for &index in indices {
                    if seen.contains(&index) {
                        tracing::warn!("⚠️ Card index {} was picked more than once", index);
                    }
                    seen.push(index);
                }
                indices.clone()
            }
        };

        let layout = request.spread.layout();
        let cards = indices
            .into_iter()
            .enumerate()
            .map(|(position, index)| {
                let label = layout
                    .positions
                    .get(position)
                    .copied()
                    .unwrap_or(ADVICE_CARD_LABEL);
                Ok(DrawnCard {
                    card: self.catalog.card(index)?.clone(),
                    position,
                    is_reversed: rng.gen_bool(self.reversal_probability),
                    position_meaning: label.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Drew {} cards for {} ({} reversed)",
            cards.len(),
            request.spread,
            cards.iter().filter(|c| c.is_reversed).count()
        );

        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> DrawEngine {
        DrawEngine::new(Arc::new(TarotCatalog::embedded().unwrap()))
    }

    #[test]
    fn test_random_three_card_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        let cards = engine()
            .draw(&DrawRequest::random(SpreadType::ThreeCard), &mut rng)
            .unwrap();

        let labels: Vec<&str> = cards.iter().map(|c| c.position_meaning.as_str()).collect();
        assert_eq!(labels, vec!["Past", "Present", "Future"]);
        assert_ne!(cards[0].card.id, cards[1].card.id);
        assert_ne!(cards[1].card.id, cards[2].card.id);
        assert_ne!(cards[0].card.id, cards[2].card.id);
    }

    #[test]
    fn test_advice_card_comes_last() {
        let mut rng = StdRng::seed_from_u64(1);
        let request = DrawRequest::random(SpreadType::OneCard).with_advice_card();
        let cards = engine().draw(&request, &mut rng).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].position_meaning, ADVICE_CARD_LABEL);
        assert!(cards[1].is_advice_card());
        assert_eq!(cards[1].position, 1);
    }

    #[test]
    fn test_explicit_indices_are_used_in_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let request = DrawRequest::explicit(SpreadType::ProblemSolution, vec![77, 0]);
        let cards = engine().draw(&request, &mut rng).unwrap();
        assert_eq!(cards[0].card.id, "minor-pentacles-14");
        assert_eq!(cards[0].position_meaning, "Problem");
        assert_eq!(cards[1].card.id, "major-00");
        assert_eq!(cards[1].position_meaning, "Solution");
    }

    #[test]
    fn test_explicit_count_must_match_layout() {
        let mut rng = StdRng::seed_from_u64(3);
        let short = DrawRequest::explicit(SpreadType::ThreeCard, vec![1, 2]);
        assert!(matches!(
            engine().draw(&short, &mut rng),
            Err(SajuError::CardCountMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));

        // 需要額外一張建議牌
        let no_advice_index =
            DrawRequest::explicit(SpreadType::ThreeCard, vec![1, 2, 3]).with_advice_card();
        assert!(engine().draw(&no_advice_index, &mut rng).is_err());
    }

    #[test]
    fn test_explicit_advice_card_takes_extra_index() {
        let mut rng = StdRng::seed_from_u64(3);
        let request = DrawRequest::explicit(SpreadType::OneCard, vec![3, 9]).with_advice_card();
        let cards = engine().draw(&request, &mut rng).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].card.id, "major-03");
        assert_eq!(cards[0].position_meaning, "Present Guidance");
        assert_eq!(cards[0].position, 0);
        assert_eq!(cards[1].card.id, "major-09");
        assert_eq!(cards[1].position_meaning, ADVICE_CARD_LABEL);
        assert_eq!(cards[1].position, 1);
        assert!(cards[1].is_advice_card());
    }

    #[test]
    fn test_explicit_index_out_of_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let request = DrawRequest::explicit(SpreadType::OneCard, vec![78]);
        assert!(matches!(
            engine().draw(&request, &mut rng),
            Err(SajuError::InvalidCardIndex { index: 78, .. })
        ));
    }

    #[test]
    fn test_duplicate_explicit_indices_are_kept() {
        let mut rng = StdRng::seed_from_u64(3);
        let request = DrawRequest::explicit(SpreadType::TwoCard, vec![5, 5]);
        let cards = engine().draw(&request, &mut rng).unwrap();
        assert_eq!(cards[0].card.id, cards[1].card.id);
    }

    #[test]
    fn test_reversal_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(11);
        let never = engine().with_reversal_probability(0.0);
        let always = engine().with_reversal_probability(2.0);
        let request = DrawRequest::random(SpreadType::CelticCross);

        assert!(never.draw(&request, &mut rng).unwrap().iter().all(|c| !c.is_reversed));
        assert_eq!(always.reversal_probability(), 1.0);
        assert!(always.draw(&request, &mut rng).unwrap().iter().all(|c| c.is_reversed));
    }
}
