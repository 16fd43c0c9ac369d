use crate::domain::tarot::{Suit, TarotCard, DECK_SIZE};
use crate::utils::error::{Result, SajuError};
use std::collections::HashSet;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../../data/tarot_cards.json");

const MAJOR_ARCANA: usize = 22;
const CARDS_PER_MINOR_SUIT: usize = 14;

/// Read-only 78-card deck, loaded once and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TarotCatalog {
    cards: Vec<TarotCard>,
}

impl TarotCatalog {
    /// Catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("Loading tarot catalog from {}", path.as_ref().display());
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let cards: Vec<TarotCard> = serde_json::from_str(content)?;
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<TarotCard>) -> Result<Self> {
        let catalog = Self { cards };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.cards.len() != DECK_SIZE {
            return Err(SajuError::Catalog {
                message: format!("expected {} cards, found {}", DECK_SIZE, self.cards.len()),
            });
        }

        let mut ids = HashSet::new();
        for card in &self.cards {
            if !ids.insert(card.id.as_str()) {
                return Err(SajuError::Catalog {
                    message: format!("duplicate card id '{}'", card.id),
                });
            }
            if card.name.trim().is_empty() {
                return Err(SajuError::Catalog {
                    message: format!("card '{}' has no name", card.id),
                });
            }
        }

        for (suit, expected) in [
            (Suit::Major, MAJOR_ARCANA),
            (Suit::Wands, CARDS_PER_MINOR_SUIT),
            (Suit::Cups, CARDS_PER_MINOR_SUIT),
            (Suit::Swords, CARDS_PER_MINOR_SUIT),
            (Suit::Pentacles, CARDS_PER_MINOR_SUIT),
        ] {
            let found = self.cards.iter().filter(|c| c.suit == suit).count();
            if found != expected {
                return Err(SajuError::Catalog {
                    message: format!("expected {} {:?} cards, found {}", expected, suit, found),
                });
            }
        }

        Ok(())
    }

    pub fn card(&self, index: usize) -> Result<&TarotCard> {
        self.cards.get(index).ok_or(SajuError::InvalidCardIndex {
            index,
            deck_size: self.cards.len(),
        })
    }

    pub fn find(&self, id: &str) -> Option<&TarotCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn cards(&self) -> &[TarotCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tables::Element;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_catalog_is_complete() {
        let catalog = TarotCatalog::embedded().unwrap();
        assert_eq!(catalog.len(), 78);
        assert_eq!(catalog.card(0).unwrap().name, "The Fool");
        assert_eq!(catalog.card(0).unwrap().element, None);
        assert_eq!(catalog.card(22).unwrap().id, "minor-wands-01");
        assert_eq!(
            catalog.find("minor-cups-13").unwrap().element,
            Some(Element::Water)
        );
        assert!(catalog.card(78).is_err());
    }

    #[test]
    fn test_rejects_short_catalog() {
        let mut cards = TarotCatalog::embedded().unwrap().cards().to_vec();
        cards.pop();
        match TarotCatalog::from_cards(cards) {
            Err(SajuError::Catalog { message }) => assert!(message.contains("found 77")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut cards = TarotCatalog::embedded().unwrap().cards().to_vec();
        cards[1].id = cards[0].id.clone();
        assert!(TarotCatalog::from_cards(cards).is_err());
    }

    #[test]
    fn test_rejects_wrong_suit_distribution() {
        let mut cards = TarotCatalog::embedded().unwrap().cards().to_vec();
        cards[30].suit = Suit::Cups;
        assert!(TarotCatalog::from_cards(cards).is_err());
    }

    #[test]
    fn test_catalog_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(EMBEDDED_CATALOG.as_bytes()).unwrap();

        let catalog = TarotCatalog::from_file(temp_file.path()).unwrap();
        assert_eq!(catalog.len(), 78);
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            TarotCatalog::from_json_str("[{\"id\": 1}]"),
            Err(SajuError::Serialization(_))
        ));
    }
}
