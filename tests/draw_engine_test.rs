use rand::rngs::StdRng;
use rand::SeedableRng;
use saju_tarot::domain::tarot::{ADVICE_CARD_LABEL, DECK_SIZE};
use saju_tarot::{DrawEngine, DrawRequest, SpreadType, TarotCatalog};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn engine() -> DrawEngine {
    DrawEngine::new(Arc::new(TarotCatalog::embedded().unwrap()))
}

#[test]
fn test_random_draws_are_uniform_over_the_deck() {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(20240421);
    let request = DrawRequest::random(SpreadType::OneCard);
    let per_card = 200usize;
    let draws = DECK_SIZE * per_card;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..draws {
        let cards = engine.draw(&request, &mut rng).unwrap();
        *counts.entry(cards[0].card.id.clone()).or_default() += 1;
    }

    assert_eq!(counts.len(), DECK_SIZE);
    let expected = per_card as f64;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // 77 自由度，p = 0.0001 約 130
    assert!(chi_square < 130.0, "chi-square {} too large", chi_square);
}

#[test]
fn test_reversal_rate_matches_default_probability() {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(99);
    let request = DrawRequest::random(SpreadType::CelticCross);

    let mut total = 0usize;
    let mut reversed = 0usize;
    for _ in 0..2_000 {
        let cards = engine.draw(&request, &mut rng).unwrap();
        total += cards.len();
        reversed += cards.iter().filter(|c| c.is_reversed).count();
    }

    let rate = reversed as f64 / total as f64;
    assert!((rate - 0.3).abs() < 0.02, "reversal rate {}", rate);
}

#[test]
fn test_random_spreads_never_repeat_a_card() {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(8);
    for spread in SpreadType::ALL {
        let request = DrawRequest::random(spread).with_advice_card();
        for _ in 0..50 {
            let cards = engine.draw(&request, &mut rng).unwrap();
            assert_eq!(cards.len(), spread.layout().card_count() + 1);
            let ids: HashSet<_> = cards.iter().map(|c| c.card.id.as_str()).collect();
            assert_eq!(ids.len(), cards.len(), "repeat in {}", spread);
        }
    }
}

#[test]
fn test_three_card_spread_scenario() {
    let mut rng = StdRng::seed_from_u64(2024);
    let cards = engine()
        .draw(&DrawRequest::random(SpreadType::ThreeCard), &mut rng)
        .unwrap();

    let labels: Vec<_> = cards.iter().map(|c| c.position_meaning.as_str()).collect();
    assert_eq!(labels, ["Past", "Present", "Future"]);
    let positions: Vec<_> = cards.iter().map(|c| c.position).collect();
    assert_eq!(positions, [0, 1, 2]);
    let ids: HashSet<_> = cards.iter().map(|c| c.card.id.clone()).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_one_card_with_advice_scenario() {
    let mut rng = StdRng::seed_from_u64(77);
    let request = DrawRequest::random(SpreadType::OneCard).with_advice_card();
    let cards = engine().draw(&request, &mut rng).unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].position_meaning, "Present Guidance");
    assert_eq!(cards[1].position_meaning, ADVICE_CARD_LABEL);
}

#[test]
fn test_same_seed_same_draw() {
    let engine = engine();
    let request = DrawRequest::random(SpreadType::SajuCustom);
    let first = engine.draw(&request, &mut StdRng::seed_from_u64(5)).unwrap();
    let second = engine.draw(&request, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_draws_share_only_the_catalog() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..8u64)
        .map(|seed| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                engine
                    .draw(&DrawRequest::random(SpreadType::SixMonths), &mut rng)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let cards = handle.join().unwrap();
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[5].position_meaning, "Month 6");
    }
}
