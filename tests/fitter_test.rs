//! Tests for the greedy fitter

use rstest::rstest;

use bpcalc::domain::{fit, FitCandidate, FitCatalog};

fn catalog(items: &[(&str, u64)]) -> Vec<FitCandidate> {
    items
        .iter()
        .map(|(name, weight)| FitCandidate::new(*name, *weight))
        .collect()
}

#[test]
fn given_heavy_item_first_when_fitting_one_kg_then_skipped_for_good() {
    // Arrange
    let candidates = catalog(&[("palatka", 5500), ("bref", 300), ("spichki", 20)]);

    // Act
    let outcome = fit(&candidates, 1000);

    // Assert
    assert_eq!(outcome.names(), vec!["bref", "spichki"]);
    assert_eq!(outcome.count(), 2);
    assert_eq!(outcome.remaining, 680);
    assert_eq!(outcome.packed_weight(), 320);
    assert_eq!(outcome.skipped, vec!["palatka".to_string()]);
}

#[test]
fn given_picks_when_fitting_then_each_records_remaining_after() {
    let candidates = catalog(&[("bref", 300), ("spichki", 20)]);

    let outcome = fit(&candidates, 1000);

    assert_eq!(outcome.picks[0].remaining_after, 700);
    assert_eq!(outcome.picks[1].remaining_after, 680);
}

#[test]
fn given_skipped_item_that_would_fit_later_when_fitting_then_not_reconsidered() {
    // 600 is taken first, 500 no longer fits; nothing goes back to it
    let candidates = catalog(&[("a", 500), ("b", 600), ("c", 400)]);

    let outcome = fit(&candidates, 1000);

    assert_eq!(outcome.names(), vec!["b", "c"]);
    assert_eq!(outcome.skipped, vec!["a".to_string()]);
    assert_eq!(outcome.remaining, 0);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
#[case(12)]
#[case(100)]
fn given_same_input_when_fitting_twice_then_same_outcome(#[case] kg: u64) {
    let candidates = FitCatalog::builtin().unwrap().candidates();

    let first = fit(&candidates, kg * 1000);
    let second = fit(&candidates, kg * 1000);

    assert_eq!(first, second);
    assert!(first.packed_weight() <= kg * 1000);
}

#[test]
fn given_trail_kit_when_fitting_five_kg_then_heaviest_first_until_full() {
    // Arrange
    let candidates = FitCatalog::builtin().unwrap().candidates();

    // Act
    let outcome = fit(&candidates, 5000);

    // Assert: палатка (5500) is skipped, then 2250 + 1200 + 1000 = 4450,
    // бутерброды (820) no longer fits, 500 leaves 50, then 40 + 10
    assert_eq!(
        outcome.names(),
        vec![
            "спальный мешок",
            "удочка",
            "термос",
            "фрукты",
            "салфетки",
            "жвачка"
        ]
    );
    assert_eq!(outcome.remaining, 0);
    assert_eq!(outcome.catalog_weight, 12_945);
}

#[test]
fn given_budget_above_catalog_total_when_fitting_then_everything_packed() {
    let candidates = FitCatalog::builtin().unwrap().candidates();

    let outcome = fit(&candidates, 20_000);

    assert_eq!(outcome.count(), 15);
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.remaining, 20_000 - 12_945);
}
