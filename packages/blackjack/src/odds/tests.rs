use super::*;
use crate::{Action, Deck, Rank, Suit};

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn hand(cards: &[Card]) -> Hand {
    Hand::from_cards(cards)
}

/// A full deck minus the cards already on the table.
fn remaining_after(used: &[Card]) -> Vec<Card> {
    Deck::ordered()
        .remaining()
        .iter()
        .filter(|c| !used.contains(c))
        .copied()
        .collect()
}

fn calculator(seed: u64, trials: usize) -> ProbabilityCalculator {
    ProbabilityCalculator::with_config(
        SimulationConfig {
            trials,
            per_card_trials: 20,
        },
        ChaCha8Rng::seed_from_u64(seed),
    )
}

fn run(
    calc: &mut ProbabilityCalculator,
    player: &[Card],
    dealer: &[Card],
    chips: u64,
) -> ProbabilityResult {
    let used: Vec<Card> = player.iter().chain(dealer).copied().collect();
    let remaining = remaining_after(&used);
    calc.calculate_win_probabilities(&hand(player), &hand(dealer), &remaining, chips)
}

fn assert_probability_bounds(result: &ProbabilityResult) {
    let fields = [
        result.player_win_probability,
        result.dealer_win_probability,
        result.push_probability,
        result.player_blackjack_probability,
        result.dealer_blackjack_probability,
        result.player_bust_probability,
        result.dealer_bust_probability,
        result.player_21_probability,
        result.dealer_21_probability,
        result.action_analysis.stand_win_rate,
        result.action_analysis.hit_win_rate,
        result.action_analysis.double_win_rate,
        result.action_analysis.split_win_rate,
    ];
    for p in fields {
        assert!((0.0..=1.0).contains(&p), "probability out of range: {p}");
    }
    let total =
        result.player_win_probability + result.dealer_win_probability + result.push_probability;
    assert!((total - 1.0).abs() < 0.05, "outcomes sum to {total}");
}

#[test]
fn test_default_config() {
    let calc = ProbabilityCalculator::seeded(1);
    assert_eq!(calc.config().trials, 10_000);
    assert_eq!(calc.config().per_card_trials, 100);
}

#[test]
fn test_player_blackjack() {
    let mut calc = calculator(1, 1000);
    let result = run(
        &mut calc,
        &[card(Rank::Ace, Suit::Hearts), card(Rank::King, Suit::Spades)],
        &[card(Rank::Seven, Suit::Diamonds), card(Rank::Five, Suit::Clubs)],
        1000,
    );

    assert_probability_bounds(&result);
    assert_eq!(result.player_21_probability, 1.0);
    assert_eq!(result.player_blackjack_probability, 1.0);
    assert_eq!(result.player_bust_probability, 0.0);
    // A 7 up card can never make a dealer blackjack
    assert_eq!(result.player_win_probability, 1.0);

    let analysis = &result.action_analysis;
    assert!(!analysis.can_hit && !analysis.can_double && !analysis.can_split);
    assert!(analysis.can_stand);
    assert_eq!(analysis.recommended_action, Action::Stand);
}

#[test]
fn test_three_card_21_is_not_blackjack() {
    let mut calc = calculator(2, 1000);
    let result = run(
        &mut calc,
        &[
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Seven, Suit::Spades),
            card(Rank::Seven, Suit::Diamonds),
        ],
        &[card(Rank::Ten, Suit::Diamonds), card(Rank::Five, Suit::Clubs)],
        200,
    );

    assert_probability_bounds(&result);
    assert_eq!(result.player_21_probability, 1.0);
    assert_eq!(result.player_blackjack_probability, 0.0);
    assert!(result.push_probability > 0.0);
}

#[test]
fn test_busted_player_never_wins() {
    let mut calc = calculator(3, 1000);
    let result = run(
        &mut calc,
        &[
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Eight, Suit::Spades),
            card(Rank::Five, Suit::Diamonds),
        ],
        &[card(Rank::Ten, Suit::Clubs)],
        1000,
    );

    assert_probability_bounds(&result);
    assert!(result.player_win_probability < 0.05);
    assert_eq!(result.player_bust_probability, 1.0);
    assert_eq!(result.action_analysis.recommended_action, Action::Stand);
    assert!(!result.action_analysis.can_hit);
}

#[test]
fn test_normal_hand_outcomes_sum_to_one() {
    let mut calc = calculator(4, 1000);
    let result = run(
        &mut calc,
        &[card(Rank::Eight, Suit::Hearts), card(Rank::Six, Suit::Spades)],
        &[card(Rank::Ten, Suit::Diamonds), card(Rank::Five, Suit::Clubs)],
        500,
    );
    assert_probability_bounds(&result);
    assert!(result.player_bust_probability > 0.0);
}

#[test]
fn test_hidden_card_is_redrawn() {
    // The real hole card completes a dealer blackjack; the simulation must not know that
    let mut calc = calculator(5, 1000);
    let result = run(
        &mut calc,
        &[card(Rank::Ten, Suit::Hearts), card(Rank::Nine, Suit::Spades)],
        &[card(Rank::Ten, Suit::Clubs), card(Rank::Ace, Suit::Spades)],
        1000,
    );
    assert_probability_bounds(&result);
    assert!(result.player_win_probability > 0.2);
    assert!(result.dealer_blackjack_probability < 0.2);
}

#[test]
fn test_split_pair_against_six() {
    let mut calc = calculator(6, 500);
    let result = run(
        &mut calc,
        &[card(Rank::Eight, Suit::Hearts), card(Rank::Eight, Suit::Spades)],
        &[card(Rank::Six, Suit::Diamonds)],
        1000,
    );

    let analysis = &result.action_analysis;
    assert!(analysis.can_split);
    assert!(analysis.can_double);
    assert!(analysis.can_hit);
    assert!(analysis.split_win_rate > 0.0);
    assert!(analysis.expected_value >= analysis.stand_win_rate);
}

#[test]
fn test_capabilities_for_unpaired_two_cards() {
    let mut calc = calculator(7, 500);
    let result = run(
        &mut calc,
        &[card(Rank::Ten, Suit::Hearts), card(Rank::Seven, Suit::Spades)],
        &[card(Rank::Nine, Suit::Diamonds), card(Rank::Two, Suit::Clubs)],
        1000,
    );

    let analysis = &result.action_analysis;
    assert!(analysis.can_hit && analysis.can_double);
    assert!(!analysis.can_split);
    assert_eq!(analysis.split_win_rate, 0.0);
}

#[test]
fn test_capabilities_after_hitting() {
    let mut calc = calculator(8, 500);
    let result = run(
        &mut calc,
        &[
            card(Rank::Five, Suit::Hearts),
            card(Rank::Three, Suit::Spades),
            card(Rank::Four, Suit::Clubs),
        ],
        &[card(Rank::Seven, Suit::Diamonds), card(Rank::Two, Suit::Clubs)],
        1000,
    );

    let analysis = &result.action_analysis;
    assert!(analysis.can_hit);
    assert!(!analysis.can_double && !analysis.can_split);
    assert_eq!(analysis.double_win_rate, 0.0);
    assert!(!analysis.kelly.should_double);
}

#[test]
fn test_eleven_prefers_drawing_against_ten() {
    let mut calc = ProbabilityCalculator::with_config(
        SimulationConfig {
            trials: 2000,
            per_card_trials: 100,
        },
        ChaCha8Rng::seed_from_u64(9),
    );
    let player = hand(&[card(Rank::Six, Suit::Hearts), card(Rank::Five, Suit::Spades)]);
    let dealer = hand(&[card(Rank::Ten, Suit::Diamonds), card(Rank::Three, Suit::Clubs)]);
    let remaining = remaining_after(&[player.cards.clone(), dealer.cards.clone()].concat());

    let analysis = calc.analyze_actions(&player, &dealer, &remaining);
    // Standing on 11 only wins on a dealer bust; any ten-value card makes 21
    assert!(analysis.hit_win_rate > analysis.stand_win_rate + 0.1);
    assert!(analysis.double_win_rate > analysis.stand_win_rate + 0.1);
    assert_ne!(analysis.recommended_action, Action::Stand);
}

#[test]
fn test_inputs_are_not_mutated() {
    let player = hand(&[card(Rank::Nine, Suit::Hearts), card(Rank::Four, Suit::Spades)]);
    let dealer = hand(&[card(Rank::Queen, Suit::Diamonds), card(Rank::Six, Suit::Clubs)]);
    let remaining = remaining_after(&[player.cards.clone(), dealer.cards.clone()].concat());
    let (player_before, dealer_before, remaining_before) =
        (player.clone(), dealer.clone(), remaining.clone());

    let mut calc = calculator(10, 300);
    calc.calculate_win_probabilities(&player, &dealer, &remaining, 1000);

    assert_eq!(player, player_before);
    assert_eq!(dealer, dealer_before);
    assert_eq!(remaining, remaining_before);
}

#[test]
fn test_repeated_runs_only_differ_by_sampling_noise() {
    let player = [card(Rank::Ten, Suit::Hearts), card(Rank::Six, Suit::Spades)];
    let dealer = [card(Rank::Nine, Suit::Diamonds), card(Rank::Four, Suit::Clubs)];

    let mut calc = calculator(11, 1000);
    let baseline = run(&mut calc, &player, &dealer, 1000);
    for _ in 0..5 {
        let again = run(&mut calc, &player, &dealer, 1000);
        assert!((again.player_win_probability - baseline.player_win_probability).abs() < 0.1);
        assert!((again.dealer_win_probability - baseline.dealer_win_probability).abs() < 0.1);
    }
}

#[test]
fn test_same_seed_same_result() {
    let player = [card(Rank::Ten, Suit::Hearts), card(Rank::Two, Suit::Spades)];
    let dealer = [card(Rank::Six, Suit::Diamonds), card(Rank::King, Suit::Clubs)];

    let a = run(&mut calculator(12, 300), &player, &dealer, 500);
    let b = run(&mut calculator(12, 300), &player, &dealer, 500);
    assert_eq!(a, b);
}

#[test]
fn test_empty_pool_degrades_without_failing() {
    let mut calc = calculator(13, 200);
    let player = hand(&[card(Rank::Ten, Suit::Hearts), card(Rank::Six, Suit::Spades)]);
    let dealer = hand(&[card(Rank::Ten, Suit::Clubs), card(Rank::Seven, Suit::Clubs)]);

    let result = calc.calculate_win_probabilities(&player, &dealer, &[], 1000);

    // Only the hole card is left to draw, so the dealer always finishes on 17
    assert_eq!(result.dealer_win_probability, 1.0);
    assert_eq!(result.player_bust_probability, 0.0);
    assert_eq!(result.player_21_probability, 0.0);
    assert_eq!(result.action_analysis.hit_win_rate, 0.0);
    assert_eq!(result.action_analysis.double_win_rate, 0.0);
}

#[test]
fn test_hit_analysis_empty_pool() {
    let player = hand(&[card(Rank::Ten, Suit::Hearts), card(Rank::Six, Suit::Spades)]);
    assert_eq!(hit_analysis(&player, &[]), HitAnalysis::default());
}

#[test]
fn test_hit_analysis_on_twenty() {
    let cards = [card(Rank::King, Suit::Hearts), card(Rank::Queen, Suit::Spades)];
    let remaining = remaining_after(&cards);
    let analysis = hit_analysis(&hand(&cards), &remaining);

    assert!((analysis.hit_21_probability - 4.0 / 50.0).abs() < 1e-9);
    assert!((analysis.bust_probability - 46.0 / 50.0).abs() < 1e-9);
    assert_eq!(analysis.safe_probability, 0.0);
}

#[test]
fn test_hit_analysis_sums_to_one() {
    for cards in [
        vec![card(Rank::Ten, Suit::Hearts), card(Rank::Six, Suit::Spades)],
        vec![card(Rank::Ace, Suit::Hearts), card(Rank::Five, Suit::Spades)],
        vec![card(Rank::Two, Suit::Hearts), card(Rank::Three, Suit::Spades)],
    ] {
        let remaining = remaining_after(&cards);
        let a = hit_analysis(&hand(&cards), &remaining);
        let total = a.bust_probability + a.hit_21_probability + a.safe_probability;
        assert!((total - 1.0).abs() < 0.01, "sum {total}");
    }
}

#[test]
fn test_soft_hand_cannot_bust_on_one_card() {
    let cards = [card(Rank::Ace, Suit::Hearts), card(Rank::Five, Suit::Spades)];
    let a = hit_analysis(&hand(&cards), &remaining_after(&cards));
    assert_eq!(a.bust_probability, 0.0);
}

#[test]
fn test_evaluate_precedence() {
    let bust = hand(&[
        card(Rank::Ten, Suit::Hearts),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Five, Suit::Hearts),
    ]);
    let blackjack = hand(&[card(Rank::Ace, Suit::Spades), card(Rank::King, Suit::Spades)]);
    let other_blackjack = hand(&[card(Rank::Ace, Suit::Clubs), card(Rank::Ten, Suit::Clubs)]);
    let three_card_21 = hand(&[
        card(Rank::Seven, Suit::Hearts),
        card(Rank::Seven, Suit::Spades),
        card(Rank::Seven, Suit::Clubs),
    ]);
    let eighteen = hand(&[card(Rank::Ten, Suit::Diamonds), card(Rank::Eight, Suit::Diamonds)]);
    let other_eighteen = hand(&[card(Rank::Nine, Suit::Diamonds), card(Rank::Nine, Suit::Clubs)]);

    // Player bust loses even when the dealer busts too
    assert_eq!(SimulationResult::evaluate(&bust, &bust).winner, Winner::Dealer);
    assert_eq!(SimulationResult::evaluate(&eighteen, &bust).winner, Winner::Player);
    assert_eq!(SimulationResult::evaluate(&blackjack, &other_blackjack).winner, Winner::Push);
    assert_eq!(SimulationResult::evaluate(&blackjack, &three_card_21).winner, Winner::Player);
    assert_eq!(SimulationResult::evaluate(&three_card_21, &blackjack).winner, Winner::Dealer);
    assert_eq!(SimulationResult::evaluate(&three_card_21, &eighteen).winner, Winner::Player);
    assert_eq!(SimulationResult::evaluate(&eighteen, &other_eighteen).winner, Winner::Push);

    let outcome = SimulationResult::evaluate(&eighteen, &bust);
    assert!(outcome.dealer_bust && !outcome.player_bust);
    assert_eq!(outcome.player_final_value, 18);
}

#[test]
fn test_best_action_tie_breaks_in_priority_order() {
    let mut analysis = ActionAnalysis {
        stand_win_rate: 0.4,
        hit_win_rate: 0.4,
        double_win_rate: 0.3,
        split_win_rate: 0.9,
        can_hit: true,
        can_stand: true,
        can_double: true,
        can_split: false,
        ..ActionAnalysis::default()
    };
    // Unavailable split is ignored; hit ties stand so stand wins
    assert_eq!(analysis.best_action(), (Action::Stand, 0.4));

    analysis.hit_win_rate = 0.5;
    analysis.double_win_rate = 0.5;
    assert_eq!(analysis.best_action(), (Action::Hit, 0.5));

    analysis.can_split = true;
    assert_eq!(analysis.best_action(), (Action::Split, 0.9));
}

#[test]
fn test_kelly_fraction() {
    assert!((kelly_fraction(0.6, 0.4, 1.0) - 0.2).abs() < 1e-12);
    assert_eq!(kelly_fraction(0.4, 0.6, 1.0), 0.0);
    assert_eq!(kelly_fraction(0.6, 0.4, 0.0), 0.0);
    assert_eq!(kelly_fraction(0.6, 0.4, -1.0), 0.0);
    assert_eq!(kelly_fraction(0.0, 1.0, 1.5), 0.0);
    assert_eq!(kelly_fraction(-0.1, 0.5, 1.0), 0.0);
}

#[test]
fn test_kelly_fraction_never_negative() {
    for w in 0..=20 {
        for l in 0..=20 {
            for odds in [-1.0, 0.0, 0.5, 1.0, 1.5, 3.0] {
                let f = kelly_fraction(w as f64 / 20.0, l as f64 / 20.0, odds);
                assert!(f >= 0.0);
            }
        }
    }
}

#[test]
fn test_risk_level_thresholds() {
    assert_eq!(RiskLevel::from_fraction(0.0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_fraction(0.02), RiskLevel::Low);
    assert_eq!(RiskLevel::from_fraction(0.021), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_fraction(0.05), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_fraction(0.051), RiskLevel::High);
    assert_eq!(RiskLevel::High.to_string(), "High");
}

fn probabilities(win: f64, lose: f64, push: f64) -> ProbabilityResult {
    ProbabilityResult {
        player_win_probability: win,
        dealer_win_probability: lose,
        push_probability: push,
        ..ProbabilityResult::default()
    }
}

#[test]
fn test_in_hand_caps_fraction() {
    let k = in_hand_recommendation(&probabilities(0.9, 0.1, 0.0), 1000);
    assert!((k.standard_kelly_fraction - 0.8).abs() < 1e-9);
    assert_eq!(k.recommended_bet_fraction, MAX_BET_FRACTION);
    assert_eq!(k.recommended_bet_amount, 100);
    assert_eq!(k.risk_level, RiskLevel::High);
    assert!((k.expected_growth_rate - 0.08).abs() < 1e-9);
}

#[test]
fn test_in_hand_excludes_push_mass() {
    let k = in_hand_recommendation(&probabilities(0.3, 0.3, 0.4), 1000);
    assert_eq!(k.standard_kelly_fraction, 0.0);

    let k = in_hand_recommendation(&probabilities(0.36, 0.24, 0.4), 1000);
    // 0.6 / 0.4 after normalisation
    assert!((k.standard_kelly_fraction - 0.2).abs() < 1e-9);
}

#[test]
fn test_in_hand_raises_to_minimum_bet() {
    let k = in_hand_recommendation(&probabilities(0.51, 0.49, 0.0), 100);
    assert_eq!(k.recommended_bet_amount, MIN_BET);

    let k = in_hand_recommendation(&probabilities(0.51, 0.49, 0.0), 5);
    assert!(k.recommended_bet_amount <= 5);
}

#[test]
fn test_in_hand_zero_chips() {
    let k = in_hand_recommendation(&probabilities(0.7, 0.3, 0.0), 0);
    assert_eq!(k.recommended_bet_amount, 0);
    assert_eq!(k.recommended_bet_fraction, 0.0);
    assert_eq!(k.risk_level, RiskLevel::High);
}

#[test]
fn test_in_hand_blackjack_fraction_dominates() {
    let mut result = probabilities(0.5, 0.5, 0.0);
    result.player_blackjack_probability = 1.0;
    let k = in_hand_recommendation(&result, 1000);
    assert!((k.blackjack_kelly_fraction - 1.0).abs() < 1e-9);
    assert_eq!(k.recommended_bet_fraction, MAX_BET_FRACTION);
}

#[test]
fn test_in_hand_should_double() {
    let mut result = probabilities(0.5, 0.5, 0.0);
    result.action_analysis.double_win_rate = 0.6;
    result.action_analysis.can_double = true;
    let k = in_hand_recommendation(&result, 1000);
    assert!((k.double_kelly_fraction - 0.2).abs() < 1e-9);
    assert!((k.double_expected_roi - 0.2).abs() < 1e-9);
    assert!(k.should_double);

    result.action_analysis.can_double = false;
    assert!(!in_hand_recommendation(&result, 1000).should_double);

    result.action_analysis.can_double = true;
    result.action_analysis.double_win_rate = 0.0;
    let k = in_hand_recommendation(&result, 1000);
    assert!(!k.should_double);
    assert_eq!(k.double_expected_roi, -1.0);
}

#[test]
fn test_in_hand_never_exceeds_chips() {
    for chips in [0, 1, 9, 10, 11, 99, 1000, 123_456] {
        for win in [0.0, 0.3, 0.5, 0.7, 1.0] {
            let k = in_hand_recommendation(&probabilities(win, 1.0 - win, 0.0), chips);
            assert!(k.recommended_bet_amount <= chips);
        }
    }
}

#[test]
fn test_basic_recommendation_tiers() {
    let k = basic_recommendation(0.45, 0.55, 2000);
    assert_eq!(k.recommended_bet_amount, 30);
    assert_eq!(k.recommended_bet_fraction, 0.015);
    assert_eq!(k.risk_level, RiskLevel::Low);

    let k = basic_recommendation(0.48, 0.52, 750);
    assert_eq!(k.recommended_bet_amount, 10);
    assert_eq!(k.risk_level, RiskLevel::Low);

    let k = basic_recommendation(0.5, 0.5, 300);
    assert_eq!(k.recommended_bet_amount, 10);
    assert_eq!(k.risk_level, RiskLevel::Medium);

    let k = basic_recommendation(0.4, 0.6, 50);
    assert_eq!(k.recommended_bet_amount, 10);
    assert_eq!(k.recommended_bet_fraction, 0.0);
    assert_eq!(k.risk_level, RiskLevel::High);
}

#[test]
fn test_basic_recommendation_small_bankrolls() {
    let calc = ProbabilityCalculator::seeded(0);
    let k = calc.calculate_basic_kelly_fraction(BASELINE_WIN_RATE, BASELINE_LOSE_RATE, 5);
    assert!(k.recommended_bet_amount <= 5);
    assert_eq!(k.risk_level, RiskLevel::High);

    let k = calc.calculate_basic_kelly_fraction(BASELINE_WIN_RATE, BASELINE_LOSE_RATE, 0);
    assert_eq!(k.recommended_bet_amount, 0);
}

#[test]
fn test_basic_recommendation_reports_expected_loss() {
    let k = basic_recommendation(0.48, 0.52, 1000);
    assert_eq!(k.standard_kelly_fraction, 0.0);
    assert_eq!(k.double_kelly_fraction, 0.0);
    assert!(!k.should_double);
    assert!((k.expected_growth_rate + 0.04 * 0.015).abs() < 1e-12);
}
