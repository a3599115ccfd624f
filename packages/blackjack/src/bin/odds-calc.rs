use std::collections::HashSet;

use blackjack::{
    clock_seed, odds, Card, Deck, Hand, ProbabilityCalculator, ProbabilityResult,
    SimulationConfig,
};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

#[derive(Parser)]
#[command(
    name = "odds-calc",
    about = "Estimate blackjack win odds and bet sizing for a hand"
)]
struct Args {
    /// Player cards, comma separated (e.g. "AH,7c")
    #[arg(long, required_unless_present = "basic")]
    player: Option<String>,

    /// Dealer cards, up card first; the hole card is optional and treated as unseen
    #[arg(long, required_unless_present = "basic")]
    dealer: Option<String>,

    /// Current bankroll, used for bet sizing
    #[arg(long, default_value = "1000")]
    chips: u64,

    /// Simulated trials per estimate
    #[arg(long, default_value = "10000")]
    trials: usize,

    /// Trials per candidate card when rating hit/double/split
    #[arg(long, default_value = "100")]
    per_card_trials: usize,

    /// RNG seed; defaults to the clock
    #[arg(long)]
    seed: Option<u64>,

    /// Print the full result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Betting-phase recommendation from the chip count alone
    #[arg(long, default_value_t = false)]
    basic: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.basic {
        let kelly = odds::basic_recommendation(
            odds::BASELINE_WIN_RATE,
            odds::BASELINE_LOSE_RATE,
            args.chips,
        );
        if args.json {
            print_json(&kelly);
        } else {
            println!("Chips:           {}", args.chips);
            println!("Recommended bet: {}", kelly.recommended_bet_amount);
            println!("Bet fraction:    {:.2}%", kelly.recommended_bet_fraction * 100.0);
            println!("Risk level:      {}", kelly.risk_level);
            println!("Expected growth: {:+.4}%", kelly.expected_growth_rate * 100.0);
        }
        return;
    }

    let player = parse_hand("player", args.player.as_deref().unwrap_or_default());
    let dealer = parse_hand("dealer", args.dealer.as_deref().unwrap_or_default());
    if player.is_empty() || dealer.is_empty() {
        eprintln!("Both --player and --dealer need at least one card");
        std::process::exit(1);
    }

    let on_table: Vec<Card> = player.cards.iter().chain(&dealer.cards).copied().collect();
    let distinct: HashSet<&Card> = on_table.iter().collect();
    if distinct.len() != on_table.len() {
        eprintln!("The same card appears more than once");
        std::process::exit(1);
    }

    let remaining: Vec<Card> = Deck::ordered()
        .remaining()
        .iter()
        .filter(|c| !on_table.contains(c))
        .copied()
        .collect();

    let seed = args.seed.unwrap_or_else(clock_seed);
    let config = SimulationConfig {
        trials: args.trials,
        per_card_trials: args.per_card_trials,
    };
    info!("seed {seed}, {} trials, {} cards unseen", config.trials, remaining.len());

    let mut calculator = ProbabilityCalculator::with_config(config, ChaCha8Rng::seed_from_u64(seed));
    let result = calculator.calculate_win_probabilities(&player, &dealer, &remaining, args.chips);

    if args.json {
        print_json(&result);
    } else {
        print_report(&player, &dealer, &result);
    }
}

fn parse_hand(which: &str, s: &str) -> Hand {
    let mut hand = Hand::new();
    for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let card: Card = token.parse().unwrap_or_else(|e| {
            eprintln!("Invalid {which} card: {e}");
            std::process::exit(1);
        });
        hand.add_card(card);
    }
    hand
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}

fn print_report(player: &Hand, dealer: &Hand, result: &ProbabilityResult) {
    let analysis = &result.action_analysis;
    let up = dealer.up_card().map(Card::to_string).unwrap_or_default();

    println!("Player: {} ({})", player, player.value());
    println!("Dealer: {up} showing");
    println!();
    println!("Win:    {:6.2}%", result.player_win_probability * 100.0);
    println!("Lose:   {:6.2}%", result.dealer_win_probability * 100.0);
    println!("Push:   {:6.2}%", result.push_probability * 100.0);
    println!("Bust on next card: {:.2}%", result.player_bust_probability * 100.0);
    println!("Dealer bust:       {:.2}%", result.dealer_bust_probability * 100.0);
    println!();
    println!("Stand:  {:6.2}%", analysis.stand_win_rate * 100.0);
    if analysis.can_hit {
        println!("Hit:    {:6.2}%", analysis.hit_win_rate * 100.0);
    }
    if analysis.can_double {
        println!("Double: {:6.2}%", analysis.double_win_rate * 100.0);
    }
    if analysis.can_split {
        println!("Split:  {:6.2}%", analysis.split_win_rate * 100.0);
    }
    println!("Recommended: {}", analysis.recommended_action);

    let kelly = &analysis.kelly;
    println!();
    println!(
        "Kelly bet: {} ({:.1}% of bankroll, {} risk)",
        kelly.recommended_bet_amount,
        kelly.recommended_bet_fraction * 100.0,
        kelly.risk_level
    );
    if kelly.should_double {
        println!("Doubling is favourable (ROI {:+.1}%)", kelly.double_expected_roi * 100.0);
    }
}
