mod console;
mod display;

use std::io;

use blackjack::{
    clock_seed, Game, PayoutRatio, ProbabilityCalculator, SimulationConfig, TableRules,
};
use clap::Parser;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::console::Console;

#[derive(Parser)]
#[command(
    name = "blackjack-cli",
    about = "Console blackjack with live odds and Kelly bet sizing"
)]
struct Cli {
    /// Seed for the shoe and the odds engine; defaults to the clock
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Monte Carlo trials per odds estimate
    #[arg(long, env = "BLACKJACK_TRIALS", default_value = "10000")]
    trials: usize,

    /// Chips to start with
    #[arg(long, env = "BLACKJACK_CHIPS", default_value = "1000")]
    chips: u64,

    /// Blackjack payout ratio (e.g. "3:2", "6:5")
    #[arg(long, env = "BLACKJACK_PAYOUT", default_value = "3:2")]
    blackjack_payout: PayoutRatio,

    /// Play without the odds panel
    #[arg(long, default_value_t = false)]
    no_odds: bool,
}

fn main() {
    dotenvy::dotenv().ok();
    // Keep log lines out of the game output unless asked for
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(clock_seed);
    log::info!("seed {seed}, {} trials", cli.trials);

    let rules = TableRules {
        starting_chips: cli.chips,
        blackjack_payout: cli.blackjack_payout,
        ..TableRules::default()
    };
    let game = Game::seeded(rules, seed);
    let calculator = (!cli.no_odds).then(|| {
        ProbabilityCalculator::with_config(
            SimulationConfig::with_trials(cli.trials),
            ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        )
    });

    let stdin = io::stdin();
    let mut console = Console::new(game, calculator, stdin.lock(), io::stdout());
    if let Err(e) = console.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
