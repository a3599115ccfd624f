mod card;
mod deck;
mod error;
mod game;
mod hand;
pub mod odds;
mod rules;
mod strategy;

pub use card::{Card, Rank, Suit};
pub use deck::Deck;
pub use error::{Error, Result};
pub use game::{Game, GamePhase, Player, RoundOutcome, RoundResult};
pub use hand::{calculate_hand_value, can_split_cards, is_blackjack, is_busted, is_soft_hand, Hand};
pub use odds::{
    ActionAnalysis, HitAnalysis, KellyRecommendation, ProbabilityCalculator, ProbabilityResult,
    RiskLevel, SimulationConfig,
};
pub use rules::{PayoutRatio, TableRules, DEALER_STAND_VALUE};
pub use strategy::{basic_strategy, Action};

/// Seed derived from the wall clock, for generators that do not need to be reproducible.
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
