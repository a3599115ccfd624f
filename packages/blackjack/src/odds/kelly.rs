use std::fmt;

use serde::{Deserialize, Serialize};

use super::ProbabilityResult;

/// Ceiling on the recommended share of the bankroll.
pub const MAX_BET_FRACTION: f64 = 0.10;
/// Table minimum; recommendations are raised to it when chips allow.
pub const MIN_BET: u64 = 10;
/// Long-run win/lose rates assumed before any card is dealt.
pub const BASELINE_WIN_RATE: f64 = 0.48;
pub const BASELINE_LOSE_RATE: f64 = 0.52;

const EVEN_MONEY: f64 = 1.0;
const BLACKJACK_ODDS: f64 = 1.5;
const BASELINE_BLACKJACK_RATE: f64 = 0.048;
const DOUBLE_KELLY_THRESHOLD: f64 = 0.02;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction <= 0.02 {
            RiskLevel::Low
        } else if fraction <= 0.05 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KellyRecommendation {
    /// Kelly fraction for an even-money win
    pub standard_kelly_fraction: f64,
    /// Kelly fraction for a 3:2 blackjack win
    pub blackjack_kelly_fraction: f64,
    pub double_kelly_fraction: f64,

    pub recommended_bet_amount: u64,
    pub recommended_bet_fraction: f64,

    pub should_double: bool,
    /// Linear approximation, `2p - 1`
    pub double_expected_roi: f64,

    pub risk_level: RiskLevel,
    /// Growth per hand at the recommended fraction; an expected loss in the betting phase
    pub expected_growth_rate: f64,
}

/// f* = (b·p − q) / b, floored at zero.
pub fn kelly_fraction(win_prob: f64, lose_prob: f64, odds: f64) -> f64 {
    if odds <= 0.0 || win_prob <= 0.0 {
        return 0.0;
    }
    ((odds * win_prob - lose_prob) / odds).max(0.0)
}

fn expected_growth_rate(win_prob: f64, lose_prob: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return 0.0;
    }
    win_prob * (1.0 + fraction) + lose_prob * (1.0 - fraction) - 1.0
}

/// Sizing from live probabilities. Pushes are taken out of the win/lose mass before
/// the even-money fraction is computed.
pub fn in_hand_recommendation(result: &ProbabilityResult, current_chips: u64) -> KellyRecommendation {
    let mut win_prob = result.player_win_probability;
    let mut lose_prob = result.dealer_win_probability;
    let decided = win_prob + lose_prob;
    if decided > 0.0 {
        win_prob /= decided;
        lose_prob /= decided;
    }

    let blackjack_prob = result.player_blackjack_probability;
    let standard = kelly_fraction(win_prob, lose_prob, EVEN_MONEY);
    let blackjack = kelly_fraction(blackjack_prob, 1.0 - blackjack_prob, BLACKJACK_ODDS);

    let analysis = &result.action_analysis;
    let double_win = analysis.double_win_rate;
    let double_lose = if double_win > 0.0 { 1.0 - double_win } else { 1.0 };
    let double = kelly_fraction(double_win, double_lose, EVEN_MONEY);

    let mut recommendation = KellyRecommendation {
        standard_kelly_fraction: standard,
        blackjack_kelly_fraction: blackjack,
        double_kelly_fraction: double,
        double_expected_roi: double_win * 2.0 - 1.0,
        ..KellyRecommendation::default()
    };

    if current_chips == 0 {
        recommendation.risk_level = RiskLevel::High;
        return recommendation;
    }

    let fraction = standard.max(blackjack).min(MAX_BET_FRACTION);
    let mut amount = (current_chips as f64 * fraction) as u64;
    if amount < MIN_BET && current_chips >= MIN_BET {
        amount = MIN_BET;
    }

    recommendation.recommended_bet_amount = amount;
    recommendation.recommended_bet_fraction = fraction;
    recommendation.should_double = double > DOUBLE_KELLY_THRESHOLD && analysis.can_double;
    recommendation.risk_level = RiskLevel::from_fraction(fraction);
    recommendation.expected_growth_rate = expected_growth_rate(win_prob, lose_prob, fraction);
    recommendation
}

/// Betting-phase sizing. The Kelly fractions are reported for reference only; the bet
/// itself comes from a conservative table keyed by bankroll size.
pub fn basic_recommendation(
    estimated_win_rate: f64,
    estimated_lose_rate: f64,
    current_chips: u64,
) -> KellyRecommendation {
    let standard = kelly_fraction(estimated_win_rate, estimated_lose_rate, EVEN_MONEY);
    let blackjack = kelly_fraction(BASELINE_BLACKJACK_RATE, estimated_lose_rate, BLACKJACK_ODDS);

    let share = |fraction: f64| ((current_chips as f64 * fraction) as u64).max(MIN_BET);
    let (fraction, amount, risk_level) = match current_chips {
        1000.. => (0.015, share(0.015), RiskLevel::Low),
        500..=999 => (0.01, share(0.01), RiskLevel::Low),
        200..=499 => (0.005, MIN_BET, RiskLevel::Medium),
        _ => (0.0, MIN_BET, RiskLevel::High),
    };

    KellyRecommendation {
        standard_kelly_fraction: standard,
        blackjack_kelly_fraction: blackjack,
        double_kelly_fraction: 0.0,
        recommended_bet_amount: amount.min(current_chips),
        recommended_bet_fraction: fraction,
        should_double: false,
        double_expected_roi: 0.0,
        risk_level,
        expected_growth_rate: -((estimated_lose_rate - estimated_win_rate) * fraction),
    }
}
