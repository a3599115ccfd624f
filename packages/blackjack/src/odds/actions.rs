use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{KellyRecommendation, ProbabilityCalculator, SimulationResult, Winner};
use crate::{Action, Card, Hand};

/// Win rate of each action from the current decision point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionAnalysis {
    pub hit_win_rate: f64,
    pub stand_win_rate: f64,
    pub double_win_rate: f64,
    pub split_win_rate: f64,

    pub can_hit: bool,
    pub can_stand: bool,
    pub can_double: bool,
    pub can_split: bool,

    pub recommended_action: Action,
    /// Win rate of the recommended action
    pub expected_value: f64,

    pub kelly: KellyRecommendation,
}

impl ActionAnalysis {
    pub(super) fn stand_only(stand_win_rate: f64) -> Self {
        Self {
            stand_win_rate,
            can_stand: true,
            recommended_action: Action::Stand,
            expected_value: stand_win_rate,
            ..Self::default()
        }
    }

    /// Highest win rate among available actions; earlier actions keep ties.
    pub(super) fn best_action(&self) -> (Action, f64) {
        [
            (Action::Hit, self.hit_win_rate, self.can_hit),
            (Action::Double, self.double_win_rate, self.can_double),
            (Action::Split, self.split_win_rate, self.can_split),
        ]
        .into_iter()
        .filter(|&(_, _, available)| available)
        .fold(
            (Action::Stand, self.stand_win_rate),
            |best, (action, rate, _)| if rate > best.1 { (action, rate) } else { best },
        )
    }
}

impl<R: Rng> ProbabilityCalculator<R> {
    pub fn analyze_actions(
        &mut self,
        player: &Hand,
        dealer: &Hand,
        remaining: &[Card],
    ) -> ActionAnalysis {
        let value = player.value();
        let mut analysis = ActionAnalysis {
            can_hit: value < 21,
            can_stand: true,
            can_double: player.len() == 2,
            can_split: player.can_split(),
            ..ActionAnalysis::default()
        };

        let trials = self.config.trials();
        analysis.stand_win_rate = self.stand_win_rate(player, dealer, remaining, trials);

        if value >= 21 {
            analysis.recommended_action = Action::Stand;
            analysis.expected_value = analysis.stand_win_rate;
            return analysis;
        }

        if analysis.can_hit {
            analysis.hit_win_rate = self.hit_win_rate(player, dealer, remaining);
        }
        if analysis.can_double {
            analysis.double_win_rate = self.double_win_rate(player, dealer, remaining);
        }
        if analysis.can_split {
            analysis.split_win_rate = self.split_win_rate(player, dealer, remaining);
        }

        let (action, rate) = analysis.best_action();
        analysis.recommended_action = action;
        analysis.expected_value = rate;

        trace!(
            "stand {:.3} hit {:.3} double {:.3} split {:.3} -> {}",
            analysis.stand_win_rate,
            analysis.hit_win_rate,
            analysis.double_win_rate,
            analysis.split_win_rate,
            action
        );

        analysis
    }

    /// Fraction of dealer continuations the fixed player hand beats.
    pub(super) fn stand_win_rate(
        &mut self,
        player: &Hand,
        dealer: &Hand,
        remaining: &[Card],
        trials: usize,
    ) -> f64 {
        let trials = trials.max(1);
        let wins = (0..trials)
            .filter(|_| {
                let dealer_final = self.simulate_dealer_play(dealer, remaining);
                SimulationResult::evaluate(player, &dealer_final).winner == Winner::Player
            })
            .count();
        wins as f64 / trials as f64
    }

    pub(super) fn hit_win_rate(&mut self, player: &Hand, dealer: &Hand, remaining: &[Card]) -> f64 {
        self.draw_one_then_stand(player, dealer, remaining)
    }

    /// Doubling takes exactly one card and must stand.
    pub(super) fn double_win_rate(
        &mut self,
        player: &Hand,
        dealer: &Hand,
        remaining: &[Card],
    ) -> f64 {
        self.draw_one_then_stand(player, dealer, remaining)
    }

    /// Average over the two single-card hands of the better of standing and hitting.
    /// No re-splitting or doubling inside the estimate.
    pub(super) fn split_win_rate(
        &mut self,
        player: &Hand,
        dealer: &Hand,
        remaining: &[Card],
    ) -> f64 {
        if !player.can_split() {
            return 0.0;
        }

        let card = player.cards[0];
        let first = self.best_of_stand_or_hit(&Hand::from_cards(&[card]), dealer, remaining);
        let second = self.best_of_stand_or_hit(&Hand::from_cards(&[card]), dealer, remaining);
        (first + second) / 2.0
    }

    fn best_of_stand_or_hit(&mut self, player: &Hand, dealer: &Hand, remaining: &[Card]) -> f64 {
        let trials = self.config.trials();
        let stand = self.stand_win_rate(player, dealer, remaining, trials);
        if player.value() >= 21 {
            return stand;
        }
        let hit = self.hit_win_rate(player, dealer, remaining);
        stand.max(hit)
    }

    /// Enumerate every unseen card as the next one drawn, rate standing on the result
    /// with the reduced trial count, and average with equal weight. Busting scores 0.
    fn draw_one_then_stand(&mut self, player: &Hand, dealer: &Hand, remaining: &[Card]) -> f64 {
        if remaining.is_empty() {
            return 0.0;
        }

        let per_card = self.config.per_card_trials();
        let mut total = 0.0;
        for (idx, card) in remaining.iter().enumerate() {
            let mut next = player.clone();
            next.add_card(*card);
            if next.is_busted() {
                continue;
            }
            let rest: Vec<Card> = remaining
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != idx)
                .map(|(_, c)| *c)
                .collect();
            total += self.stand_win_rate(&next, dealer, &rest, per_card);
        }

        total / remaining.len() as f64
    }
}
