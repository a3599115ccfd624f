use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DEALER_STAND_VALUE;

/// Player decisions, in tie-break priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Stand,
    Hit,
    Double,
    Split,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Stand => "stand",
            Action::Hit => "hit",
            Action::Double => "double",
            Action::Split => "split",
        };
        f.write_str(name)
    }
}

/// Hit/stand decision of the simplified basic-strategy chart used by simulated players.
///
/// Keyed by whether the hand is soft, its value, and the dealer's visible card value
/// (Ace = 11). Without a visible dealer card the player draws to 17.
pub fn basic_strategy(is_soft: bool, player_value: u8, dealer_up: Option<u8>) -> Action {
    let Some(up) = dealer_up else {
        return if player_value < DEALER_STAND_VALUE {
            Action::Hit
        } else {
            Action::Stand
        };
    };

    match (is_soft, player_value, up) {
        // Soft hands
        (true, ..=17, _) => Action::Hit,
        (true, 18, 9..) => Action::Hit,
        (true, _, _) => Action::Stand,
        // Hard hands
        (false, ..=11, _) => Action::Hit,
        (false, 12, 4..=6) => Action::Stand,
        (false, 13..=16, ..=6) => Action::Stand,
        (false, 17.., _) => Action::Stand,
        (false, _, _) => Action::Hit,
    }
}
