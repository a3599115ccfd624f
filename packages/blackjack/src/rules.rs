use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Dealer draws while below this value, on soft and hard totals alike.
pub const DEALER_STAND_VALUE: u8 = 17;

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, Error> {
        if denominator == 0 {
            return Err(Error::InvalidPayout("denominator cannot be zero".to_string()));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Winnings on top of the returned stake, rounded down.
    pub fn calculate_payout(&self, bet: u64) -> u64 {
        (bet * self.numerator as u64) / self.denominator as u64
    }
}

impl fmt::Display for PayoutRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

impl FromStr for PayoutRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidPayout(format!("'{s}', expected N:D (e.g. 3:2)")))?;
        let num: u16 = num
            .trim()
            .parse()
            .map_err(|_| Error::InvalidPayout(format!("invalid numerator in '{s}'")))?;
        let den: u16 = den
            .trim()
            .parse()
            .map_err(|_| Error::InvalidPayout(format!("invalid denominator in '{s}'")))?;
        Self::new(num, den)
    }
}

/// Table configuration for the single-player game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Chips the player sits down with
    pub starting_chips: u64,

    /// Bet sizes offered during the betting phase
    pub bet_ladder: Vec<u64>,

    /// Blackjack payout multiplier
    pub blackjack_payout: PayoutRatio,

    /// A fresh deck is shuffled before a round when fewer cards than this remain
    pub reshuffle_below: usize,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            starting_chips: 1000,
            bet_ladder: vec![10, 25, 50, 100, 200],
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            reshuffle_below: 10,
        }
    }
}
