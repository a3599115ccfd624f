use std::io::{self, Write};

use blackjack::{Hand, KellyRecommendation, ProbabilityResult, RoundOutcome, RoundResult, TableRules};

const RULE: &str = "========================================";

pub fn welcome(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Welcome to Blackjack")?;
    writeln!(out, "====================")?;
    writeln!(out)
}

pub fn menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "1. Start game")?;
    writeln!(out, "2. Rules")?;
    writeln!(out, "3. Exit")?;
    writeln!(out)
}

pub fn rules(out: &mut impl Write, rules: &TableRules) -> io::Result<()> {
    writeln!(out, "Rules")?;
    writeln!(out, "-----")?;
    writeln!(out, "Get closer to 21 than the dealer without going over.")?;
    writeln!(out, "Number cards count face value, J/Q/K count 10, Aces count 11 or 1.")?;
    writeln!(out, "Blackjack (21 on two cards) pays {}.", rules.blackjack_payout)?;
    writeln!(out, "Dealer draws below 17 and stands on all 17s.")?;
    writeln!(out, "Double down on your first two cards: double the bet, take one card.")?;
    writeln!(out, "You start with {} chips.", rules.starting_chips)?;
    writeln!(out)
}

pub fn goodbye(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Thanks for playing. Goodbye!")
}

pub fn error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "! {message}")?;
    writeln!(out)
}

pub fn round_start(out: &mut impl Write, round: u32, chips: u64) -> io::Result<()> {
    writeln!(out, "Round {round}, chips: {chips}")?;
    writeln!(out, "{RULE}")
}

pub fn bet_options(
    out: &mut impl Write,
    options: &[u64],
    recommendation: &KellyRecommendation,
) -> io::Result<()> {
    writeln!(
        out,
        "Suggested bet: {} ({} risk)",
        recommendation.recommended_bet_amount, recommendation.risk_level
    )?;
    for (i, amount) in options.iter().enumerate() {
        writeln!(out, "{}. {} chips", i + 1, amount)?;
    }
    writeln!(out)
}

fn hidden_hand(hand: &Hand) -> String {
    match hand.up_card() {
        Some(up) if hand.len() > 1 => {
            let mut shown = up.to_string();
            for _ in 1..hand.len() {
                shown.push_str(" [??]");
            }
            shown
        }
        _ => hand.to_string(),
    }
}

/// The hole card stays face down until `reveal`.
pub fn table(out: &mut impl Write, player: &Hand, dealer: &Hand, reveal: bool) -> io::Result<()> {
    if reveal {
        writeln!(out, "Dealer: {} ({})", dealer, dealer.value())?;
    } else {
        writeln!(out, "Dealer: {}", hidden_hand(dealer))?;
    }
    writeln!(out, "You:    {} ({})", player, player.value())?;
    writeln!(out)
}

pub fn odds(out: &mut impl Write, result: &ProbabilityResult) -> io::Result<()> {
    let analysis = &result.action_analysis;
    writeln!(
        out,
        "Win {:.1}% | Lose {:.1}% | Push {:.1}%",
        result.player_win_probability * 100.0,
        result.dealer_win_probability * 100.0,
        result.push_probability * 100.0
    )?;
    if analysis.can_hit {
        writeln!(
            out,
            "Next card: bust {:.1}%, 21 {:.1}%",
            result.player_bust_probability * 100.0,
            result.player_21_probability * 100.0
        )?;
    }

    let mut rates = vec![format!("stand {:.1}%", analysis.stand_win_rate * 100.0)];
    if analysis.can_hit {
        rates.push(format!("hit {:.1}%", analysis.hit_win_rate * 100.0));
    }
    if analysis.can_double {
        rates.push(format!("double {:.1}%", analysis.double_win_rate * 100.0));
    }
    if analysis.can_split {
        rates.push(format!("split {:.1}%", analysis.split_win_rate * 100.0));
    }
    writeln!(out, "Win rate by action: {}", rates.join(", "))?;
    writeln!(out, "Recommended: {}", analysis.recommended_action)?;

    if analysis.can_double {
        let kelly = &analysis.kelly;
        let advice = if kelly.should_double { "double" } else { "don't double" };
        writeln!(
            out,
            "Kelly: {advice} (fraction {:.3}, ROI {:+.1}%, {} risk)",
            kelly.double_kelly_fraction,
            kelly.double_expected_roi * 100.0,
            kelly.risk_level
        )?;
    }
    writeln!(out)
}

pub fn action_prompt(can_double: bool) -> &'static str {
    if can_double {
        "(h)it (s)tand (d)ouble (q)uit: "
    } else {
        "(h)it (s)tand (q)uit: "
    }
}

pub fn outcome_message(outcome: RoundOutcome) -> &'static str {
    match outcome {
        RoundOutcome::PlayerBust => "You bust. Dealer wins.",
        RoundOutcome::DealerBust => "Dealer busts. You win!",
        RoundOutcome::PlayerBlackjack => "Blackjack! You win!",
        RoundOutcome::DealerBlackjack => "Dealer has blackjack.",
        RoundOutcome::PlayerWin => "You win!",
        RoundOutcome::DealerWin => "Dealer wins.",
        RoundOutcome::Push => "Push.",
    }
}

fn outcome_tag(outcome: RoundOutcome) -> &'static str {
    if outcome.player_won() {
        "WIN"
    } else if outcome == RoundOutcome::Push {
        "PUSH"
    } else {
        "LOSS"
    }
}

pub fn result(out: &mut impl Write, result: &RoundResult) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "[{}] {}",
        outcome_tag(result.outcome),
        outcome_message(result.outcome)
    )?;
    write!(out, "Bet: {}", result.bet)?;
    if result.doubled {
        write!(out, " (doubled)")?;
    }
    writeln!(out)?;
    writeln!(out, "Chips: {}", result.chips)?;
    writeln!(out, "{RULE}")?;
    writeln!(out)
}

pub fn game_over(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Out of chips. Game over!")?;
    writeln!(out)
}
