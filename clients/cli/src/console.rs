//! Line-oriented game loop over any reader/writer pair.

use std::io::{self, BufRead, Write};

use blackjack::{Game, GamePhase, Player, ProbabilityCalculator};
use log::debug;
use thiserror::Error;

use crate::display;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("game error: {0}")]
    Game(#[from] blackjack::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hit,
    Stand,
    Double,
    Quit,
}

pub fn parse_command(input: &str) -> Option<Command> {
    match input.trim().to_lowercase().as_str() {
        "h" | "hit" => Some(Command::Hit),
        "s" | "stand" => Some(Command::Stand),
        "d" | "double" | "dd" => Some(Command::Double),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

/// Where to go after a round or a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Menu,
    Exit,
}

pub struct Console<I, O> {
    game: Game,
    calculator: Option<ProbabilityCalculator>,
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(game: Game, calculator: Option<ProbabilityCalculator>, input: I, output: O) -> Self {
        Self {
            game,
            calculator,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[cfg(test)]
    pub fn into_output(self) -> O {
        self.output
    }

    /// Main menu loop. Returns when the player exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        display::welcome(&mut self.output)?;
        loop {
            display::menu(&mut self.output)?;
            let Some(choice) = self.read_line("Choose an option: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => {
                    if self.play_game()? == Flow::Exit {
                        break;
                    }
                }
                "2" => display::rules(&mut self.output, &self.game.rules)?,
                "3" => break,
                _ => display::error(&mut self.output, "Invalid choice, try again")?,
            }
        }
        display::goodbye(&mut self.output)?;
        self.output.flush()?;
        Ok(())
    }

    /// Trimmed next line, or `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn play_game(&mut self) -> Result<Flow> {
        if self.game.is_over() {
            self.game.player = Player::new(self.game.rules.starting_chips);
            writeln!(self.output, "New bankroll: {} chips", self.game.player.chips)?;
        }

        loop {
            match self.play_round()? {
                Flow::Continue => {}
                flow => return Ok(flow),
            }

            if self.game.is_over() {
                display::game_over(&mut self.output)?;
                return Ok(Flow::Menu);
            }

            match self.read_line("Play another round? (y/n): ")? {
                None => return Ok(Flow::Exit),
                Some(answer) if matches!(answer.to_lowercase().as_str(), "y" | "yes") => {}
                Some(_) => return Ok(Flow::Menu),
            }
        }
    }

    fn play_round(&mut self) -> Result<Flow> {
        self.game.start_round()?;
        let upcoming = self.game.round() + 1;
        display::round_start(&mut self.output, upcoming, self.game.player.chips)?;

        match self.take_bet()? {
            Flow::Continue => {}
            flow => return Ok(flow),
        }

        self.game.deal_initial()?;
        if self.player_turn()? == Flow::Exit {
            return Ok(Flow::Exit);
        }

        self.game.dealer_play()?;
        writeln!(self.output, "Dealer reveals:")?;
        display::table(&mut self.output, &self.game.player.hand, &self.game.dealer, true)?;

        let result = self.game.settle()?;
        display::result(&mut self.output, &result)?;
        Ok(Flow::Continue)
    }

    fn take_bet(&mut self) -> Result<Flow> {
        let options = self.game.bet_options();
        let recommendation = self.game.betting_recommendation();
        display::bet_options(&mut self.output, &options, &recommendation)?;

        loop {
            let Some(input) = self.read_line("Choose a bet (number, or q to leave): ")? else {
                return Ok(Flow::Exit);
            };
            if input.eq_ignore_ascii_case("q") {
                return Ok(Flow::Menu);
            }

            let amount = input
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i).copied());
            let Some(amount) = amount else {
                display::error(&mut self.output, "Enter one of the listed numbers")?;
                continue;
            };

            match self.game.place_bet(amount) {
                Ok(()) => {
                    writeln!(self.output, "Bet placed: {amount} chips")?;
                    writeln!(self.output)?;
                    return Ok(Flow::Continue);
                }
                Err(e) => display::error(&mut self.output, &e.to_string())?,
            }
        }
    }

    /// Runs until the turn passes to the dealer.
    fn player_turn(&mut self) -> Result<Flow> {
        while self.game.phase() == GamePhase::PlayerTurn {
            display::table(&mut self.output, &self.game.player.hand, &self.game.dealer, false)?;
            if let Some(calculator) = self.calculator.as_mut() {
                if let Some(result) = self.game.win_probabilities(calculator) {
                    display::odds(&mut self.output, &result)?;
                }
            }

            if self.game.player.hand.is_blackjack() {
                writeln!(self.output, "Blackjack!")?;
                self.game.stand()?;
                break;
            }

            let can_double = self.game.can_double();
            let Some(input) = self.read_line(display::action_prompt(can_double))? else {
                return Ok(Flow::Exit);
            };
            let Some(command) = parse_command(&input) else {
                display::error(&mut self.output, "Invalid input, try again")?;
                continue;
            };
            debug!("round {}: {:?}", self.game.round(), command);

            match command {
                Command::Hit => {
                    let card = self.game.hit()?;
                    writeln!(self.output, "You draw {card}")?;
                    if self.game.player.hand.is_busted() {
                        writeln!(self.output, "Bust!")?;
                    }
                }
                Command::Stand => {
                    self.game.stand()?;
                    writeln!(self.output, "You stand")?;
                }
                Command::Double if can_double => {
                    let card = self.game.double_down()?;
                    writeln!(self.output, "You double down and draw {card}")?;
                }
                Command::Double => display::error(&mut self.output, "You can't double now")?,
                Command::Quit => return Ok(Flow::Exit),
            }
        }
        Ok(Flow::Continue)
    }
}
