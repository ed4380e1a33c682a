//! Records and enums shared by the registry, the ledger and settlement.

use soroban_sdk::{contracttype, Address, String};

use crate::Error;

/// Lifecycle of a game. Only ever moves forward: Open -> Frozen -> Closed.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameState {
    Open = 0,
    Frozen = 1,
    Closed = 2,
}

/// Final result recorded when a game is closed.
///
/// `Undecided` on a closed game means the match was voided and every stake
/// is refunded.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameResult {
    Undecided = 0,
    TeamAWin = 1,
    Draw = 2,
    TeamBWin = 3,
}

/// Side a bettor picks. Codes line up with the matching `GameResult`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    TeamA = 1,
    Draw = 2,
    TeamB = 3,
}

impl Outcome {
    pub fn from_code(code: u32) -> Result<Self, Error> {
        match code {
            1 => Ok(Outcome::TeamA),
            2 => Ok(Outcome::Draw),
            3 => Ok(Outcome::TeamB),
            _ => Err(Error::InvalidOutcome),
        }
    }
}

impl GameResult {
    pub fn from_code(code: u32) -> Result<Self, Error> {
        match code {
            0 => Ok(GameResult::Undecided),
            1 => Ok(GameResult::TeamAWin),
            2 => Ok(GameResult::Draw),
            3 => Ok(GameResult::TeamBWin),
            _ => Err(Error::InvalidOutcome),
        }
    }

    /// The side whose bettors share the pot, or `None` for a voided game.
    pub fn winning_side(&self) -> Option<Outcome> {
        match self {
            GameResult::Undecided => None,
            GameResult::TeamAWin => Some(Outcome::TeamA),
            GameResult::Draw => Some(Outcome::Draw),
            GameResult::TeamBWin => Some(Outcome::TeamB),
        }
    }
}

/// Full game record as stored under `DataKey::Game(id)`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Game {
    pub id: u64,
    pub team_a: String,
    pub team_b: String,
    pub description: String,
    pub created_at: u64,
    pub state: GameState,
    pub result: GameResult,
    pub team_a_total: i128,
    pub draw_total: i128,
    pub team_b_total: i128,
    pub bet_count: u32,
    /// Sum of every payout already transferred for this game's bets.
    pub paid_out: i128,
}

impl Game {
    pub fn pool(&self, side: Outcome) -> i128 {
        match side {
            Outcome::TeamA => self.team_a_total,
            Outcome::Draw => self.draw_total,
            Outcome::TeamB => self.team_b_total,
        }
    }

    /// Total stake collected across the three pools.
    pub fn collected(&self) -> Result<i128, Error> {
        self.team_a_total
            .checked_add(self.draw_total)
            .and_then(|v| v.checked_add(self.team_b_total))
            .ok_or(Error::Overflow)
    }

    pub(crate) fn add_stake(&mut self, side: Outcome, amount: i128) -> Result<(), Error> {
        let pool = match side {
            Outcome::TeamA => &mut self.team_a_total,
            Outcome::Draw => &mut self.draw_total,
            Outcome::TeamB => &mut self.team_b_total,
        };
        *pool = pool.checked_add(amount).ok_or(Error::Overflow)?;
        self.bet_count = self.bet_count.checked_add(1).ok_or(Error::Overflow)?;
        Ok(())
    }
}

/// A single stake. Only `withdrawn` ever changes after placement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bet {
    pub id: u64,
    pub game_id: u64,
    pub bettor: Address,
    pub outcome: Outcome,
    pub amount: i128,
    pub withdrawn: bool,
}

/// Descriptive fields of a game returned by `get_game_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameInfo {
    pub team_a: String,
    pub team_b: String,
    pub description: String,
    pub state: GameState,
    pub created_at: u64,
}

/// Pool totals of a game returned by `get_game_amounts`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameAmounts {
    pub team_a_total: i128,
    pub draw_total: i128,
    pub team_b_total: i128,
    pub bet_count: u32,
    pub created_at: u64,
}

impl From<&Game> for GameInfo {
    fn from(game: &Game) -> Self {
        GameInfo {
            team_a: game.team_a.clone(),
            team_b: game.team_b.clone(),
            description: game.description.clone(),
            state: game.state,
            created_at: game.created_at,
        }
    }
}

impl From<&Game> for GameAmounts {
    fn from(game: &Game) -> Self {
        GameAmounts {
            team_a_total: game.team_a_total,
            draw_total: game.draw_total,
            team_b_total: game.team_b_total,
            bet_count: game.bet_count,
            created_at: game.created_at,
        }
    }
}
