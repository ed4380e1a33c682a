//! Beths Payout Contract
//!
//! Pari-mutuel pool on the three-way outcome of a real-world match (team A
//! wins, draw, team B wins). Bettors escrow SEP-41 tokens on one side while a
//! game is open; once the operator closes the game with a result, winners
//! split the losing pools in proportion to their stake.
//!
//! ## Game Flow
//! 1. Operator calls `create_game` → game is `Open`.
//! 2. Bettors call `place_bet` → stake transfers in, pools grow.
//! 3. Operator calls `freeze_game` → no more bets.
//! 4. Operator calls `close_game` with the result → game is `Closed`.
//! 5. Each bettor calls `withdraw` once per bet → payout transfers out.
//!
//! A game closed as `Undecided` is void: every bet withdraws its own stake.
//!
//! ## Invariant
//! For every game, `team_a_total + draw_total + team_b_total` equals the sum
//! of its bets, and `paid_out` never exceeds that sum. Every failed call
//! aborts the invocation, so neither storage nor token balances are left
//! half-updated.
#![no_std]
#![allow(unexpected_cfgs)]

mod settlement;
mod storage;
mod types;

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, token::TokenClient, Address, Env,
    String, Vec,
};

pub use storage::{DataKey, PERSISTENT_BUMP_LEDGERS};
pub use types::{Bet, Game, GameAmounts, GameInfo, GameResult, GameState, Outcome};

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized     = 2,
    Unauthorized       = 3,
    GameNotFound       = 4,
    BetNotFound        = 5,
    InvalidState       = 6,
    InvalidAmount      = 7,
    InvalidOutcome     = 8,
    AlreadyWithdrawn   = 9,
    PayoutExceedsPool  = 10,
    Overflow           = 11,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[contractevent]
pub struct Initialized {
    #[topic]
    pub operator: Address,
    pub token: Address,
}

#[contractevent]
pub struct GameCreated {
    #[topic]
    pub game_id: u64,
    pub team_a: String,
    pub team_b: String,
    pub created_at: u64,
}

#[contractevent]
pub struct GameFrozen {
    #[topic]
    pub game_id: u64,
    pub bet_count: u32,
}

#[contractevent]
pub struct GameClosed {
    #[topic]
    pub game_id: u64,
    pub result: GameResult,
}

#[contractevent]
pub struct BetPlaced {
    #[topic]
    pub game_id: u64,
    #[topic]
    pub bettor: Address,
    pub bet_id: u64,
    pub outcome: Outcome,
    pub amount: i128,
}

#[contractevent]
pub struct PayoutWithdrawn {
    #[topic]
    pub game_id: u64,
    #[topic]
    pub bettor: Address,
    pub bet_id: u64,
    pub amount: i128,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct BethsPayout;

#[contractimpl]
impl BethsPayout {
    // -----------------------------------------------------------------------
    // init
    // -----------------------------------------------------------------------

    /// Initialize the contract. May only be called once.
    ///
    /// `operator` is the only address allowed to create, freeze and close
    /// games; it cannot be changed afterwards. `token` is the SEP-41 contract
    /// every stake and payout moves through.
    pub fn init(env: Env, operator: Address, token: Address) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        operator.require_auth();

        env.storage().instance().set(&DataKey::Operator, &operator);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::NextGameId, &0u64);
        env.storage().instance().set(&DataKey::NextBetId, &0u64);

        Initialized { operator, token }.publish(&env);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Game registry
    // -----------------------------------------------------------------------

    /// Open a new game and return its id. Operator only.
    ///
    /// `created_at` is taken as given, not read from the ledger clock.
    pub fn create_game(
        env: Env,
        operator: Address,
        team_a: String,
        team_b: String,
        description: String,
        created_at: u64,
    ) -> Result<u64, Error> {
        require_initialized(&env)?;
        require_operator(&env, &operator)?;

        let game_id = storage::next_id(&env, DataKey::NextGameId)?;
        let game = Game {
            id: game_id,
            team_a: team_a.clone(),
            team_b: team_b.clone(),
            description,
            created_at,
            state: GameState::Open,
            result: GameResult::Undecided,
            team_a_total: 0,
            draw_total: 0,
            team_b_total: 0,
            bet_count: 0,
            paid_out: 0,
        };
        storage::save_game(&env, &game);

        GameCreated {
            game_id,
            team_a,
            team_b,
            created_at,
        }
        .publish(&env);

        Ok(game_id)
    }

    /// Stop accepting bets on an open game. Operator only.
    pub fn freeze_game(env: Env, operator: Address, game_id: u64) -> Result<(), Error> {
        require_initialized(&env)?;
        require_operator(&env, &operator)?;

        let mut game = storage::load_game(&env, game_id)?;
        if game.state != GameState::Open {
            return Err(Error::InvalidState);
        }

        game.state = GameState::Frozen;
        storage::save_game(&env, &game);

        GameFrozen {
            game_id,
            bet_count: game.bet_count,
        }
        .publish(&env);

        Ok(())
    }

    /// Record the final result of a frozen game. Operator only.
    ///
    /// `result` uses the `GameResult` codes: 0 void, 1 team A, 2 draw,
    /// 3 team B. Closing twice fails with `InvalidState`.
    pub fn close_game(
        env: Env,
        operator: Address,
        game_id: u64,
        result: u32,
    ) -> Result<(), Error> {
        require_initialized(&env)?;
        require_operator(&env, &operator)?;

        let mut game = storage::load_game(&env, game_id)?;
        if game.state != GameState::Frozen {
            return Err(Error::InvalidState);
        }
        let result = GameResult::from_code(result)?;

        game.result = result;
        game.state = GameState::Closed;
        storage::save_game(&env, &game);

        GameClosed { game_id, result }.publish(&env);

        Ok(())
    }

    pub fn get_game_info(env: Env, game_id: u64) -> Result<GameInfo, Error> {
        require_initialized(&env)?;
        Ok(GameInfo::from(&storage::load_game(&env, game_id)?))
    }

    pub fn get_game_state(env: Env, game_id: u64) -> Result<GameState, Error> {
        require_initialized(&env)?;
        Ok(storage::load_game(&env, game_id)?.state)
    }

    /// `Undecided` until the game is closed.
    pub fn get_game_result(env: Env, game_id: u64) -> Result<GameResult, Error> {
        require_initialized(&env)?;
        Ok(storage::load_game(&env, game_id)?.result)
    }

    /// Full stored record, including the running `paid_out` total.
    pub fn get_game(env: Env, game_id: u64) -> Result<Game, Error> {
        require_initialized(&env)?;
        storage::load_game(&env, game_id)
    }

    /// Number of games created so far; ids run from 0 to this value minus one.
    pub fn get_game_count(env: Env) -> Result<u64, Error> {
        require_initialized(&env)?;
        Ok(storage::game_count(&env))
    }

    // -----------------------------------------------------------------------
    // Bet ledger
    // -----------------------------------------------------------------------

    /// Stake `amount` tokens on `outcome` (1 team A, 2 draw, 3 team B) and
    /// return the new bet id.
    ///
    /// The bettor must sign an auth tree covering both this invocation and the
    /// downstream `token.transfer` into the contract.
    pub fn place_bet(
        env: Env,
        bettor: Address,
        game_id: u64,
        outcome: u32,
        amount: i128,
    ) -> Result<u64, Error> {
        require_initialized(&env)?;
        bettor.require_auth();

        let mut game = storage::load_game(&env, game_id)?;
        if game.state != GameState::Open {
            return Err(Error::InvalidState);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let outcome = Outcome::from_code(outcome)?;

        game.add_stake(outcome, amount)?;

        let token = storage::get_token(&env)?;
        TokenClient::new(&env, &token).transfer(&bettor, &env.current_contract_address(), &amount);

        let bet_id = storage::next_id(&env, DataKey::NextBetId)?;
        let bet = Bet {
            id: bet_id,
            game_id,
            bettor: bettor.clone(),
            outcome,
            amount,
            withdrawn: false,
        };
        storage::save_bet(&env, &bet);
        storage::save_game(&env, &game);
        storage::index_bet(&env, &bettor, bet_id);

        BetPlaced {
            game_id,
            bettor,
            bet_id,
            outcome,
            amount,
        }
        .publish(&env);

        Ok(bet_id)
    }

    /// Bet ids placed by `bettor`, oldest first. Empty if none.
    pub fn get_bets_by_address(env: Env, bettor: Address) -> Result<Vec<u64>, Error> {
        require_initialized(&env)?;
        Ok(storage::bets_of(&env, &bettor))
    }

    pub fn get_game_amounts(env: Env, game_id: u64) -> Result<GameAmounts, Error> {
        require_initialized(&env)?;
        Ok(GameAmounts::from(&storage::load_game(&env, game_id)?))
    }

    pub fn get_bet(env: Env, bet_id: u64) -> Result<Bet, Error> {
        require_initialized(&env)?;
        storage::load_bet(&env, bet_id)
    }

    // -----------------------------------------------------------------------
    // Settlement
    // -----------------------------------------------------------------------

    /// What `withdraw` would pay for `bet_id` right now. Read-only.
    ///
    /// Does not look at the `withdrawn` flag; a paid bet still reports the
    /// amount it was paid.
    pub fn compute_payout(env: Env, bet_id: u64) -> Result<i128, Error> {
        require_initialized(&env)?;
        let bet = storage::load_bet(&env, bet_id)?;
        let game = storage::load_game(&env, bet.game_id)?;
        settlement::payout(&env, &game, &bet)
    }

    /// Pay out `bet_id` to its bettor and return the amount paid.
    ///
    /// Succeeds at most once per bet. A losing bet withdraws 0 and is still
    /// marked as withdrawn. All accounting state is written before the
    /// external `token.transfer`; if the transfer traps the whole invocation
    /// is rolled back.
    pub fn withdraw(env: Env, bettor: Address, bet_id: u64) -> Result<i128, Error> {
        require_initialized(&env)?;
        bettor.require_auth();

        let mut bet = storage::load_bet(&env, bet_id)?;
        if bet.bettor != bettor {
            return Err(Error::Unauthorized);
        }
        if bet.withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }

        let mut game = storage::load_game(&env, bet.game_id)?;
        let amount = settlement::payout(&env, &game, &bet)?;

        let paid_out = game.paid_out.checked_add(amount).ok_or(Error::Overflow)?;
        if paid_out > game.collected()? {
            return Err(Error::PayoutExceedsPool);
        }

        bet.withdrawn = true;
        game.paid_out = paid_out;
        storage::save_bet(&env, &bet);
        storage::save_game(&env, &game);

        if amount > 0 {
            let token = storage::get_token(&env)?;
            TokenClient::new(&env, &token).transfer(
                &env.current_contract_address(),
                &bettor,
                &amount,
            );
        }

        PayoutWithdrawn {
            game_id: bet.game_id,
            bettor,
            bet_id,
            amount,
        }
        .publish(&env);

        Ok(amount)
    }

    // -----------------------------------------------------------------------
    // Config
    // -----------------------------------------------------------------------

    pub fn get_operator(env: Env) -> Result<Address, Error> {
        storage::get_operator(&env)
    }

    pub fn get_token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn require_initialized(env: &Env) -> Result<(), Error> {
    if !storage::is_initialized(env) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

/// Verify that `caller` is the stored operator and has signed the invocation.
fn require_operator(env: &Env, caller: &Address) -> Result<(), Error> {
    let operator = storage::get_operator(env)?;
    caller.require_auth();
    if caller != &operator {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
