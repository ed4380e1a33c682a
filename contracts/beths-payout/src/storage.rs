//! Storage layout and typed accessors.
//!
//! - `instance()`: Operator, Token and the two id counters. Small, fixed-size
//!   config that shares one ledger entry and TTL.
//! - `persistent()`: one entry per game, per bet and per bettor index, each
//!   bumped on write so active games never expire mid-round.

use soroban_sdk::{contracttype, Address, Env, IntoVal, Val, Vec};

use crate::types::{Bet, Game};
use crate::Error;

/// Persistent storage TTL in ledgers (~30 days at 5 s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() ---
    Operator,
    Token,
    NextGameId,
    NextBetId,
    // --- persistent() ---
    Game(u64),
    Bet(u64),
    /// Bet ids placed by one address, oldest first.
    BettorBets(Address),
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Operator)
}

pub fn get_operator(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Operator)
        .ok_or(Error::NotInitialized)
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn game_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::NextGameId)
        .unwrap_or(0)
}

/// Hand out the next id for `counter` and advance it.
pub fn next_id(env: &Env, counter: DataKey) -> Result<u64, Error> {
    let id: u64 = env.storage().instance().get(&counter).unwrap_or(0);
    let next = id.checked_add(1).ok_or(Error::Overflow)?;
    env.storage().instance().set(&counter, &next);
    Ok(id)
}

pub fn load_game(env: &Env, game_id: u64) -> Result<Game, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Game(game_id))
        .ok_or(Error::GameNotFound)
}

pub fn save_game(env: &Env, game: &Game) {
    set_persistent(env, DataKey::Game(game.id), game);
}

pub fn load_bet(env: &Env, bet_id: u64) -> Result<Bet, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Bet(bet_id))
        .ok_or(Error::BetNotFound)
}

pub fn save_bet(env: &Env, bet: &Bet) {
    set_persistent(env, DataKey::Bet(bet.id), bet);
}

pub fn bets_of(env: &Env, bettor: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::BettorBets(bettor.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn index_bet(env: &Env, bettor: &Address, bet_id: u64) {
    let mut ids = bets_of(env, bettor);
    ids.push_back(bet_id);
    set_persistent(env, DataKey::BettorBets(bettor.clone()), &ids);
}

fn set_persistent<T>(env: &Env, key: DataKey, value: &T)
where
    T: IntoVal<Env, Val>,
{
    env.storage().persistent().set(&key, value);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}
