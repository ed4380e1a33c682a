//! Pari-mutuel payout arithmetic.
//!
//! A winning bet gets its stake back plus a share of the losing pools
//! proportional to its weight in the winning pool:
//!
//! ```text
//! payout = stake + floor(stake * losing_total / winning_pool)
//! ```
//!
//! The product `stake * losing_total` is formed at 256-bit width, so it may
//! exceed `i128` as long as the final payout fits.
//!
//! Division floors, so the sum of all winning payouts can fall short of the
//! collected total by at most one token per winning bet. That remainder stays
//! in the contract balance and is never paid to anyone.

use soroban_sdk::{Env, I256};

use crate::types::{Bet, Game, GameState};
use crate::Error;

/// Amount owed to `bet` once `game` is closed.
///
/// - Voided game (`Undecided`): the stake is refunded.
/// - Bet on a losing side: 0.
/// - Bet on the winning side: stake plus its pro-rata share of the losers.
///   If the winning pool were empty the stake alone is returned; a recorded
///   winning bet always contributes to that pool, so this only guards the
///   division.
pub fn payout(env: &Env, game: &Game, bet: &Bet) -> Result<i128, Error> {
    if game.state != GameState::Closed {
        return Err(Error::InvalidState);
    }

    let winner = match game.result.winning_side() {
        Some(side) => side,
        None => return Ok(bet.amount),
    };
    if bet.outcome != winner {
        return Ok(0);
    }

    let winning_pool = game.pool(winner);
    if winning_pool <= 0 {
        return Ok(bet.amount);
    }

    let losing_total = game
        .collected()?
        .checked_sub(winning_pool)
        .ok_or(Error::Overflow)?;

    let share = I256::from_i128(env, bet.amount)
        .mul(&I256::from_i128(env, losing_total))
        .div(&I256::from_i128(env, winning_pool))
        .to_i128()
        .ok_or(Error::Overflow)?;

    bet.amount.checked_add(share).ok_or(Error::Overflow)
}
