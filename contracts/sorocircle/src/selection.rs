//! Winner selection policies.
//!
//! Both policies only read round state. The settlement module decides when a
//! round may be settled and applies the result.
//!
//! The random draw hashes ledger time, a value from the host PRNG, and the
//! round index. All three are known to validators before the settling
//! transaction is final, so the draw is only as fair as the least honest
//! participant allows. Pools that need unpredictability should use a
//! verifiable randomness source instead.

use soroban_sdk::{symbol_short, Address, Bytes, Env, Vec};

use crate::errors::ContractError;
use crate::pool;
use crate::storage;
use crate::types::{Bid, Pool, SelectionPolicy};

/// Winner of a round and, for bid pools, the winning priority score.
pub struct Selection {
    pub winner: Address,
    pub winning_bid: Option<i128>,
}

pub fn select_winner(
    env: &Env,
    pool: &Pool,
    funded: &Vec<Address>,
) -> Result<Selection, ContractError> {
    match pool.policy {
        SelectionPolicy::RandomDraw => {
            if funded.is_empty() {
                return Err(ContractError::RoundNotReady);
            }
            let seed = seed_material(
                env,
                env.ledger().timestamp(),
                env.prng().gen::<u64>(),
                pool.current_round,
            );
            let digest = env.crypto().sha256(&seed).to_array();
            let index = draw_index(&digest, funded.len());
            let winner = funded.get(index).ok_or(ContractError::RoundNotReady)?;
            Ok(Selection {
                winner,
                winning_bid: None,
            })
        }
        SelectionPolicy::PriorityBid => {
            let bid =
                storage::get_highest_bid(env, pool.id).ok_or(ContractError::NoBidSubmitted)?;
            Ok(Selection {
                winner: bid.bidder,
                winning_bid: Some(bid.priority),
            })
        }
    }
}

pub fn seed_material(env: &Env, timestamp: u64, chain_seed: u64, round: u32) -> Bytes {
    let mut seed = Bytes::new(env);
    seed.extend_from_array(&timestamp.to_be_bytes());
    seed.extend_from_array(&chain_seed.to_be_bytes());
    seed.extend_from_array(&round.to_be_bytes());
    seed
}

/// Map a digest onto `0..count` using its first eight bytes.
pub fn draw_index(digest: &[u8; 32], count: u32) -> u32 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % count as u64) as u32
}

/// Record a priority score for this round. Returns `true` when the bid is now
/// the highest. A score equal to the current highest leaves the incumbent.
pub fn place_bid(
    env: &Env,
    bidder: Address,
    pool_id: u64,
    priority: i128,
) -> Result<bool, ContractError> {
    bidder.require_auth();

    let pool = pool::get_active_pool(env, pool_id)?;
    if pool.policy != SelectionPolicy::PriorityBid {
        return Err(ContractError::WrongPolicy);
    }

    let state = storage::get_member(env, pool_id, &bidder).ok_or(ContractError::NotMember)?;
    if !state.funded {
        return Err(ContractError::NotFunded);
    }
    if priority <= 0 {
        return Err(ContractError::WrongAmount);
    }

    if let Some(current) = storage::get_highest_bid(env, pool_id) {
        if priority <= current.priority {
            return Ok(false);
        }
    }

    storage::set_highest_bid(
        env,
        pool_id,
        &Bid {
            bidder: bidder.clone(),
            priority,
            placed_at: env.ledger().timestamp(),
        },
    );

    env.events()
        .publish((symbol_short!("bid"),), (pool_id, bidder, priority));

    Ok(true)
}

/// Current highest bid of the round in progress; `NoBidSubmitted` if none.
pub fn get_highest_bid(env: &Env, pool_id: u64) -> Result<Bid, ContractError> {
    pool::get_pool(env, pool_id)?;
    storage::get_highest_bid(env, pool_id).ok_or(ContractError::NoBidSubmitted)
}
