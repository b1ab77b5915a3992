#![no_std]

//! Rotating savings pools.
//!
//! A pool of fixed size collects a fixed contribution from every member each
//! round and pays the whole pot to one member, for as many rounds as it has
//! members. Recipients are picked either by a random draw or by the highest
//! priority bid of the round.

use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env, String, Vec};

mod admin;
mod custody;
mod errors;
mod membership;
mod pool;
mod selection;
mod settlement;
mod storage;
mod types;

pub use errors::ContractError;
pub use types::*;

#[contract]
pub struct SoroCircleContract;

#[contractimpl]
impl SoroCircleContract {
    /// Initialize the protocol with an admin and the largest pool size allowed.
    pub fn __constructor(env: Env, admin: Address, max_pool_members: u32) {
        if let Err(err) = admin::initialize(&env, &admin, max_pool_members) {
            panic_with_error!(&env, err);
        }
    }

    // ─── Pool Registry ──────────────────────────────────────────────

    /// Create a pool. Bid pools admit the creator as first member and captain,
    /// so the creator pays the first contribution here.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pool(
        env: Env,
        creator: Address,
        name: String,
        token: Address,
        policy: SelectionPolicy,
        contribution_amount: i128,
        target_members: u32,
        duration_days: u64,
    ) -> Result<u64, ContractError> {
        pool::create_pool(
            &env,
            creator,
            name,
            token,
            policy,
            contribution_amount,
            target_members,
            duration_days,
        )
    }

    /// Get pool details.
    pub fn get_pool(env: Env, pool_id: u64) -> Result<Pool, ContractError> {
        pool::get_pool(&env, pool_id)
    }

    /// Members in admission order.
    pub fn get_members(env: Env, pool_id: u64) -> Result<Vec<Address>, ContractError> {
        pool::get_members(&env, pool_id)
    }

    /// Get all pool IDs a member belongs to.
    pub fn get_member_pools(env: Env, member: Address) -> Vec<u64> {
        pool::get_member_pools(&env, member)
    }

    /// Number of pools created so far; also the most recent pool ID.
    pub fn pool_count(env: Env) -> u64 {
        pool::pool_count(&env)
    }

    // ─── Membership ─────────────────────────────────────────────────

    /// Join a pool, paying exactly one contribution. In a random-draw pool the
    /// join that fills the round also settles it.
    pub fn join(env: Env, member: Address, pool_id: u64, amount: i128) -> Result<(), ContractError> {
        membership::join(&env, member, pool_id, amount)
    }

    /// Pay the current round's contribution as an existing member.
    pub fn fund(env: Env, member: Address, pool_id: u64, amount: i128) -> Result<(), ContractError> {
        membership::fund(&env, member, pool_id, amount)
    }

    /// Amount a member has deposited for the round in progress.
    pub fn get_contribution(env: Env, pool_id: u64, member: Address) -> Result<i128, ContractError> {
        membership::get_contribution(&env, pool_id, member)
    }

    /// Funding state of a member for the round in progress.
    pub fn get_member_state(
        env: Env,
        pool_id: u64,
        member: Address,
    ) -> Result<MemberState, ContractError> {
        membership::get_member_state(&env, pool_id, member)
    }

    /// Check if an address has been admitted to a pool.
    pub fn is_member(env: Env, pool_id: u64, member: Address) -> Result<bool, ContractError> {
        membership::is_member(&env, pool_id, member)
    }

    // ─── Bidding ────────────────────────────────────────────────────

    /// Submit a priority score for the current round. The score ranks bidders
    /// and is never charged. Returns whether it is now the highest.
    pub fn place_bid(
        env: Env,
        bidder: Address,
        pool_id: u64,
        priority: i128,
    ) -> Result<bool, ContractError> {
        selection::place_bid(&env, bidder, pool_id, priority)
    }

    /// Get the current round's highest bid. Fails with `NoBidSubmitted` if none.
    pub fn get_highest_bid(env: Env, pool_id: u64) -> Result<Bid, ContractError> {
        selection::get_highest_bid(&env, pool_id)
    }

    // ─── Settlement ─────────────────────────────────────────────────

    /// Pay the current round's pot to its winner and open the next round.
    /// Anyone can call this once the round is ready.
    pub fn settle(env: Env, pool_id: u64) -> Result<(), ContractError> {
        settlement::settle(&env, pool_id)
    }

    /// Terminate a bid pool early, refunding current-round deposits.
    pub fn abandon(env: Env, captain: Address, pool_id: u64) -> Result<i128, ContractError> {
        settlement::abandon(&env, captain, pool_id)
    }

    /// Where the pool stands in its settlement cycle.
    pub fn get_phase(env: Env, pool_id: u64) -> Result<PoolPhase, ContractError> {
        settlement::get_phase(&env, pool_id)
    }

    /// Get the record of a settled round.
    pub fn get_round(env: Env, pool_id: u64, round: u32) -> Result<RoundRecord, ContractError> {
        settlement::get_round(&env, pool_id, round)
    }

    /// Get the recipient of a settled round.
    pub fn get_round_winner(env: Env, pool_id: u64, round: u32) -> Result<Address, ContractError> {
        settlement::get_round_winner(&env, pool_id, round)
    }

    /// Funds held for a pool and not yet paid out.
    pub fn get_escrow_balance(env: Env, pool_id: u64) -> Result<i128, ContractError> {
        pool::get_pool(&env, pool_id)?;
        Ok(custody::balance(&env, pool_id))
    }

    // ─── Admin ──────────────────────────────────────────────────────

    /// Get the protocol configuration.
    pub fn get_config(env: Env) -> Result<Config, ContractError> {
        admin::get_config(&env)
    }

    /// Replace the protocol configuration. Only the protocol admin can call this.
    pub fn update_config(env: Env, admin: Address, config: Config) -> Result<(), ContractError> {
        admin::update_config(&env, admin, config)
    }

    /// Transfer the protocol admin role.
    pub fn set_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        admin::set_admin(&env, current_admin, new_admin)
    }
}

#[cfg(test)]
mod test_bid;
