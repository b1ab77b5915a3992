use soroban_sdk::{symbol_short, Address, Env, String, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::membership;
use crate::storage;
use crate::types::{Pool, PoolStatus, SelectionPolicy};

pub const SECONDS_PER_DAY: u64 = 86_400;

#[allow(clippy::too_many_arguments)]
pub fn create_pool(
    env: &Env,
    creator: Address,
    name: String,
    token: Address,
    policy: SelectionPolicy,
    contribution_amount: i128,
    target_members: u32,
    duration_days: u64,
) -> Result<u64, ContractError> {
    creator.require_auth();

    let config = admin::get_config(env)?;

    if name.len() == 0 || contribution_amount <= 0 || duration_days == 0 {
        return Err(ContractError::InvalidParameters);
    }
    if target_members < 2 || target_members > config.max_pool_members {
        return Err(ContractError::InvalidParameters);
    }
    // Every round pays out the full pot and pushes the deadline forward, so
    // both must stay representable for the whole life of the pool.
    contribution_amount
        .checked_mul(target_members as i128)
        .ok_or(ContractError::InvalidParameters)?;
    let round_secs = round_duration_secs(duration_days)?;
    let now = env.ledger().timestamp();
    round_secs
        .checked_mul(target_members as u64)
        .and_then(|total| total.checked_add(now))
        .ok_or(ContractError::InvalidParameters)?;

    let pool_id = storage::get_pool_counter(env) + 1;
    storage::set_pool_counter(env, pool_id);

    let pool = Pool {
        id: pool_id,
        name,
        captain: creator.clone(),
        token,
        policy,
        contribution_amount,
        target_members,
        duration_days,
        created_at: now,
        next_deadline: now + round_secs,
        current_round: 0,
        status: PoolStatus::Active,
        members: Vec::new(env),
        funded_count: 0,
    };
    storage::set_pool(env, &pool);

    env.events()
        .publish((symbol_short!("pool_new"),), (pool_id, creator.clone(), policy));

    // The captain of a bid pool is its first member and pays in like everyone else.
    if policy == SelectionPolicy::PriorityBid {
        membership::admit(env, pool, creator, contribution_amount)?;
    }

    Ok(pool_id)
}

pub fn get_pool(env: &Env, pool_id: u64) -> Result<Pool, ContractError> {
    storage::get_pool(env, pool_id).ok_or(ContractError::NotFound)
}

/// Load a pool that still accepts state changes.
pub fn get_active_pool(env: &Env, pool_id: u64) -> Result<Pool, ContractError> {
    let pool = get_pool(env, pool_id)?;
    if pool.status != PoolStatus::Active {
        return Err(ContractError::NotActive);
    }
    Ok(pool)
}

pub fn get_members(env: &Env, pool_id: u64) -> Result<Vec<Address>, ContractError> {
    Ok(get_pool(env, pool_id)?.members)
}

pub fn get_member_pools(env: &Env, member: Address) -> Vec<u64> {
    storage::get_member_pools(env, &member)
}

pub fn pool_count(env: &Env) -> u64 {
    storage::get_pool_counter(env)
}

pub fn round_duration_secs(duration_days: u64) -> Result<u64, ContractError> {
    duration_days
        .checked_mul(SECONDS_PER_DAY)
        .ok_or(ContractError::InvalidParameters)
}
