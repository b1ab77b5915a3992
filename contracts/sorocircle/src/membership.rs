use soroban_sdk::{symbol_short, Address, Env};

use crate::custody;
use crate::errors::ContractError;
use crate::pool;
use crate::settlement;
use crate::storage;
use crate::types::{MemberState, Pool};

pub fn join(env: &Env, member: Address, pool_id: u64, amount: i128) -> Result<(), ContractError> {
    member.require_auth();

    let pool = pool::get_active_pool(env, pool_id)?;
    admit(env, pool, member, amount)
}

/// Add `member` to `pool`, taking their first contribution. A deposit made at
/// admission funds whatever round the pool is currently collecting.
pub(crate) fn admit(
    env: &Env,
    mut pool: Pool,
    member: Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount != pool.contribution_amount {
        return Err(ContractError::WrongAmount);
    }
    if pool.is_full() {
        return Err(ContractError::Full);
    }
    if storage::has_member(env, pool.id, &member) {
        return Err(ContractError::AlreadyMember);
    }

    custody::deposit(env, pool.id, &pool.token, &member, amount)?;

    pool.members.push_back(member.clone());
    pool.funded_count += 1;
    storage::set_member(
        env,
        pool.id,
        &member,
        &MemberState {
            funded: true,
            deposited: amount,
        },
    );
    storage::set_pool(env, &pool);
    storage::add_member_pool(env, &member, pool.id);

    env.events()
        .publish((symbol_short!("mbr_join"),), (pool.id, member, amount));

    settlement::settle_if_ready(env, pool)
}

/// Pay this round's contribution as an existing member.
pub fn fund(env: &Env, member: Address, pool_id: u64, amount: i128) -> Result<(), ContractError> {
    member.require_auth();

    let mut pool = pool::get_active_pool(env, pool_id)?;
    let mut state = storage::get_member(env, pool_id, &member).ok_or(ContractError::NotMember)?;

    if amount != pool.contribution_amount {
        return Err(ContractError::WrongAmount);
    }
    if state.funded {
        return Err(ContractError::AlreadyFunded);
    }

    custody::deposit(env, pool_id, &pool.token, &member, amount)?;

    state.funded = true;
    state.deposited += amount;
    pool.funded_count += 1;
    storage::set_member(env, pool_id, &member, &state);
    storage::set_pool(env, &pool);

    env.events()
        .publish((symbol_short!("funded"),), (pool_id, member, amount));

    settlement::settle_if_ready(env, pool)
}

pub fn get_member_state(
    env: &Env,
    pool_id: u64,
    member: Address,
) -> Result<MemberState, ContractError> {
    pool::get_pool(env, pool_id)?;
    storage::get_member(env, pool_id, &member).ok_or(ContractError::NotMember)
}

pub fn get_contribution(env: &Env, pool_id: u64, member: Address) -> Result<i128, ContractError> {
    Ok(get_member_state(env, pool_id, member)?.deposited)
}

pub fn is_member(env: &Env, pool_id: u64, member: Address) -> Result<bool, ContractError> {
    pool::get_pool(env, pool_id)?;
    Ok(storage::has_member(env, pool_id, &member))
}
