use soroban_sdk::{log, symbol_short, Address, Env, Vec};

use crate::custody;
use crate::errors::ContractError;
use crate::pool;
use crate::selection;
use crate::storage;
use crate::types::{MemberState, Pool, PoolPhase, PoolStatus, RoundRecord, SelectionPolicy};

/// Whether the current round may settle now.
///
/// Every member must have funded the round. Bid pools additionally wait for
/// the round deadline so that every member has had a chance to bid.
pub fn is_ready(env: &Env, pool: &Pool) -> bool {
    if pool.status != PoolStatus::Active || pool.current_round >= pool.target_members {
        return false;
    }
    if !pool.is_full() || pool.funded_count < pool.target_members {
        return false;
    }
    match pool.policy {
        SelectionPolicy::RandomDraw => true,
        SelectionPolicy::PriorityBid => env.ledger().timestamp() >= pool.next_deadline,
    }
}

/// Random-draw pools settle in the same call that completes their funding.
pub(crate) fn settle_if_ready(env: &Env, pool: Pool) -> Result<(), ContractError> {
    if pool.policy == SelectionPolicy::RandomDraw && is_ready(env, &pool) {
        settle_round(env, pool)
    } else {
        Ok(())
    }
}

pub fn settle(env: &Env, pool_id: u64) -> Result<(), ContractError> {
    let pool = pool::get_active_pool(env, pool_id)?;
    if !is_ready(env, &pool) {
        return Err(ContractError::RoundNotReady);
    }
    settle_round(env, pool)
}

fn settle_round(env: &Env, mut pool: Pool) -> Result<(), ContractError> {
    let round = pool.current_round;
    if storage::has_round(env, pool.id, round) {
        return Err(ContractError::AlreadySettled);
    }

    // Taken before any per-round state is cleared; the resets below walk this
    // copy, not the live pool.
    let snapshot = pool.members.clone();
    let mut funded = Vec::new(env);
    for member in snapshot.iter() {
        let is_funded = storage::get_member(env, pool.id, &member)
            .map(|state| state.funded)
            .unwrap_or(false);
        if is_funded {
            funded.push_back(member);
        }
    }

    let selection = selection::select_winner(env, &pool, &funded)?;
    let payout = pool.pot();
    custody::debit(env, pool.id, payout)?;

    let now = env.ledger().timestamp();
    storage::set_round(
        env,
        pool.id,
        &RoundRecord {
            round,
            winner: selection.winner.clone(),
            payout,
            winning_bid: selection.winning_bid,
            settled_at: now,
        },
    );

    for member in snapshot.iter() {
        storage::set_member(env, pool.id, &member, &MemberState::default());
    }

    pool.funded_count = 0;
    storage::remove_highest_bid(env, pool.id);
    pool.current_round += 1;
    pool.next_deadline += pool::round_duration_secs(pool.duration_days)?;
    if pool.current_round >= pool.target_members {
        pool.status = PoolStatus::Completed;
    }
    storage::set_pool(env, &pool);

    log!(env, "round settled", pool.id, round, payout);
    env.events().publish(
        (symbol_short!("rnd_settl"),),
        (pool.id, round, selection.winner.clone(), payout),
    );
    if pool.status == PoolStatus::Completed {
        env.events()
            .publish((symbol_short!("pool_done"),), pool.id);
    }

    // Last effect: nothing above may depend on the recipient's behaviour.
    custody::transfer_out(env, &pool.token, &selection.winner, payout)
}

/// Captain-only early termination of a bid pool. Refunds each member's
/// deposit for the round in progress and returns the total refunded.
pub fn abandon(env: &Env, captain: Address, pool_id: u64) -> Result<i128, ContractError> {
    captain.require_auth();

    let mut pool = pool::get_active_pool(env, pool_id)?;
    if pool.policy != SelectionPolicy::PriorityBid {
        return Err(ContractError::WrongPolicy);
    }
    if captain != pool.captain {
        return Err(ContractError::Unauthorized);
    }

    let snapshot = pool.members.clone();
    let mut refunds: Vec<(Address, i128)> = Vec::new(env);
    let mut total: i128 = 0;
    for member in snapshot.iter() {
        if let Some(state) = storage::get_member(env, pool_id, &member) {
            if state.deposited > 0 {
                total += state.deposited;
                refunds.push_back((member.clone(), state.deposited));
            }
            storage::set_member(env, pool_id, &member, &MemberState::default());
        }
    }
    custody::debit(env, pool_id, total)?;

    pool.status = PoolStatus::Terminated;
    pool.funded_count = 0;
    storage::remove_highest_bid(env, pool.id);
    storage::set_pool(env, &pool);

    log!(env, "pool terminated", pool_id, total);
    env.events()
        .publish((symbol_short!("pool_term"),), (pool_id, total));

    for (member, amount) in refunds.iter() {
        custody::transfer_out(env, &pool.token, &member, amount)?;
    }

    Ok(total)
}

pub fn get_phase(env: &Env, pool_id: u64) -> Result<PoolPhase, ContractError> {
    let pool = pool::get_pool(env, pool_id)?;
    Ok(match pool.status {
        PoolStatus::Completed => PoolPhase::Completed,
        PoolStatus::Terminated => PoolPhase::Terminated,
        PoolStatus::Active if is_ready(env, &pool) => PoolPhase::ReadyToSettle(pool.current_round),
        PoolStatus::Active => PoolPhase::Collecting(pool.current_round),
    })
}

pub fn get_round(env: &Env, pool_id: u64, round: u32) -> Result<RoundRecord, ContractError> {
    pool::get_pool(env, pool_id)?;
    storage::get_round(env, pool_id, round).ok_or(ContractError::NotFound)
}

pub fn get_round_winner(env: &Env, pool_id: u64, round: u32) -> Result<Address, ContractError> {
    Ok(get_round(env, pool_id, round)?.winner)
}
