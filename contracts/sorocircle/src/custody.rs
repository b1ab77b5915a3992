//! Per-pool escrow. The contract holds every pool's tokens in one account,
//! so each pool's share is tracked as a ledger entry next to the token
//! balance. Inbound transfers credit the entry; outbound ones debit it.

use soroban_sdk::{Address, Env};

use crate::errors::ContractError;
use crate::storage;

/// Pull `amount` from `from` into the contract and credit the pool's escrow.
pub fn deposit(
    env: &Env,
    pool_id: u64,
    token: &Address,
    from: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    let balance = storage::get_escrow(env, pool_id)
        .checked_add(amount)
        .ok_or(ContractError::InvalidParameters)?;

    let token_client = soroban_sdk::token::Client::new(env, token);
    token_client.transfer(from, &env.current_contract_address(), &amount);

    storage::set_escrow(env, pool_id, balance);
    Ok(())
}

/// Debit the pool's escrow ahead of a transfer out. Never lets it go negative:
/// a shortfall means the escrow entry disagrees with the recorded deposits.
pub fn debit(env: &Env, pool_id: u64, amount: i128) -> Result<(), ContractError> {
    let balance = storage::get_escrow(env, pool_id);
    if amount > balance {
        return Err(ContractError::EscrowShortfall);
    }
    storage::set_escrow(env, pool_id, balance - amount);
    Ok(())
}

/// Send already-debited funds out of the contract.
///
/// A failing token call surfaces as `PayoutTransferFailed`; returning it
/// from the entrypoint rolls back the bookkeeping done before the call.
pub fn transfer_out(
    env: &Env,
    token: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    let token_client = soroban_sdk::token::Client::new(env, token);
    match token_client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::PayoutTransferFailed),
    }
}

pub fn balance(env: &Env, pool_id: u64) -> i128 {
    storage::get_escrow(env, pool_id)
}
