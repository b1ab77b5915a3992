use soroban_sdk::{symbol_short, Address, Env};

use crate::errors::ContractError;
use crate::storage;
use crate::types::Config;

/// Upper bound on `max_pool_members`. Settlement walks every member of a
/// pool in one invocation, which has to fit the host's resource budget.
pub const MAX_POOL_MEMBERS_LIMIT: u32 = 100;

pub fn initialize(env: &Env, admin: &Address, max_pool_members: u32) -> Result<(), ContractError> {
    let config = Config { max_pool_members };
    validate(&config)?;
    storage::set_admin(env, admin);
    storage::set_config(env, &config);
    Ok(())
}

pub fn get_config(env: &Env) -> Result<Config, ContractError> {
    storage::get_config(env).ok_or(ContractError::NotInitialized)
}

pub fn update_config(env: &Env, admin: Address, config: Config) -> Result<(), ContractError> {
    admin.require_auth();

    let current_admin = storage::get_admin(env).ok_or(ContractError::NotInitialized)?;
    if admin != current_admin {
        return Err(ContractError::Unauthorized);
    }
    validate(&config)?;

    storage::set_config(env, &config);

    env.events()
        .publish((symbol_short!("cfg_upd"),), config.max_pool_members);

    Ok(())
}

pub fn set_admin(env: &Env, current_admin: Address, new_admin: Address) -> Result<(), ContractError> {
    current_admin.require_auth();

    let admin = storage::get_admin(env).ok_or(ContractError::NotInitialized)?;
    if current_admin != admin {
        return Err(ContractError::Unauthorized);
    }

    storage::set_admin(env, &new_admin);

    env.events()
        .publish((symbol_short!("adm_chng"),), new_admin);

    Ok(())
}

fn validate(config: &Config) -> Result<(), ContractError> {
    if config.max_pool_members < 2 || config.max_pool_members > MAX_POOL_MEMBERS_LIMIT {
        return Err(ContractError::InvalidParameters);
    }
    Ok(())
}
