use soroban_sdk::{Address, Env, Vec};

use crate::types::{Bid, Config, DataKey, MemberState, Pool, RoundRecord};

const INSTANCE_TTL_THRESHOLD: u32 = 100;
const INSTANCE_TTL_EXTEND: u32 = 500;
const PERSISTENT_TTL_THRESHOLD: u32 = 100;
const PERSISTENT_TTL_EXTEND: u32 = 1000;

// --- Admin / Config ---

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

pub fn get_config(env: &Env) -> Option<Config> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// --- Pool Counter ---

pub fn get_pool_counter(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::PoolCounter)
        .unwrap_or(0)
}

pub fn set_pool_counter(env: &Env, counter: u64) {
    env.storage()
        .instance()
        .set(&DataKey::PoolCounter, &counter);
    extend_instance_ttl(env);
}

// --- Pool ---

pub fn get_pool(env: &Env, pool_id: u64) -> Option<Pool> {
    let key = DataKey::Pool(pool_id);
    let result = env.storage().persistent().get(&key);
    if result.is_some() {
        extend_persistent_ttl(env, &key);
    }
    result
}

pub fn set_pool(env: &Env, pool: &Pool) {
    let key = DataKey::Pool(pool.id);
    env.storage().persistent().set(&key, pool);
    extend_persistent_ttl(env, &key);
}

// --- Member State ---

pub fn get_member(env: &Env, pool_id: u64, member: &Address) -> Option<MemberState> {
    let key = DataKey::Member(pool_id, member.clone());
    let result = env.storage().persistent().get(&key);
    if result.is_some() {
        extend_persistent_ttl(env, &key);
    }
    result
}

pub fn has_member(env: &Env, pool_id: u64, member: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Member(pool_id, member.clone()))
}

pub fn set_member(env: &Env, pool_id: u64, member: &Address, state: &MemberState) {
    let key = DataKey::Member(pool_id, member.clone());
    env.storage().persistent().set(&key, state);
    extend_persistent_ttl(env, &key);
}

// --- Escrow ---

pub fn get_escrow(env: &Env, pool_id: u64) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Escrow(pool_id))
        .unwrap_or(0)
}

pub fn set_escrow(env: &Env, pool_id: u64, balance: i128) {
    let key = DataKey::Escrow(pool_id);
    env.storage().persistent().set(&key, &balance);
    extend_persistent_ttl(env, &key);
}

// --- Round ---

pub fn get_round(env: &Env, pool_id: u64, round: u32) -> Option<RoundRecord> {
    let key = DataKey::Round(pool_id, round);
    let result = env.storage().persistent().get(&key);
    if result.is_some() {
        extend_persistent_ttl(env, &key);
    }
    result
}

pub fn has_round(env: &Env, pool_id: u64, round: u32) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Round(pool_id, round))
}

pub fn set_round(env: &Env, pool_id: u64, record: &RoundRecord) {
    let key = DataKey::Round(pool_id, record.round);
    env.storage().persistent().set(&key, record);
    extend_persistent_ttl(env, &key);
}

// --- Highest Bid ---

pub fn get_highest_bid(env: &Env, pool_id: u64) -> Option<Bid> {
    let key = DataKey::HighestBid(pool_id);
    env.storage().persistent().get(&key)
}

pub fn set_highest_bid(env: &Env, pool_id: u64, bid: &Bid) {
    let key = DataKey::HighestBid(pool_id);
    env.storage().persistent().set(&key, bid);
    extend_persistent_ttl(env, &key);
}

pub fn remove_highest_bid(env: &Env, pool_id: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::HighestBid(pool_id));
}

// --- Member Pools ---

pub fn get_member_pools(env: &Env, member: &Address) -> Vec<u64> {
    let key = DataKey::MemberPools(member.clone());
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env))
}

pub fn add_member_pool(env: &Env, member: &Address, pool_id: u64) {
    let key = DataKey::MemberPools(member.clone());
    let mut pools = get_member_pools(env, member);
    pools.push_back(pool_id);
    env.storage().persistent().set(&key, &pools);
    extend_persistent_ttl(env, &key);
}

// --- TTL Management ---

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
