use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short,
    testutils::{Address as _, Events, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, Env, IntoVal, String, Symbol, Val, Vec,
};

use crate::types::{PoolPhase, PoolStatus, SelectionPolicy};
use crate::{ContractError, SoroCircleContract, SoroCircleContractClient};

const CONTRIBUTION: i128 = 100;
const DAY: u64 = 86_400;

// A token whose transfers to chosen recipients fail, for exercising payout
// failure without touching a real asset contract.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MockTokenError {
    Blocked = 1,
    InsufficientBalance = 2,
}

#[contracttype]
#[derive(Clone)]
pub enum MockKey {
    Balance(Address),
    Blocked(Address),
}

#[contract]
pub struct MockToken;

#[contractimpl]
impl MockToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&MockKey::Balance(to), &(balance + amount));
    }

    pub fn set_blocked(env: Env, id: Address, blocked: bool) {
        env.storage().persistent().set(&MockKey::Blocked(id), &blocked);
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&MockKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), MockTokenError> {
        from.require_auth();

        let blocked: bool = env
            .storage()
            .persistent()
            .get(&MockKey::Blocked(to.clone()))
            .unwrap_or(false);
        if blocked {
            return Err(MockTokenError::Blocked);
        }

        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            return Err(MockTokenError::InsufficientBalance);
        }
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&MockKey::Balance(from), &(from_balance - amount));
        env.storage()
            .persistent()
            .set(&MockKey::Balance(to), &(to_balance + amount));
        Ok(())
    }
}

fn setup_env() -> (Env, SoroCircleContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let contract_id = env.register(SoroCircleContract, (&admin, 10u32));
    let client = SoroCircleContractClient::new(&env, &contract_id);

    let token_admin = Address::generate(&env);
    let token_id = env.register_stellar_asset_contract_v2(token_admin.clone());

    (env, client, token_id.address())
}

fn funded_account(env: &Env, token: &Address) -> Address {
    let account = Address::generate(env);
    StellarAssetClient::new(env, token).mint(&account, &1_000);
    account
}

fn create_bid_pool(
    env: &Env,
    client: &SoroCircleContractClient,
    captain: &Address,
    token: &Address,
) -> u64 {
    client.create_pool(
        captain,
        &String::from_str(env, "Bidding Circle"),
        token,
        &SelectionPolicy::PriorityBid,
        &CONTRIBUTION,
        &3,
        &7,
    )
}

/// Captain plus two joined members; round 0 fully funded.
fn full_bid_pool(
    env: &Env,
    client: &SoroCircleContractClient,
    token: &Address,
) -> (u64, Address, Address, Address) {
    let captain = funded_account(env, token);
    let pool_id = create_bid_pool(env, client, &captain, token);
    let member1 = funded_account(env, token);
    let member2 = funded_account(env, token);
    client.join(&member1, &pool_id, &CONTRIBUTION);
    client.join(&member2, &pool_id, &CONTRIBUTION);
    (pool_id, captain, member1, member2)
}

fn has_event(env: &Env, contract: &Address, topic: Symbol) -> bool {
    let expected: Vec<Val> = (topic,).into_val(env);
    env.events()
        .all()
        .iter()
        .any(|(emitter, topics, _)| emitter == *contract && topics == expected)
}

#[test]
fn test_captain_is_first_member() {
    let (env, client, token) = setup_env();
    let captain = funded_account(&env, &token);
    let pool_id = create_bid_pool(&env, &client, &captain, &token);

    let pool = client.get_pool(&pool_id);
    assert_eq!(pool.captain, captain);
    assert_eq!(pool.members.len(), 1);
    assert_eq!(pool.members.get(0).unwrap(), captain);
    assert_eq!(pool.funded_count, 1);
    assert_eq!(client.get_contribution(&pool_id, &captain), CONTRIBUTION);
    assert_eq!(client.get_escrow_balance(&pool_id), CONTRIBUTION);
    assert_eq!(TokenClient::new(&env, &token).balance(&captain), 900);
    assert_eq!(client.get_member_pools(&captain).len(), 1);
}

#[test]
fn test_captain_cannot_rejoin() {
    let (env, client, token) = setup_env();
    let captain = funded_account(&env, &token);
    let pool_id = create_bid_pool(&env, &client, &captain, &token);

    assert_eq!(
        client.try_join(&captain, &pool_id, &CONTRIBUTION),
        Err(Ok(ContractError::AlreadyMember))
    );

    let pool = client.get_pool(&pool_id);
    assert_eq!(pool.members.len(), 1);
    assert_eq!(pool.funded_count, 1);
    assert_eq!(client.get_escrow_balance(&pool_id), CONTRIBUTION);
    assert_eq!(client.get_member_pools(&captain).len(), 1);
}

#[test]
fn test_settle_without_bid_fails() {
    let (env, client, token) = setup_env();
    let (pool_id, _captain, _member1, _member2) = full_bid_pool(&env, &client, &token);

    // Full and funded, but the round deadline has not passed.
    assert_eq!(client.get_phase(&pool_id), PoolPhase::Collecting(0));
    assert_eq!(client.try_settle(&pool_id), Err(Ok(ContractError::RoundNotReady)));

    env.ledger().set_timestamp(7 * DAY);
    assert_eq!(client.get_phase(&pool_id), PoolPhase::ReadyToSettle(0));
    assert_eq!(client.try_settle(&pool_id), Err(Ok(ContractError::NoBidSubmitted)));

    let pool = client.get_pool(&pool_id);
    assert_eq!(pool.current_round, 0);
    assert_eq!(client.get_escrow_balance(&pool_id), 3 * CONTRIBUTION);
}

#[test]
fn test_equal_bid_keeps_incumbent() {
    let (env, client, token) = setup_env();
    let (pool_id, _captain, member1, member2) = full_bid_pool(&env, &client, &token);

    assert!(client.place_bid(&member1, &pool_id, &50));
    assert!(!client.place_bid(&member2, &pool_id, &50));
    assert!(!client.place_bid(&member2, &pool_id, &40));

    let bid = client.get_highest_bid(&pool_id);
    assert_eq!(bid.bidder, member1);
    assert_eq!(bid.priority, 50);

    env.ledger().set_timestamp(7 * DAY);
    client.settle(&pool_id);
    assert_eq!(client.get_round_winner(&pool_id, &0), member1);
}

#[test]
fn test_highest_bidder_receives_pot() {
    let (env, client, token) = setup_env();
    let (pool_id, captain, member1, member2) = full_bid_pool(&env, &client, &token);
    let token_client = TokenClient::new(&env, &token);

    env.ledger().set_timestamp(DAY);
    assert!(client.place_bid(&member1, &pool_id, &50));
    assert!(client.place_bid(&member2, &pool_id, &60));
    assert_eq!(client.get_highest_bid(&pool_id).placed_at, DAY);

    env.ledger().set_timestamp(7 * DAY);
    client.settle(&pool_id);

    // The priority score is never charged; the winner only gains the pot.
    assert_eq!(token_client.balance(&member2), 1_200);
    assert_eq!(token_client.balance(&member1), 900);
    assert_eq!(token_client.balance(&captain), 900);
    assert_eq!(client.get_escrow_balance(&pool_id), 0);

    let record = client.get_round(&pool_id, &0);
    assert_eq!(record.winner, member2);
    assert_eq!(record.payout, 3 * CONTRIBUTION);
    assert_eq!(record.winning_bid, Some(60));
    assert_eq!(record.settled_at, 7 * DAY);

    let pool = client.get_pool(&pool_id);
    assert_eq!(pool.current_round, 1);
    assert_eq!(pool.next_deadline, 14 * DAY);
    assert_eq!(pool.funded_count, 0);
    assert_eq!(
        client.try_get_highest_bid(&pool_id),
        Err(Ok(ContractError::NoBidSubmitted))
    );
    assert_eq!(client.get_contribution(&pool_id, &member2), 0);
}

#[test]
fn test_bid_rules() {
    let (env, client, token) = setup_env();
    let (pool_id, captain, member1, member2) = full_bid_pool(&env, &client, &token);
    let outsider = funded_account(&env, &token);

    assert_eq!(
        client.try_place_bid(&outsider, &pool_id, &10),
        Err(Ok(ContractError::NotMember))
    );
    assert_eq!(
        client.try_place_bid(&member1, &pool_id, &0),
        Err(Ok(ContractError::WrongAmount))
    );

    assert!(client.place_bid(&member1, &pool_id, &10));
    assert!(has_event(&env, &client.address, symbol_short!("bid")));

    // Matching the incumbent is not an outbid and emits nothing.
    assert!(!client.place_bid(&member2, &pool_id, &10));
    assert!(!has_event(&env, &client.address, symbol_short!("bid")));
    assert_eq!(client.get_highest_bid(&pool_id).bidder, member1);

    env.ledger().set_timestamp(7 * DAY);
    client.settle(&pool_id);

    // Round 1: only funded members may bid.
    client.fund(&captain, &pool_id, &CONTRIBUTION);
    assert_eq!(
        client.try_place_bid(&member2, &pool_id, &10),
        Err(Ok(ContractError::NotFunded))
    );
    assert!(client.place_bid(&captain, &pool_id, &10));
}

#[test]
fn test_settle_requires_full_funding() {
    let (env, client, token) = setup_env();
    let (pool_id, captain, member1, _member2) = full_bid_pool(&env, &client, &token);

    client.place_bid(&member1, &pool_id, &10);
    env.ledger().set_timestamp(7 * DAY);
    client.settle(&pool_id);

    client.fund(&captain, &pool_id, &CONTRIBUTION);
    client.fund(&member1, &pool_id, &CONTRIBUTION);
    client.place_bid(&captain, &pool_id, &10);
    env.ledger().set_timestamp(14 * DAY);

    assert_eq!(client.get_phase(&pool_id), PoolPhase::Collecting(1));
    assert_eq!(client.try_settle(&pool_id), Err(Ok(ContractError::RoundNotReady)));
    assert_eq!(client.get_escrow_balance(&pool_id), 2 * CONTRIBUTION);
}

#[test]
fn test_bid_pool_runs_to_completion() {
    let (env, client, token) = setup_env();
    let (pool_id, captain, member1, member2) = full_bid_pool(&env, &client, &token);
    let token_client = TokenClient::new(&env, &token);

    // The same member may win more than once; past winners are not excluded.
    for round in 0..3u32 {
        if round > 0 {
            client.fund(&captain, &pool_id, &CONTRIBUTION);
            client.fund(&member1, &pool_id, &CONTRIBUTION);
            client.fund(&member2, &pool_id, &CONTRIBUTION);
        }
        client.place_bid(&member1, &pool_id, &(10 + round as i128));
        env.ledger().set_timestamp(7 * DAY * (round as u64 + 1));
        client.settle(&pool_id);
        assert_eq!(client.get_round_winner(&pool_id, &round), member1);
    }

    let pool = client.get_pool(&pool_id);
    assert_eq!(pool.status, PoolStatus::Completed);
    assert_eq!(pool.current_round, 3);
    assert_eq!(token_client.balance(&member1), 1_000 - 300 + 900);
    assert_eq!(token_client.balance(&captain), 700);
    assert_eq!(client.get_escrow_balance(&pool_id), 0);

    assert_eq!(
        client.try_fund(&captain, &pool_id, &CONTRIBUTION),
        Err(Ok(ContractError::NotActive))
    );
    assert_eq!(
        client.try_place_bid(&member1, &pool_id, &99),
        Err(Ok(ContractError::NotActive))
    );
    assert_eq!(client.try_abandon(&captain, &pool_id), Err(Ok(ContractError::NotActive)));
}

#[test]
fn test_abandon_refunds_current_round_deposits() {
    let (env, client, token) = setup_env();
    let (pool_id, captain, member1, member2) = full_bid_pool(&env, &client, &token);
    let token_client = TokenClient::new(&env, &token);

    client.place_bid(&member2, &pool_id, &10);
    env.ledger().set_timestamp(7 * DAY);
    client.settle(&pool_id);
    let round0_winner = client.get_round_winner(&pool_id, &0);

    // Round 1: two of three members fund before the captain pulls out.
    client.fund(&captain, &pool_id, &CONTRIBUTION);
    client.fund(&member1, &pool_id, &CONTRIBUTION);

    assert_eq!(client.try_abandon(&member1, &pool_id), Err(Ok(ContractError::Unauthorized)));

    let refunded = client.abandon(&captain, &pool_id);
    assert!(has_event(&env, &client.address, symbol_short!("pool_term")));
    assert_eq!(refunded, 2 * CONTRIBUTION);

    assert_eq!(token_client.balance(&captain), 900);
    assert_eq!(token_client.balance(&member1), 900);
    assert_eq!(token_client.balance(&member2), 1_200);
    assert_eq!(client.get_escrow_balance(&pool_id), 0);
    assert_eq!(client.get_contribution(&pool_id, &captain), 0);

    let pool = client.get_pool(&pool_id);
    assert_eq!(pool.status, PoolStatus::Terminated);
    assert_eq!(client.get_phase(&pool_id), PoolPhase::Terminated);

    // History survives termination; mutations do not.
    assert_eq!(client.get_round_winner(&pool_id, &0), round0_winner);
    let late = funded_account(&env, &token);
    assert_eq!(client.try_join(&late, &pool_id, &CONTRIBUTION), Err(Ok(ContractError::NotActive)));
    assert_eq!(
        client.try_fund(&member2, &pool_id, &CONTRIBUTION),
        Err(Ok(ContractError::NotActive))
    );
    assert_eq!(client.try_settle(&pool_id), Err(Ok(ContractError::NotActive)));
}

#[test]
fn test_abandon_before_pool_fills() {
    let (env, client, token) = setup_env();
    let captain = funded_account(&env, &token);
    let pool_id = create_bid_pool(&env, &client, &captain, &token);
    let member = funded_account(&env, &token);
    client.join(&member, &pool_id, &CONTRIBUTION);

    assert_eq!(client.abandon(&captain, &pool_id), 2 * CONTRIBUTION);

    let token_client = TokenClient::new(&env, &token);
    assert_eq!(token_client.balance(&captain), 1_000);
    assert_eq!(token_client.balance(&member), 1_000);
    assert_eq!(token_client.balance(&client.address), 0);
    assert_eq!(client.get_pool(&pool_id).status, PoolStatus::Terminated);
}

#[test]
fn test_failed_payout_leaves_round_unchanged() {
    let (env, client, _token) = setup_env();
    let token_id = env.register(MockToken, ());
    let token = MockTokenClient::new(&env, &token_id);

    let captain = Address::generate(&env);
    let member1 = Address::generate(&env);
    let member2 = Address::generate(&env);
    for account in [&captain, &member1, &member2] {
        token.mint(account, &1_000);
    }

    let pool_id = create_bid_pool(&env, &client, &captain, &token_id);
    client.join(&member1, &pool_id, &CONTRIBUTION);
    client.join(&member2, &pool_id, &CONTRIBUTION);
    client.place_bid(&member1, &pool_id, &25);
    env.ledger().set_timestamp(7 * DAY);

    token.set_blocked(&member1, &true);
    assert_eq!(
        client.try_settle(&pool_id),
        Err(Ok(ContractError::PayoutTransferFailed))
    );

    let pool = client.get_pool(&pool_id);
    assert_eq!(pool.current_round, 0);
    assert_eq!(pool.next_deadline, 7 * DAY);
    assert_eq!(pool.funded_count, 3);
    assert_eq!(client.get_highest_bid(&pool_id).bidder, member1);
    assert_eq!(client.get_escrow_balance(&pool_id), 3 * CONTRIBUTION);
    assert_eq!(client.get_contribution(&pool_id, &member2), CONTRIBUTION);
    assert_eq!(client.try_get_round(&pool_id, &0), Err(Ok(ContractError::NotFound)));
    assert_eq!(token.balance(&client.address), 3 * CONTRIBUTION);

    // Resubmitting once the recipient can receive again settles normally.
    token.set_blocked(&member1, &false);
    client.settle(&pool_id);
    assert_eq!(client.get_round_winner(&pool_id, &0), member1);
    assert_eq!(token.balance(&member1), 1_200);
    assert_eq!(client.get_pool(&pool_id).current_round, 1);
}
