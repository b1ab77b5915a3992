use soroban_sdk::{contracttype, Address, String, Vec};

/// Lifecycle flag of a pool.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum PoolStatus {
    Active,     // Collecting contributions and settling rounds
    Completed,  // Every round settled
    Terminated, // Abandoned by the captain, current-round deposits refunded
}

/// How a round's recipient is chosen.
#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionPolicy {
    /// Draw over the funded members, seeded from ledger time and the host PRNG.
    /// The seed is observable before the settling call lands, so the draw is
    /// manipulable by a motivated participant and is not a fair lottery.
    RandomDraw,
    /// Highest priority score wins. Scores rank bidders and are never charged.
    PriorityBid,
}

/// Where a pool stands in its settlement cycle. Derived, never stored.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum PoolPhase {
    Collecting(u32),
    ReadyToSettle(u32),
    Completed,
    Terminated,
}

/// Current highest bid of a round.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Bid {
    pub bidder: Address,
    pub priority: i128,
    pub placed_at: u64,
}

/// Pool configuration and round state. The round's highest bid is stored
/// separately under `DataKey::HighestBid`.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Pool {
    pub id: u64,
    pub name: String,
    pub captain: Address,
    pub token: Address,
    pub policy: SelectionPolicy,
    pub contribution_amount: i128,
    pub target_members: u32,
    pub duration_days: u64,
    pub created_at: u64,
    pub next_deadline: u64,
    pub current_round: u32,
    pub status: PoolStatus,
    pub members: Vec<Address>,
    pub funded_count: u32,
}

impl Pool {
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.target_members
    }

    /// Amount paid to a round's winner.
    pub fn pot(&self) -> i128 {
        self.contribution_amount * self.target_members as i128
    }
}

/// Per-round funding state of one member.
#[contracttype]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemberState {
    pub funded: bool,
    pub deposited: i128,
}

/// Outcome of a settled round. Written once.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct RoundRecord {
    pub round: u32,
    pub winner: Address,
    pub payout: i128,
    pub winning_bid: Option<i128>,
    pub settled_at: u64,
}

/// Protocol-wide limits, set at deploy time.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub max_pool_members: u32,
}

/// Storage keys for all contract data.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    PoolCounter,
    Pool(u64),
    Member(u64, Address),
    Escrow(u64),
    Round(u64, u32),
    HighestBid(u64),
    MemberPools(Address),
}
