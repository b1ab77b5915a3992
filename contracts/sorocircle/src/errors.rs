use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    InvalidParameters = 1,
    NotFound = 2,
    NotActive = 3,
    WrongAmount = 4,
    AlreadyFunded = 5,
    AlreadyMember = 6,
    Full = 7,
    RoundNotReady = 8,
    NoBidSubmitted = 9,
    Unauthorized = 10,
    PayoutTransferFailed = 11,
    NotMember = 12,
    NotFunded = 13,
    WrongPolicy = 14,
    AlreadySettled = 15,
    NotInitialized = 16,
    EscrowShortfall = 17,
}
