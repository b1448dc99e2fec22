use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Timestamp, Uint128};

use crate::state::{Lock, LockStatus};

#[cw_serde]
pub struct InstantiateMsg {
    /// Max lock duration in seconds, unbounded if not set
    pub max_lock_duration: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Lock coins for `duration` seconds. Coins are taken from the attached
    /// funds; when not given, all attached funds are locked.
    LockTokens {
        coins: Option<Vec<Coin>>,
        duration: u64,
    },
    /// Withdraw a single lock once its end time is reached
    UnlockPeriodLock { id: u64 },
    /// Withdraw every unlockable lock of the sender
    UnlockTokens {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    /// Coins held by all live locks
    #[returns(CoinsResponse)]
    ModuleBalance {},
    /// Coins of locks that are not unlockable yet
    #[returns(CoinsResponse)]
    ModuleLockedAmount {},
    #[returns(CoinsResponse)]
    AccountUnlockableCoins { owner: String },
    #[returns(CoinsResponse)]
    AccountLockedCoins { owner: String },
    /// Locks of owner still locked at timestamp (end time > timestamp)
    #[returns(LocksResponse)]
    AccountLockedPastTime { owner: String, timestamp: Timestamp },
    /// Locks of owner unlockable at timestamp (end time <= timestamp)
    #[returns(LocksResponse)]
    AccountUnlockedBeforeTime { owner: String, timestamp: Timestamp },
    /// Locks of owner whose end time is strictly before timestamp
    #[returns(LocksResponse)]
    AccountUnlockedStrictlyBeforeTime { owner: String, timestamp: Timestamp },
    #[returns(LocksResponse)]
    AccountLockedPastTimeDenom {
        owner: String,
        denom: String,
        timestamp: Timestamp,
    },
    /// Locks of owner with duration >= `duration` seconds
    #[returns(LocksResponse)]
    AccountLockedLongerThanDuration { owner: String, duration: u64 },
    #[returns(LocksResponse)]
    AccountLockedLongerThanDurationDenom {
        owner: String,
        denom: String,
        duration: u64,
    },
    /// Locks of any owner holding denom, still locked at timestamp
    #[returns(LocksResponse)]
    DenomLockedPastTime { denom: String, timestamp: Timestamp },
    /// Amount of denom held by locks with duration >= `duration` seconds
    #[returns(LockedDenomResponse)]
    LockedDenom { denom: String, duration: u64 },
    #[returns(LockResponse)]
    LockedById { lock_id: u64 },
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: Addr,
    pub max_lock_duration: Option<u64>,
    pub last_lock_id: u64,
}

#[cw_serde]
pub struct CoinsResponse {
    pub coins: Vec<Coin>,
}

#[cw_serde]
pub struct LocksResponse {
    pub locks: Vec<Lock>,
}

#[cw_serde]
pub struct LockResponse {
    pub lock: Lock,
    pub status: LockStatus,
}

#[cw_serde]
pub struct LockedDenomResponse {
    pub amount: Uint128,
}
