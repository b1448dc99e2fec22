use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, Coin, StdResult, Storage, Timestamp};
use cw_storage_plus::{Item, Map};

use crate::error::ContractError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct State {
    pub owner: Addr,
    /// Max lock duration in seconds, unbounded when unset
    pub max_lock_duration: Option<u64>,
    /// Id of the most recently created lock, 0 before the first one
    pub last_lock_id: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Lock {
    pub id: u64,
    pub owner: Addr,
    /// Sorted by denom, one entry per denom, all amounts positive
    pub coins: Vec<Coin>,
    /// Lock duration in seconds
    pub duration: u64,
    pub end_time: Timestamp,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    Locked,
    Unlockable,
}

impl Lock {
    pub fn status(&self, now: Timestamp) -> LockStatus {
        if now < self.end_time {
            LockStatus::Locked
        } else {
            LockStatus::Unlockable
        }
    }
}

pub const STATE: Item<State> = Item::new("state");
pub const LOCKS: Map<u64, Lock> = Map::new("locks");
/// Block time of the last executed operation.
pub const CLOCK: Item<Timestamp> = Item::new("clock");

fn next_lock_id(store: &mut dyn Storage) -> StdResult<u64> {
    let mut id = 0;
    STATE.update(store, |mut state| -> StdResult<_> {
        state.last_lock_id += 1;
        id = state.last_lock_id;
        Ok(state)
    })?;

    Ok(id)
}

pub fn create_lock(
    store: &mut dyn Storage,
    owner: Addr,
    coins: Vec<Coin>,
    duration: u64,
    end_time: Timestamp,
) -> StdResult<Lock> {
    let lock = Lock {
        id: next_lock_id(store)?,
        owner,
        coins,
        duration,
        end_time,
    };
    LOCKS.save(store, lock.id, &lock)?;
    Ok(lock)
}

pub fn load_lock(store: &dyn Storage, id: u64) -> Result<Lock, ContractError> {
    LOCKS
        .may_load(store, id)?
        .ok_or(ContractError::LockNotFound { id })
}

pub fn delete_lock(store: &mut dyn Storage, id: u64) -> Result<(), ContractError> {
    if !LOCKS.has(store, id) {
        return Err(ContractError::LockNotFound { id });
    }
    LOCKS.remove(store, id);
    Ok(())
}
