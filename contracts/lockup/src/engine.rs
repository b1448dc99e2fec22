use cosmwasm_std::{Addr, Coin, Event, OverflowError, StdResult, Storage, Timestamp};

use crate::balance::{coins_to_string, normalize_coins, CoinBalance};
use crate::error::ContractError;
use crate::index::{self, Scope};
use crate::ledger::EscrowLedger;
use crate::state::{create_lock, delete_lock, load_lock, Lock, LockStatus, CLOCK, LOCKS, STATE};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Rejects operations whose block time is earlier than the last committed one.
fn check_clock(store: &dyn Storage, now: Timestamp) -> Result<(), ContractError> {
    if let Some(last) = CLOCK.may_load(store)? {
        if now < last {
            return Err(ContractError::fatal(format!(
                "block time {} is before last seen {}",
                now, last
            )));
        }
    }
    Ok(())
}

/// Records `now` once an operation can no longer fail.
pub fn advance_clock(store: &mut dyn Storage, now: Timestamp) -> StdResult<()> {
    CLOCK.save(store, &now)
}

fn end_time(now: Timestamp, duration: u64) -> Result<Timestamp, ContractError> {
    duration
        .checked_mul(NANOS_PER_SECOND)
        .and_then(|nanos| now.nanos().checked_add(nanos))
        .map(Timestamp::from_nanos)
        .ok_or_else(|| ContractError::invalid_argument("duration overflows end time"))
}

/// Every fallible check runs before the first write, so a failed call leaves
/// the lock store, the indices and the clock untouched.
pub fn lock_tokens<L: EscrowLedger>(
    store: &mut dyn Storage,
    ledger: &mut L,
    now: Timestamp,
    owner: &Addr,
    coins: Vec<Coin>,
    duration: u64,
    events: &mut Vec<Event>,
) -> Result<Lock, ContractError> {
    check_clock(store, now)?;

    if duration == 0 {
        return Err(ContractError::invalid_argument("duration must be positive"));
    }
    let state = STATE.load(store)?;
    if let Some(max) = state.max_lock_duration {
        if duration > max {
            return Err(ContractError::invalid_argument(format!(
                "duration {} exceeds max lock duration {}",
                duration, max
            )));
        }
    }
    let coins = normalize_coins(coins)?;
    let end_time = end_time(now, duration)?;

    ledger.escrow(owner, &coins)?;

    let lock = create_lock(store, owner.clone(), coins, duration, end_time)?;
    index::index_lock(store, &lock)?;
    advance_clock(store, now)?;

    events.push(
        Event::new("lock_created")
            .add_attribute("lock_id", lock.id.to_string())
            .add_attribute("owner", lock.owner.as_str())
            .add_attribute("amount", coins_to_string(&lock.coins))
            .add_attribute("duration", lock.duration.to_string())
            .add_attribute("unlock_time", lock.end_time.to_string()),
    );
    Ok(lock)
}

fn remove_lock(store: &mut dyn Storage, lock: &Lock) -> Result<Event, ContractError> {
    index::unindex_lock(store, lock)?;
    delete_lock(store, lock.id)?;

    Ok(Event::new("lock_removed")
        .add_attribute("lock_id", lock.id.to_string())
        .add_attribute("owner", lock.owner.as_str())
        .add_attribute("duration", lock.duration.to_string())
        .add_attribute("unlock_time", lock.end_time.to_string()))
}

pub fn unlock_by_id<L: EscrowLedger>(
    store: &mut dyn Storage,
    ledger: &mut L,
    now: Timestamp,
    id: u64,
    requester: &Addr,
    events: &mut Vec<Event>,
) -> Result<Lock, ContractError> {
    check_clock(store, now)?;

    let lock = load_lock(store, id)?;
    if &lock.owner != requester {
        return Err(ContractError::Unauthorized {});
    }
    if lock.status(now) == LockStatus::Locked {
        return Err(ContractError::NotUnlockable {
            id,
            end_time: lock.end_time,
        });
    }

    ledger.release(&lock.owner, &lock.coins)?;
    let removed = remove_lock(store, &lock)?;
    advance_clock(store, now)?;

    events.push(removed);
    Ok(lock)
}

/// Removes every lock of `owner` whose end time is at or before `now`, in
/// ascending `(end time, id)` order, releasing their coins in one transfer.
pub fn unlock_all_unlockable<L: EscrowLedger>(
    store: &mut dyn Storage,
    ledger: &mut L,
    now: Timestamp,
    owner: &Addr,
    events: &mut Vec<Event>,
) -> Result<(Vec<Lock>, Vec<Coin>), ContractError> {
    check_clock(store, now)?;

    let mut locks = vec![];
    for id in index::past_time(store, Scope::Owner(owner), now)? {
        locks.push(load_lock(store, id)?);
    }
    let total = sum_coins(&locks)?;

    ledger.release(owner, &total)?;

    let mut removed = Vec::with_capacity(locks.len());
    for lock in &locks {
        removed.push(remove_lock(store, lock)?);
    }
    advance_clock(store, now)?;

    events.push(
        Event::new("tokens_unlocked")
            .add_attribute("owner", owner.as_str())
            .add_attribute("amount", coins_to_string(&total)),
    );
    events.extend(removed);
    Ok((locks, total))
}

pub fn sum_coins(locks: &[Lock]) -> Result<Vec<Coin>, OverflowError> {
    let mut balance = CoinBalance::default();
    for lock in locks {
        balance.add_coins(&lock.coins)?;
    }
    Ok(balance.into_coins())
}

pub fn load_locks(store: &dyn Storage, ids: Vec<u64>) -> StdResult<Vec<Lock>> {
    ids.into_iter().map(|id| LOCKS.load(store, id)).collect()
}
