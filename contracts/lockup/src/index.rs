use std::convert::TryFrom;

use cosmwasm_std::{Addr, Empty, Order, StdError, StdResult, Storage, Timestamp};
use cw_storage_plus::{Bound, Map, Prefix};

use crate::error::ContractError;
use crate::state::Lock;

const SCOPE_ALL: u8 = 0;
const SCOPE_OWNER: u8 = 1;
const SCOPE_DENOM: u8 = 2;
const SCOPE_OWNER_DENOM: u8 = 3;

/// (scope, end time nanos, lock id). Only [`index_lock`] and [`unindex_lock`]
/// write here, so a scan within one scope walks ascending `(end time, id)`.
pub(crate) const LOCKS_BY_END_TIME: Map<(&[u8], u64, u64), Empty> =
    Map::new("locks_by_end_time");
/// (scope, duration seconds, lock id)
pub(crate) const LOCKS_BY_DURATION: Map<(&[u8], u64, u64), Empty> =
    Map::new("locks_by_duration");

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scope<'a> {
    All,
    Owner(&'a Addr),
    Denom(&'a str),
    OwnerDenom(&'a Addr, &'a str),
}

impl<'a> Scope<'a> {
    /// Storage prefix of the scope. The map length-prefixes it, so two
    /// scopes only share entries when their keys are byte-equal.
    pub fn key(&self) -> StdResult<Vec<u8>> {
        let key = match self {
            Scope::All => vec![SCOPE_ALL],
            Scope::Owner(owner) => [&[SCOPE_OWNER][..], owner.as_bytes()].concat(),
            Scope::Denom(denom) => [&[SCOPE_DENOM][..], denom.as_bytes()].concat(),
            Scope::OwnerDenom(owner, denom) => {
                let bytes = owner.as_bytes();
                let len = u16::try_from(bytes.len()).map_err(|_| {
                    StdError::generic_err(format!("owner {} is too long for a scope key", owner))
                })?;
                let mut key = Vec::with_capacity(3 + bytes.len() + denom.len());
                key.push(SCOPE_OWNER_DENOM);
                key.extend_from_slice(&len.to_be_bytes());
                key.extend_from_slice(bytes);
                key.extend_from_slice(denom.as_bytes());
                key
            }
        };
        Ok(key)
    }
}

/// Scope keys a lock is indexed under.
pub(crate) fn scope_keys(lock: &Lock) -> StdResult<Vec<Vec<u8>>> {
    let mut keys = vec![Scope::All.key()?, Scope::Owner(&lock.owner).key()?];
    for coin in &lock.coins {
        keys.push(Scope::Denom(&coin.denom).key()?);
        keys.push(Scope::OwnerDenom(&lock.owner, &coin.denom).key()?);
    }
    Ok(keys)
}

pub fn index_lock(store: &mut dyn Storage, lock: &Lock) -> StdResult<()> {
    let end = lock.end_time.nanos();
    for scope in scope_keys(lock)? {
        let scope = scope.as_slice();
        LOCKS_BY_END_TIME.save(store, (scope, end, lock.id), &Empty {})?;
        LOCKS_BY_DURATION.save(store, (scope, lock.duration, lock.id), &Empty {})?;
    }
    Ok(())
}

/// Removes every entry [`index_lock`] wrote for `lock`. Fails without
/// touching storage when any of them is missing.
pub fn unindex_lock(store: &mut dyn Storage, lock: &Lock) -> Result<(), ContractError> {
    let end = lock.end_time.nanos();
    let scopes = scope_keys(lock)?;

    let missing = scopes.iter().map(Vec::as_slice).any(|scope| {
        !LOCKS_BY_END_TIME.has(store, (scope, end, lock.id))
            || !LOCKS_BY_DURATION.has(store, (scope, lock.duration, lock.id))
    });
    if missing {
        return Err(ContractError::fatal(format!(
            "index entries missing for lock {}",
            lock.id
        )));
    }

    for scope in scopes.iter().map(Vec::as_slice) {
        LOCKS_BY_END_TIME.remove(store, (scope, end, lock.id));
        LOCKS_BY_DURATION.remove(store, (scope, lock.duration, lock.id));
    }
    Ok(())
}

fn ids(
    prefix: Prefix<(u64, u64), Empty, (u64, u64)>,
    store: &dyn Storage,
    min: Option<Bound<(u64, u64)>>,
    max: Option<Bound<(u64, u64)>>,
) -> StdResult<Vec<u64>> {
    prefix
        .keys(store, min, max, Order::Ascending)
        .map(|item| item.map(|(_, id)| id))
        .collect()
}

/// Locks with `end_time <= t`: unlockable at `t`.
pub fn past_time(store: &dyn Storage, scope: Scope, t: Timestamp) -> StdResult<Vec<u64>> {
    let key = scope.key()?;
    let max = Bound::inclusive((t.nanos(), u64::MAX));
    ids(LOCKS_BY_END_TIME.sub_prefix(&key), store, None, Some(max))
}

/// Locks with `end_time < t`.
pub fn before_time(store: &dyn Storage, scope: Scope, t: Timestamp) -> StdResult<Vec<u64>> {
    let key = scope.key()?;
    let max = Bound::exclusive((t.nanos(), 0u64));
    ids(LOCKS_BY_END_TIME.sub_prefix(&key), store, None, Some(max))
}

/// Locks with `end_time > t`: still locked at `t`.
pub fn after_time(store: &dyn Storage, scope: Scope, t: Timestamp) -> StdResult<Vec<u64>> {
    let key = scope.key()?;
    let min = Bound::exclusive((t.nanos(), u64::MAX));
    ids(LOCKS_BY_END_TIME.sub_prefix(&key), store, Some(min), None)
}

/// Locks with `duration >= d` (seconds).
pub fn duration_at_least(store: &dyn Storage, scope: Scope, d: u64) -> StdResult<Vec<u64>> {
    let key = scope.key()?;
    let min = Bound::inclusive((d, 0u64));
    ids(LOCKS_BY_DURATION.sub_prefix(&key), store, Some(min), None)
}
