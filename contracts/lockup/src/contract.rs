#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_binary, Binary, Coin, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Timestamp,
};

use crate::balance::CoinBalance;
use crate::engine::{self, load_locks, sum_coins};
use crate::error::ContractError;
use crate::index::{self, Scope};
use crate::ledger::BankLedger;
use crate::msg::{
    CoinsResponse, ConfigResponse, ExecuteMsg, InstantiateMsg, LockResponse, LockedDenomResponse,
    LocksResponse, QueryMsg,
};
use crate::state::{State, LOCKS, STATE};

use cw2::set_contract_version;

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:cw-disper-lockup";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    if msg.max_lock_duration == Some(0) {
        return Err(ContractError::invalid_argument(
            "max lock duration must be positive",
        ));
    }
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let state = State {
        owner: info.sender.clone(),
        max_lock_duration: msg.max_lock_duration,
        last_lock_id: 0,
    };
    STATE.save(deps.storage, &state)?;
    engine::advance_clock(deps.storage, env.block.time)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", info.sender))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::LockTokens { coins, duration } => {
            try_lock_tokens(deps, env, info, coins, duration)
        }
        ExecuteMsg::UnlockPeriodLock { id } => try_unlock_period_lock(deps, env, info, id),
        ExecuteMsg::UnlockTokens {} => try_unlock_tokens(deps, env, info),
    }
}

pub fn try_lock_tokens(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    coins: Option<Vec<Coin>>,
    duration: u64,
) -> Result<Response, ContractError> {
    let coins = coins.unwrap_or_else(|| info.funds.clone());
    let mut ledger = BankLedger::new(deps.querier, env.contract.address, info.funds);

    let mut events = vec![];
    let lock = engine::lock_tokens(
        deps.storage,
        &mut ledger,
        env.block.time,
        &info.sender,
        coins,
        duration,
        &mut events,
    )?;

    Ok(Response::new()
        .add_attribute("action", "lock_tokens")
        .add_attribute("owner", info.sender.as_str())
        .add_attribute("lock_id", lock.id.to_string())
        .add_messages(ledger.into_messages(&info.sender))
        .add_events(events))
}

pub fn try_unlock_period_lock(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    let mut ledger = BankLedger::new(deps.querier, env.contract.address, info.funds);

    let mut events = vec![];
    engine::unlock_by_id(
        deps.storage,
        &mut ledger,
        env.block.time,
        id,
        &info.sender,
        &mut events,
    )?;

    Ok(Response::new()
        .add_attribute("action", "unlock_period_lock")
        .add_attribute("owner", info.sender.as_str())
        .add_attribute("lock_id", id.to_string())
        .add_messages(ledger.into_messages(&info.sender))
        .add_events(events))
}

pub fn try_unlock_tokens(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut ledger = BankLedger::new(deps.querier, env.contract.address, info.funds);

    let mut events = vec![];
    let (locks, _) = engine::unlock_all_unlockable(
        deps.storage,
        &mut ledger,
        env.block.time,
        &info.sender,
        &mut events,
    )?;

    Ok(Response::new()
        .add_attribute("action", "unlock_tokens")
        .add_attribute("owner", info.sender.as_str())
        .add_attribute("unlocked", locks.len().to_string())
        .add_messages(ledger.into_messages(&info.sender))
        .add_events(events))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    let now = env.block.time;
    match msg {
        QueryMsg::Config {} => to_binary(&query_config(deps)?),
        QueryMsg::ModuleBalance {} => {
            let ids = index::duration_at_least(deps.storage, Scope::All, 0)?;
            to_binary(&query_coins(deps, ids)?)
        }
        QueryMsg::ModuleLockedAmount {} => {
            let ids = index::after_time(deps.storage, Scope::All, now)?;
            to_binary(&query_coins(deps, ids)?)
        }
        QueryMsg::AccountUnlockableCoins { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            let ids = index::past_time(deps.storage, Scope::Owner(&owner), now)?;
            to_binary(&query_coins(deps, ids)?)
        }
        QueryMsg::AccountLockedCoins { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            let ids = index::after_time(deps.storage, Scope::Owner(&owner), now)?;
            to_binary(&query_coins(deps, ids)?)
        }
        QueryMsg::AccountLockedPastTime { owner, timestamp } => {
            let owner = deps.api.addr_validate(&owner)?;
            let ids = index::after_time(deps.storage, Scope::Owner(&owner), timestamp)?;
            to_binary(&query_locks(deps, ids)?)
        }
        QueryMsg::AccountUnlockedBeforeTime { owner, timestamp } => {
            let owner = deps.api.addr_validate(&owner)?;
            let ids = index::past_time(deps.storage, Scope::Owner(&owner), timestamp)?;
            to_binary(&query_locks(deps, ids)?)
        }
        QueryMsg::AccountUnlockedStrictlyBeforeTime { owner, timestamp } => {
            let owner = deps.api.addr_validate(&owner)?;
            let ids = index::before_time(deps.storage, Scope::Owner(&owner), timestamp)?;
            to_binary(&query_locks(deps, ids)?)
        }
        QueryMsg::AccountLockedPastTimeDenom {
            owner,
            denom,
            timestamp,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            let scope = Scope::OwnerDenom(&owner, &denom);
            let ids = index::after_time(deps.storage, scope, timestamp)?;
            to_binary(&query_locks(deps, ids)?)
        }
        QueryMsg::AccountLockedLongerThanDuration { owner, duration } => {
            let owner = deps.api.addr_validate(&owner)?;
            let ids = index::duration_at_least(deps.storage, Scope::Owner(&owner), duration)?;
            to_binary(&query_locks(deps, ids)?)
        }
        QueryMsg::AccountLockedLongerThanDurationDenom {
            owner,
            denom,
            duration,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            let scope = Scope::OwnerDenom(&owner, &denom);
            let ids = index::duration_at_least(deps.storage, scope, duration)?;
            to_binary(&query_locks(deps, ids)?)
        }
        QueryMsg::DenomLockedPastTime { denom, timestamp } => {
            let ids = index::after_time(deps.storage, Scope::Denom(&denom), timestamp)?;
            to_binary(&query_locks(deps, ids)?)
        }
        QueryMsg::LockedDenom { denom, duration } => {
            to_binary(&query_locked_denom(deps, denom, duration)?)
        }
        QueryMsg::LockedById { lock_id } => to_binary(&query_lock(deps, now, lock_id)?),
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let state = STATE.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: state.owner,
        max_lock_duration: state.max_lock_duration,
        last_lock_id: state.last_lock_id,
    })
}

fn query_coins(deps: Deps, ids: Vec<u64>) -> StdResult<CoinsResponse> {
    let locks = load_locks(deps.storage, ids)?;
    Ok(CoinsResponse {
        coins: sum_coins(&locks)?,
    })
}

fn query_locks(deps: Deps, ids: Vec<u64>) -> StdResult<LocksResponse> {
    Ok(LocksResponse {
        locks: load_locks(deps.storage, ids)?,
    })
}

fn query_locked_denom(deps: Deps, denom: String, duration: u64) -> StdResult<LockedDenomResponse> {
    let ids = index::duration_at_least(deps.storage, Scope::Denom(&denom), duration)?;
    let mut total = CoinBalance::default();
    for lock in load_locks(deps.storage, ids)? {
        total.add_coins(&lock.coins)?;
    }
    Ok(LockedDenomResponse {
        amount: total.amount_of(&denom),
    })
}

fn query_lock(deps: Deps, now: Timestamp, id: u64) -> StdResult<LockResponse> {
    let lock = LOCKS.load(deps.storage, id)?;
    Ok(LockResponse {
        status: lock.status(now),
        lock,
    })
}
