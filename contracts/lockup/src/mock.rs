#![cfg(test)]

use std::collections::BTreeSet;

use cosmwasm_std::testing::{
    mock_dependencies, mock_env, mock_info, MockApi, MockQuerier, MockStorage, MOCK_CONTRACT_ADDR,
};
use cosmwasm_std::{
    from_binary, BankMsg, Coin, CosmosMsg, Env, Order, OwnedDeps, Response, StdResult, Storage,
    Timestamp,
};
use serde::de::DeserializeOwned;

use crate::contract::{execute, instantiate, query};
use crate::error::ContractError;
use crate::index::{scope_keys, LOCKS_BY_DURATION, LOCKS_BY_END_TIME};
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::state::{Lock, LOCKS};

pub const SECOND: u64 = 1_000_000_000;

pub type MockDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

pub fn mock_env_at(nanos: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_nanos(nanos);
    env
}

pub fn mock_lockup(max_lock_duration: Option<u64>) -> MockDeps {
    let mut deps = mock_dependencies();
    let msg = InstantiateMsg { max_lock_duration };
    instantiate(deps.as_mut(), mock_env_at(0), mock_info("creator", &[]), msg).unwrap();
    deps
}

pub fn contract_balance(deps: &MockDeps) -> Vec<Coin> {
    deps.as_ref()
        .querier
        .query_all_balances(MOCK_CONTRACT_ADDR)
        .unwrap()
}

/// Executes `msg` at block time `nanos` and settles the bank side like the
/// chain would: attached funds land in the contract, bank sends leave it.
pub fn execute_at(
    deps: &mut MockDeps,
    nanos: u64,
    sender: &str,
    funds: &[Coin],
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let mut balance = contract_balance(deps);
    credit(&mut balance, funds);
    deps.querier.update_balance(MOCK_CONTRACT_ADDR, balance.clone());

    let res = execute(deps.as_mut(), mock_env_at(nanos), mock_info(sender, funds), msg);
    match &res {
        Ok(res) => {
            for sub in &res.messages {
                if let CosmosMsg::Bank(BankMsg::Send { amount, .. }) = &sub.msg {
                    debit(&mut balance, amount);
                }
            }
        }
        Err(_) => debit(&mut balance, funds),
    }
    deps.querier.update_balance(MOCK_CONTRACT_ADDR, balance);
    res
}

pub fn query_at<T: DeserializeOwned>(deps: &MockDeps, nanos: u64, msg: QueryMsg) -> T {
    from_binary(&query(deps.as_ref(), mock_env_at(nanos), msg).unwrap()).unwrap()
}

fn credit(balance: &mut Vec<Coin>, coins: &[Coin]) {
    for coin in coins {
        match balance.iter_mut().find(|c| c.denom == coin.denom) {
            Some(existing) => existing.amount += coin.amount,
            None => balance.push(coin.clone()),
        }
    }
    balance.sort_by(|a, b| a.denom.cmp(&b.denom));
}

fn debit(balance: &mut Vec<Coin>, coins: &[Coin]) {
    for coin in coins {
        let existing = balance
            .iter_mut()
            .find(|c| c.denom == coin.denom)
            .expect("bank send without balance");
        existing.amount = existing.amount.checked_sub(coin.amount).unwrap();
    }
    balance.retain(|c| !c.amount.is_zero());
}

/// Both indices hold exactly the entries the live locks call for.
pub fn assert_indexes_consistent(store: &dyn Storage) {
    let locks: Vec<Lock> = LOCKS
        .range(store, None, None, Order::Ascending)
        .map(|item| item.map(|(_, lock)| lock))
        .collect::<StdResult<_>>()
        .unwrap();

    let mut by_end_time = BTreeSet::new();
    let mut by_duration = BTreeSet::new();
    for lock in &locks {
        for scope in scope_keys(lock).unwrap() {
            by_end_time.insert((scope.clone(), lock.end_time.nanos(), lock.id));
            by_duration.insert((scope, lock.duration, lock.id));
        }
    }

    let stored: BTreeSet<_> = LOCKS_BY_END_TIME
        .keys(store, None, None, Order::Ascending)
        .collect::<StdResult<_>>()
        .unwrap();
    assert_eq!(by_end_time, stored);

    let stored: BTreeSet<_> = LOCKS_BY_DURATION
        .keys(store, None, None, Order::Ascending)
        .collect::<StdResult<_>>()
        .unwrap();
    assert_eq!(by_duration, stored);
}
