use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Coin, OverflowError, Uint128};

use crate::error::ContractError;

/// Per-denom sum of coins, kept sorted by denom.
#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug, Default)]
pub struct CoinBalance {
    pub coins: Vec<Coin>,
}

impl CoinBalance {
    pub fn add_coins(&mut self, add: &[Coin]) -> Result<(), OverflowError> {
        for token in add {
            let index = self
                .coins
                .binary_search_by(|exist| exist.denom.as_str().cmp(&token.denom));
            match index {
                Ok(idx) => {
                    self.coins[idx].amount = self.coins[idx].amount.checked_add(token.amount)?
                }
                Err(idx) => self.coins.insert(idx, token.clone()),
            }
        }
        Ok(())
    }

    pub fn amount_of(&self, denom: &str) -> Uint128 {
        self.coins
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or_default()
    }

    pub fn into_coins(self) -> Vec<Coin> {
        self.coins
    }
}

/// Validates a set of coins to be locked and returns it sorted by denom.
pub fn normalize_coins(mut coins: Vec<Coin>) -> Result<Vec<Coin>, ContractError> {
    if coins.is_empty() {
        return Err(ContractError::invalid_argument("no coins to lock"));
    }
    coins.sort_by(|a, b| a.denom.cmp(&b.denom));

    for (i, coin) in coins.iter().enumerate() {
        if coin.denom.is_empty() {
            return Err(ContractError::invalid_argument("empty denom"));
        }
        if coin.amount.is_zero() {
            return Err(ContractError::invalid_argument(format!(
                "zero amount for {}",
                coin.denom
            )));
        }
        if i > 0 && coins[i - 1].denom == coin.denom {
            return Err(ContractError::invalid_argument(format!(
                "duplicate denom {}",
                coin.denom
            )));
        }
    }
    Ok(coins)
}

pub fn coins_to_string(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
