use cosmwasm_std::{Addr, BankMsg, Coin, QuerierWrapper, Uint128};

use crate::balance::CoinBalance;
use crate::error::ContractError;

/// Holder of the real balances behind the locks.
pub trait EscrowLedger {
    /// Moves `coins` from the owner's spendable funds into the pooled balance.
    fn escrow(&mut self, owner: &Addr, coins: &[Coin]) -> Result<(), ContractError>;

    /// Returns `coins` from the pooled balance to the owner. A failure here
    /// means the pool lost funds it provably held and is reported as fatal.
    fn release(&mut self, owner: &Addr, coins: &[Coin]) -> Result<(), ContractError>;
}

/// Ledger backed by the bank module. Escrow draws from the funds attached
/// to the executing message; releases become `BankMsg::Send` out of the
/// contract balance.
pub struct BankLedger<'a> {
    querier: QuerierWrapper<'a>,
    contract: Addr,
    attached: Vec<Coin>,
    released: CoinBalance,
    messages: Vec<BankMsg>,
}

impl<'a> BankLedger<'a> {
    pub fn new(querier: QuerierWrapper<'a>, contract: Addr, attached: Vec<Coin>) -> Self {
        BankLedger {
            querier,
            contract,
            attached,
            released: CoinBalance::default(),
            messages: vec![],
        }
    }

    fn attached_amount(&self, denom: &str) -> Uint128 {
        self.attached
            .iter()
            .filter(|c| c.denom == denom)
            .map(|c| c.amount)
            .sum()
    }

    /// Queued sends, followed by a refund to `sender` of any attached funds
    /// that were not escrowed.
    pub fn into_messages(self, sender: &Addr) -> Vec<BankMsg> {
        let mut messages = self.messages;
        let refund: Vec<Coin> = self
            .attached
            .into_iter()
            .filter(|c| !c.amount.is_zero())
            .collect();
        if !refund.is_empty() {
            messages.push(BankMsg::Send {
                to_address: sender.to_string(),
                amount: refund,
            });
        }
        messages
    }
}

impl<'a> EscrowLedger for BankLedger<'a> {
    fn escrow(&mut self, _owner: &Addr, coins: &[Coin]) -> Result<(), ContractError> {
        for coin in coins {
            let available = self.attached_amount(&coin.denom);
            if available < coin.amount {
                return Err(ContractError::InsufficientFunds {
                    denom: coin.denom.clone(),
                    required: coin.amount,
                    available,
                });
            }
        }

        for coin in coins {
            let mut remaining = coin.amount;
            for fund in self.attached.iter_mut().filter(|c| c.denom == coin.denom) {
                let taken = fund.amount.min(remaining);
                fund.amount -= taken;
                remaining -= taken;
            }
        }
        Ok(())
    }

    fn release(&mut self, owner: &Addr, coins: &[Coin]) -> Result<(), ContractError> {
        if coins.is_empty() {
            return Ok(());
        }

        for coin in coins {
            let pool = self.querier.query_balance(&self.contract, &coin.denom)?;
            // attached funds sit in the contract balance but are not pooled
            let available = pool
                .amount
                .saturating_sub(self.attached_amount(&coin.denom))
                .saturating_sub(self.released.amount_of(&coin.denom));
            if available < coin.amount {
                return Err(ContractError::fatal(format!(
                    "pool holds {}{} but {}{} must be released",
                    available, coin.denom, coin.amount, coin.denom
                )));
            }
        }

        self.released.add_coins(coins)?;
        self.messages.push(BankMsg::Send {
            to_address: owner.to_string(),
            amount: coins.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies_with_balance, MOCK_CONTRACT_ADDR};
    use cosmwasm_std::{coin, coins};

    #[test]
    fn escrow_consumes_attached_funds() {
        let deps = mock_dependencies_with_balance(&[]);
        let owner = Addr::unchecked("owner");
        let mut ledger = BankLedger::new(
            deps.as_ref().querier,
            Addr::unchecked(MOCK_CONTRACT_ADDR),
            vec![coin(10, "stake"), coin(3, "atom")],
        );

        ledger.escrow(&owner, &coins(4, "stake")).unwrap();
        match ledger.escrow(&owner, &[coin(1, "atom"), coin(7, "stake")]) {
            Err(ContractError::InsufficientFunds {
                denom,
                required,
                available,
            }) => {
                assert_eq!("stake", denom);
                assert_eq!(Uint128::new(7), required);
                assert_eq!(Uint128::new(6), available);
            }
            _ => panic!("Must return InsufficientFunds error"),
        }

        // failed escrow took nothing, leftovers are refunded
        let messages = ledger.into_messages(&owner);
        assert_eq!(
            vec![BankMsg::Send {
                to_address: "owner".into(),
                amount: vec![coin(6, "stake"), coin(3, "atom")],
            }],
            messages
        );
    }

    #[test]
    fn escrow_without_funds() {
        let deps = mock_dependencies_with_balance(&[]);
        let owner = Addr::unchecked("owner");
        let mut ledger =
            BankLedger::new(deps.as_ref().querier, Addr::unchecked(MOCK_CONTRACT_ADDR), vec![]);

        match ledger.escrow(&owner, &coins(1, "stake")) {
            Err(ContractError::InsufficientFunds { available, .. }) => {
                assert_eq!(Uint128::zero(), available)
            }
            _ => panic!("Must return InsufficientFunds error"),
        }
        assert!(ledger.into_messages(&owner).is_empty());
    }

    #[test]
    fn release_is_bounded_by_pool() {
        let deps = mock_dependencies_with_balance(&coins(15, "stake"));
        let owner = Addr::unchecked("owner");
        let mut ledger =
            BankLedger::new(deps.as_ref().querier, Addr::unchecked(MOCK_CONTRACT_ADDR), vec![]);

        ledger.release(&owner, &coins(10, "stake")).unwrap();
        match ledger.release(&owner, &coins(10, "stake")) {
            Err(ContractError::Fatal { .. }) => {}
            _ => panic!("Must return Fatal error"),
        }
        match ledger.release(&owner, &coins(1, "atom")) {
            Err(ContractError::Fatal { .. }) => {}
            _ => panic!("Must return Fatal error"),
        }
        ledger.release(&owner, &[]).unwrap();

        let messages = ledger.into_messages(&owner);
        assert_eq!(
            vec![BankMsg::Send {
                to_address: "owner".into(),
                amount: coins(10, "stake"),
            }],
            messages
        );
    }
}
