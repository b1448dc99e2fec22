pub mod balance;
pub mod contract;
pub mod engine;
mod error;
pub mod index;
pub mod ledger;
mod mock;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
