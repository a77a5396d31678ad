//! The on-chain actions a user can start, and what each one needs.

use alloy_primitives::{Address, U256};

use super::WriteRequest;
use crate::domain::{ContractCall, ContractFunction, ContractSet, ReadKey, TokenId, TxError};
use crate::state::data::ReadCache;

/// One user-initiated write.
///
/// Per-item actions carry their token, so each NFT card owns independent flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TxAction {
    Mint,
    Approve(TokenId),
    Stake(TokenId),
    Unstake(TokenId),
}

/// Everything an action looks at to decide whether it can be prepared.
#[derive(Debug, Clone, Copy)]
pub struct ActionEnv<'a> {
    pub account: Option<Address>,
    pub contracts: &'a ContractSet,
    pub mint_price: U256,
    pub max_supply: U256,
    pub reads: &'a ReadCache,
}

impl<'a> ActionEnv<'a> {
    /// Approved operator for `token`, or `None` while the read is unresolved.
    #[must_use]
    pub fn approved_operator(&self, token: TokenId) -> Option<Address> {
        self.reads
            .resolved(&ReadKey::Approved(token))
            .and_then(|value| value.as_address())
    }

    /// `Some(true)` if the staking contract may move `token`; `None` while unknown.
    #[must_use]
    pub fn is_approved_for_staking(&self, token: TokenId) -> Option<bool> {
        let operator = self.approved_operator(token)?;
        Some(self.contracts.staking == Some(operator))
    }

    #[must_use]
    pub fn total_supply(&self) -> Option<U256> {
        self.reads
            .resolved(&ReadKey::TotalSupply)
            .and_then(|value| value.as_uint())
    }
}

impl TxAction {
    /// Button label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mint => "Mint NFT",
            Self::Approve(_) => "Approve",
            Self::Stake(_) => "Stake",
            Self::Unstake(_) => "Unstake & claim",
        }
    }

    #[must_use]
    pub const fn token(&self) -> Option<TokenId> {
        match self {
            Self::Mint => None,
            Self::Approve(token) | Self::Stake(token) | Self::Unstake(token) => Some(*token),
        }
    }

    /// Toast shown once the transaction confirms.
    #[must_use]
    pub const fn success_message(&self) -> &'static str {
        match self {
            Self::Mint => "Successfully minted your NFT!",
            Self::Approve(_) => "Successfully approved your NFT!",
            Self::Stake(_) => "Successfully staked your NFT!",
            Self::Unstake(_) => "Successfully unstaked your NFT with rewards!",
        }
    }

    /// Toast shown when the invocation fails.
    #[must_use]
    pub fn failure_message(&self, error: &TxError) -> String {
        match self.token() {
            Some(token) => format!("{} {token} failed: {error}", self.label()),
            None => format!("{} failed: {error}", self.label()),
        }
    }

    /// Reads made stale by a confirmed transaction sent from `from`.
    #[must_use]
    pub fn invalidates(&self, from: Address) -> Vec<ReadKey> {
        match self {
            Self::Mint => vec![ReadKey::TotalSupply, ReadKey::OwnedTokens(from)],
            Self::Approve(token) => vec![ReadKey::Approved(*token)],
            Self::Stake(_) => vec![ReadKey::OwnedTokens(from), ReadKey::StakedTokens(from)],
            // Transfers clear approvals, so a returned token must be re-checked.
            Self::Unstake(token) => vec![
                ReadKey::OwnedTokens(from),
                ReadKey::StakedTokens(from),
                ReadKey::TokenBalance(from),
                ReadKey::Approved(*token),
            ],
        }
    }

    /// Builds the write for the current inputs.
    ///
    /// # Errors
    ///
    /// Returns the reason the action is not available yet. Unresolved
    /// prerequisite reads always block the action.
    pub fn prepare(&self, env: &ActionEnv<'_>) -> Result<WriteRequest, String> {
        let from = env
            .account
            .ok_or_else(|| "Connect a wallet first".to_string())?;

        let call = match *self {
            Self::Mint => {
                let supply = env
                    .total_supply()
                    .ok_or_else(|| "Waiting for total supply".to_string())?;
                if supply >= env.max_supply {
                    return Err("Out of stock".to_string());
                }
                ContractCall::new(env.contracts.nft, ContractFunction::SafeMint { to: from })
                    .with_value(env.mint_price)
            }
            Self::Approve(token) => {
                let staking = staking_address(env)?;
                match env.is_approved_for_staking(token) {
                    None => return Err("Checking approval".to_string()),
                    Some(true) => return Err("Already approved".to_string()),
                    Some(false) => {}
                }
                ContractCall::new(
                    env.contracts.nft,
                    ContractFunction::Approve {
                        spender: staking,
                        token,
                    },
                )
            }
            Self::Stake(token) => {
                let staking = staking_address(env)?;
                match env.is_approved_for_staking(token) {
                    None => return Err("Checking approval".to_string()),
                    Some(false) => return Err("Approval required".to_string()),
                    Some(true) => {}
                }
                ContractCall::new(staking, ContractFunction::Stake(token))
            }
            Self::Unstake(token) => {
                ContractCall::new(staking_address(env)?, ContractFunction::Unstake(token))
            }
        };

        Ok(WriteRequest { from, call })
    }
}

fn staking_address(env: &ActionEnv<'_>) -> Result<Address, String> {
    env.contracts
        .staking
        .ok_or_else(|| "Staking contract not configured".to_string())
}

// ============================================================================
// Tests
// ============================================================================
