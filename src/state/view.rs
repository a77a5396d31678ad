//! Derived view state.
//!
//! Everything the views show is a pure function of the connected account,
//! the read cache and the flow registry. Nothing here is stored; it is
//! recomputed on every render and on every reconcile pass.

use alloy_primitives::{Address, TxHash, U256};

use super::config::AppConfig;
use super::data::ReadCache;
use super::navigation::View;
use crate::domain::{ReadKey, TokenId, format_ether, format_units};
use crate::flow::{ActionEnv, FlowRegistry, FlowState, Outcome, Readiness, TxAction, WriteRequest};

/// Borrowed inputs of every derivation.
#[derive(Debug, Clone, Copy)]
pub struct ViewInputs<'a> {
    pub account: Option<Address>,
    pub config: &'a AppConfig,
    pub reads: &'a ReadCache,
    pub flows: &'a FlowRegistry,
}

// ============================================================================
// Actions
// ============================================================================

/// What a button for one action should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState {
    /// No account; the button asks the user to connect.
    ConnectWallet,
    /// Not executable, with the reason.
    Unavailable(String),
    /// The current inputs are being simulated.
    Checking,
    /// Executable.
    Ready,
    /// Submitted or being submitted.
    Pending(Option<TxHash>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub action: TxAction,
    pub state: ActionState,
    /// Hash of the last confirmed invocation.
    pub confirmed: Option<TxHash>,
    /// Error of the last failed invocation.
    pub last_error: Option<String>,
}

impl ActionView {
    #[must_use]
    pub fn new(action: TxAction, inputs: &ViewInputs<'_>) -> Self {
        let flow = inputs.flows.get(&action);
        let state = match (inputs.account, flow.map(|f| f.state())) {
            (_, Some(FlowState::Pending(hash))) => ActionState::Pending(*hash),
            (None, _) => ActionState::ConnectWallet,
            (Some(_), None) => ActionState::Checking,
            (Some(_), Some(FlowState::Prepared)) => ActionState::Ready,
            (Some(_), Some(FlowState::Idle(Readiness::Simulating))) => ActionState::Checking,
            (Some(_), Some(FlowState::Idle(Readiness::NotReady(reason)))) => {
                ActionState::Unavailable(reason.clone())
            }
            (Some(_), Some(FlowState::Idle(Readiness::Rejected(error)))) => {
                ActionState::Unavailable(error.to_string())
            }
        };
        let (confirmed, last_error) = match flow.and_then(|f| f.outcome()) {
            Some(Outcome::Confirmed(hash)) => (Some(*hash), None),
            Some(Outcome::Failed(error)) => (None, Some(error.to_string())),
            None => (None, None),
        };
        Self {
            action,
            state,
            confirmed,
            last_error,
        }
    }
}

// ============================================================================
// Minter
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintView {
    /// Total supply is still loading.
    Loading,
    /// Total supply could not be read.
    Failed(String),
    /// Every token has been minted.
    OutOfStock,
    Available {
        next_id: TokenId,
        image_url: String,
        price: String,
        action: ActionView,
    },
}

#[must_use]
pub fn mint_view(inputs: &ViewInputs<'_>) -> MintView {
    let Some(supply) = inputs
        .reads
        .value(&ReadKey::TotalSupply)
        .and_then(|v| v.as_uint())
    else {
        return match inputs.reads.error(&ReadKey::TotalSupply) {
            Some(error) => MintView::Failed(error.to_string()),
            None => MintView::Loading,
        };
    };

    if supply >= inputs.config.max_supply() {
        return MintView::OutOfStock;
    }

    let next_id = TokenId(U256::from(inputs.config.first_token_id).saturating_add(supply));
    MintView::Available {
        next_id,
        image_url: next_id.image_url(&inputs.config.ipfs_uri),
        price: format_ether(inputs.config.mint_price),
        action: ActionView::new(TxAction::Mint, inputs),
    }
}

// ============================================================================
// Gallery
// ============================================================================

/// Where a card lives and what its token needs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStage {
    /// Owned; approval not yet known.
    CheckingApproval,
    /// Owned; the staking contract must be approved first.
    NeedsApproval,
    /// Owned and approved.
    ReadyToStake,
    /// Held by the staking contract.
    Staked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCard {
    pub token: TokenId,
    pub image_url: String,
    pub stage: CardStage,
    /// Formatted reward amount, for staked cards once resolved.
    pub rewards: Option<String>,
    pub action: ActionView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    Disconnected,
    Loading,
    Failed(String),
    Loaded {
        owned: Vec<NftCard>,
        /// `None` when no staking contract is configured.
        staked: Option<Vec<NftCard>>,
    },
}

impl GalleryView {
    /// All cards, owned first, in selection order.
    #[must_use]
    pub fn cards(&self) -> Vec<&NftCard> {
        match self {
            Self::Loaded { owned, staked } => owned
                .iter()
                .chain(staked.iter().flatten())
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn token_list(reads: &ReadCache, key: &ReadKey) -> Option<Vec<TokenId>> {
    reads
        .value(key)
        .and_then(|v| v.as_tokens())
        .map(<[TokenId]>::to_vec)
}

#[must_use]
pub fn gallery_view(inputs: &ViewInputs<'_>) -> GalleryView {
    let Some(account) = inputs.account else {
        return GalleryView::Disconnected;
    };
    let config = inputs.config;
    let staking = config.staking_address;

    let owned_key = ReadKey::OwnedTokens(account);
    let staked_key = ReadKey::StakedTokens(account);

    let Some(owned_ids) = token_list(inputs.reads, &owned_key) else {
        return match inputs.reads.error(&owned_key) {
            Some(error) => GalleryView::Failed(error.to_string()),
            None => GalleryView::Loading,
        };
    };
    let staked_ids = match staking {
        Some(_) => match token_list(inputs.reads, &staked_key) {
            Some(ids) => Some(ids),
            None => {
                return match inputs.reads.error(&staked_key) {
                    Some(error) => GalleryView::Failed(error.to_string()),
                    None => GalleryView::Loading,
                };
            }
        },
        None => None,
    };

    let owned = owned_ids
        .into_iter()
        .map(|token| {
            let approved = inputs
                .reads
                .value(&ReadKey::Approved(token))
                .and_then(|v| v.as_address());
            let (stage, action) = match approved {
                None => (CardStage::CheckingApproval, TxAction::Approve(token)),
                Some(operator) if staking == Some(operator) => {
                    (CardStage::ReadyToStake, TxAction::Stake(token))
                }
                Some(_) => (CardStage::NeedsApproval, TxAction::Approve(token)),
            };
            NftCard {
                token,
                image_url: token.image_url(&config.ipfs_uri),
                stage,
                rewards: None,
                action: ActionView::new(action, inputs),
            }
        })
        .collect();

    let staked = staked_ids.map(|ids| {
        ids.into_iter()
            .map(|token| NftCard {
                token,
                image_url: token.image_url(&config.ipfs_uri),
                stage: CardStage::Staked,
                rewards: inputs
                    .reads
                    .value(&ReadKey::Rewards(token))
                    .and_then(|v| v.as_uint())
                    .map(|amount| format_units(amount, config.token_decimals)),
                action: ActionView::new(TxAction::Unstake(token), inputs),
            })
            .collect()
    });

    GalleryView::Loaded { owned, staked }
}

// ============================================================================
// Header
// ============================================================================

/// Formatted reward-token balance of the connected account.
#[must_use]
pub fn token_balance(inputs: &ViewInputs<'_>) -> Option<String> {
    let account = inputs.account?;
    inputs.config.staking_address?;
    inputs
        .reads
        .value(&ReadKey::TokenBalance(account))
        .and_then(|v| v.as_uint())
        .map(|amount| format_units(amount, inputs.config.token_decimals))
}

// ============================================================================
// Reads and Actions per View
// ============================================================================

/// Reads the mounted view (and the header) depend on.
///
/// Dependent reads appear as soon as the reads they depend on have a value:
/// approval per owned token, rewards per staked token.
#[must_use]
pub fn visible_reads(view: View, inputs: &ViewInputs<'_>) -> Vec<ReadKey> {
    let staking = inputs.config.staking_address.is_some();
    let mut keys = Vec::new();

    if let (Some(account), true) = (inputs.account, staking) {
        keys.push(ReadKey::TokenBalance(account));
    }

    match view {
        View::Minter => keys.push(ReadKey::TotalSupply),
        View::Gallery => {
            let Some(account) = inputs.account else {
                return keys;
            };
            keys.push(ReadKey::OwnedTokens(account));
            if let Some(owned) = token_list(inputs.reads, &ReadKey::OwnedTokens(account)) {
                keys.extend(owned.into_iter().map(ReadKey::Approved));
            }
            if staking {
                keys.push(ReadKey::StakedTokens(account));
                if let Some(staked) = token_list(inputs.reads, &ReadKey::StakedTokens(account)) {
                    keys.extend(staked.into_iter().map(ReadKey::Rewards));
                }
            }
        }
    }
    keys
}

/// Actions the mounted view offers, each with its current inputs.
#[must_use]
pub fn desired_actions(
    view: View,
    inputs: &ViewInputs<'_>,
) -> Vec<(TxAction, Result<WriteRequest, String>)> {
    let contracts = inputs.config.contracts();
    let env = ActionEnv {
        account: inputs.account,
        contracts: &contracts,
        mint_price: inputs.config.mint_price,
        max_supply: inputs.config.max_supply(),
        reads: inputs.reads,
    };

    let actions: Vec<TxAction> = match view {
        View::Minter => vec![TxAction::Mint],
        View::Gallery => {
            let Some(account) = inputs.account else {
                return Vec::new();
            };
            let owned = token_list(inputs.reads, &ReadKey::OwnedTokens(account)).unwrap_or_default();
            let staked = token_list(inputs.reads, &ReadKey::StakedTokens(account)).unwrap_or_default();
            owned
                .into_iter()
                .flat_map(|token| [TxAction::Approve(token), TxAction::Stake(token)])
                .chain(staked.into_iter().map(TxAction::Unstake))
                .collect()
        }
    };

    actions
        .into_iter()
        .map(|action| (action, action.prepare(&env)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
