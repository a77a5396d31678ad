//! Shared test utilities and Mother pattern factories.
//!
//! [`MockProvider`] is an in-memory contract-call provider backed by a tiny
//! model of the NFT and staking contracts. Successful confirmations apply the
//! write to the model, so refetched reads observe the new chain state the way
//! they would against a node.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use ratatui::{Terminal, backend::TestBackend};
use rstest::fixture;

use crate::client::{ContractProvider, Receipt, SharedProvider};
use crate::domain::{
    ContractCall, ContractFunction, ContractSet, Network, NetworkConfig, ProviderError, TokenId,
};
use crate::state::{App, AppConfig, StartupOptions};

// ============================================================================
// Fixed Addresses
// ============================================================================

pub const ACCOUNT: Address = Address::new([0xaa; 20]);
pub const OTHER_ACCOUNT: Address = Address::new([0xbb; 20]);
pub const NFT: Address = Address::new([0x11; 20]);
pub const STAKING: Address = Address::new([0x22; 20]);

#[must_use]
pub fn contracts() -> ContractSet {
    ContractSet {
        nft: NFT,
        staking: Some(STAKING),
    }
}

// ============================================================================
// Mother Pattern Factories
// ============================================================================

pub struct ConfigMother;

impl ConfigMother {
    /// Local node, both contracts configured, ids start at zero.
    #[must_use]
    pub fn local() -> AppConfig {
        AppConfig {
            network: NetworkConfig::BuiltIn(Network::LocalNode),
            nft_address: NFT,
            staking_address: Some(STAKING),
            first_token_id: 0,
            max_supply: 5,
            ..AppConfig::default()
        }
    }

    /// BSC testnet, so explorer links are available.
    #[must_use]
    pub fn testnet() -> AppConfig {
        AppConfig {
            network: NetworkConfig::BuiltIn(Network::BscTestnet),
            ..Self::local()
        }
    }
}

// ============================================================================
// Mock Provider
// ============================================================================

/// In-memory state of the two contracts.
#[derive(Debug, Default, Clone)]
pub struct MockChain {
    pub total_supply: u64,
    pub owned: HashMap<Address, Vec<TokenId>>,
    pub staked: HashMap<Address, Vec<TokenId>>,
    pub approved: HashMap<TokenId, Address>,
    pub rewards: HashMap<TokenId, U256>,
    pub balances: HashMap<Address, U256>,
}

impl MockChain {
    /// Mints `count` tokens to `owner`.
    #[must_use]
    pub fn with_owned(mut self, owner: Address, ids: &[u64]) -> Self {
        for id in ids {
            self.owned.entry(owner).or_default().push(TokenId::new(*id));
            self.total_supply += 1;
        }
        self
    }

    #[must_use]
    pub fn with_staked(mut self, owner: Address, ids: &[u64]) -> Self {
        for id in ids {
            self.staked.entry(owner).or_default().push(TokenId::new(*id));
            self.total_supply += 1;
        }
        self
    }

    #[must_use]
    pub fn with_reward(mut self, id: u64, amount: U256) -> Self {
        self.rewards.insert(TokenId::new(id), amount);
        self
    }

    fn read(&self, function: &ContractFunction) -> Result<Vec<u8>, ProviderError> {
        let ids = |list: Option<&Vec<TokenId>>| -> Vec<U256> {
            list.map(|l| l.iter().map(TokenId::as_u256).collect())
                .unwrap_or_default()
        };
        let data = match function {
            ContractFunction::TotalSupply => U256::from(self.total_supply).abi_encode(),
            ContractFunction::GetApproved(token) => self
                .approved
                .get(token)
                .copied()
                .unwrap_or(Address::ZERO)
                .abi_encode(),
            ContractFunction::GetUserTokens(owner) => ids(self.owned.get(owner)).abi_encode(),
            ContractFunction::GetHolderTokens(owner) => ids(self.staked.get(owner)).abi_encode(),
            ContractFunction::CalculateTokens(token) => self
                .rewards
                .get(token)
                .copied()
                .unwrap_or_default()
                .abi_encode(),
            ContractFunction::BalanceOf(owner) => self
                .balances
                .get(owner)
                .copied()
                .unwrap_or_default()
                .abi_encode(),
            other => {
                return Err(ProviderError::rpc(-32000, format!("{} is not a view", other.name())));
            }
        };
        Ok(data)
    }

    fn check(&self, from: Address, call: &ContractCall) -> Result<(), String> {
        match &call.function {
            ContractFunction::SafeMint { .. } => Ok(()),
            ContractFunction::Approve { token, .. } => self.require_owner(from, *token),
            ContractFunction::Stake(token) => {
                self.require_owner(from, *token)?;
                if self.approved.get(token) == Some(&call.to) {
                    Ok(())
                } else {
                    Err("ERC721: caller is not token owner or approved".to_string())
                }
            }
            ContractFunction::Unstake(token) => {
                if self.staked.get(&from).is_some_and(|l| l.contains(token)) {
                    Ok(())
                } else {
                    Err("Not the staker".to_string())
                }
            }
            other => Err(format!("{} is not a write", other.name())),
        }
    }

    fn require_owner(&self, from: Address, token: TokenId) -> Result<(), String> {
        if self.owned.get(&from).is_some_and(|l| l.contains(&token)) {
            Ok(())
        } else {
            Err("ERC721: invalid token ID".to_string())
        }
    }

    fn apply(&mut self, from: Address, call: &ContractCall) {
        match &call.function {
            ContractFunction::SafeMint { to } => {
                let id = TokenId::new(self.total_supply);
                self.total_supply += 1;
                self.owned.entry(*to).or_default().push(id);
            }
            ContractFunction::Approve { spender, token } => {
                self.approved.insert(*token, *spender);
            }
            ContractFunction::Stake(token) => {
                if let Some(list) = self.owned.get_mut(&from) {
                    list.retain(|t| t != token);
                }
                self.approved.remove(token);
                self.staked.entry(from).or_default().push(*token);
            }
            ContractFunction::Unstake(token) => {
                if let Some(list) = self.staked.get_mut(&from) {
                    list.retain(|t| t != token);
                }
                self.owned.entry(from).or_default().push(*token);
                let reward = self.rewards.remove(token).unwrap_or_default();
                *self.balances.entry(from).or_default() += reward;
            }
            _ => {}
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<Address>,
    chain: MockChain,
    read_counts: HashMap<&'static str, usize>,
    simulations: usize,
    submitted: Vec<ContractCall>,
    pending: HashMap<TxHash, (Address, ContractCall)>,
    next_hash: u8,
    reject_submissions: bool,
    revert_confirmations: bool,
    hold_confirmations: bool,
}

/// Scriptable in-memory [`ContractProvider`].
#[derive(Debug, Default)]
pub struct MockProvider {
    state: Mutex<MockState>,
}

impl MockProvider {
    #[must_use]
    pub fn new(chain: MockChain) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockState {
                accounts: vec![ACCOUNT],
                chain,
                ..MockState::default()
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.lock().accounts = accounts;
    }

    /// Answers every submission with an EIP-1193 user rejection.
    pub fn reject_submissions(&self, reject: bool) {
        self.lock().reject_submissions = reject;
    }

    /// Mines every transaction with a failed status.
    pub fn revert_confirmations(&self, revert: bool) {
        self.lock().revert_confirmations = revert;
    }

    /// Never produces a receipt while set.
    pub fn hold_confirmations(&self, hold: bool) {
        self.lock().hold_confirmations = hold;
    }

    pub fn update_chain(&self, f: impl FnOnce(&mut MockChain)) {
        f(&mut self.lock().chain);
    }

    #[must_use]
    pub fn chain(&self) -> MockChain {
        self.lock().chain.clone()
    }

    /// Number of reads of the contract function `name`.
    #[must_use]
    pub fn read_count(&self, name: &str) -> usize {
        self.lock().read_counts.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn submitted(&self) -> Vec<ContractCall> {
        self.lock().submitted.clone()
    }

    #[must_use]
    pub fn simulations(&self) -> usize {
        self.lock().simulations
    }
}

#[async_trait]
impl ContractProvider for MockProvider {
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.lock().accounts.clone())
    }

    async fn read(&self, call: &ContractCall) -> Result<Bytes, ProviderError> {
        let mut state = self.lock();
        *state.read_counts.entry(call.function.name()).or_default() += 1;
        state.chain.read(&call.function).map(Bytes::from)
    }

    async fn simulate(&self, from: Address, call: &ContractCall) -> Result<(), ProviderError> {
        let mut state = self.lock();
        state.simulations += 1;
        state
            .chain
            .check(from, call)
            .map_err(|message| ProviderError::rpc(3, message))
    }

    async fn submit(&self, from: Address, call: &ContractCall) -> Result<TxHash, ProviderError> {
        let mut state = self.lock();
        if state.reject_submissions {
            return Err(ProviderError::rpc(4001, "User rejected the request."));
        }
        state.next_hash = state.next_hash.wrapping_add(1);
        let hash = TxHash::repeat_byte(state.next_hash);
        state.submitted.push(call.clone());
        state.pending.insert(hash, (from, call.clone()));
        Ok(hash)
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<Receipt, ProviderError> {
        let hold = self.lock().hold_confirmations;
        if hold {
            std::future::pending::<()>().await;
        }

        let mut state = self.lock();
        let Some((from, call)) = state.pending.remove(&hash) else {
            return Err(ProviderError::decode(format!("unknown transaction {hash}")));
        };
        let success = !state.revert_confirmations;
        if success {
            state.chain.apply(from, &call);
        }
        Ok(Receipt {
            hash,
            block_number: Some(1),
            success,
        })
    }
}

// ============================================================================
// rstest Fixtures
// ============================================================================

#[fixture]
pub fn test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(100, 40)).expect("terminal creation should succeed")
}

#[fixture]
pub fn test_terminal_80x24() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(80, 24)).expect("terminal creation should succeed")
}

/// App wired to `provider` with the local test configuration.
#[must_use]
pub fn mock_app(provider: &Arc<MockProvider>, config: AppConfig) -> App {
    let shared: SharedProvider = provider.clone();
    App::with_provider(config, shared, StartupOptions::default())
}

/// Runs spawned provider tasks and applies their messages until things settle.
pub async fn settle(app: &mut App) {
    for _ in 0..64 {
        tokio::task::yield_now().await;
        app.process_messages();
    }
}

/// Renders the app into a string buffer.
#[must_use]
pub fn render_to_string(app: &mut App, terminal: &mut Terminal<TestBackend>) -> String {
    terminal
        .draw(|frame| crate::ui::render(app, frame))
        .expect("draw should succeed");
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
