//! Contract interfaces, call descriptors and read keys.
//!
//! The minter exposes two contracts: the NFT contract (mint, approve, owned
//! tokens) and the staking/reward-token contract (stake, unstake, rewards,
//! holder tokens, balance). Every call the app makes is described by a
//! [`ContractCall`]; every cached read is identified by a [`ReadKey`].

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue, sol};

use super::error::ProviderError;
use super::token::TokenId;

sol! {
    interface INftMinter {
        function totalSupply() external view returns (uint256);
        function safeMint(address to) external payable;
        function getApproved(uint256 tokenId) external view returns (address);
        function approve(address to, uint256 tokenId) external;
        function getUserTokens(address owner) external view returns (uint256[] memory);
    }

    interface IStakingToken {
        function stake(uint256 tokenId) external;
        function unstake(uint256 tokenId) external;
        function calculateTokens(uint256 tokenId) external view returns (uint256);
        function getHolderTokens(address owner) external view returns (uint256[] memory);
        function balanceOf(address owner) external view returns (uint256);
    }
}

// ============================================================================
// Contract Addresses
// ============================================================================

/// Addresses of the deployed contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractSet {
    /// The NFT contract.
    pub nft: Address,
    /// The staking / reward-token contract. Staking is unavailable without it.
    pub staking: Option<Address>,
}

impl ContractSet {
    /// Returns the staking contract address.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] when no staking contract is set.
    pub fn staking(&self) -> Result<Address, ProviderError> {
        self.staking
            .ok_or(ProviderError::NotConfigured("Staking contract"))
    }
}

// ============================================================================
// Contract Functions
// ============================================================================

/// A contract function together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    TotalSupply,
    SafeMint { to: Address },
    GetApproved(TokenId),
    Approve { spender: Address, token: TokenId },
    GetUserTokens(Address),
    Stake(TokenId),
    Unstake(TokenId),
    CalculateTokens(TokenId),
    GetHolderTokens(Address),
    BalanceOf(Address),
}

impl ContractFunction {
    /// Solidity function name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TotalSupply => "totalSupply",
            Self::SafeMint { .. } => "safeMint",
            Self::GetApproved(_) => "getApproved",
            Self::Approve { .. } => "approve",
            Self::GetUserTokens(_) => "getUserTokens",
            Self::Stake(_) => "stake",
            Self::Unstake(_) => "unstake",
            Self::CalculateTokens(_) => "calculateTokens",
            Self::GetHolderTokens(_) => "getHolderTokens",
            Self::BalanceOf(_) => "balanceOf",
        }
    }

    /// ABI-encoded calldata (selector followed by the arguments).
    #[must_use]
    pub fn calldata(&self) -> Bytes {
        let encoded = match self {
            Self::TotalSupply => INftMinter::totalSupplyCall {}.abi_encode(),
            Self::SafeMint { to } => INftMinter::safeMintCall { to: *to }.abi_encode(),
            Self::GetApproved(token) => INftMinter::getApprovedCall {
                tokenId: token.as_u256(),
            }
            .abi_encode(),
            Self::Approve { spender, token } => INftMinter::approveCall {
                to: *spender,
                tokenId: token.as_u256(),
            }
            .abi_encode(),
            Self::GetUserTokens(owner) => {
                INftMinter::getUserTokensCall { owner: *owner }.abi_encode()
            }
            Self::Stake(token) => IStakingToken::stakeCall {
                tokenId: token.as_u256(),
            }
            .abi_encode(),
            Self::Unstake(token) => IStakingToken::unstakeCall {
                tokenId: token.as_u256(),
            }
            .abi_encode(),
            Self::CalculateTokens(token) => IStakingToken::calculateTokensCall {
                tokenId: token.as_u256(),
            }
            .abi_encode(),
            Self::GetHolderTokens(owner) => {
                IStakingToken::getHolderTokensCall { owner: *owner }.abi_encode()
            }
            Self::BalanceOf(owner) => IStakingToken::balanceOfCall { owner: *owner }.abi_encode(),
        };
        Bytes::from(encoded)
    }
}

// ============================================================================
// Call Descriptor
// ============================================================================

/// Everything needed to read from or write to a contract.
///
/// Built fresh from the current account and inputs; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractCall {
    /// Target contract.
    pub to: Address,
    /// Function and arguments.
    pub function: ContractFunction,
    /// Native value attached to the call, in wei.
    pub value: U256,
}

impl ContractCall {
    #[must_use]
    pub fn new(to: Address, function: ContractFunction) -> Self {
        Self {
            to,
            function,
            value: U256::ZERO,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn calldata(&self) -> Bytes {
        self.function.calldata()
    }
}

// ============================================================================
// Read Keys
// ============================================================================

/// Identifies one cached contract read.
///
/// Each key resolves to exactly one contract + function + arguments triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadKey {
    /// `totalSupply()` on the NFT contract.
    TotalSupply,
    /// `getApproved(id)` on the NFT contract.
    Approved(TokenId),
    /// `getUserTokens(owner)` on the NFT contract.
    OwnedTokens(Address),
    /// `getHolderTokens(owner)` on the staking contract.
    StakedTokens(Address),
    /// `calculateTokens(id)` on the staking contract.
    Rewards(TokenId),
    /// `balanceOf(owner)` on the reward-token contract.
    TokenBalance(Address),
}

impl ReadKey {
    /// Builds the call this key reads.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] for staking reads when no
    /// staking contract is configured.
    pub fn call(&self, contracts: &ContractSet) -> Result<ContractCall, ProviderError> {
        let call = match *self {
            Self::TotalSupply => ContractCall::new(contracts.nft, ContractFunction::TotalSupply),
            Self::Approved(token) => {
                ContractCall::new(contracts.nft, ContractFunction::GetApproved(token))
            }
            Self::OwnedTokens(owner) => {
                ContractCall::new(contracts.nft, ContractFunction::GetUserTokens(owner))
            }
            Self::StakedTokens(owner) => ContractCall::new(
                contracts.staking()?,
                ContractFunction::GetHolderTokens(owner),
            ),
            Self::Rewards(token) => ContractCall::new(
                contracts.staking()?,
                ContractFunction::CalculateTokens(token),
            ),
            Self::TokenBalance(owner) => {
                ContractCall::new(contracts.staking()?, ContractFunction::BalanceOf(owner))
            }
        };
        Ok(call)
    }

    /// Decodes the raw return data of this key's call.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Decode`] if the data does not match the return type.
    pub fn decode(&self, data: &[u8]) -> Result<ReadValue, ProviderError> {
        let decode_err =
            |e: alloy_sol_types::Error| ProviderError::decode(format!("{self:?}: {e}"));
        match self {
            Self::TotalSupply | Self::Rewards(_) | Self::TokenBalance(_) => U256::abi_decode(data)
                .map(ReadValue::Uint)
                .map_err(decode_err),
            Self::Approved(_) => Address::abi_decode(data)
                .map(ReadValue::Address)
                .map_err(decode_err),
            Self::OwnedTokens(_) | Self::StakedTokens(_) => Vec::<U256>::abi_decode(data)
                .map(|ids| ReadValue::Tokens(ids.into_iter().map(TokenId::from).collect()))
                .map_err(decode_err),
        }
    }

    /// Reads that track continuously changing values and are re-polled while visible.
    #[must_use]
    pub const fn is_watched(&self) -> bool {
        matches!(self, Self::Rewards(_) | Self::TokenBalance(_))
    }
}

/// A decoded read result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadValue {
    Uint(U256),
    Address(Address),
    Tokens(Vec<TokenId>),
}

impl ReadValue {
    #[must_use]
    pub const fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(address) => Some(*address),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tokens(&self) -> Option<&[TokenId]> {
        match self {
            Self::Tokens(tokens) => Some(tokens),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn contracts() -> ContractSet {
        ContractSet {
            nft: Address::repeat_byte(0x11),
            staking: Some(Address::repeat_byte(0x22)),
        }
    }

    #[rstest]
    #[case::total_supply(ContractFunction::TotalSupply, [0x18, 0x16, 0x0d, 0xdd])]
    #[case::safe_mint(ContractFunction::SafeMint { to: Address::ZERO }, [0x40, 0xd0, 0x97, 0xc3])]
    #[case::approve(
        ContractFunction::Approve { spender: Address::ZERO, token: TokenId::new(1) },
        [0x09, 0x5e, 0xa7, 0xb3]
    )]
    #[case::get_approved(ContractFunction::GetApproved(TokenId::new(1)), [0x08, 0x18, 0x12, 0xfc])]
    #[case::balance_of(ContractFunction::BalanceOf(Address::ZERO), [0x70, 0xa0, 0x82, 0x31])]
    fn test_function_selectors(#[case] function: ContractFunction, #[case] selector: [u8; 4]) {
        assert_eq!(&function.calldata()[..4], &selector);
    }

    #[test]
    fn test_stake_calldata_encodes_token_id() {
        let data = ContractFunction::Stake(TokenId::new(3)).calldata();
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(data[35], 3);
        assert!(data[4..35].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_read_key_targets() {
        let set = contracts();
        let owner = Address::repeat_byte(0xaa);

        assert_eq!(ReadKey::TotalSupply.call(&set).unwrap().to, set.nft);
        assert_eq!(ReadKey::OwnedTokens(owner).call(&set).unwrap().to, set.nft);
        assert_eq!(
            ReadKey::StakedTokens(owner).call(&set).unwrap().function,
            ContractFunction::GetHolderTokens(owner)
        );
        assert_eq!(
            ReadKey::Rewards(TokenId::new(0)).call(&set).unwrap().to,
            Address::repeat_byte(0x22)
        );
    }

    #[test]
    fn test_staking_reads_require_staking_contract() {
        let set = ContractSet {
            staking: None,
            ..contracts()
        };
        assert!(matches!(
            ReadKey::TokenBalance(Address::ZERO).call(&set),
            Err(ProviderError::NotConfigured(_))
        ));
        assert!(ReadKey::TotalSupply.call(&set).is_ok());
    }

    #[test]
    fn test_decode_values() {
        let supply = U256::from(4u64).abi_encode();
        assert_eq!(
            ReadKey::TotalSupply.decode(&supply).unwrap(),
            ReadValue::Uint(U256::from(4u64))
        );

        let approved = Address::repeat_byte(0x22).abi_encode();
        assert_eq!(
            ReadKey::Approved(TokenId::new(0))
                .decode(&approved)
                .unwrap()
                .as_address(),
            Some(Address::repeat_byte(0x22))
        );

        let ids = vec![U256::from(0u64), U256::from(3u64)].abi_encode();
        let decoded = ReadKey::OwnedTokens(Address::ZERO).decode(&ids).unwrap();
        assert_eq!(
            decoded.as_tokens(),
            Some(&[TokenId::new(0), TokenId::new(3)][..])
        );
    }

    #[test]
    fn test_decode_rejects_short_data() {
        assert!(matches!(
            ReadKey::TotalSupply.decode(&[0u8; 4]),
            Err(ProviderError::Decode { .. })
        ));
    }

    #[test]
    fn test_watched_reads() {
        assert!(ReadKey::Rewards(TokenId::new(1)).is_watched());
        assert!(ReadKey::TokenBalance(Address::ZERO).is_watched());
        assert!(!ReadKey::TotalSupply.is_watched());
        assert!(!ReadKey::Approved(TokenId::new(1)).is_watched());
    }
}
