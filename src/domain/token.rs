//! NFT token identifiers and their content addresses.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Identifier of an NFT.
///
/// Zero is a valid id. "No item" is always expressed as `Option<TokenId>`,
/// never by comparing against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub U256);

impl TokenId {
    #[cfg(test)]
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(U256::from(id))
    }

    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Image location of this token: `{base_uri}/{id}.png`.
    #[must_use]
    pub fn image_url(&self, base_uri: &str) -> String {
        format!("{}/{}.png", base_uri.trim_end_matches('/'), self.0)
    }
}

impl From<U256> for TokenId {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const IPFS: &str = "https://ipfs.io/ipfs/QmZmsHnadyws9is5KApM1ovqLE5g31oVMgTT714yd1FkWj";

    #[rstest]
    #[case::zero(0, "0.png")]
    #[case::three(3, "3.png")]
    #[case::large(4_294_967_296, "4294967296.png")]
    fn test_image_url(#[case] id: u64, #[case] suffix: &str) {
        let url = TokenId::new(id).image_url(IPFS);
        assert_eq!(url, format!("{IPFS}/{suffix}"));
    }

    #[test]
    fn test_image_url_trims_trailing_slash() {
        assert_eq!(
            TokenId::new(7).image_url("https://host/base/"),
            "https://host/base/7.png"
        );
    }

    #[test]
    fn test_zero_is_a_present_id() {
        let maybe: Option<TokenId> = Some(TokenId::new(0));
        assert!(maybe.is_some());
        assert_eq!(maybe.map(|id| id.to_string()).as_deref(), Some("#0"));
    }
}
