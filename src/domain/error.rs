//! Error types for contract calls and transaction flows.
//!
//! [`ProviderError`] describes what went wrong while talking to the chain.
//! [`TxError`] is the user-facing taxonomy a transaction flow settles into.

use alloy_transport::{RpcError, TransportError};
use thiserror::Error;

/// EIP-1193 code for a request the user declined to sign.
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC codes a node returns for momentary trouble on its side.
const TRANSIENT_RPC_CODES: [i64; 2] = [-32603, -32005];

// ============================================================================
// Provider Errors
// ============================================================================

/// Error returned by a contract-call provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a JSON-RPC answer (connection, HTTP status).
    #[error("Network error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message reported by the node.
        message: String,
    },

    /// The response could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of what failed to decode.
        message: String,
    },

    /// No receipt appeared before the confirmation deadline.
    #[error("Timed out after {secs}s waiting for confirmation")]
    Timeout {
        /// Seconds waited.
        secs: u64,
    },

    /// A required contract address or account is missing.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl ProviderError {
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Returns `true` if the signer declined the request.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::Rpc { code, message } => {
                *code == USER_REJECTED_CODE || message.to_ascii_lowercase().contains("user denied")
            }
            _ => false,
        }
    }

    /// Returns `true` if retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rpc { code, .. } => TRANSIENT_RPC_CODES.contains(code),
            _ => false,
        }
    }
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => Self::rpc(payload.code, payload.message.to_string()),
            RpcError::NullResp => Self::decode("node returned a null response"),
            RpcError::DeserError { err, .. } => Self::decode(err.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

// ============================================================================
// Transaction Errors
// ============================================================================

/// Why a transaction flow failed.
///
/// Every variant is recoverable: the flow returns to idle and the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// The signer declined the transaction.
    #[error("Transaction rejected by the signer")]
    UserRejected,

    /// Prerequisites not met or the call would revert.
    #[error("Transaction would fail: {0}")]
    SimulationFailed(String),

    /// The transaction could not be submitted.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// The transaction was mined but reverted, or its receipt never arrived.
    #[error("Transaction failed on-chain: {0}")]
    ConfirmationFailed(String),
}

impl TxError {
    /// Classifies an error raised while submitting a write.
    #[must_use]
    pub fn from_submission(err: &ProviderError) -> Self {
        if err.is_user_rejection() {
            Self::UserRejected
        } else {
            Self::SubmissionFailed(err.to_string())
        }
    }

    /// Classifies an error raised while waiting for a receipt.
    #[must_use]
    pub fn from_confirmation(err: &ProviderError) -> Self {
        Self::ConfirmationFailed(err.to_string())
    }

    /// Classifies an error raised while simulating a write.
    #[must_use]
    pub fn from_simulation(err: &ProviderError) -> Self {
        match err {
            ProviderError::Rpc { message, .. } => Self::SimulationFailed(message.clone()),
            other => Self::SimulationFailed(other.to_string()),
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

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::rpc(-32000, "execution reverted").to_string(),
            "RPC error -32000: execution reverted"
        );
        assert_eq!(
            ProviderError::decode("bad hex").to_string(),
            "Decode error: bad hex"
        );
        assert_eq!(
            ProviderError::NotConfigured("Staking contract").to_string(),
            "Staking contract is not configured"
        );
    }

    #[rstest]
    #[case::eip1193(ProviderError::rpc(4001, "rejected"), true)]
    #[case::metamask_text(ProviderError::rpc(-32603, "MetaMask: User denied transaction"), true)]
    #[case::revert(ProviderError::rpc(3, "execution reverted"), false)]
    #[case::timeout(ProviderError::Timeout { secs: 5 }, false)]
    fn test_user_rejection_detection(#[case] err: ProviderError, #[case] expected: bool) {
        assert_eq!(err.is_user_rejection(), expected);
    }

    #[rstest]
    #[case::http(ProviderError::Transport("HTTP error 502".into()), true)]
    #[case::internal(ProviderError::rpc(-32603, "internal error"), true)]
    #[case::invalid_params(ProviderError::rpc(-32602, "invalid argument"), false)]
    #[case::decode(ProviderError::decode("bad hex"), false)]
    fn test_transient_detection(#[case] err: ProviderError, #[case] expected: bool) {
        assert_eq!(err.is_transient(), expected);
    }

    #[test]
    fn test_transport_error_mapping() {
        let payload = alloy_json_rpc::ErrorPayload {
            code: 4001,
            message: "User rejected the request.".into(),
            data: None,
        };
        let err = ProviderError::from(TransportError::ErrorResp(payload));
        assert!(err.is_user_rejection());

        assert!(matches!(
            ProviderError::from(TransportError::NullResp),
            ProviderError::Decode { .. }
        ));
    }

    #[test]
    fn test_tx_error_classification() {
        assert_eq!(
            TxError::from_submission(&ProviderError::rpc(4001, "no")),
            TxError::UserRejected
        );
        assert!(matches!(
            TxError::from_submission(&ProviderError::rpc(-32000, "nonce too low")),
            TxError::SubmissionFailed(msg) if msg.contains("nonce too low")
        ));
        assert_eq!(
            TxError::from_simulation(&ProviderError::rpc(3, "ERC721: invalid token ID")),
            TxError::SimulationFailed("ERC721: invalid token ID".to_string())
        );
        assert!(matches!(
            TxError::from_confirmation(&ProviderError::Timeout { secs: 120 }),
            TxError::ConfirmationFailed(_)
        ));
    }
}
