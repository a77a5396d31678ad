//! Wallet session: which account, if any, the app sends transactions from.
//!
//! Connecting asks the provider for the accounts its signer controls and
//! picks one; disconnecting forgets it. Every connect attempt is numbered so
//! an answer that arrives after the user disconnected (or reconnected) is
//! ignored.

use alloy_primitives::Address;

/// Connection state of the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalletStatus {
    #[default]
    Disconnected,
    /// Waiting for the account list of attempt `n`.
    Connecting(u64),
    Connected(Address),
}

#[derive(Debug, Default)]
pub struct WalletSession {
    status: WalletStatus,
    attempts: u64,
    /// Account to prefer when the signer controls several.
    preferred: Option<Address>,
}

impl WalletSession {
    #[must_use]
    pub fn new(preferred: Option<Address>) -> Self {
        Self {
            preferred,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn status(&self) -> WalletStatus {
        self.status
    }

    /// Connected account, if any.
    #[must_use]
    pub const fn account(&self) -> Option<Address> {
        match self.status {
            WalletStatus::Connected(account) => Some(account),
            _ => None,
        }
    }

    /// Starts a connect attempt and returns its number.
    pub fn begin_connect(&mut self) -> u64 {
        self.attempts = self.attempts.wrapping_add(1);
        self.status = WalletStatus::Connecting(self.attempts);
        self.attempts
    }

    /// Completes connect attempt `attempt` with the signer's accounts.
    ///
    /// Returns `Ok(None)` if the attempt is no longer current.
    ///
    /// # Errors
    ///
    /// Returns a message when no usable account is available; the session
    /// falls back to disconnected.
    pub fn finish_connect(
        &mut self,
        attempt: u64,
        accounts: Result<Vec<Address>, String>,
    ) -> Result<Option<Address>, String> {
        if self.status != WalletStatus::Connecting(attempt) {
            return Ok(None);
        }

        let picked = accounts.and_then(|accounts| self.pick(&accounts));
        match picked {
            Ok(account) => {
                self.status = WalletStatus::Connected(account);
                Ok(Some(account))
            }
            Err(message) => {
                self.status = WalletStatus::Disconnected;
                Err(message)
            }
        }
    }

    /// Forgets the account. Any connect attempt in flight becomes stale.
    pub fn disconnect(&mut self) {
        self.status = WalletStatus::Disconnected;
    }

    fn pick(&self, accounts: &[Address]) -> Result<Address, String> {
        match self.preferred {
            Some(preferred) if accounts.contains(&preferred) => Ok(preferred),
            Some(preferred) => Err(format!("Account {preferred} is not managed by the node")),
            None => accounts
                .first()
                .copied()
                .ok_or_else(|| "The node manages no accounts".to_string()),
        }
    }
}

/// Shortens an address for display: `0x1234…abcd`.
#[must_use]
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

// ============================================================================
// Tests
// ============================================================================
