//! JSON-RPC contract-call provider.
//!
//! Talks to an EVM node over HTTP through alloy's provider. Writes are sent
//! with `eth_sendTransaction`, so the node (or the wallet proxy in front of it)
//! holds the keys and does the signing.

use std::future::IntoFuture;
use std::time::Duration;

use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::{Address, Bytes, TxHash, TxKind};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::{TransactionInput, TransactionReceipt, TransactionRequest};
use alloy_transport::TransportResult;
use alloy_transport_http::Http;
use async_trait::async_trait;
use reqwest::Url;
use tokio::time::Instant;

use super::{ContractProvider, Receipt};
use crate::domain::{ContractCall, ProviderError};

const USER_AGENT: &str = concat!("nftstake/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Settings
// ============================================================================

/// Tuning for the JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct RpcSettings {
    /// Node endpoint.
    pub url: Url,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Delay between receipt polls.
    pub receipt_poll_interval: Duration,
    /// Give up waiting for a receipt after this long.
    pub receipt_timeout: Duration,
}

impl RpcSettings {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            request_timeout: Duration::from_secs(30),
            receipt_poll_interval: Duration::from_secs(2),
            receipt_timeout: Duration::from_secs(120),
        }
    }

    #[must_use]
    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }
}

fn transaction(from: Option<Address>, call: &ContractCall) -> TransactionRequest {
    TransactionRequest {
        from,
        to: Some(TxKind::Call(call.to)),
        value: (!call.value.is_zero()).then_some(call.value),
        input: TransactionInput::new(call.calldata()),
        ..Default::default()
    }
}

impl From<&TransactionReceipt> for Receipt {
    fn from(raw: &TransactionReceipt) -> Self {
        Self {
            hash: raw.transaction_hash(),
            block_number: raw.block_number(),
            success: raw.status(),
        }
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Contract-call provider backed by a JSON-RPC node.
pub struct JsonRpcProvider {
    inner: RootProvider<Ethereum>,
    settings: RpcSettings,
}

impl std::fmt::Debug for JsonRpcProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcProvider")
            .field("url", &self.settings.url.as_str())
            .finish_non_exhaustive()
    }
}

impl JsonRpcProvider {
    /// Builds the HTTP transport for `settings.url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] if the HTTP client cannot be built.
    pub fn new(settings: RpcSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let transport = Http::with_client(client, settings.url.clone());
        let inner = RootProvider::new(RpcClient::new(transport, false));
        Ok(Self { inner, settings })
    }

    async fn request<T>(
        &self,
        method: &'static str,
        call: impl IntoFuture<Output = TransportResult<T>>,
    ) -> Result<T, ProviderError> {
        tracing::debug!(method, "JSON-RPC request");
        call.await
            .map_err(ProviderError::from)
            .inspect_err(|e| tracing::debug!(method, error = %e, "JSON-RPC error"))
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ProviderError> {
        let raw = self
            .request(
                "eth_getTransactionReceipt",
                self.inner.get_transaction_receipt(hash),
            )
            .await?;
        Ok(raw.as_ref().map(Receipt::from))
    }
}

#[async_trait]
impl ContractProvider for JsonRpcProvider {
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.request("eth_accounts", self.inner.get_accounts()).await
    }

    async fn read(&self, call: &ContractCall) -> Result<Bytes, ProviderError> {
        self.request("eth_call", self.inner.call(transaction(None, call)))
            .await
    }

    async fn simulate(&self, from: Address, call: &ContractCall) -> Result<(), ProviderError> {
        self.request("eth_call", self.inner.call(transaction(Some(from), call)))
            .await?;
        Ok(())
    }

    async fn submit(&self, from: Address, call: &ContractCall) -> Result<TxHash, ProviderError> {
        let pending = self
            .request(
                "eth_sendTransaction",
                self.inner.send_transaction(transaction(Some(from), call)),
            )
            .await?;
        let hash = *pending.tx_hash();
        tracing::info!(%hash, function = call.function.name(), "transaction submitted");
        Ok(hash)
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<Receipt, ProviderError> {
        let deadline = Instant::now() + self.settings.receipt_timeout;
        loop {
            match self.receipt(hash).await {
                Ok(Some(receipt)) => {
                    tracing::info!(%hash, success = receipt.success, "receipt observed");
                    return Ok(receipt);
                }
                Ok(None) => {}
                Err(e) if e.is_transient() => {
                    tracing::warn!(%hash, error = %e, "receipt poll failed, retrying");
                }
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(ProviderError::Timeout {
                    secs: self.settings.receipt_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.settings.receipt_poll_interval).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
