//! Computes the solver's net token-0 exposure for a batch and submits the
//! settlement transaction, with exponential-backoff retry reserved for
//! genuinely transient RPC failures.

mod provider;

use std::time::Duration;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use chain_domain::{Order, PoolKey};

pub use provider::AlloyCoordinatorWriter;

/// Retry budget for the transport-level calls within one settlement
/// submission. Coordinator reverts (classified as [`RejectReason`]) never
/// reach this retry loop — only `Err` from the writer trait does.
const MAX_RETRIES: u32 = 3;
const BASE_DELAY: Duration = Duration::from_millis(500);

/// A coordinator revert, classified so the caller can decide whether it is
/// worth ever retrying (it never is — reverts are deterministic given the
/// submitted inputs).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("proof rejected by verifier")]
    InvalidProof,
    #[error("batch is not in the settle phase")]
    BatchNotInSettle,
    #[error("batch already settled")]
    AlreadySettled,
    #[error("submitted orders root does not match the committed batch")]
    OrdersRootMismatch,
    #[error("coordinator reverted: {0}")]
    Unknown(String),
}

impl RejectReason {
    /// Classifies a revert reason string from the coordinator. Matching is
    /// substring-based because revert reasons may carry additional encoded
    /// context the circuit/contract appends.
    pub fn classify(revert_message: &str) -> Self {
        if revert_message.contains("InvalidProof") {
            Self::InvalidProof
        } else if revert_message.contains("BatchNotInSettle") {
            Self::BatchNotInSettle
        } else if revert_message.contains("AlreadySettled") {
            Self::AlreadySettled
        } else if revert_message.contains("OrdersRootMismatch") {
            Self::OrdersRootMismatch
        } else {
            Self::Unknown(revert_message.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// RPC/transport failure — the *same* attempt may well succeed on
    /// retry. Only this variant is ever retried.
    #[error("transient settlement failure: {0}")]
    Transient(#[source] anyhow::Error),
    /// A deterministic rejection from the coordinator. Retrying would just
    /// reproduce the same revert.
    #[error("settlement rejected: {0}")]
    Rejected(#[from] RejectReason),
}

/// The write surface of the coordinator contract this pipeline needs.
/// `settle_batch` returns `Ok(Err(reason))`, not an `Err`, for a
/// coordinator-side revert — only transport-level failures are `Err`, so a
/// retry wrapper around this trait only ever retries what's actually
/// retryable.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait CoordinatorWriter: Send + Sync {
    async fn approve(&self, spender: Address, amount: U256) -> Result<(), anyhow::Error>;
    async fn settle_batch(
        &self,
        pool_key: PoolKey,
        proof_hex: &str,
        public_inputs_hex: &[String; 25],
    ) -> Result<Result<(), RejectReason>, anyhow::Error>;
}

/// Computes `max(0, Σ fill[buy] − Σ fill[sell])`: the amount of token-0 the
/// hook will pull from the solver to cover buyer fills beyond what sellers
/// deposited.
pub fn net_solver_token0(orders: &[Order], fills: &[u128]) -> u128 {
    let buy_total: u128 = orders
        .iter()
        .zip(fills)
        .filter(|(order, _)| order.is_buy)
        .map(|(_, fill)| fill)
        .sum();
    let sell_total: u128 = orders
        .iter()
        .zip(fills)
        .filter(|(order, _)| !order.is_buy)
        .map(|(_, fill)| fill)
        .sum();
    buy_total.saturating_sub(sell_total)
}

/// Submits one settlement: conditionally approves token-0, then calls
/// `settleBatch`. Approval is skipped when `net_solver_token0 == 0`.
pub async fn submit_settlement(
    writer: &dyn CoordinatorWriter,
    hook: Address,
    pool_key: PoolKey,
    orders: &[Order],
    fills: &[u128],
    proof_hex: &str,
    public_inputs_hex: &[String; 25],
) -> Result<(), SettlementError> {
    let net_token0 = net_solver_token0(orders, fills);
    if net_token0 > 0 {
        let amount = U256::from(net_token0);
        retry::with_retry(|| writer.approve(hook, amount), MAX_RETRIES, BASE_DELAY)
            .await
            .map_err(SettlementError::Transient)?;
    }

    let outcome = retry::with_retry(
        || writer.settle_batch(pool_key, proof_hex, public_inputs_hex),
        MAX_RETRIES,
        BASE_DELAY,
    )
    .await
    .map_err(SettlementError::Transient)?;

    match outcome {
        Ok(()) => Ok(()),
        Err(reason) => Err(SettlementError::Rejected(reason)),
    }
}
