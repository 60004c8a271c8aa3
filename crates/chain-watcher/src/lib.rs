//! Locates the currently-settleable batch for a pool and rehydrates its
//! revealed orders.
//!
//! The RPC boundary is expressed as [`CoordinatorReader`], an object-safe
//! `async_trait`, rather than directly against a concrete RPC client — the
//! same boundary-crate shape used throughout this pipeline's upstream
//! (`account-balances`, `ethrpc`) so watcher logic can be exercised against
//! a `mockall` mock without a live node.

mod provider;

use alloy_primitives::{B256, U256};
use async_trait::async_trait;
use chain_domain::{BatchState, Order, Phase, PoolConfig};

pub use provider::AlloyCoordinatorReader;

#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("coordinator read failed: {0}")]
    Rpc(#[from] anyhow::Error),
}

/// The coordinator's read surface, as this pipeline needs it. Production
/// code talks to the real contract through [`AlloyCoordinatorReader`]; tests
/// substitute `MockCoordinatorReader`.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait CoordinatorReader: Send + Sync {
    async fn current_batch_id(&self, pool_id: B256) -> Result<U256, WatcherError>;
    async fn phase(&self, pool_id: B256, batch_id: U256) -> Result<Phase, WatcherError>;
    async fn pool_config(&self, pool_id: B256) -> Result<PoolConfig, WatcherError>;
    async fn revealed_order_count(&self, pool_id: B256, batch_id: U256) -> Result<u64, WatcherError>;
    async fn revealed_order_at(
        &self,
        pool_id: B256,
        batch_id: U256,
        index: u64,
    ) -> Result<Order, WatcherError>;
}

/// Reads the pool's current batch id and phase, and — if that batch is in
/// `Settle` phase — paginates `revealed_order_at` to reconstruct the order
/// sequence in canonical on-chain order.
///
/// Returns `Ok(None)` if the current batch is not yet settleable. All reads
/// for one call target whatever block tag the reader implementation uses;
/// a mid-read reorg is tolerated by the next iteration's fresh read.
pub async fn fetch_settleable_batch(
    reader: &dyn CoordinatorReader,
    pool_id: B256,
) -> Result<Option<BatchState>, WatcherError> {
    let batch_id = reader.current_batch_id(pool_id).await?;
    let phase = reader.phase(pool_id, batch_id).await?;
    if phase != Phase::Settle {
        tracing::info!(?phase, %batch_id, "batch not in settle phase, skipping");
        return Ok(None);
    }

    let count = reader.revealed_order_count(pool_id, batch_id).await?;
    let mut orders = Vec::with_capacity(count as usize);
    for index in 0..count {
        orders.push(reader.revealed_order_at(pool_id, batch_id, index).await?);
    }

    Ok(Some(BatchState { pool_id, batch_id, orders }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn sample_order() -> Order {
        Order {
            trader: Address::ZERO,
            amount: 10,
            limit_price: 5,
            is_buy: true,
        }
    }

    #[tokio::test]
    async fn returns_none_outside_settle_phase() {
        let pool_id = B256::ZERO;
        let mut reader = MockCoordinatorReader::new();
        reader
            .expect_current_batch_id()
            .returning(|_| Ok(U256::from(1u64)));
        reader
            .expect_phase()
            .returning(|_, _| Ok(Phase::Reveal));

        let result = fetch_settleable_batch(&reader, pool_id).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn paginates_revealed_orders_in_order() {
        let pool_id = B256::ZERO;
        let mut reader = MockCoordinatorReader::new();
        reader
            .expect_current_batch_id()
            .returning(|_| Ok(U256::from(3u64)));
        reader.expect_phase().returning(|_, _| Ok(Phase::Settle));
        reader.expect_revealed_order_count().returning(|_, _| Ok(3));
        reader
            .expect_revealed_order_at()
            .returning(|_, _, _| Ok(sample_order()));

        let batch = fetch_settleable_batch(&reader, pool_id).await.unwrap().unwrap();
        assert_eq!(batch.batch_id, U256::from(3u64));
        assert_eq!(batch.orders.len(), 3);
    }

    #[tokio::test]
    async fn zero_revealed_orders_is_an_empty_batch() {
        let pool_id = B256::ZERO;
        let mut reader = MockCoordinatorReader::new();
        reader
            .expect_current_batch_id()
            .returning(|_| Ok(U256::from(9u64)));
        reader.expect_phase().returning(|_, _| Ok(Phase::Settle));
        reader.expect_revealed_order_count().returning(|_, _| Ok(0));

        let batch = fetch_settleable_batch(&reader, pool_id).await.unwrap().unwrap();
        assert!(batch.orders.is_empty());
    }

    #[tokio::test]
    async fn propagates_rpc_errors() {
        let pool_id = B256::ZERO;
        let mut reader = MockCoordinatorReader::new();
        reader
            .expect_current_batch_id()
            .returning(|_| Err(WatcherError::Rpc(anyhow::anyhow!("rpc unreachable"))));

        let result = fetch_settleable_batch(&reader, pool_id).await;
        assert!(result.is_err());
    }
}
