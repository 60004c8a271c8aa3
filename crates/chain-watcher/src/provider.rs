//! Production [`CoordinatorReader`](crate::CoordinatorReader), backed by an
//! `alloy` JSON-RPC provider and an inline `sol!` interface for the
//! coordinator's read methods.

use alloy::providers::Provider;
use alloy::sol;
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use chain_domain::{Order, Phase, PoolConfig};

use crate::{CoordinatorReader, WatcherError};

sol! {
    #[sol(rpc)]
    interface ILatchCoordinator {
        function getCurrentBatchId(bytes32 poolId) external view returns (uint256);
        function getBatchPhase(bytes32 poolId, uint256 batchId) external view returns (uint8);
        function getPoolConfig(bytes32 poolId) external view returns (uint16 feeRate, bytes32 whitelistRoot);
        function getRevealedOrderCount(bytes32 poolId, uint256 batchId) external view returns (uint64);
        function getRevealedOrderAt(bytes32 poolId, uint256 batchId, uint64 index)
            external
            view
            returns (address trader, uint128 amount, uint128 limitPrice, bool isBuy);
    }
}

/// Reads coordinator state over JSON-RPC. Every call targets the provider's
/// default block tag ("latest"); callers that need a single consistent
/// block across several reads should snapshot it themselves.
pub struct AlloyCoordinatorReader<P> {
    provider: P,
    coordinator: Address,
}

impl<P: Provider + Clone> AlloyCoordinatorReader<P> {
    pub fn new(provider: P, coordinator: Address) -> Self {
        Self { provider, coordinator }
    }

    fn contract(&self) -> ILatchCoordinator::ILatchCoordinatorInstance<P> {
        ILatchCoordinator::new(self.coordinator, self.provider.clone())
    }
}

#[async_trait]
impl<P: Provider + Clone + Send + Sync> CoordinatorReader for AlloyCoordinatorReader<P> {
    async fn current_batch_id(&self, pool_id: B256) -> Result<U256, WatcherError> {
        self.contract()
            .getCurrentBatchId(pool_id)
            .call()
            .await
            .map_err(|e| WatcherError::Rpc(e.into()))
    }

    async fn phase(&self, pool_id: B256, batch_id: U256) -> Result<Phase, WatcherError> {
        let raw = self
            .contract()
            .getBatchPhase(pool_id, batch_id)
            .call()
            .await
            .map_err(|e| WatcherError::Rpc(e.into()))?;
        Phase::from_u8(raw).ok_or_else(|| {
            WatcherError::Rpc(anyhow::anyhow!("coordinator returned unknown phase byte {raw}"))
        })
    }

    async fn pool_config(&self, pool_id: B256) -> Result<PoolConfig, WatcherError> {
        let result = self
            .contract()
            .getPoolConfig(pool_id)
            .call()
            .await
            .map_err(|e| WatcherError::Rpc(e.into()))?;
        Ok(PoolConfig {
            fee_rate: result.feeRate,
            whitelist_root: result.whitelistRoot,
        })
    }

    async fn revealed_order_count(&self, pool_id: B256, batch_id: U256) -> Result<u64, WatcherError> {
        self.contract()
            .getRevealedOrderCount(pool_id, batch_id)
            .call()
            .await
            .map_err(|e| WatcherError::Rpc(e.into()))
    }

    async fn revealed_order_at(
        &self,
        pool_id: B256,
        batch_id: U256,
        index: u64,
    ) -> Result<Order, WatcherError> {
        let result = self
            .contract()
            .getRevealedOrderAt(pool_id, batch_id, index)
            .call()
            .await
            .map_err(|e| WatcherError::Rpc(e.into()))?;
        Ok(Order {
            trader: result.trader,
            amount: result.amount,
            limit_price: result.limitPrice,
            is_buy: result.isBuy,
        })
    }
}
