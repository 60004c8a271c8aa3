//! Production [`RewardsWriter`](crate::RewardsWriter), backed by an `alloy`
//! JSON-RPC provider and an inline `sol!` interface for the rewards
//! collaborator's claim method.

use alloy::providers::Provider;
use alloy::sol;
use alloy_primitives::Address;
use async_trait::async_trait;

use crate::RewardsWriter;

sol! {
    #[sol(rpc)]
    interface IRewardsCollector {
        function claim(address[] tokens) external;
    }
}

pub struct AlloyRewardsWriter<P> {
    provider: P,
    collector: Address,
}

impl<P: Provider + Clone> AlloyRewardsWriter<P> {
    pub fn new(provider: P, collector: Address) -> Self {
        Self { provider, collector }
    }
}

#[async_trait]
impl<P: Provider + Clone + Send + Sync> RewardsWriter for AlloyRewardsWriter<P> {
    async fn claim(&self, tokens: &[Address]) -> anyhow::Result<()> {
        let contract = IRewardsCollector::new(self.collector, self.provider.clone());
        contract.claim(tokens.to_vec()).send().await?.get_receipt().await?;
        Ok(())
    }
}
