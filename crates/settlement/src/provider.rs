//! Production [`CoordinatorWriter`](crate::CoordinatorWriter), backed by an
//! `alloy` JSON-RPC provider, an ERC-20 `approve` interface, and the
//! coordinator's `settleBatch` write method.

use alloy::providers::Provider;
use alloy::sol;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use chain_domain::PoolKey;

use crate::{CoordinatorWriter, RejectReason};

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface ILatchCoordinatorWrite {
        struct PoolKeyTuple {
            address currency0;
            address currency1;
            uint32 fee;
            int32 tickSpacing;
            address hooks;
        }

        function settleBatch(PoolKeyTuple poolKey, bytes proofBytes, bytes32[25] publicInputs) external;
    }
}

/// Submits writes over JSON-RPC via the configured signer. `token0` is the
/// ERC-20 address approval is drawn against; `coordinator` is the contract
/// `settleBatch` is called on.
pub struct AlloyCoordinatorWriter<P> {
    provider: P,
    token0: Address,
    coordinator: Address,
}

impl<P: Provider + Clone> AlloyCoordinatorWriter<P> {
    pub fn new(provider: P, token0: Address, coordinator: Address) -> Self {
        Self { provider, token0, coordinator }
    }
}

#[async_trait]
impl<P: Provider + Clone + Send + Sync> CoordinatorWriter for AlloyCoordinatorWriter<P> {
    async fn approve(&self, spender: Address, amount: U256) -> Result<(), anyhow::Error> {
        let token = IERC20::new(self.token0, self.provider.clone());
        token
            .approve(spender, amount)
            .send()
            .await?
            .get_receipt()
            .await?;
        Ok(())
    }

    async fn settle_batch(
        &self,
        pool_key: PoolKey,
        proof_hex: &str,
        public_inputs_hex: &[String; 25],
    ) -> Result<Result<(), RejectReason>, anyhow::Error> {
        let proof_bytes = Bytes::from(hex::decode(proof_hex.trim_start_matches("0x"))?);
        let mut public_inputs = [alloy_primitives::B256::ZERO; 25];
        for (slot, hex_str) in public_inputs.iter_mut().zip(public_inputs_hex.iter()) {
            let bytes = hex::decode(hex_str.trim_start_matches("0x"))?;
            let array: [u8; 32] = bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("public input slot is not exactly 32 bytes"))?;
            *slot = alloy_primitives::B256::from(array);
        }

        let contract = ILatchCoordinatorWrite::new(self.coordinator, self.provider.clone());
        let pool_key_tuple = ILatchCoordinatorWrite::PoolKeyTuple {
            currency0: pool_key.currency0,
            currency1: pool_key.currency1,
            fee: pool_key.fee,
            tickSpacing: pool_key.tick_spacing,
            hooks: pool_key.hooks,
        };

        match contract
            .settleBatch(pool_key_tuple, proof_bytes, public_inputs)
            .send()
            .await
        {
            Ok(pending) => {
                pending.get_receipt().await?;
                Ok(Ok(()))
            }
            Err(error) => {
                let message = error.to_string();
                if looks_like_revert(&message) {
                    Ok(Err(RejectReason::classify(&message)))
                } else {
                    Err(error.into())
                }
            }
        }
    }
}

fn looks_like_revert(message: &str) -> bool {
    message.contains("revert") || message.contains("execution reverted")
}
