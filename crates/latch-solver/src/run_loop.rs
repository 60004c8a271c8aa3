use std::path::PathBuf;

use alloy_primitives::{Address, B256};
use chain_domain::{Order, PoolKey};
use chain_watcher::CoordinatorReader;
use config::Config;
use settlement::CoordinatorWriter;
use tracing::Instrument;

/// Every 50 iterations, if a rewards collaborator is configured, the loop
/// claims accumulated rewards for the configured token set.
const REWARDS_CLAIM_EVERY_N_ITERATIONS: u64 = 50;

pub struct RunLoop {
    pool_id: B256,
    hook: Address,
    pool_key: PoolKey,
    circuit_dir: PathBuf,
    poll_interval: std::time::Duration,
    reader: Box<dyn CoordinatorReader>,
    writer: Box<dyn CoordinatorWriter>,
    rewards_maintainer: Option<Box<dyn rewards::Maintaining>>,
}

impl RunLoop {
    pub fn new(
        config: Config,
        reader: Box<dyn CoordinatorReader>,
        writer: Box<dyn CoordinatorWriter>,
        rewards_maintainer: Option<Box<dyn rewards::Maintaining>>,
    ) -> Self {
        Self {
            pool_id: config.pool_id,
            hook: config.latch_hook_address,
            pool_key: config.pool_key(),
            circuit_dir: config.circuit_dir,
            poll_interval: config.poll_interval,
            reader,
            writer,
            rewards_maintainer,
        }
    }

    pub async fn run_forever(&self) -> ! {
        let mut iteration: u64 = 0;
        loop {
            self.single_run(iteration)
                .instrument(tracing::info_span!("iteration", iteration))
                .await;
            iteration = iteration.wrapping_add(1);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn single_run(&self, iteration: u64) {
        if let Err(error) = self.try_settle_current_batch().await {
            tracing::error!(?error, "iteration failed, will re-evaluate next poll");
        }

        if iteration > 0 && iteration % REWARDS_CLAIM_EVERY_N_ITERATIONS == 0 {
            if let Some(maintainer) = &self.rewards_maintainer {
                if let Err(error) = maintainer.run_maintenance().await {
                    tracing::warn!(?error, task = maintainer.name(), "maintenance task failed");
                }
            }
        }
    }

    async fn try_settle_current_batch(&self) -> anyhow::Result<()> {
        let batch = match chain_watcher::fetch_settleable_batch(self.reader.as_ref(), self.pool_id).await? {
            Some(batch) => batch,
            None => {
                tracing::info!("no settleable batch this poll");
                return Ok(());
            }
        };

        if batch.orders.is_empty() {
            tracing::info!(batch_id = %batch.batch_id, "settleable batch has zero revealed orders, skipping");
            return Ok(());
        }

        let pool_config = self.reader.pool_config(self.pool_id).await?;
        let clearing = clearing::compute_clearing(&batch.orders);
        if clearing.matched_volume == 0 {
            tracing::info!(batch_id = %batch.batch_id, "no clearing price crosses the book, skipping");
            return Ok(());
        }

        let fills = clearing::compute_fills(&batch.orders, &clearing);
        let orders_root = compute_orders_root(&batch.orders);
        let whitelist_root = field_math::FieldElement::from_be_array(&pool_config.whitelist_root.0);

        let public_inputs = public_inputs::build_public_inputs(public_inputs::PublicInputsRequest {
            batch_id: batch.batch_id,
            clearing_price: clearing.clearing_price,
            buy_volume: clearing.buy_volume,
            sell_volume: clearing.sell_volume,
            matched_volume: clearing.matched_volume,
            order_count: batch.orders.len(),
            orders_root,
            whitelist_root: B256::from(whitelist_root.to_be_bytes()),
            fee_rate: pool_config.fee_rate,
            fills: fills.clone(),
        });

        let artifacts = prover_driver::prove_batch(&self.circuit_dir, &batch.orders, &public_inputs).await?;

        settlement::submit_settlement(
            self.writer.as_ref(),
            self.hook,
            self.pool_key,
            &batch.orders,
            &fills,
            &artifacts.proof_hex,
            &artifacts.public_inputs_hex,
        )
        .await?;

        tracing::info!(
            batch_id = %batch.batch_id,
            clearing_price = clearing.clearing_price,
            matched_volume = clearing.matched_volume,
            "settled batch"
        );
        Ok(())
    }
}

fn compute_orders_root(orders: &[Order]) -> field_math::FieldElement {
    let leaves: Vec<field_math::FieldElement> = orders
        .iter()
        .map(|order| {
            field_math::hash_order_leaf(
                order.trader_field(),
                field_math::FieldElement::from_u128(order.amount),
                field_math::FieldElement::from_u128(order.limit_price),
                order.is_buy,
            )
        })
        .collect();
    order_merkle::compute_root(&leaves)
}
