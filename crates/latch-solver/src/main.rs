//! The off-chain batch-auction solver. Watches one pool for a settleable
//! batch, clears it at a uniform price, proves the settlement, and submits
//! it to the coordinator — forever, one batch at a time.

mod run_loop;

use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use clap::Parser;
use config::Config;

use run_loop::RunLoop;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    observe::initialize(&config.log_level);
    tracing::info!("{config}");

    let wallet = EthereumWallet::from(config.private_key.clone());
    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(config.rpc_url.clone());

    let reader = chain_watcher::AlloyCoordinatorReader::new(provider.clone(), config.latch_hook_address);
    let writer =
        settlement::AlloyCoordinatorWriter::new(provider.clone(), config.currency0, config.latch_hook_address);
    let rewards_maintainer = config.solver_rewards_address.map(|rewards_address| {
        let writer = rewards::AlloyRewardsWriter::new(provider.clone(), rewards_address);
        let tokens = vec![config.currency0, config.currency1];
        Box::new(rewards::RewardsMaintainer::new(Box::new(writer), tokens)) as Box<dyn rewards::Maintaining>
    });

    let run_loop = RunLoop::new(config, Box::new(reader), Box::new(writer), rewards_maintainer);
    run_loop.run_forever().await;
}
