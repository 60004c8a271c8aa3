//! Environment-variable configuration for the solver binary.
//!
//! Every field is `#[clap(long, env)]` so it can be supplied either way;
//! the process always runs non-interactively, so env vars are the expected
//! path in production and flags are mostly useful for local runs.

use std::path::PathBuf;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{Address, B256};
use clap::Parser;
use url::Url;

#[derive(Parser)]
pub struct Config {
    /// JSON-RPC endpoint of the chain.
    #[clap(long, env = "RPC_URL")]
    pub rpc_url: Url,

    /// Solver wallet secret key.
    #[clap(long, env = "PRIVATE_KEY")]
    pub private_key: PrivateKeySigner,

    /// Coordinator contract address.
    #[clap(long, env = "LATCH_HOOK_ADDRESS")]
    pub latch_hook_address: Address,

    /// 32-byte pool identifier.
    #[clap(long, env = "POOL_ID")]
    pub pool_id: B256,

    /// Token-0 address. Must be less than `currency1`.
    #[clap(long, env = "CURRENCY0")]
    pub currency0: Address,

    /// Token-1 address. Must be greater than `currency0`.
    #[clap(long, env = "CURRENCY1")]
    pub currency1: Address,

    /// Pool fee tier, matching the on-chain pool key.
    #[clap(long, env = "POOL_FEE")]
    pub pool_fee: u32,

    /// Pool tick spacing, matching the on-chain pool key.
    #[clap(long, env = "TICK_SPACING")]
    pub tick_spacing: i32,

    /// Rewards collaborator address. When unset, periodic reward-claim
    /// maintenance is disabled.
    #[clap(long, env = "SOLVER_REWARDS_ADDRESS")]
    pub solver_rewards_address: Option<Address>,

    /// Path to the prover's working directory.
    #[clap(long, env = "CIRCUIT_DIR", default_value = "../circuits")]
    pub circuit_dir: PathBuf,

    /// Main-loop poll interval.
    #[clap(long, env = "POLL_INTERVAL_MS", default_value = "12000", value_parser = parse_millis)]
    pub poll_interval: Duration,

    /// `tracing` filter directive, e.g. `info` or `latch_solver=debug`.
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

fn parse_millis(value: &str) -> Result<Duration, std::num::ParseIntError> {
    value.parse().map(Duration::from_millis)
}

impl Config {
    /// The on-chain pool-key tuple this config describes, passed verbatim
    /// to `settleBatch`.
    pub fn pool_key(&self) -> chain_domain::PoolKey {
        chain_domain::PoolKey {
            currency0: self.currency0,
            currency1: self.currency1,
            fee: self.pool_fee,
            tick_spacing: self.tick_spacing,
            hooks: self.latch_hook_address,
        }
    }
}

/// Arg types get custom `Display` impls instead of relying on `Debug`, so a
/// logged config never leaks the solver's private key.
impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rpc_url: {}", self.rpc_url)?;
        writeln!(f, "private_key: SECRET")?;
        writeln!(f, "latch_hook_address: {}", self.latch_hook_address)?;
        writeln!(f, "pool_id: {}", self.pool_id)?;
        writeln!(f, "currency0: {}", self.currency0)?;
        writeln!(f, "currency1: {}", self.currency1)?;
        writeln!(f, "pool_fee: {}", self.pool_fee)?;
        writeln!(f, "tick_spacing: {}", self.tick_spacing)?;
        writeln!(f, "solver_rewards_address: {:?}", self.solver_rewards_address)?;
        writeln!(f, "circuit_dir: {}", self.circuit_dir.display())?;
        writeln!(f, "poll_interval: {:?}", self.poll_interval)?;
        write!(f, "log_level: {}", self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn sample_args() -> Vec<&'static str> {
        vec![
            "latch-solver",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            TEST_KEY,
            "--latch-hook-address",
            "0x0000000000000000000000000000000000000000",
            "--pool-id",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
            "--currency0",
            "0x0000000000000000000000000000000000000000",
            "--currency1",
            "0x0000000000000000000000000000000000000001",
            "--pool-fee",
            "3000",
            "--tick-spacing",
            "60",
        ]
    }

    #[test]
    fn display_never_prints_the_private_key() {
        let config = Config::try_parse_from(sample_args()).unwrap();
        let rendered = config.to_string();
        assert!(rendered.contains("private_key: SECRET"));
        assert!(!rendered.contains(TEST_KEY));
    }

    #[test]
    fn default_poll_interval_is_twelve_seconds() {
        let config = Config::try_parse_from(sample_args()).unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(12_000));
    }

    #[test]
    fn pool_key_uses_hook_address_as_hooks() {
        let config = Config::try_parse_from(sample_args()).unwrap();
        let key = config.pool_key();
        assert_eq!(key.hooks, config.latch_hook_address);
        assert_eq!(key.fee, 3000);
        assert_eq!(key.tick_spacing, 60);
    }
}
