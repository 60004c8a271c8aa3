//! Periodic solver-reward claim maintenance.
//!
//! The on-chain reward accounting is out of scope here (it belongs to the
//! rewards collaborator contract); this crate is only responsible for
//! invoking the claim call on a schedule when a rewards address is
//! configured.

mod provider;

use alloy_primitives::Address;
use async_trait::async_trait;

pub use provider::AlloyRewardsWriter;

/// A periodic background task the main loop runs on a fixed cadence,
/// mirroring the shape this pipeline's upstream uses for its own
/// maintenance tasks (empty-pool removal, cache refresh): a name for
/// logging, and a fallible `run_maintenance`.
#[async_trait]
pub trait Maintaining: Send + Sync {
    async fn run_maintenance(&self) -> anyhow::Result<()>;
    fn name(&self) -> &str;
}

/// The rewards collaborator's write surface.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait RewardsWriter: Send + Sync {
    async fn claim(&self, tokens: &[Address]) -> anyhow::Result<()>;
}

/// Claims all accumulated rewards for a fixed token set on every
/// `run_maintenance` call.
pub struct RewardsMaintainer {
    writer: Box<dyn RewardsWriter>,
    tokens: Vec<Address>,
}

impl RewardsMaintainer {
    pub fn new(writer: Box<dyn RewardsWriter>, tokens: Vec<Address>) -> Self {
        Self { writer, tokens }
    }
}

#[async_trait]
impl Maintaining for RewardsMaintainer {
    async fn run_maintenance(&self) -> anyhow::Result<()> {
        if self.tokens.is_empty() {
            return Ok(());
        }
        tracing::debug!(tokens = ?self.tokens, "claiming accumulated solver rewards");
        self.writer.claim(&self.tokens).await
    }

    fn name(&self) -> &str {
        "RewardsMaintainer"
    }
}
