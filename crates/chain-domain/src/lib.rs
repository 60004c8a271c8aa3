//! Shared wire types for the batch-auction settlement pipeline: the revealed
//! order, the reconstructed batch state, the clearing result, and the
//! on-chain pool identifiers the watcher and submitter both need.

use alloy_primitives::{Address, B256, U256};
use field_math::FieldElement;

/// The maximum protocol fee the coordinator will accept, in basis points.
pub const MAX_FEE_RATE: u16 = 1000;

/// A trader's revealed order for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub trader: Address,
    pub amount: u128,
    pub limit_price: u128,
    pub is_buy: bool,
}

impl Order {
    /// The trader address zero-extended to a 32-byte field element, as used
    /// by the order-leaf hash and the whitelist's trader hash.
    pub fn trader_field(&self) -> FieldElement {
        let mut buf = [0u8; 32];
        buf[12..].copy_from_slice(self.trader.as_slice());
        FieldElement::from_be_array(&buf)
    }
}

/// The on-chain batch phase, advanced by block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    Inactive,
    Commit,
    Reveal,
    Settle,
    Claim,
    Finalized,
}

impl Phase {
    /// Decodes the coordinator's `uint8` phase encoding. Matches the
    /// enumeration order in the glossary.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Inactive),
            1 => Some(Self::Commit),
            2 => Some(Self::Reveal),
            3 => Some(Self::Settle),
            4 => Some(Self::Claim),
            5 => Some(Self::Finalized),
            _ => None,
        }
    }
}

/// A reconstructed batch: the revealed orders for one pool/batch pair, in
/// canonical on-chain order. Order index is significant — it fixes both the
/// Merkle leaf position and the fill-array slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchState {
    pub pool_id: B256,
    pub batch_id: U256,
    pub orders: Vec<Order>,
}

/// The pool's immutable configuration as reported by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Protocol fee rate, in basis points. Must not exceed [`MAX_FEE_RATE`].
    pub fee_rate: u16,
    /// Whitelist Merkle root; zero means an open (permissionless) pool.
    pub whitelist_root: B256,
}

/// The pool-key tuple identifying a Uniswap-v4-style hook pool, passed
/// verbatim to `settleBatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolKey {
    pub currency0: Address,
    pub currency1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

/// The result of uniform-price discovery: the chosen clearing price and the
/// *raw* (unmatched) demand/supply at that price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearingResult {
    pub clearing_price: u128,
    pub buy_volume: u128,
    pub sell_volume: u128,
    pub matched_volume: u128,
}

impl ClearingResult {
    pub fn no_match() -> Self {
        Self::default()
    }
}
