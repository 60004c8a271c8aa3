//! `Prover.toml` serialization: the on-disk input contract the external
//! `witness-gen`/`prove` pipeline reads.

use chain_domain::Order;
use field_math::FieldElement;
use public_inputs::PublicInputs;
use serde::Serialize;

const ORDER_SLOTS: usize = 16;
const WHITELIST_PATH_DEPTH: usize = 8;

#[derive(Serialize)]
pub struct ProverInput {
    pub public: PublicInputSection,
    pub private: PrivateInputSection,
}

/// Scalar fields are quoted as decimal strings (Noir's native field
/// literal); `orders_root`/`whitelist_root` are `0x`-hex; `fills` is a
/// decimal-string array.
#[derive(Serialize)]
pub struct PublicInputSection {
    pub batch_id: String,
    pub clearing_price: String,
    pub buy_volume: String,
    pub sell_volume: String,
    pub order_count: String,
    pub orders_root: String,
    pub whitelist_root: String,
    pub fee_rate: String,
    pub protocol_fee: String,
    pub fills: Vec<String>,
}

impl PublicInputSection {
    pub fn from_public_inputs(pi: &PublicInputs) -> Self {
        Self {
            batch_id: pi.batch_id.to_decimal_string(),
            clearing_price: pi.clearing_price.to_decimal_string(),
            buy_volume: pi.buy_volume.to_decimal_string(),
            sell_volume: pi.sell_volume.to_decimal_string(),
            order_count: pi.order_count.to_decimal_string(),
            orders_root: format!("0x{}", hex::encode(pi.orders_root.to_be_bytes())),
            whitelist_root: format!("0x{}", hex::encode(pi.whitelist_root.to_be_bytes())),
            fee_rate: pi.fee_rate.to_decimal_string(),
            protocol_fee: pi.protocol_fee.to_decimal_string(),
            fills: pi.fills.iter().map(|f| f.to_decimal_string()).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct PrivateInputSection {
    pub orders: Vec<OrderRecord>,
    pub whitelist_proofs: Vec<WhitelistProofRecord>,
}

/// One order slot. The trader address is rendered as 20 individual
/// `0x`-prefixed byte strings, matching the circuit's `[Field; 20]`
/// representation of an address.
#[derive(Serialize)]
pub struct OrderRecord {
    pub amount: String,
    pub limit_price: String,
    pub trader: [String; 20],
    pub is_buy: bool,
}

impl OrderRecord {
    fn zero() -> Self {
        Self {
            amount: "0".to_string(),
            limit_price: "0".to_string(),
            trader: std::array::from_fn(|_| "0x00".to_string()),
            is_buy: false,
        }
    }

    fn from_order(order: &Order) -> Self {
        let bytes = order.trader.as_slice();
        Self {
            amount: order.amount.to_string(),
            limit_price: order.limit_price.to_string(),
            trader: std::array::from_fn(|i| format!("0x{:02x}", bytes[i])),
            is_buy: order.is_buy,
        }
    }
}

/// A whitelist inclusion proof. Every slot, including padding slots, carries
/// a proof record so the circuit's fixed-depth Merkle check has a uniform
/// shape; in the permissionless pools this crate currently supports, every
/// path element and index bit is zero.
#[derive(Serialize)]
pub struct WhitelistProofRecord {
    pub path: [String; WHITELIST_PATH_DEPTH],
    pub index: [bool; WHITELIST_PATH_DEPTH],
}

impl WhitelistProofRecord {
    fn permissionless() -> Self {
        Self {
            path: std::array::from_fn(|_| FieldElement::zero().to_decimal_string()),
            index: [false; WHITELIST_PATH_DEPTH],
        }
    }
}

/// Builds the full `Prover.toml` payload from a batch's revealed orders and
/// its already-assembled public inputs. `orders` must have at most
/// [`ORDER_SLOTS`] entries; callers pad to 16 at the chain-watcher layer.
pub fn build_prover_input(orders: &[Order], public_inputs: &PublicInputs) -> ProverInput {
    assert!(
        orders.len() <= ORDER_SLOTS,
        "prover-driver: {} orders exceed {ORDER_SLOTS} slots",
        orders.len()
    );

    let mut order_records: Vec<OrderRecord> = orders.iter().map(OrderRecord::from_order).collect();
    order_records.resize_with(ORDER_SLOTS, OrderRecord::zero);

    let whitelist_proofs = (0..ORDER_SLOTS).map(|_| WhitelistProofRecord::permissionless()).collect();

    ProverInput {
        public: PublicInputSection::from_public_inputs(public_inputs),
        private: PrivateInputSection {
            orders: order_records,
            whitelist_proofs,
        },
    }
}

/// Serializes to the TOML text written at `Prover.toml`.
pub fn to_toml_string(input: &ProverInput) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(input)
}
