//! Assembles the verifier's fixed 25-element public-inputs vector and its
//! 25×32-byte big-endian on-chain encoding.

use alloy_primitives::{B256, U256};
use chain_domain::MAX_FEE_RATE;
use field_math::FieldElement;

/// Number of fill slots (and Merkle leaves) in a batch.
pub const FILL_SLOTS: usize = 16;
/// Total length of the flattened public-inputs vector.
pub const PUBLIC_INPUTS_LEN: usize = 9 + FILL_SLOTS;
/// Byte length of the on-chain public-inputs encoding (25 × 32 bytes).
pub const PUBLIC_INPUTS_BYTE_LEN: usize = PUBLIC_INPUTS_LEN * 32;

/// The assembled public inputs for one settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicInputs {
    pub batch_id: FieldElement,
    pub clearing_price: FieldElement,
    pub buy_volume: FieldElement,
    pub sell_volume: FieldElement,
    pub order_count: FieldElement,
    pub orders_root: FieldElement,
    pub whitelist_root: FieldElement,
    pub fee_rate: FieldElement,
    pub protocol_fee: FieldElement,
    pub fills: [FieldElement; FILL_SLOTS],
}

/// Inputs needed to build a [`PublicInputs`] value. Kept as an explicit
/// record rather than a long parameter list or a dynamically-named config
/// object, per this pipeline's "no hidden defaults" convention.
pub struct PublicInputsRequest {
    pub batch_id: U256,
    pub clearing_price: u128,
    pub buy_volume: u128,
    pub sell_volume: u128,
    pub matched_volume: u128,
    pub order_count: usize,
    pub orders_root: FieldElement,
    pub whitelist_root: B256,
    pub fee_rate: u16,
    pub fills: Vec<u128>,
}

/// Computes `floor(matched_volume * fee_rate / 10_000)`.
pub fn compute_protocol_fee(matched_volume: u128, fee_rate: u16) -> u128 {
    matched_volume * u128::from(fee_rate) / 10_000
}

/// Assembles the public inputs from a clearing result and pool
/// configuration.
///
/// # Panics
///
/// Panics (invariant violation, per the error-handling design) if
/// `fee_rate` exceeds [`MAX_FEE_RATE`], if `order_count` exceeds
/// [`FILL_SLOTS`], if `fills` is longer than [`FILL_SLOTS`], if
/// `clearing_price == 0` while `matched_volume > 0`, or if any fill exceeds
/// the width/modulus a field element can hold.
pub fn build_public_inputs(request: PublicInputsRequest) -> PublicInputs {
    assert!(
        request.fee_rate <= MAX_FEE_RATE,
        "public-inputs: fee_rate {} exceeds MAX_FEE_RATE", request.fee_rate
    );
    assert!(
        request.order_count <= FILL_SLOTS,
        "public-inputs: order_count {} exceeds {FILL_SLOTS} slots", request.order_count
    );
    assert!(
        request.fills.len() <= FILL_SLOTS,
        "public-inputs: {} fills exceed {FILL_SLOTS} slots", request.fills.len()
    );
    assert!(
        !(request.clearing_price == 0 && request.matched_volume > 0),
        "public-inputs: zero clearing price with positive matched volume"
    );

    let protocol_fee = compute_protocol_fee(request.matched_volume, request.fee_rate);

    let mut fills = [FieldElement::zero(); FILL_SLOTS];
    for (slot, amount) in fills.iter_mut().zip(request.fills.iter()) {
        *slot = FieldElement::from_u128(*amount);
    }

    PublicInputs {
        batch_id: FieldElement::from_be_array(&request.batch_id.to_be_bytes()),
        clearing_price: FieldElement::from_u128(request.clearing_price),
        buy_volume: FieldElement::from_u128(request.buy_volume),
        sell_volume: FieldElement::from_u128(request.sell_volume),
        order_count: FieldElement::from_u128(request.order_count as u128),
        orders_root: request.orders_root,
        whitelist_root: FieldElement::from_be_array(&request.whitelist_root.0),
        fee_rate: FieldElement::from_u128(u128::from(request.fee_rate)),
        protocol_fee: FieldElement::from_u128(protocol_fee),
        fills,
    }
}

impl PublicInputs {
    /// Flattens into the fixed 25-slot layout the verifier expects:
    /// `[batch_id, clearing_price, buy_volume, sell_volume, order_count,
    /// orders_root, whitelist_root, fee_rate, protocol_fee, fills[0..16]]`.
    pub fn to_array(&self) -> [FieldElement; PUBLIC_INPUTS_LEN] {
        let mut out = [FieldElement::zero(); PUBLIC_INPUTS_LEN];
        out[0] = self.batch_id;
        out[1] = self.clearing_price;
        out[2] = self.buy_volume;
        out[3] = self.sell_volume;
        out[4] = self.order_count;
        out[5] = self.orders_root;
        out[6] = self.whitelist_root;
        out[7] = self.fee_rate;
        out[8] = self.protocol_fee;
        out[9..9 + FILL_SLOTS].copy_from_slice(&self.fills);
        out
    }

    /// Encodes the flattened vector as 25 left-zero-padded 32-byte
    /// big-endian slices, concatenated.
    pub fn to_be_bytes(&self) -> [u8; PUBLIC_INPUTS_BYTE_LEN] {
        let mut out = [0u8; PUBLIC_INPUTS_BYTE_LEN];
        for (i, element) in self.to_array().into_iter().enumerate() {
            out[i * 32..(i + 1) * 32].copy_from_slice(&element.to_be_bytes());
        }
        out
    }

    /// Renders the public inputs as 25 lowercase `0x`-prefixed 64-character
    /// hex strings, the shape the coordinator's `settleBatch` call expects.
    pub fn to_hex_strings(&self) -> [String; PUBLIC_INPUTS_LEN] {
        self.to_array().map(|element| format!("0x{}", hex::encode(element.to_be_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> PublicInputsRequest {
        PublicInputsRequest {
            batch_id: U256::from(7u64),
            clearing_price: 50,
            buy_volume: 10_000,
            sell_volume: 5_000,
            matched_volume: 5_000,
            order_count: 2,
            orders_root: FieldElement::from_u128(1234),
            whitelist_root: B256::ZERO,
            fee_rate: 30,
            fills: vec![100, 100],
        }
    }

    #[test]
    fn layout_matches_spec_table() {
        let pi = build_public_inputs(sample_request());
        let arr = pi.to_array();
        assert_eq!(arr[0], pi.batch_id);
        assert_eq!(arr[1], pi.clearing_price);
        assert_eq!(arr[2], pi.buy_volume);
        assert_eq!(arr[3], pi.sell_volume);
        assert_eq!(arr[4], pi.order_count);
        assert_eq!(arr[5], pi.orders_root);
        assert_eq!(arr[6], pi.whitelist_root);
        assert_eq!(arr[7], pi.fee_rate);
        assert_eq!(arr[8], pi.protocol_fee);
        assert_eq!(arr[9], pi.fills[0]);
        assert_eq!(arr[24], pi.fills[15]);
    }

    #[test]
    fn protocol_fee_is_floor_division() {
        assert_eq!(compute_protocol_fee(5_000, 30), 15);
    }

    #[test]
    fn build_is_deterministic() {
        let a = build_public_inputs(sample_request());
        let b = build_public_inputs(sample_request());
        assert_eq!(a, b);
        assert_eq!(a.to_be_bytes(), b.to_be_bytes());
    }

    #[test]
    fn encoding_is_pure_big_endian_32_byte_slots() {
        let pi = build_public_inputs(sample_request());
        for hex_str in pi.to_hex_strings() {
            assert_eq!(hex_str.len(), 66);
            assert!(hex_str.starts_with("0x"));
        }
    }

    #[test]
    fn byte_31_of_first_slot_decodes_to_one() {
        let mut request = sample_request();
        request.clearing_price = 1;
        let pi = build_public_inputs(request);
        let bytes = pi.to_be_bytes();
        assert_eq!(&bytes[32..63], &[0u8; 31]);
        assert_eq!(bytes[63], 1);
        assert_eq!(&bytes[64..96], &[0u8; 32]);
    }

    #[test]
    #[should_panic(expected = "exceeds MAX_FEE_RATE")]
    fn rejects_fee_rate_above_max() {
        let mut request = sample_request();
        request.fee_rate = MAX_FEE_RATE + 1;
        build_public_inputs(request);
    }

    #[test]
    #[should_panic(expected = "zero clearing price")]
    fn rejects_zero_price_with_positive_match() {
        let mut request = sample_request();
        request.clearing_price = 0;
        request.matched_volume = 1;
        build_public_inputs(request);
    }
}
