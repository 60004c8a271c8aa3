use ark_ff::{BigInteger, PrimeField};
use std::cmp::Ordering;
use std::fmt;

/// An element of the BN254 scalar field.
///
/// Values are always canonical representatives in `[0, p)`. Construction
/// from raw bytes that do not fit below the modulus is a programmer error:
/// per the wire contract with the on-chain verifier, nothing in this pipeline
/// is allowed to silently wrap a too-large value into a smaller one.
#[derive(Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FieldElement(ark_bn254::Fr);

impl FieldElement {
    pub const BYTE_LEN: usize = 32;

    pub fn zero() -> Self {
        Self(ark_bn254::Fr::from(0u64))
    }

    pub fn one() -> Self {
        Self(ark_bn254::Fr::from(1u64))
    }

    pub fn from_bool(value: bool) -> Self {
        if value { Self::one() } else { Self::zero() }
    }

    pub fn from_u128(value: u128) -> Self {
        Self(ark_bn254::Fr::from(value))
    }

    /// Builds a field element from a big-endian byte slice of at most 32
    /// bytes, left-padding with zeros. Panics if the decoded integer is not
    /// strictly less than the field modulus.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() <= Self::BYTE_LEN, "field-math: input wider than 32 bytes");
        let mut buf = [0u8; Self::BYTE_LEN];
        buf[Self::BYTE_LEN - bytes.len()..].copy_from_slice(bytes);
        Self::from_be_array(&buf)
    }

    /// Builds a field element from an exactly-32-byte big-endian buffer.
    /// Panics on modulus overflow (see module docs): this mirrors the
    /// distilled spec's "fails loudly, not retried" policy for a
    /// construction-time invariant violation.
    pub fn from_be_array(buf: &[u8; 32]) -> Self {
        let element = ark_bn254::Fr::from_be_bytes_mod_order(buf);
        let mut roundtrip = [0u8; 32];
        let bigint_bytes = element.into_bigint().to_bytes_be();
        roundtrip[32 - bigint_bytes.len()..].copy_from_slice(&bigint_bytes);
        assert_eq!(
            &roundtrip, buf,
            "field-math: value exceeds BN254 scalar modulus"
        );
        Self(element)
    }

    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = self.0.into_bigint().to_bytes_be();
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    /// Renders the canonical integer representative in base 10, the form
    /// the external prover's `Prover.toml` expects for scalar fields.
    pub fn to_decimal_string(self) -> String {
        num::BigUint::from_bytes_be(&self.to_be_bytes()).to_string()
    }

    /// True if the value fits in `bits` bits (used for the 128-bit and
    /// 16-bit public-inputs invariants).
    pub fn fits_in_bits(self, bits: u32) -> bool {
        let bytes = self.to_be_bytes();
        let full_zero_bytes = 32 - (bits as usize).div_ceil(8);
        let leading_ok = bytes[..full_zero_bytes].iter().all(|b| *b == 0);
        if !leading_ok {
            return false;
        }
        if bits % 8 == 0 {
            return true;
        }
        let top_byte = bytes[full_zero_bytes];
        let allowed_mask = (1u8 << (bits % 8)) - 1;
        top_byte & !allowed_mask == 0
    }
}

impl core::ops::Add for FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl PartialOrd for FieldElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_be_bytes().cmp(&other.to_be_bytes())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::zero()
    }
}
