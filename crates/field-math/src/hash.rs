use crate::field::FieldElement;
use std::sync::OnceLock;

/// Number of rounds in the field permutation. Matches the round count used
/// by MiMC-family constructions over BN254 with the `x^7` S-box.
const ROUNDS: usize = 91;

/// Domain separator for order-leaf hashing: ASCII bytes of `"LATCH_ORDER_V1"`
/// interpreted as a big-endian field element.
pub const DOMAIN_ORDER_TAG: &[u8] = b"LATCH_ORDER_V1";
/// Domain separator for Merkle pair hashing.
pub const DOMAIN_MERKLE_TAG: &[u8] = b"LATCH_MERKLE_V1";
/// Domain separator for trader hashing.
pub const DOMAIN_TRADER_TAG: &[u8] = b"LATCH_TRADER";

/// A MiMC-family sponge permutation over the BN254 scalar field, with
/// precomputed round constants shared across every call. The constants are
/// expensive to regenerate and never change, so they are computed once
/// behind a `OnceLock` and handed out as a shared reference afterward —
/// the same amortization strategy the upstream prover's own field library
/// uses for its constant setup.
struct Permutation {
    round_constants: Vec<FieldElement>,
}

impl Permutation {
    fn new() -> Self {
        let round_constants = (0..ROUNDS)
            .map(|i| Self::round_constant(i))
            .collect();
        Self { round_constants }
    }

    /// `RC[i] = (i+1)^3 + (i+1)`, a simple deterministic constant schedule.
    fn round_constant(i: usize) -> FieldElement {
        let idx = FieldElement::from_u128((i + 1) as u128);
        let cubed = mul(mul(idx, idx), idx);
        add(cubed, idx)
    }

    /// One MiMC round: `(x + k + c)^7`.
    fn round(&self, x: FieldElement, key: FieldElement, constant: FieldElement) -> FieldElement {
        let t = add(add(x, key), constant);
        let t2 = mul(t, t);
        let t4 = mul(t2, t2);
        let t6 = mul(t4, t2);
        mul(t6, t)
    }

    fn permute(&self, x: FieldElement, key: FieldElement) -> FieldElement {
        let mut state = x;
        for constant in &self.round_constants {
            state = self.round(state, key, *constant);
        }
        add(state, key)
    }

    /// Sponge-absorbs an arbitrary-length slice of field elements into a
    /// single digest.
    fn absorb(&self, inputs: &[FieldElement]) -> FieldElement {
        let mut state = FieldElement::zero();
        for input in inputs {
            state = self.permute(add(state, *input), FieldElement::zero());
        }
        state
    }
}

fn add(a: FieldElement, b: FieldElement) -> FieldElement {
    a + b
}

fn mul(a: FieldElement, b: FieldElement) -> FieldElement {
    a * b
}

fn permutation() -> &'static Permutation {
    static PERMUTATION: OnceLock<Permutation> = OnceLock::new();
    PERMUTATION.get_or_init(Permutation::new)
}

fn domain_separator(tag: &'static [u8]) -> FieldElement {
    static CACHE: OnceLock<std::sync::Mutex<std::collections::HashMap<&'static [u8], FieldElement>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| std::sync::Mutex::new(std::collections::HashMap::new()));
    let mut guard = cache.lock().expect("domain separator cache poisoned");
    *guard
        .entry(tag)
        .or_insert_with(|| FieldElement::from_be_bytes(tag))
}

/// `H(inputs)` — the raw sponge hash, infallible given valid field elements.
pub fn hash(inputs: &[FieldElement]) -> FieldElement {
    permutation().absorb(inputs)
}

/// Commutative pair hash used by the order-commitment Merkle tree:
/// `hash_pair(a, b) == hash_pair(b, a)`.
pub fn hash_pair(a: FieldElement, b: FieldElement) -> FieldElement {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    hash(&[domain_separator(DOMAIN_MERKLE_TAG), lo, hi])
}

/// Order-leaf hash: `H([D_order, trader, amount, price, is_buy])`.
pub fn hash_order_leaf(
    trader: FieldElement,
    amount: FieldElement,
    limit_price: FieldElement,
    is_buy: bool,
) -> FieldElement {
    hash(&[
        domain_separator(DOMAIN_ORDER_TAG),
        trader,
        amount,
        limit_price,
        FieldElement::from_bool(is_buy),
    ])
}

/// Trader hash: `H([D_trader, trader])`.
pub fn hash_trader(trader: FieldElement) -> FieldElement {
    hash(&[domain_separator(DOMAIN_TRADER_TAG), trader])
}
