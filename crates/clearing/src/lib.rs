//! Uniform-price discovery and pro-rata fill allocation.
//!
//! For every distinct limit price in the batch this computes the raw
//! demand/supply that would cross at that price and picks the price that
//! maximizes matched volume, breaking ties toward the lowest price. Matched
//! volume is then split pro-rata across whichever side is constrained.

use chain_domain::{ClearingResult, Order};

/// Number of fill slots in a batch; matches the Merkle tree's leaf count.
pub const FILL_SLOTS: usize = 16;

/// Computes the clearing price and raw demand/supply for a batch.
///
/// Returns [`ClearingResult::no_match`] if no candidate price yields a
/// positive matched volume.
pub fn compute_clearing(orders: &[Order]) -> ClearingResult {
    let mut candidate_prices: Vec<u128> = orders.iter().map(|o| o.limit_price).collect();
    candidate_prices.sort_unstable();
    candidate_prices.dedup();

    let mut best = ClearingResult::no_match();

    for price in candidate_prices {
        let demand: u128 = orders
            .iter()
            .filter(|o| o.is_buy && o.limit_price >= price)
            .map(|o| o.amount)
            .sum();
        let supply: u128 = orders
            .iter()
            .filter(|o| !o.is_buy && o.limit_price <= price)
            .map(|o| o.amount)
            .sum();
        let matched = demand.min(supply);

        // Strict greater-than: ascending iteration plus a strict replacement
        // test means the first (lowest) price reaching the maximum sticks.
        if matched > best.matched_volume {
            best = ClearingResult {
                clearing_price: price,
                buy_volume: demand,
                sell_volume: supply,
                matched_volume: matched,
            };
        }
    }

    best
}

/// Computes the pro-rata fill for each order at the given clearing result,
/// returning a vector the same length as `orders`. Callers pad to the
/// fixed-16 slot layout ([`FILL_SLOTS`]) when assembling public inputs.
pub fn compute_fills(orders: &[Order], clearing: &ClearingResult) -> Vec<u128> {
    let ClearingResult {
        clearing_price,
        buy_volume,
        sell_volume,
        ..
    } = *clearing;

    if buy_volume == 0 && sell_volume == 0 {
        return vec![0; orders.len()];
    }

    orders
        .iter()
        .map(|order| {
            let eligible_buy = order.is_buy && order.limit_price >= clearing_price;
            let eligible_sell = !order.is_buy && order.limit_price <= clearing_price;

            if !eligible_buy && !eligible_sell {
                return 0;
            }

            if buy_volume == sell_volume {
                return order.amount;
            }

            match (eligible_buy, buy_volume > sell_volume) {
                // Buy-constrained: buys get pro-rata, sells get full amount.
                (true, true) => floor_pro_rata(order.amount, sell_volume, buy_volume),
                (true, false) => order.amount,
                // Sell-constrained: sells get pro-rata, buys get full amount.
                (false, _) => {
                    if sell_volume > buy_volume {
                        floor_pro_rata(order.amount, buy_volume, sell_volume)
                    } else {
                        order.amount
                    }
                }
            }
        })
        .collect()
}

fn floor_pro_rata(amount: u128, numerator_volume: u128, denominator_volume: u128) -> u128 {
    amount * numerator_volume / denominator_volume
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn order(is_buy: bool, amount: u128, price: u128) -> Order {
        Order {
            trader: Address::ZERO,
            amount,
            limit_price: price,
            is_buy,
        }
    }

    #[test]
    fn balanced_crossing() {
        let orders = vec![order(true, 100, 50), order(false, 100, 50)];
        let clearing = compute_clearing(&orders);
        assert_eq!(clearing.clearing_price, 50);
        assert_eq!(clearing.buy_volume, 100);
        assert_eq!(clearing.sell_volume, 100);
        assert_eq!(clearing.matched_volume, 100);

        let fills = compute_fills(&orders, &clearing);
        assert_eq!(fills, vec![100, 100]);
    }

    #[test]
    fn no_crossing_skips_batch() {
        let orders = vec![order(true, 100, 40), order(false, 100, 60)];
        let clearing = compute_clearing(&orders);
        assert_eq!(clearing, chain_domain::ClearingResult::no_match());
        assert_eq!(compute_fills(&orders, &clearing), vec![0, 0]);
    }

    #[test]
    fn raw_volume_reporting_with_pro_rata_fill() {
        let orders = vec![order(true, 200, 50), order(false, 100, 50)];
        let clearing = compute_clearing(&orders);
        assert_eq!(clearing.clearing_price, 50);
        assert_eq!(clearing.buy_volume, 200);
        assert_eq!(clearing.sell_volume, 100);
        assert_eq!(clearing.matched_volume, 100);

        let fills = compute_fills(&orders, &clearing);
        // floor(200 * 100 / 200) = 100
        assert_eq!(fills, vec![100, 100]);
    }

    #[test]
    fn tie_breaking_prefers_lowest_price() {
        let orders = vec![
            order(true, 100, 60),
            order(true, 100, 50),
            order(false, 100, 50),
            order(false, 100, 60),
        ];
        let clearing = compute_clearing(&orders);
        assert_eq!(clearing.clearing_price, 50);
        assert_eq!(clearing.matched_volume, 100);
    }

    #[test]
    fn max_volume_discovery_picks_best_price() {
        let orders = vec![
            order(true, 100, 60),
            order(true, 100, 50),
            order(false, 150, 50),
            order(false, 50, 55),
        ];
        let clearing = compute_clearing(&orders);
        assert_eq!(clearing.clearing_price, 50);
        assert_eq!(clearing.matched_volume, 150);
    }

    #[test]
    fn fill_never_exceeds_order_amount() {
        let orders = vec![order(true, 200, 50), order(false, 1, 50)];
        let clearing = compute_clearing(&orders);
        let fills = compute_fills(&orders, &clearing);
        for (fill, order) in fills.iter().zip(orders.iter()) {
            assert!(*fill <= order.amount);
        }
    }

    #[test]
    fn ineligible_orders_at_chosen_price_get_zero_fill() {
        // At clearing_price=50, a buy at 40 would never be selected as
        // eligible (40 < 50), so even though it's in the order list it
        // should receive a zero fill.
        let orders = vec![
            order(true, 100, 50),
            order(true, 10, 40),
            order(false, 100, 50),
        ];
        let clearing = compute_clearing(&orders);
        let fills = compute_fills(&orders, &clearing);
        assert_eq!(fills[1], 0);
    }
}
