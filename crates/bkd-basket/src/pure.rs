//! Pure basket builder: rank-ordered greedy fill within a single theme.
//!
//! # Algorithm (first-fit in rank order, no backtracking)
//!
//! 1. Validate inputs (investment finite and >= 0, ranks finite).
//! 2. Filter to stocks with rank <= [`policy::RANK_ELIGIBILITY_CUTOFF`].
//! 3. Stable-sort ascending by rank; equal ranks keep input order.
//! 4. Scan the sorted sequence. A candidate is selected when the basket
//!    holds fewer than [`policy::MAX_BASKET_SIZE`] stocks AND its full
//!    price fits the remaining budget. An unaffordable candidate is
//!    skipped and the scan continues — a cheaper stock later in rank
//!    order may still fit. No partial purchases.
//! 5. Stop at capacity or sequence end.
//!
//! Intentionally not an optimising allocator: replacing the greedy scan
//! with e.g. a knapsack fill would change observable output.

use crate::policy;
use crate::types::{Basket, BasketKind, Stock};
use crate::{eligible_by_rank, guard_investment, guard_ranks, BasketError};

/// Why a scanned candidate was not selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Rank is above the eligibility cutoff; never entered the scan.
    RankAboveCutoff,
    /// Price exceeds the remaining budget at scan time.
    OverBudget,
}

/// A candidate that was considered but not selected.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedStock {
    pub symbol: String,
    pub price: f64,
    pub rank: f64,
    pub reason: SkipReason,
}

/// The output of one pure fill: the basket plus the skip log.
#[derive(Clone, Debug, PartialEq)]
pub struct PureFill {
    pub basket: Basket,
    pub skipped: Vec<SkippedStock>,
}

/// Fill a pure basket for one theme's universe.
///
/// `stocks` is the theme's full load, in input order; eligibility and
/// ordering are applied here.
pub fn build_pure_basket(
    investment: f64,
    stocks: &[Stock],
    theme: &str,
    risk: &str,
) -> Result<PureFill, BasketError> {
    guard_investment(investment)?;
    guard_ranks(stocks)?;

    let mut skipped: Vec<SkippedStock> = stocks
        .iter()
        .filter(|s| s.rank > policy::RANK_ELIGIBILITY_CUTOFF)
        .map(|s| SkippedStock {
            symbol: s.symbol.clone(),
            price: s.price,
            rank: s.rank,
            reason: SkipReason::RankAboveCutoff,
        })
        .collect();

    let mut basket = Basket::empty(theme, BasketKind::Pure, investment, risk);

    for stock in eligible_by_rank(stocks) {
        if basket.count >= policy::MAX_BASKET_SIZE {
            break;
        }
        if stock.price <= basket.remaining {
            basket.add(stock);
        } else {
            skipped.push(SkippedStock {
                symbol: stock.symbol.clone(),
                price: stock.price,
                rank: stock.rank,
                reason: SkipReason::OverBudget,
            });
        }
    }

    Ok(PureFill { basket, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(symbol: &str, rank: f64, price: f64) -> Stock {
        Stock {
            symbol: symbol.to_string(),
            name: format!("{symbol} Ltd"),
            price,
            rank,
            theme: "IT".to_string(),
            week52_low: 0.0,
            week52_high: 0.0,
            current_price: price,
        }
    }

    fn symbols(basket: &Basket) -> Vec<&str> {
        basket.stocks.iter().map(|s| s.symbol.as_str()).collect()
    }

    #[test]
    fn rejects_negative_investment() {
        let err = build_pure_basket(-100.0, &[], "IT", "low").unwrap_err();
        assert_eq!(err, BasketError::InvalidInvestment { value: -100.0 });
    }

    #[test]
    fn rejects_nan_rank() {
        let universe = vec![stock("BAD", f64::NAN, 10.0)];
        let err = build_pure_basket(100.0, &universe, "IT", "low").unwrap_err();
        assert_eq!(
            err,
            BasketError::InvalidRank {
                symbol: "BAD".to_string()
            }
        );
    }

    #[test]
    fn empty_universe_fills_nothing() {
        let fill = build_pure_basket(1000.0, &[], "IT", "medium").unwrap();
        assert_eq!(fill.basket.count, 0);
        assert!(fill.basket.stocks.is_empty());
        assert_eq!(fill.basket.remaining, 1000.0);
        assert_eq!(fill.basket.invested, 0.0);
        assert!(fill.skipped.is_empty());
    }

    #[test]
    fn fills_in_rank_order_not_input_order() {
        let universe = vec![
            stock("C", 3.0, 10.0),
            stock("A", 1.0, 10.0),
            stock("B", 2.0, 10.0),
        ];
        let fill = build_pure_basket(1000.0, &universe, "IT", "low").unwrap();
        assert_eq!(symbols(&fill.basket), vec!["A", "B", "C"]);
    }

    #[test]
    fn rank_above_cutoff_excluded_and_logged() {
        let universe = vec![stock("IN", 15.0, 10.0), stock("OUT", 15.5, 10.0)];
        let fill = build_pure_basket(1000.0, &universe, "IT", "low").unwrap();
        assert_eq!(symbols(&fill.basket), vec!["IN"]);
        assert_eq!(fill.skipped.len(), 1);
        assert_eq!(fill.skipped[0].symbol, "OUT");
        assert_eq!(fill.skipped[0].reason, SkipReason::RankAboveCutoff);
    }

    #[test]
    fn equal_ranks_fill_in_input_order() {
        let universe = vec![
            stock("FIRST", 2.0, 10.0),
            stock("SECOND", 2.0, 10.0),
            stock("EARLIER", 1.0, 10.0),
        ];
        let fill = build_pure_basket(1000.0, &universe, "IT", "low").unwrap();
        assert_eq!(symbols(&fill.basket), vec!["EARLIER", "FIRST", "SECOND"]);
    }

    #[test]
    fn unaffordable_candidate_does_not_stop_the_scan() {
        // The expensive rank-2 stock is skipped; the cheap rank-3 stock
        // later in the order still fits.
        let universe = vec![
            stock("A", 1.0, 100.0),
            stock("BIG", 2.0, 10_000.0),
            stock("SMALL", 3.0, 50.0),
        ];
        let fill = build_pure_basket(200.0, &universe, "IT", "low").unwrap();
        assert_eq!(symbols(&fill.basket), vec!["A", "SMALL"]);
        assert_eq!(fill.basket.remaining, 50.0);
        assert_eq!(fill.skipped.len(), 1);
        assert_eq!(fill.skipped[0].symbol, "BIG");
        assert_eq!(fill.skipped[0].reason, SkipReason::OverBudget);
    }

    #[test]
    fn stops_at_max_basket_size() {
        let universe: Vec<Stock> = (1..=15)
            .map(|i| stock(&format!("S{i}"), i as f64, 1.0))
            .collect();
        let fill = build_pure_basket(1_000.0, &universe, "IT", "low").unwrap();
        assert_eq!(fill.basket.count, policy::MAX_BASKET_SIZE);
        assert_eq!(fill.basket.stocks.len(), policy::MAX_BASKET_SIZE);
        // Candidates past the cap are not scanned, so they are not logged
        // as over-budget skips either.
        assert!(fill.skipped.is_empty());
    }

    #[test]
    fn invested_is_investment_minus_remaining() {
        let universe = vec![stock("A", 1.0, 120.0), stock("B", 2.0, 80.0)];
        let fill = build_pure_basket(500.0, &universe, "IT", "high").unwrap();
        let b = &fill.basket;
        assert_eq!(b.invested, b.investment - b.remaining);
        assert_eq!(b.invested, 200.0);
        assert!(b.invested <= b.investment);
    }

    #[test]
    fn zero_investment_buys_nothing_priced() {
        let universe = vec![stock("A", 1.0, 10.0)];
        let fill = build_pure_basket(0.0, &universe, "IT", "low").unwrap();
        assert_eq!(fill.basket.count, 0);
        assert_eq!(fill.skipped.len(), 1);
        assert_eq!(fill.skipped[0].reason, SkipReason::OverBudget);
    }

    #[test]
    fn fractional_ranks_are_eligible_for_pure_baskets() {
        let universe = vec![stock("FRAC", 2.5, 10.0), stock("INT", 3.0, 10.0)];
        let fill = build_pure_basket(100.0, &universe, "IT", "low").unwrap();
        assert_eq!(symbols(&fill.basket), vec!["FRAC", "INT"]);
    }
}
