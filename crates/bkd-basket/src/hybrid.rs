//! Hybrid basket builder: rank-major interleaving across all themes.
//!
//! # Algorithm
//!
//! Each theme's universe is reduced to the same eligible+sorted form the
//! pure builder uses. Selection then walks integer rank tiers
//! r = 1..=[`policy::HYBRID_RANK_TIERS`]; within a tier, themes are
//! visited in their configured order and each theme may contribute at
//! most one stock per tier: the first stock whose rank is EXACTLY r,
//! whose symbol has not been selected under any theme, and whose full
//! price fits the remaining budget. The walk stops when the basket holds
//! [`policy::MAX_BASKET_SIZE`] stocks or the tiers are exhausted.
//!
//! The round-robin tier walk gives every theme a chance to contribute
//! before the basket fills; the global symbol set keeps a stock that is a
//! member of several themes from appearing twice.
//!
//! Tier matching is exact integer equality: a stock with a fractional
//! rank (e.g. 2.5) passes the eligibility cutoff but can never equal an
//! integer tier, so it is unreachable here even though the pure builder
//! would select it. Observed behaviour, kept as-is pending product
//! review — do not widen to `<=` matching.

use std::collections::HashSet;

use crate::policy;
use crate::types::{Basket, BasketKind, Stock};
use crate::{eligible_by_rank, guard_investment, guard_ranks, BasketError};

/// Theme label of every hybrid basket.
pub const HYBRID_THEME_LABEL: &str = "Hybrid";

/// One theme's loaded universe, in input row order.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeStocks {
    pub theme: String,
    pub stocks: Vec<Stock>,
}

/// Fill the hybrid basket from all themes.
///
/// `themes` must be in the configured theme order; it drives the
/// round-robin visit order. Themes with empty universes participate
/// harmlessly (they simply never match a tier).
pub fn build_hybrid_basket(
    investment: f64,
    themes: &[ThemeStocks],
    risk: &str,
) -> Result<Basket, BasketError> {
    guard_investment(investment)?;
    for t in themes {
        guard_ranks(&t.stocks)?;
    }

    let prepared: Vec<Vec<Stock>> = themes.iter().map(|t| eligible_by_rank(&t.stocks)).collect();

    let mut basket = Basket::empty(HYBRID_THEME_LABEL, BasketKind::Hybrid, investment, risk);
    let mut used: HashSet<String> = HashSet::new();

    'tiers: for tier in 1..=policy::HYBRID_RANK_TIERS {
        let tier_rank = tier as f64;
        for theme in &prepared {
            if basket.count >= policy::MAX_BASKET_SIZE {
                break 'tiers;
            }
            let pick = theme.iter().find(|s| {
                s.rank == tier_rank
                    && !used.contains(&s.symbol)
                    && s.price <= basket.remaining
            });
            if let Some(stock) = pick {
                used.insert(stock.symbol.clone());
                basket.add(stock.clone());
            }
        }
    }

    Ok(basket)
}
