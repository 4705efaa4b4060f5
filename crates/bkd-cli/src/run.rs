//! Run orchestration: budget computation, load -> build -> export.
//!
//! The per-basket investment (income x risk multiplier) is applied
//! INDEPENDENTLY AND IN FULL to every pure basket and again to the hybrid
//! basket — the implied notional across a run is (themes + 1) x
//! investment, never a split of income. That is the allocation contract;
//! do not normalise it to proportional splitting.

use anyhow::{bail, Result};
use bkd_basket::{build_hybrid_basket, build_pure_basket, policy, Basket, ThemeStocks};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// The configured theme universe, in generation order. Overridable with
/// repeated `--theme` flags.
pub const DEFAULT_THEME_FILES: &[&str] = &[
    "Largecap.csv",
    "Midcap.csv",
    "Smallcap.csv",
    "Realty.csv",
    "Healthcare.csv",
    "Auto.csv",
    "Consumer durables.csv",
    "IT.csv",
    "Consumer Discretionary.csv",
];

pub fn run(income: f64, risk: &str, data_dir: &Path, out: &Path, themes: &[String]) -> Result<()> {
    if !income.is_finite() || income <= 0.0 {
        bail!("income must be a positive number (got {income})");
    }
    let risk = risk.to_lowercase();

    let theme_files: Vec<PathBuf> = if themes.is_empty() {
        DEFAULT_THEME_FILES
            .iter()
            .map(|f| data_dir.join(f))
            .collect()
    } else {
        themes.iter().map(|f| data_dir.join(f)).collect()
    };

    // Fatal precondition: every configured source must exist before any
    // generation begins. Degraded (undersized/headerless) sources are the
    // loader's business, absence is not.
    let missing: Vec<String> = theme_files
        .iter()
        .filter(|p| !p.exists())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        bail!(
            "REFUSING RUN: missing theme input file(s): {}",
            missing.join(", ")
        );
    }

    let multiplier = policy::risk_multiplier(&risk);
    let investment = income * multiplier;
    info!(
        income,
        risk = %risk,
        multiplier,
        investment,
        themes = theme_files.len(),
        "starting basket generation"
    );

    // Load every theme once; the same records feed both builders. A theme
    // that loads empty emits no pure basket but stays in the hybrid pass.
    let universes: Vec<ThemeStocks> = theme_files
        .iter()
        .map(|path| ThemeStocks {
            theme: bkd_ingest::theme_label(path),
            stocks: bkd_ingest::load_theme_file(path),
        })
        .collect();

    let mut baskets: Vec<Basket> = Vec::new();
    for u in &universes {
        if u.stocks.is_empty() {
            info!(theme = %u.theme, "no valid stocks; pure basket skipped");
            continue;
        }
        let fill = build_pure_basket(investment, &u.stocks, &u.theme, &risk)?;
        for s in &fill.skipped {
            debug!(
                theme = %u.theme,
                symbol = %s.symbol,
                price = s.price,
                rank = s.rank,
                reason = ?s.reason,
                "candidate skipped"
            );
        }
        info!(
            theme = %u.theme,
            count = fill.basket.count,
            invested = fill.basket.invested,
            "pure basket filled"
        );
        baskets.push(fill.basket);
    }

    let hybrid = build_hybrid_basket(investment, &universes, &risk)?;
    info!(
        count = hybrid.count,
        invested = hybrid.invested,
        "hybrid basket filled"
    );
    baskets.push(hybrid);

    let report = bkd_artifacts::export_baskets(&baskets, out).map_err(|e| {
        error!(error = %format!("{e:#}"), "export failed; any prior artifact survives as the backup");
        e
    })?;

    for b in &baskets {
        println!(
            "basket={} type={} stocks={} invested={:.2} remaining={:.2}",
            b.theme,
            b.kind.as_str(),
            b.count,
            b.invested,
            b.remaining
        );
    }
    println!(
        "exported={} bytes={} baskets={} stocks={}",
        report.path.display(),
        report.bytes,
        report.baskets,
        report.stocks
    );
    if let Some(bak) = &report.backup {
        println!("backup={}", bak.display());
    }

    Ok(())
}
