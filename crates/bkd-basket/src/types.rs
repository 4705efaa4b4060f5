use serde::{Deserialize, Serialize};

/// One valid input row from a themed universe.
///
/// `price` and `current_price` both carry the source's `Current Price`
/// value; the export schema requires both keys. `rank` is normalised to
/// `f64` at load time (lower = more preferred), so fractional and integral
/// source ranks compare uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub rank: f64,
    pub theme: String,
    #[serde(rename = "52_week_low")]
    pub week52_low: f64,
    #[serde(rename = "52_week_high")]
    pub week52_high: f64,
    pub current_price: f64,
}

/// Whether a basket draws from one theme or interleaves all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasketKind {
    Pure,
    Hybrid,
}

impl BasketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasketKind::Pure => "pure",
            BasketKind::Hybrid => "hybrid",
        }
    }
}

/// A filled basket. Field order is the wire order of the export schema.
///
/// Invariants: `count == stocks.len()`, `invested == investment - remaining`,
/// and `invested <= investment` (every addition is budget-guarded). Stocks
/// appear in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    pub theme: String,
    #[serde(rename = "type")]
    pub kind: BasketKind,
    pub stocks: Vec<Stock>,
    pub investment: f64,
    pub remaining: f64,
    pub count: usize,
    pub risk: String,
    pub invested: f64,
}

impl Basket {
    pub(crate) fn empty(theme: &str, kind: BasketKind, investment: f64, risk: &str) -> Self {
        Self {
            theme: theme.to_string(),
            kind,
            stocks: Vec::new(),
            investment,
            remaining: investment,
            count: 0,
            risk: risk.to_string(),
            invested: 0.0,
        }
    }

    /// Add a stock whose full price fits the remaining budget.
    /// Callers must have checked affordability; this only does the bookkeeping.
    pub(crate) fn add(&mut self, stock: Stock) {
        self.remaining -= stock.price;
        self.count += 1;
        self.stocks.push(stock);
        self.invested = self.investment - self.remaining;
    }
}
