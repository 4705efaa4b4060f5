//! CSV ingestion for themed stock universes (bkd-ingest boundary).
//!
//! Read side only: this crate turns one themed CSV source into validated
//! [`Stock`] records for the basket builders. It does not write anything
//! and it does not decide what happens to an empty theme — the caller does.
//!
//! ## CSV column contract (exact names, order-independent)
//!
//! | Column          | Type / example | Notes                               |
//! |-----------------|----------------|-------------------------------------|
//! | `Stock Symbol`  | `INFY`         | Required per row; empty row dropped |
//! | `Full Name`     | `Infosys Ltd`  | May be quoted (commas allowed)      |
//! | `Current Price` | `1512.40`      | Blank/missing -> 0.0                |
//! | `Rank`          | `3` or `2.5`   | Decimal text -> float, else integer |
//! | `52-Week Low`   | `1181.00`      | Blank/missing -> 0.0                |
//! | `52-Week High`  | `1733.00`      | Blank/missing -> 0.0                |
//!
//! Extra columns (e.g. an appended sentiment label) are ignored.
//!
//! File-level problems — missing path, source under [`MIN_SOURCE_BYTES`],
//! unreadable header — degrade to an empty load with a logged diagnostic;
//! they never abort the run. Row-level problems skip that row only: one
//! bad row never aborts the file.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use bkd_basket::Stock;
use tracing::{info, warn};

/// Sources smaller than this are treated as truncated and load nothing.
pub const MIN_SOURCE_BYTES: u64 = 10;

const COL_SYMBOL: &str = "Stock Symbol";
const COL_NAME: &str = "Full Name";
const COL_PRICE: &str = "Current Price";
const COL_RANK: &str = "Rank";
const COL_WEEK52_LOW: &str = "52-Week Low";
const COL_WEEK52_HIGH: &str = "52-Week High";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural (whole-file) parse errors.
#[derive(Debug)]
pub enum IngestError {
    /// An I/O or CSV-library error while reading the header.
    Io(String),
    /// The source has no header row.
    MissingHeader,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(msg) => write!(f, "csv io error: {msg}"),
            IngestError::MissingHeader => write!(f, "csv source has no header row"),
        }
    }
}

impl std::error::Error for IngestError {}

/// Why a data row was dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum RowRejectReason {
    /// Symbol field empty after trimming.
    MissingSymbol,
    /// A numeric field could not be parsed.
    BadField { field: &'static str, raw: String },
    /// The CSV record itself was malformed (e.g. unbalanced quotes).
    BadRecord(String),
}

impl fmt::Display for RowRejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejectReason::MissingSymbol => write!(f, "missing stock symbol"),
            RowRejectReason::BadField { field, raw } => {
                write!(f, "cannot parse field '{field}' from value '{raw}'")
            }
            RowRejectReason::BadRecord(msg) => write!(f, "malformed record: {msg}"),
        }
    }
}

/// A dropped row: 1-based data-row number plus the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct RowReject {
    pub row: usize,
    pub reason: RowRejectReason,
}

/// The outcome of parsing one source: valid stocks in input order plus
/// the rows that were dropped.
#[derive(Debug)]
pub struct ThemeParse {
    pub stocks: Vec<Stock>,
    pub rejects: Vec<RowReject>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load one theme source from disk.
///
/// The theme label is the file's base name (stem). Every degraded path
/// logs a diagnostic and returns an empty sequence so the caller can skip
/// the theme; this function never fails.
pub fn load_theme_file(path: &Path) -> Vec<Stock> {
    let theme = theme_label(path);

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "theme source missing; loading nothing");
            return Vec::new();
        }
    };
    if meta.len() < MIN_SOURCE_BYTES {
        warn!(
            path = %path.display(),
            bytes = meta.len(),
            min_bytes = MIN_SOURCE_BYTES,
            "theme source undersized; loading nothing"
        );
        return Vec::new();
    }

    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "theme source unreadable; loading nothing");
            return Vec::new();
        }
    };

    match parse_theme_str(&src, &theme) {
        Ok(parse) => {
            for r in &parse.rejects {
                warn!(theme = %theme, row = r.row, reason = %r.reason, "row rejected");
            }
            info!(
                theme = %theme,
                loaded = parse.stocks.len(),
                rejected = parse.rejects.len(),
                "theme source loaded"
            );
            parse.stocks
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "theme source invalid; loading nothing");
            Vec::new()
        }
    }
}

/// Theme label for a source path: its file stem.
pub fn theme_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse CSV text into stocks for `theme` (useful for tests without
/// touching the filesystem).
///
/// Only structural problems (no header, unreadable input) are returned as
/// `Err`; every per-row problem lands in [`ThemeParse::rejects`].
pub fn parse_theme_str(src: &str, theme: &str) -> Result<ThemeParse, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(src.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::Io(e.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(IngestError::MissingHeader);
    }

    let mut col_idx: HashMap<String, usize> = HashMap::new();
    for (i, col) in headers.iter().enumerate() {
        col_idx.insert(col.trim().to_string(), i);
    }

    let symbol_col = col_idx.get(COL_SYMBOL).copied();
    let name_col = col_idx.get(COL_NAME).copied();
    let price_col = col_idx.get(COL_PRICE).copied();
    let rank_col = col_idx.get(COL_RANK).copied();
    let low_col = col_idx.get(COL_WEEK52_LOW).copied();
    let high_col = col_idx.get(COL_WEEK52_HIGH).copied();

    let mut stocks = Vec::new();
    let mut rejects = Vec::new();

    for (i, rec) in reader.records().enumerate() {
        let row = i + 1; // 1-based, data rows only

        let rec = match rec {
            Ok(r) => r,
            Err(e) => {
                rejects.push(RowReject {
                    row,
                    reason: RowRejectReason::BadRecord(e.to_string()),
                });
                continue;
            }
        };

        // Absent columns and short records read as "", matching the
        // observed loader's per-field defaults.
        let field = |col: Option<usize>| col.and_then(|c| rec.get(c)).unwrap_or("").trim();

        let symbol = field(symbol_col);
        if symbol.is_empty() {
            rejects.push(RowReject {
                row,
                reason: RowRejectReason::MissingSymbol,
            });
            continue;
        }

        let price = match parse_currency(field(price_col)) {
            Ok(v) => v,
            Err(raw) => {
                rejects.push(RowReject {
                    row,
                    reason: RowRejectReason::BadField {
                        field: COL_PRICE,
                        raw,
                    },
                });
                continue;
            }
        };

        // A source without a Rank column at all yields rank 0 for every
        // row (eligible for pure baskets, unmatchable by hybrid tiers);
        // a blank or unparseable value in an existing column drops the row.
        let rank = match rank_col {
            None => 0.0,
            Some(c) => match parse_rank(rec.get(c).unwrap_or("").trim()) {
                Ok(v) => v,
                Err(raw) => {
                    rejects.push(RowReject {
                        row,
                        reason: RowRejectReason::BadField {
                            field: COL_RANK,
                            raw,
                        },
                    });
                    continue;
                }
            },
        };

        let week52_low = match parse_currency(field(low_col)) {
            Ok(v) => v,
            Err(raw) => {
                rejects.push(RowReject {
                    row,
                    reason: RowRejectReason::BadField {
                        field: COL_WEEK52_LOW,
                        raw,
                    },
                });
                continue;
            }
        };

        let week52_high = match parse_currency(field(high_col)) {
            Ok(v) => v,
            Err(raw) => {
                rejects.push(RowReject {
                    row,
                    reason: RowRejectReason::BadField {
                        field: COL_WEEK52_HIGH,
                        raw,
                    },
                });
                continue;
            }
        };

        stocks.push(Stock {
            symbol: symbol.to_string(),
            name: field(name_col).to_string(),
            price,
            rank,
            theme: theme.to_string(),
            week52_low,
            week52_high,
            current_price: price,
        });
    }

    Ok(ThemeParse { stocks, rejects })
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Currency fields: blank reads as 0.0, anything else must parse as f64.
fn parse_currency(raw: &str) -> Result<f64, String> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| raw.to_string())
}

/// Rank: text containing a decimal separator parses as a float, anything
/// else as an integer widened to f64. Either way the result is finite —
/// "NaN"/"inf" have no '.' and fail the integer parse, and a float parse
/// that overflows to infinity is rejected.
fn parse_rank(raw: &str) -> Result<f64, String> {
    let parsed = if raw.contains('.') {
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    } else {
        raw.parse::<i64>().ok().map(|v| v as f64)
    };
    parsed.ok_or_else(|| raw.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
