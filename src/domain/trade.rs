//! Trades and the per-security trade ledger.

use chrono::{DateTime, Duration, Utc};
use log::warn;
use std::fmt;
use std::str::FromStr;

use super::error::MarketError;

/// Pound sign as plain UTF-8 (`C2 A3`). Deliberately not the doubly
/// encoded `Â£` (`C3 82 C2 A3`) that a mis-decoded source literal yields;
/// confirmations are expected to read `£`.
pub const DEFAULT_CURRENCY: &str = "£";
pub const DEFAULT_WINDOW_MINUTES: i64 = 15;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy { Side::Buy } else { Side::Sell }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            Side::Buy => "bought",
            Side::Sell => "sold",
        }
    }
}

impl FromStr for Side {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "b" => Ok(Side::Buy),
            "sell" | "s" => Ok(Side::Sell),
            other => Err(MarketError::Data {
                reason: format!("unknown trade side '{}'", other),
            }),
        }
    }
}

/// Receipt for a recorded trade. Displays as the confirmation line.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeConfirmation {
    pub timestamp: DateTime<Utc>,
    pub trade: Trade,
    pub side: Side,
    pub currency: String,
}

impl fmt::Display for TradeConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp:{} Number of Shares: {} {} at {}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.trade.quantity,
            self.side.indicator(),
            self.currency,
            self.trade.price
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub trade: Trade,
}

/// Append-only trade history, ascending by timestamp.
///
/// Windowed queries walk backwards from the newest entry and stop at the
/// first one outside the window, so ordering is enforced on append.
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    entries: Vec<LedgerEntry>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trade and return the instant it was recorded at. A timestamp
    /// older than the newest entry is moved forward to that entry's instant.
    pub fn append(&mut self, timestamp: DateTime<Utc>, trade: Trade) -> DateTime<Utc> {
        let recorded_at = match self.entries.last() {
            Some(last) if timestamp < last.timestamp => {
                warn!(
                    "trade timestamp {} precedes ledger head {}, recording at head",
                    timestamp, last.timestamp
                );
                last.timestamp
            }
            _ => timestamp,
        };
        self.entries.push(LedgerEntry {
            timestamp: recorded_at,
            trade,
        });
        recorded_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Trades strictly newer than `now - window_minutes`, newest first.
    pub fn recent(
        &self,
        now: DateTime<Utc>,
        window_minutes: i64,
    ) -> impl Iterator<Item = &Trade> + '_ {
        // None: the window reaches past the representable range
        let cutoff = Duration::try_minutes(window_minutes).and_then(|w| now.checked_sub_signed(w));
        self.entries
            .iter()
            .rev()
            .take_while(move |e| cutoff.is_none_or(|c| e.timestamp > c))
            .map(|e| &e.trade)
    }
}
