//! The tradable universe as loaded from data files, and assembly of a
//! [`Market`] from it.

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::domain::error::MarketError;
use crate::domain::market::Market;
use crate::domain::security::{CommonStock, Listing, PreferredStock, PricedInstrument};
use crate::domain::trade::{Side, TradeConfirmation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityKind {
    Common,
    Preferred,
}

impl FromStr for SecurityKind {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(SecurityKind::Common),
            "preferred" => Ok(SecurityKind::Preferred),
            other => Err(MarketError::Data {
                reason: format!("unknown security type '{}'", other),
            }),
        }
    }
}

/// One row of the securities table.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRecord {
    pub symbol: String,
    pub kind: SecurityKind,
    pub last_dividend: f64,
    /// Percent of par value; only meaningful for preferred stock.
    pub fixed_dividend: Option<f64>,
    pub par_value: f64,
    pub price: Option<f64>,
}

impl SecurityRecord {
    pub fn into_security(self, precision: i64) -> Result<Box<dyn PricedInstrument>, MarketError> {
        let mut listing = Listing::new(self.symbol.clone(), self.last_dividend, self.par_value);
        listing.set_precision(precision);
        let listing = match self.price {
            Some(price) => listing.with_price(price)?,
            None => listing,
        };

        Ok(match self.kind {
            SecurityKind::Common => Box::new(CommonStock::from_listing(listing)),
            SecurityKind::Preferred => {
                let rate = self.fixed_dividend.ok_or_else(|| MarketError::Data {
                    reason: format!("preferred security {} has no fixed dividend", self.symbol),
                })?;
                Box::new(PreferredStock::from_listing(listing, rate))
            }
        })
    }
}

/// One row of the trades table.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub symbol: String,
    pub price: f64,
    pub quantity: i64,
    pub side: Side,
}

/// Build a market from records. Symbols must be unique within the table.
pub fn build_market(
    records: Vec<SecurityRecord>,
    security_precision: i64,
    index_precision: i64,
) -> Result<Market, MarketError> {
    let mut market = Market::new();
    market.set_precision(index_precision);

    for record in records {
        if market.contains(&record.symbol) {
            return Err(MarketError::DuplicateSymbol(record.symbol));
        }
        market.add_security(record.into_security(security_precision)?);
    }
    Ok(market)
}

/// Record each trade against its security, all at `now`. Stops at the first
/// rejected trade.
pub fn replay_trades(
    market: &mut Market,
    trades: &[TradeRecord],
    now: DateTime<Utc>,
    currency: &str,
) -> Result<Vec<TradeConfirmation>, MarketError> {
    trades
        .iter()
        .map(|t| {
            let security = market
                .get_mut(&t.symbol)
                .ok_or_else(|| MarketError::UnknownSymbol(t.symbol.clone()))?;
            security.record_trade_at(now, t.price, t.quantity, t.side, currency)
        })
        .collect()
}
