//! Securities and trade table access port trait.

use crate::domain::error::MarketError;
use crate::domain::universe::{SecurityRecord, TradeRecord};

pub trait DataPort {
    fn fetch_securities(&self) -> Result<Vec<SecurityRecord>, MarketError>;

    /// Trades in recording order. Empty when no trade table is configured.
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, MarketError>;
}
