#![allow(dead_code)]

use gbce::domain::error::MarketError;
use gbce::domain::security::{CommonStock, PreferredStock, PricedInstrument};
use gbce::domain::trade::Side;
use gbce::domain::universe::{SecurityKind, SecurityRecord, TradeRecord};
use gbce::ports::data_port::DataPort;

pub const GBCE_CSV: &str = "symbol,type,last_dividend,fixed_dividend,par_value,price\n\
    TEA,Common,0,,100,\n\
    POP,Common,8,,100,\n\
    ALE,Common,23,,60,\n\
    GIN,Preferred,8,2%,100,\n\
    JOE,Common,13,,250,\n";

pub struct MockDataPort {
    pub securities: Vec<SecurityRecord>,
    pub trades: Vec<TradeRecord>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            securities: Vec::new(),
            trades: Vec::new(),
            error: None,
        }
    }

    pub fn with_security(mut self, record: SecurityRecord) -> Self {
        self.securities.push(record);
        self
    }

    pub fn with_trade(mut self, symbol: &str, price: f64, quantity: i64, side: Side) -> Self {
        self.trades.push(TradeRecord {
            symbol: symbol.to_string(),
            price,
            quantity,
            side,
        });
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_securities(&self) -> Result<Vec<SecurityRecord>, MarketError> {
        if let Some(reason) = &self.error {
            return Err(MarketError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.securities.clone())
    }

    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, MarketError> {
        Ok(self.trades.clone())
    }
}

pub fn common_record(symbol: &str, last_dividend: f64, par_value: f64) -> SecurityRecord {
    SecurityRecord {
        symbol: symbol.to_string(),
        kind: SecurityKind::Common,
        last_dividend,
        fixed_dividend: None,
        par_value,
        price: None,
    }
}

pub fn preferred_record(
    symbol: &str,
    last_dividend: f64,
    par_value: f64,
    fixed_dividend: f64,
) -> SecurityRecord {
    SecurityRecord {
        symbol: symbol.to_string(),
        kind: SecurityKind::Preferred,
        last_dividend,
        fixed_dividend: Some(fixed_dividend),
        par_value,
        price: None,
    }
}

/// TEA, POP, ALE, GIN (preferred, 2%), JOE in that order.
pub fn gbce_records() -> Vec<SecurityRecord> {
    vec![
        common_record("TEA", 0.0, 100.0),
        common_record("POP", 8.0, 100.0),
        common_record("ALE", 23.0, 60.0),
        preferred_record("GIN", 8.0, 100.0, 2.0),
        common_record("JOE", 13.0, 250.0),
    ]
}

/// The same table built directly as securities.
pub fn gbce_securities() -> Vec<Box<dyn PricedInstrument>> {
    vec![
        Box::new(CommonStock::new("TEA", 0.0, 100.0)),
        Box::new(CommonStock::new("POP", 8.0, 100.0)),
        Box::new(CommonStock::new("ALE", 23.0, 60.0)),
        Box::new(PreferredStock::new("GIN", 8.0, 100.0, 2.0)),
        Box::new(CommonStock::new("JOE", 13.0, 250.0)),
    ]
}
