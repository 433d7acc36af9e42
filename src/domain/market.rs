//! The market: securities keyed by symbol and the All Share index.

use log::warn;
use std::collections::HashMap;

use super::precision::Precision;
use super::security::PricedInstrument;

/// Securities in insertion order with a symbol index.
#[derive(Debug, Default)]
pub struct Market {
    securities: Vec<Box<dyn PricedInstrument>>,
    index: HashMap<String, usize>,
    precision: Precision,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_securities<I>(securities: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn PricedInstrument>>,
    {
        let mut market = Market::new();
        for security in securities {
            market.add_security(security);
        }
        market
    }

    /// Insert a security under its symbol. An existing entry with the same
    /// symbol is replaced in place and handed back.
    pub fn add_security(
        &mut self,
        security: Box<dyn PricedInstrument>,
    ) -> Option<Box<dyn PricedInstrument>> {
        let symbol = security.symbol().to_string();
        match self.index.get(&symbol) {
            Some(&pos) => {
                warn!("replacing existing security {}", symbol);
                Some(std::mem::replace(&mut self.securities[pos], security))
            }
            None => {
                self.index.insert(symbol, self.securities.len());
                self.securities.push(security);
                None
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&dyn PricedInstrument> {
        self.index
            .get(symbol)
            .map(|&pos| &*self.securities[pos] as &dyn PricedInstrument)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut (dyn PricedInstrument + 'static)> {
        let pos = *self.index.get(symbol)?;
        Some(self.securities[pos].as_mut())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Securities in the order they were first added.
    pub fn securities(&self) -> impl Iterator<Item = &dyn PricedInstrument> + '_ {
        self.securities
            .iter()
            .map(|s| &**s as &dyn PricedInstrument)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.securities.iter().map(|s| s.symbol()).collect()
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    pub fn precision(&self) -> u32 {
        self.precision.places()
    }

    /// Negative values clamp to zero.
    pub fn set_precision(&mut self, places: i64) {
        self.precision = Precision::clamped(places);
    }

    /// Geometric mean of current prices, 0.0 for an empty market.
    ///
    /// Summed in log space so large markets neither overflow nor underflow.
    /// An unpriced security contributes `ln 0 = -inf` and zeroes the index.
    pub fn all_share_index(&self) -> f64 {
        if self.securities.is_empty() {
            return 0.0;
        }
        let log_sum: f64 = self.securities.iter().map(|s| s.price().ln()).sum();
        let n = self.securities.len() as f64;
        self.precision.round((log_sum / n).exp())
    }
}
