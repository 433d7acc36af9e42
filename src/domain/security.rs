//! Securities and their per-instrument metrics.
//!
//! [`CommonStock`] and [`PreferredStock`] share all state through a
//! [`Listing`] and differ only in how dividend yield is computed, which is
//! the one required method of [`PricedInstrument`].

use chrono::{DateTime, Utc};
use log::warn;

use super::error::MarketError;
use super::precision::Precision;
use super::trade::{
    DEFAULT_CURRENCY, DEFAULT_WINDOW_MINUTES, Side, Trade, TradeConfirmation, TradeLedger,
};

/// Prices must be strictly positive; NaN is rejected too.
pub fn is_valid_price(price: f64) -> bool {
    price > 0.0
}

/// State common to every kind of security.
#[derive(Debug, Clone)]
pub struct Listing {
    symbol: String,
    last_dividend: f64,
    par_value: f64,
    price: f64,
    precision: Precision,
    ledger: TradeLedger,
}

impl Listing {
    /// New listing with no price yet (price 0) and an empty ledger.
    pub fn new(symbol: impl Into<String>, last_dividend: f64, par_value: f64) -> Self {
        Listing {
            symbol: symbol.into(),
            last_dividend,
            par_value,
            price: 0.0,
            precision: Precision::default(),
            ledger: TradeLedger::new(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Result<Self, MarketError> {
        self.set_price(price)?;
        Ok(self)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn last_dividend(&self) -> f64 {
        self.last_dividend
    }

    pub fn set_last_dividend(&mut self, last_dividend: f64) {
        self.last_dividend = last_dividend;
    }

    pub fn par_value(&self) -> f64 {
        self.par_value
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_price(&mut self, price: f64) -> Result<(), MarketError> {
        if !is_valid_price(price) {
            return Err(MarketError::InvalidPrice);
        }
        self.price = price;
        Ok(())
    }

    pub fn precision(&self) -> u32 {
        self.precision.places()
    }

    /// Negative values clamp to zero.
    pub fn set_precision(&mut self, places: i64) {
        self.precision = Precision::clamped(places);
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    pub fn round(&self, value: f64) -> f64 {
        self.precision.round(value)
    }

    pub fn record_trade_at(
        &mut self,
        now: DateTime<Utc>,
        price: f64,
        quantity: i64,
        side: Side,
        currency: &str,
    ) -> Result<TradeConfirmation, MarketError> {
        if !is_valid_price(price) {
            return Err(MarketError::InvalidPrice);
        }
        if quantity <= 0 {
            return Err(MarketError::InvalidQuantity);
        }
        let trade = Trade { price, quantity };
        let timestamp = self.ledger.append(now, trade);
        Ok(TradeConfirmation {
            timestamp,
            trade,
            side,
            currency: currency.to_string(),
        })
    }

    pub fn calc_pe_ratio(&self, price: f64) -> Result<f64, MarketError> {
        if !is_valid_price(price) {
            return Err(MarketError::InvalidPrice);
        }
        if self.last_dividend == 0.0 {
            return Ok(0.0);
        }
        Ok(self.round(price / self.last_dividend))
    }

    /// sum(price * quantity) / sum(quantity) over trades strictly newer than
    /// `now - window_minutes`.
    pub fn calc_volume_weighted_price_at(
        &self,
        now: DateTime<Utc>,
        window_minutes: i64,
    ) -> Result<f64, MarketError> {
        // f64 totals: a few large quantities would overflow an i64 sum
        let (total_cost, total_quantity) = self
            .ledger
            .recent(now, window_minutes)
            .fold((0.0, 0.0), |(cost, qty), t| {
                let quantity = t.quantity as f64;
                (cost + t.price * quantity, qty + quantity)
            });

        if total_quantity == 0.0 {
            warn!(
                "No trades recorded to calculate price for {} in last {} minutes",
                self.symbol, window_minutes
            );
            return Err(MarketError::InsufficientData {
                symbol: self.symbol.clone(),
                window_minutes,
            });
        }
        Ok(self.round(total_cost / total_quantity))
    }
}

/// A tradable instrument. Everything except dividend yield is provided on
/// top of the shared [`Listing`].
pub trait PricedInstrument: std::fmt::Debug {
    fn listing(&self) -> &Listing;

    fn listing_mut(&mut self) -> &mut Listing;

    fn calc_dividend_yield(&self, price: f64) -> Result<f64, MarketError>;

    fn symbol(&self) -> &str {
        self.listing().symbol()
    }

    fn price(&self) -> f64 {
        self.listing().price()
    }

    fn set_price(&mut self, price: f64) -> Result<(), MarketError> {
        self.listing_mut().set_price(price)
    }

    fn last_dividend(&self) -> f64 {
        self.listing().last_dividend()
    }

    fn set_last_dividend(&mut self, last_dividend: f64) {
        self.listing_mut().set_last_dividend(last_dividend)
    }

    fn par_value(&self) -> f64 {
        self.listing().par_value()
    }

    fn precision(&self) -> u32 {
        self.listing().precision()
    }

    fn set_precision(&mut self, places: i64) {
        self.listing_mut().set_precision(places)
    }

    fn ledger(&self) -> &TradeLedger {
        self.listing().ledger()
    }

    /// Record a trade at the current time, priced in pounds.
    fn record_trade(
        &mut self,
        price: f64,
        quantity: i64,
        side: Side,
    ) -> Result<TradeConfirmation, MarketError> {
        self.record_trade_in(price, quantity, side, DEFAULT_CURRENCY)
    }

    fn record_trade_in(
        &mut self,
        price: f64,
        quantity: i64,
        side: Side,
        currency: &str,
    ) -> Result<TradeConfirmation, MarketError> {
        self.listing_mut()
            .record_trade_at(Utc::now(), price, quantity, side, currency)
    }

    fn record_trade_at(
        &mut self,
        now: DateTime<Utc>,
        price: f64,
        quantity: i64,
        side: Side,
        currency: &str,
    ) -> Result<TradeConfirmation, MarketError> {
        self.listing_mut()
            .record_trade_at(now, price, quantity, side, currency)
    }

    fn calc_pe_ratio(&self, price: f64) -> Result<f64, MarketError> {
        self.listing().calc_pe_ratio(price)
    }

    /// Volume-weighted price over the default 15 minute window.
    fn calc_volume_weighted_price(&self) -> Result<f64, MarketError> {
        self.calc_volume_weighted_price_over(DEFAULT_WINDOW_MINUTES)
    }

    fn calc_volume_weighted_price_over(&self, window_minutes: i64) -> Result<f64, MarketError> {
        self.listing()
            .calc_volume_weighted_price_at(Utc::now(), window_minutes)
    }

    fn calc_volume_weighted_price_at(
        &self,
        now: DateTime<Utc>,
        window_minutes: i64,
    ) -> Result<f64, MarketError> {
        self.listing()
            .calc_volume_weighted_price_at(now, window_minutes)
    }
}

/// Common stock: yield is last dividend over price.
#[derive(Debug, Clone)]
pub struct CommonStock {
    listing: Listing,
}

impl CommonStock {
    pub fn new(symbol: impl Into<String>, last_dividend: f64, par_value: f64) -> Self {
        CommonStock {
            listing: Listing::new(symbol, last_dividend, par_value),
        }
    }

    pub fn from_listing(listing: Listing) -> Self {
        CommonStock { listing }
    }
}

impl PricedInstrument for CommonStock {
    fn listing(&self) -> &Listing {
        &self.listing
    }

    fn listing_mut(&mut self) -> &mut Listing {
        &mut self.listing
    }

    fn calc_dividend_yield(&self, price: f64) -> Result<f64, MarketError> {
        if !is_valid_price(price) {
            return Err(MarketError::InvalidPrice);
        }
        Ok(self.listing.round(self.listing.last_dividend() / price))
    }
}

/// Preferred stock: yield is the fixed dividend (percent of par) over price.
#[derive(Debug, Clone)]
pub struct PreferredStock {
    listing: Listing,
    fixed_dividend_rate: f64,
}

impl PreferredStock {
    pub fn new(
        symbol: impl Into<String>,
        last_dividend: f64,
        par_value: f64,
        fixed_dividend_rate: f64,
    ) -> Self {
        PreferredStock {
            listing: Listing::new(symbol, last_dividend, par_value),
            fixed_dividend_rate,
        }
    }

    pub fn from_listing(listing: Listing, fixed_dividend_rate: f64) -> Self {
        PreferredStock {
            listing,
            fixed_dividend_rate,
        }
    }

    /// Percentage, e.g. `2.0` is 2%.
    pub fn fixed_dividend_rate(&self) -> f64 {
        self.fixed_dividend_rate
    }
}

impl PricedInstrument for PreferredStock {
    fn listing(&self) -> &Listing {
        &self.listing
    }

    fn listing_mut(&mut self) -> &mut Listing {
        &mut self.listing
    }

    fn calc_dividend_yield(&self, price: f64) -> Result<f64, MarketError> {
        if !is_valid_price(price) {
            return Err(MarketError::InvalidPrice);
        }
        let fixed_dividend = self.fixed_dividend_rate * self.listing.par_value() / 100.0;
        Ok(self.listing.round(fixed_dividend / price))
    }
}
