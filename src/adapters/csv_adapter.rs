//! CSV file data adapter.
//!
//! Securities: `symbol,type,last_dividend,fixed_dividend,par_value,price`
//! Trades: `symbol,price,quantity,side`

use crate::domain::error::MarketError;
use crate::domain::universe::{SecurityKind, SecurityRecord, TradeRecord};
use crate::ports::data_port::DataPort;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CsvAdapter {
    securities_path: PathBuf,
    trades_path: Option<PathBuf>,
}

impl CsvAdapter {
    pub fn new(securities_path: PathBuf) -> Self {
        Self {
            securities_path,
            trades_path: None,
        }
    }

    pub fn with_trades(mut self, trades_path: PathBuf) -> Self {
        self.trades_path = Some(trades_path);
        self
    }

    fn read_records(path: &Path) -> Result<Vec<StringRecord>, MarketError> {
        let content = fs::read_to_string(path)?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        rdr.records()
            .map(|r| {
                r.map_err(|e| MarketError::Data {
                    reason: format!("CSV parse error in {}: {}", path.display(), e),
                })
            })
            .collect()
    }
}

fn column<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, MarketError> {
    record.get(idx).ok_or_else(|| MarketError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_column<T>(record: &StringRecord, idx: usize, name: &str) -> Result<T, MarketError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    column(record, idx, name)?
        .parse()
        .map_err(|e| MarketError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

/// Blank or absent cells are `None`. A trailing `%` is ignored.
fn optional_f64(record: &StringRecord, idx: usize, name: &str) -> Result<Option<f64>, MarketError> {
    match record.get(idx).map(|v| v.trim_end_matches('%').trim()) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|e| MarketError::Data {
            reason: format!("invalid {} value: {}", name, e),
        }),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_securities(&self) -> Result<Vec<SecurityRecord>, MarketError> {
        Self::read_records(&self.securities_path)?
            .iter()
            .map(|record| {
                let symbol = column(record, 0, "symbol")?.to_uppercase();
                if symbol.is_empty() {
                    return Err(MarketError::Data {
                        reason: "empty symbol".into(),
                    });
                }
                Ok(SecurityRecord {
                    symbol,
                    kind: column(record, 1, "type")?.parse::<SecurityKind>()?,
                    last_dividend: parse_column(record, 2, "last_dividend")?,
                    fixed_dividend: optional_f64(record, 3, "fixed_dividend")?,
                    par_value: parse_column(record, 4, "par_value")?,
                    price: optional_f64(record, 5, "price")?,
                })
            })
            .collect()
    }

    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, MarketError> {
        let Some(path) = &self.trades_path else {
            return Ok(Vec::new());
        };
        Self::read_records(path)?
            .iter()
            .map(|record| {
                Ok(TradeRecord {
                    symbol: column(record, 0, "symbol")?.to_uppercase(),
                    price: parse_column(record, 1, "price")?,
                    quantity: parse_column(record, 2, "quantity")?,
                    side: column(record, 3, "side")?.parse()?,
                })
            })
            .collect()
    }
}
