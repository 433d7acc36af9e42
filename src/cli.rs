//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::MarketError;
use crate::domain::market::Market;
use crate::domain::security::PricedInstrument;
use crate::domain::settings::MarketSettings;
use crate::domain::trade::{Side, TradeConfirmation};
use crate::domain::universe::{build_market, replay_trades};
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "gbce", about = "Stock exchange dividend, P/E and index calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print per-security metrics and the All Share index
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        securities: Option<PathBuf>,
        #[arg(long)]
        trades: Option<PathBuf>,
        /// Price to evaluate dividend yield and P/E at (default: current price)
        #[arg(long)]
        price: Option<f64>,
    },
    /// Record one trade and print its confirmation
    Trade {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        securities: Option<PathBuf>,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        quantity: i64,
        #[arg(long)]
        sell: bool,
    },
    /// Print the All Share index
    Index {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        securities: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Report {
            config,
            securities,
            trades,
            price,
        } => run_report(&config, securities, trades, price),
        Command::Trade {
            config,
            securities,
            symbol,
            price,
            quantity,
            sell,
        } => run_trade(
            &config,
            securities,
            &symbol,
            price,
            quantity,
            Side::from_is_buy(!sell),
        ),
        Command::Index { config, securities } => run_index(&config, securities),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<MarketSettings, MarketError> {
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| MarketError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    MarketSettings::from_config(&adapter)
}

/// Relative paths in the config file are taken from the config's directory.
pub fn resolve_path(config_path: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        return path;
    }
    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

/// Pick the data files from CLI overrides, falling back to the config.
pub fn build_data_port(
    config_path: &Path,
    settings: &MarketSettings,
    securities_override: Option<PathBuf>,
    trades_override: Option<PathBuf>,
) -> Result<CsvAdapter, MarketError> {
    let securities = match securities_override {
        Some(p) => p,
        None => resolve_path(config_path, settings.require_securities_path()?),
    };
    let trades = trades_override.or_else(|| {
        settings
            .trades_path
            .as_deref()
            .map(|t| resolve_path(config_path, t))
    });

    let adapter = CsvAdapter::new(securities);
    Ok(match trades {
        Some(t) => adapter.with_trades(t),
        None => adapter,
    })
}

/// Build the market and replay any recorded trades at `now`.
pub fn load_market(
    data_port: &dyn DataPort,
    settings: &MarketSettings,
    now: DateTime<Utc>,
) -> Result<Market, MarketError> {
    let mut market = build_market(
        data_port.fetch_securities()?,
        settings.security_precision,
        settings.index_precision,
    )?;
    let trades = data_port.fetch_trades()?;
    if !trades.is_empty() {
        eprintln!("Replaying {} trades...", trades.len());
        replay_trades(&mut market, &trades, now, &settings.currency)?;
    }
    Ok(market)
}

fn metric(value: Result<f64, MarketError>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(_) => "n/a".to_string(),
    }
}

/// Tabulate metrics for every security, then the index line.
pub fn render_report(
    market: &Market,
    settings: &MarketSettings,
    price: Option<f64>,
    now: DateTime<Utc>,
) -> String {
    let mut out = format!(
        "{:<8} {:>10} {:>10} {:>10} {:>10}\n",
        "SYMBOL", "PRICE", "YIELD", "P/E", "VWAP"
    );
    for security in market.securities() {
        let at = price.unwrap_or_else(|| security.price());
        out.push_str(&format!(
            "{:<8} {:>10} {:>10} {:>10} {:>10}\n",
            security.symbol(),
            at,
            metric(security.calc_dividend_yield(at)),
            metric(security.calc_pe_ratio(at)),
            metric(security.calc_volume_weighted_price_at(now, settings.vwap_window_minutes)),
        ));
    }
    out.push_str(&format!("All Share Index: {}\n", market.all_share_index()));
    out
}

fn run_report(
    config_path: &Path,
    securities: Option<PathBuf>,
    trades: Option<PathBuf>,
    price: Option<f64>,
) -> Result<String, MarketError> {
    eprintln!("Loading config from {}", config_path.display());
    let settings = load_config(config_path)?;
    let data_port = build_data_port(config_path, &settings, securities, trades)?;

    let now = Utc::now();
    let market = load_market(&data_port, &settings, now)?;
    Ok(render_report(&market, &settings, price, now))
}

/// Record a trade against a loaded market.
pub fn record_trade(
    market: &mut Market,
    settings: &MarketSettings,
    symbol: &str,
    price: f64,
    quantity: i64,
    side: Side,
    now: DateTime<Utc>,
) -> Result<TradeConfirmation, MarketError> {
    let key = symbol.to_uppercase();
    let security = market
        .get_mut(&key)
        .ok_or(MarketError::UnknownSymbol(key))?;
    security.record_trade_at(now, price, quantity, side, &settings.currency)
}

fn run_trade(
    config_path: &Path,
    securities: Option<PathBuf>,
    symbol: &str,
    price: f64,
    quantity: i64,
    side: Side,
) -> Result<String, MarketError> {
    let settings = load_config(config_path)?;
    let data_port = build_data_port(config_path, &settings, securities, None)?;

    let now = Utc::now();
    let mut market = load_market(&data_port, &settings, now)?;
    let confirmation = record_trade(&mut market, &settings, symbol, price, quantity, side, now)?;
    Ok(format!("{confirmation}\n"))
}

fn run_index(config_path: &Path, securities: Option<PathBuf>) -> Result<String, MarketError> {
    let settings = load_config(config_path)?;
    let data_port = build_data_port(config_path, &settings, securities, None)?;
    let market = load_market(&data_port, &settings, Utc::now())?;
    Ok(format!("{}\n", market.all_share_index()))
}
