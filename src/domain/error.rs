//! Domain error types.

/// Message shared by every price check (setter, trade recording, metrics).
pub const INVALID_PRICE_MESSAGE: &str = "Invalid price, must be greater than 0.0, please try again.";

/// Message for a rejected trade quantity.
pub const INVALID_QUANTITY_MESSAGE: &str =
    "Invalid quantity, must be greater than 0, please try again.";

/// Top-level error type for gbce.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("{}", INVALID_PRICE_MESSAGE)]
    InvalidPrice,

    #[error("{}", INVALID_QUANTITY_MESSAGE)]
    InvalidQuantity,

    #[error("No trades recorded to calculate price for {symbol} in last {window_minutes} minutes")]
    InsufficientData { symbol: String, window_minutes: i64 },

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MarketError> for std::process::ExitCode {
    fn from(err: &MarketError) -> Self {
        let code: u8 = match err {
            MarketError::Io(_) => 1,
            MarketError::ConfigParse { .. }
            | MarketError::ConfigMissing { .. }
            | MarketError::ConfigInvalid { .. } => 2,
            MarketError::Data { .. } | MarketError::DuplicateSymbol(_) => 3,
            MarketError::InvalidPrice
            | MarketError::InvalidQuantity
            | MarketError::UnknownSymbol(_) => 4,
            MarketError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
