//! gbce — a simplified stock exchange: trade ledgers per security, dividend
//! yield, P/E ratio, volume-weighted price and the All Share index.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
