//! Core domain types and logic.

pub mod error;
pub mod market;
pub mod precision;
pub mod security;
pub mod settings;
pub mod trade;
pub mod universe;
