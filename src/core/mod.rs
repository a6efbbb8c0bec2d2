//! Core abstractions shared by the client and the command line

pub mod config;
pub mod currency;
pub mod log;

// Re-export main types for cleaner imports
pub use currency::{Amount, Currency, CurrencyRateProvider, Rate};
