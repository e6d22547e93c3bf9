//! Tideline - composite technical-signal engine and instrument screener

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::ScreenerCriteria;
pub use error::{EngineError, Result};
pub use services::{IndicatorCache, Screener};
