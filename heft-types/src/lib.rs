//! Type definitions for heft

pub mod currency;
pub mod error;
pub mod log_level;
pub mod status;

pub use currency::CurrencyCode;
pub use error::{Error, Result};
pub use log_level::LogLevel;
pub use status::Status;
