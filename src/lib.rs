//! funds-api library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use domain::{Amount, AmountError, ValidationErrors};
