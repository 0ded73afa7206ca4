pub mod config;
pub mod error;
pub mod traits;
pub mod tuning;
pub mod types;

pub use error::{Error, Result};
