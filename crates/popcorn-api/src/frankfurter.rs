pub mod client;
pub mod error;
pub mod types;

pub use client::{FrankfurterClient, FrankfurterConfig};
pub use error::FrankfurterError;
