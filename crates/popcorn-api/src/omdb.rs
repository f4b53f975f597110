pub mod client;
pub mod error;
pub mod types;

pub use client::{OmdbClient, OmdbConfig};
pub use error::OmdbError;
