pub mod frankfurter;
pub mod omdb;
pub mod traits;

#[cfg(test)]
mod test_server;

pub use tokio_util::sync::CancellationToken;
