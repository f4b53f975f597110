use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "popcorn_core=debug,popcorn_api=debug,popcorn_runtime=debug";

/// Install the global fmt subscriber. Returns `false` if one is already set.
pub fn init() -> bool {
    init_with(DEFAULT_FILTER)
}

pub fn init_with(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
