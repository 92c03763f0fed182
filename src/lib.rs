pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

/// Installs the `tracing` subscriber shared by both binaries
///
/// Honours `RUST_LOG`, defaulting to info for this crate and the HTTP layer.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinematch=info,build_poster_cache=info,tower_http=info".into()),
        )
        .init();
}
