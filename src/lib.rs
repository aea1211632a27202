pub mod asset;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod deck;
pub mod divination;
pub mod draw;
pub mod error;
pub mod gpt;
pub mod interpret;
pub mod messaging;
pub mod plugin;

pub use error::{Result, TarotError};
pub use plugin::TarotsPlugin;

/// ログ出力の初期化（RUST_LOG未指定ならinfo）
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
