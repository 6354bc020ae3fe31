// Adapters - External system implementations

pub mod acquire_ytdlp;
pub mod decode_libav;
pub mod fs_store;
pub mod toml_config;

// Re-export adapters
pub use acquire_ytdlp::YtDlpAcquisition;
pub use decode_libav::LibavMediaOpener;
pub use fs_store::FsStore;
pub use toml_config::{AppConfig, ConfigError, ConfigOrigin};
