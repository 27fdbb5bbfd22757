mod structs;

pub use structs::*;

use once_cell::sync::OnceCell;

static CONFIG: OnceCell<StaticConfig> = OnceCell::new();

/// Load configuration once at startup. Later calls return the first value.
pub fn init_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::load)
}

/// Get the global configuration. Panics if `init_config` was never called.
pub fn get_config() -> &'static StaticConfig {
    CONFIG
        .get()
        .expect("configuration not initialized, call init_config() first")
}
