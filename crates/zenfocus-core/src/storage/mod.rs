mod config;

pub use config::Config;

use std::path::PathBuf;

/// Returns `~/.config/zenfocus[-dev]/` based on ZENFOCUS_ENV.
///
/// Set ZENFOCUS_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ZENFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("zenfocus-dev")
    } else {
        base_dir.join("zenfocus")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Location of `config.toml` inside [`data_dir`].
pub fn config_path() -> std::io::Result<PathBuf> {
    Ok(data_dir()?.join("config.toml"))
}
