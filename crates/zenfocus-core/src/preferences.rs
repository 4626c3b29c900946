//! Dark-mode preference.
//!
//! The flag is the only value the front end persists. Views receive a
//! [`PreferenceStore`] handle instead of touching shared storage directly.

use std::path::PathBuf;

use crate::error::Result;
use crate::storage::Config;

/// Persistence for the dark-mode flag.
pub trait PreferenceStore {
    /// Read the stored flag. A store that has never been written yields `false`.
    fn load(&self) -> Result<bool>;

    fn save(&mut self, dark_mode: bool) -> Result<()>;
}

/// In-process store, used by tests and embedders without a config file.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    value: Option<bool>,
    writes: usize,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(dark_mode: bool) -> Self {
        Self {
            value: Some(dark_mode),
            writes: 0,
        }
    }

    /// Number of `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self) -> Result<bool> {
        Ok(self.value.unwrap_or(false))
    }

    fn save(&mut self, dark_mode: bool) -> Result<()> {
        self.value = Some(dark_mode);
        self.writes += 1;
        Ok(())
    }
}

/// Store backed by `ui.dark_mode` in the TOML config file.
///
/// Every save re-reads the file so other sections written meanwhile are kept.
/// Only the `ui` section matters here, so out-of-range schedule values in the
/// file do not block reading or writing the flag.
#[derive(Debug, Clone)]
pub struct ConfigPreferences {
    path: PathBuf,
}

impl ConfigPreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default config location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::storage::config_path()?))
    }
}

impl PreferenceStore for ConfigPreferences {
    fn load(&self) -> Result<bool> {
        Ok(Config::read_from(&self.path)?.ui.dark_mode)
    }

    fn save(&mut self, dark_mode: bool) -> Result<()> {
        let mut cfg = Config::read_from(&self.path)?;
        cfg.ui.dark_mode = dark_mode;
        cfg.save_to(&self.path)
    }
}

/// Current theme of a view, bound to its preference store.
#[derive(Debug)]
pub struct Theme<P: PreferenceStore> {
    store: P,
    dark_mode: bool,
}

impl<P: PreferenceStore> Theme<P> {
    /// Read the stored flag and write it straight back, so the key exists
    /// after the first mount.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn mount(mut store: P) -> Result<Self> {
        let dark_mode = store.load()?;
        store.save(dark_mode)?;
        Ok(Self { store, dark_mode })
    }

    pub fn is_dark(&self) -> bool {
        self.dark_mode
    }

    pub fn name(&self) -> &'static str {
        if self.dark_mode {
            "dark"
        } else {
            "light"
        }
    }

    /// Flip the flag and persist it. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; the in-memory flag
    /// is left unchanged in that case.
    pub fn toggle(&mut self) -> Result<bool> {
        self.set(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set(&mut self, dark_mode: bool) -> Result<()> {
        self.store.save(dark_mode)?;
        self.dark_mode = dark_mode;
        tracing::debug!(dark_mode, "theme updated");
        Ok(())
    }

    pub fn store(&self) -> &P {
        &self.store
    }
}
