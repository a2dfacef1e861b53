//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] for the rig.
//!
//! - Config validation: all fields are range-checked before persistence.
//! - Namespace isolation: each subsystem uses its own namespace prefix.
//! - Host backend: an in-memory map, optionally mirrored to a JSON file so
//!   the simulator survives a restart the way the field units survive a
//!   power cut.  Every write is flushed before it returns.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::RigConfig;

const CONFIG_NAMESPACE: &str = "tankrig";
const CONFIG_KEY: &str = "rigcfg";

type Store = BTreeMap<String, Vec<u8>>;

pub struct NvsAdapter {
    store: RefCell<Store>,
    backing: Option<PathBuf>,
}

impl NvsAdapter {
    /// Volatile store; contents are lost when dropped.
    pub fn new() -> Self {
        info!("NvsAdapter: in-memory backend");
        Self {
            store: RefCell::new(Store::new()),
            backing: None,
        }
    }

    /// Store mirrored to `path`.  A missing file starts empty.  So does an
    /// unparsable one (a torn write): it is moved aside to `<path>.corrupt`
    /// and every slot reads as missing, so the tanks restore to INITIAL.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let store = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<Store>(&bytes) {
                Ok(store) => store,
                Err(e) => {
                    warn!("NvsAdapter: {} is not a valid store ({e}), starting empty", path.display());
                    let aside = sibling(path, ".corrupt");
                    if let Err(e) = std::fs::rename(path, &aside) {
                        warn!("NvsAdapter: cannot move {} aside: {e}", path.display());
                    }
                    Store::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("NvsAdapter: {} not found, starting empty", path.display());
                Store::new()
            }
            Err(e) => {
                warn!("NvsAdapter: cannot read {}: {e}", path.display());
                return Err(ConfigError::IoError);
            }
        };
        info!("NvsAdapter: file backend {} ({} keys)", path.display(), store.len());
        Ok(Self {
            store: RefCell::new(store),
            backing: Some(path.to_path_buf()),
        })
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Mirror the map to the backing file, if any.
    fn flush(&self) -> Result<(), StorageError> {
        let Some(path) = &self.backing else {
            return Ok(());
        };
        let bytes = serde_json::to_vec(&*self.store.borrow()).map_err(|_| StorageError::IoError)?;
        // Write-then-rename: a power cut leaves either the old or the new file.
        let tmp = sibling(path, ".tmp");
        std::fs::write(&tmp, bytes)
            .and_then(|()| std::fs::rename(&tmp, path))
            .map_err(|e| {
                warn!("NvsAdapter: write to {} failed: {e}", path.display());
                StorageError::IoError
            })
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl Default for NvsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_config(cfg: &RigConfig) -> Result<(), ConfigError> {
    if !(1..=600).contains(&cfg.pre_fill_secs) {
        return Err(ConfigError::ValidationFailed("pre_fill_secs must be 1–600"));
    }
    if !(60..=7200).contains(&cfg.fill_failsafe_secs) {
        return Err(ConfigError::ValidationFailed(
            "fill_failsafe_secs must be 60–7200",
        ));
    }
    if !(1..=14_400).contains(&cfg.chem1_secs) {
        return Err(ConfigError::ValidationFailed("chem1_secs must be 1–14400"));
    }
    if !(1..=14_400).contains(&cfg.chem2_secs) {
        return Err(ConfigError::ValidationFailed("chem2_secs must be 1–14400"));
    }
    if !(1..=1000).contains(&cfg.tick_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "tick_interval_ms must be 1–1000",
        ));
    }
    if !(100..=60_000).contains(&cfg.status_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "status_interval_ms must be 100–60000",
        ));
    }
    if !(100..=10_000).contains(&cfg.heartbeat_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "heartbeat_interval_ms must be 100–10000",
        ));
    }
    Ok(())
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<RigConfig, ConfigError> {
        let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
        match self.store.borrow().get(&key) {
            Some(bytes) => {
                let cfg: RigConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
                Ok(cfg)
            }
            None => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(RigConfig::default())
            }
        }
    }

    fn save(&self, config: &RigConfig) -> Result<(), ConfigError> {
        validate_config(config)?;

        let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        let len = bytes.len();
        self.store.borrow_mut().insert(key, bytes);
        self.flush().map_err(|_| ConfigError::IoError)?;
        info!("NvsAdapter: config saved ({len} bytes)");
        Ok(())
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let composite = Self::composite_key(namespace, key);
        match self.store.borrow().get(&composite) {
            Some(data) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow_mut().insert(composite, data.to_vec());
        self.flush()
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let composite = Self::composite_key(namespace, key);
        if self.store.borrow_mut().remove(&composite).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow().contains_key(&composite)
    }
}
