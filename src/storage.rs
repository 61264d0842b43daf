use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const TASKS_KEY: &str = "tasks";
pub const NOTES_KEY: &str = "notes";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const USER_NAME_KEY: &str = "userName";

const STORAGE_FILE: &str = "storage.json";

/// Synchronous string key/value persistence.
pub trait Storage {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps every key in a single `storage.json` mapping inside `dir`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    #[tracing::instrument(skip(dir))]
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(STORAGE_FILE);
        let values = read_mapping(&path)?;

        info!(file = %path.display(), keys = values.len(), "opened storage");

        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> anyhow::Result<()> {
        let dir = self
            .path
            .parent()
            .context("storage file has no parent directory")?;
        let bytes = serde_json::to_vec_pretty(&*self.values.borrow())?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
    fn save(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
            .with_context(|| format!("failed to save '{key}'"))
    }
}

fn read_mapping(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(file = %path.display(), "no storage file yet");
            return Ok(BTreeMap::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed reading {}", path.display()));
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(values) => Ok(values),
        Err(err) => {
            warn!(file = %path.display(), error = %err, "storage file is corrupt; starting empty");
            Ok(BTreeMap::new())
        }
    }
}

/// Decodes a JSON value stored under `key`. Missing or malformed values yield the default.
pub fn load_json<T>(storage: &dyn Storage, key: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = storage.load(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(key, error = %err, "stored value is not valid JSON; using empty value");
            Ok(T::default())
        }
    }
}

pub fn save_json<T>(storage: &dyn Storage, key: &str, value: &T) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).with_context(|| format!("failed to encode '{key}'"))?;
    storage.save(key, &raw)
}
