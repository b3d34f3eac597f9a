use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use confy::{load_path, store_path};
use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// string key-value store the prayer offsets are persisted into
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// yaml file mapping storage keys to their string values.
///
/// every call goes to disk, nothing is cached between calls. a missing file
/// is created empty on first access
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// storage file in the per-user config directory
    pub fn open_default() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "horison").ok_or(Error::NoConfigDir)?;
        let mut path = project_dirs.config_dir().to_owned();
        if cfg!(debug_assertions) {
            path.push("storage.debug.yaml");
        } else {
            path.push("storage.yaml");
        }
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        debug!("loading storage from {}", self.path.display());
        Ok(load_path(&self.path)?)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        store_path(&self.path, &entries)?;
        debug!("stored `{}` in {}", key, self.path.display());
        Ok(())
    }
}
