//! Locked JSON map file shared by the stores

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use pneu_types::Result;

/// JSON object on disk, re-read on every access.
///
/// `guard` serializes handles within the process; the sidecar lock file
/// serializes processes.
pub(crate) struct JsonMapFile<V> {
    path: PathBuf,
    lock_path: PathBuf,
    guard: Mutex<()>,
    _entries: PhantomData<fn() -> V>,
}

impl<V: Serialize + DeserializeOwned> JsonMapFile<V> {
    /// Create the store directory if needed and load the map
    pub(crate) fn open(store_dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let path = store_dir.join(file_name);
        let lock_path = store_dir.join(format!("{}.lock", file_name));
        let entries = Self::load(&path)?;
        debug!(path = %path.display(), entries = entries.len(), "opened store");
        Ok(Self {
            path,
            lock_path,
            guard: Mutex::new(()),
            _entries: PhantomData,
        })
    }

    fn load(path: &Path) -> Result<HashMap<String, V>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn lock_file(&self) -> Result<File> {
        Ok(OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read the latest on-disk state under a shared lock
    pub(crate) fn read<R>(&self, f: impl FnOnce(&HashMap<String, V>) -> R) -> Result<R> {
        let _guard = self.guard();
        let lock = self.lock_file()?;
        FileExt::lock_shared(&lock)?;
        let loaded = Self::load(&self.path);
        let _ = FileExt::unlock(&lock);
        Ok(f(&loaded?))
    }

    /// Reload, apply `f`, and persist under an exclusive lock.
    ///
    /// Nothing is written when `f` fails.
    pub(crate) fn update<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, V>) -> Result<R>,
    ) -> Result<R> {
        let _guard = self.guard();
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock)?;
        let outcome = self.update_locked(f);
        let _ = FileExt::unlock(&lock);
        outcome
    }

    fn update_locked<R>(&self, f: impl FnOnce(&mut HashMap<String, V>) -> Result<R>) -> Result<R> {
        let mut entries = Self::load(&self.path)?;
        let value = f(&mut entries)?;
        self.persist(&entries)?;
        Ok(value)
    }

    /// Write to a temp file and rename over the store file
    fn persist(&self, entries: &HashMap<String, V>) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), entries = entries.len(), "persisted store");
        Ok(())
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}
