//! File-backed credential store
//!
//! All keys live in one JSON object (`credentials.json`) inside the data
//! directory. Every operation holds an exclusive lock on a sidecar
//! `credentials.lock` for its read-modify-write cycle, and writes go
//! through a temp file in the same directory that is renamed into place.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::CredentialStore;

const CREDENTIALS_FILE: &str = "credentials.json";
const LOCK_FILE: &str = "credentials.lock";

type Record = BTreeMap<String, String>;

/// Credential store persisting to `<data_dir>/credentials.json`
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: data_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    /// Run `f` on a blocking thread with the store lock held
    async fn locked<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || with_lock(&dir, || f(&dir)))
            .await
            .map_err(|e| Error::storage(format!("Credential task failed: {}", e)))?
    }
}

fn with_lock<T>(dir: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    fs::create_dir_all(dir).map_err(|e| storage_err("create data directory", e))?;
    let lock = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(dir.join(LOCK_FILE))
        .map_err(|e| storage_err("open lock file", e))?;

    lock.lock_exclusive()
        .map_err(|e| storage_err("acquire lock", e))?;
    let result = f();
    let _ = lock.unlock();
    result
}

fn storage_err(action: &str, e: std::io::Error) -> Error {
    Error::storage(format!("Failed to {}: {}", action, e))
}

fn read_record(dir: &Path) -> Result<Record> {
    let path = dir.join(CREDENTIALS_FILE);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Record::new()),
        Err(e) => return Err(storage_err("read credentials", e)),
    };
    if contents.trim().is_empty() {
        return Ok(Record::new());
    }
    serde_json::from_str(&contents)
        .map_err(|e| Error::storage(format!("Credentials file is corrupt: {}", e)))
}

fn write_record(dir: &Path, record: &Record) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| storage_err("create temp file", e))?;
    tmp.write_all(json.as_bytes())
        .map_err(|e| storage_err("write credentials", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| storage_err("sync credentials", e))?;
    restrict_permissions(tmp.as_file())?;

    tmp.persist(dir.join(CREDENTIALS_FILE))
        .map_err(|e| storage_err("replace credentials", e.error))?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .map_err(|e| storage_err("set permissions", e))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> Result<()> {
    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.locked(move |dir| {
            let mut record = read_record(dir)?;
            record.insert(key, value);
            write_record(dir, &record)
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.locked(move |dir| Ok(read_record(dir)?.remove(&key)))
            .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.locked(move |dir| {
            let mut record = read_record(dir)?;
            if record.remove(&key).is_none() {
                return Ok(());
            }
            write_record(dir, &record)
        })
        .await
    }
}
