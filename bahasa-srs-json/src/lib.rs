use bahasa_srs_core::{CoreError, KeyValueStore};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

pub mod paths;

const FILE_VERSION: u32 = 1;
pub const DEFAULT_MAX_BACKUPS: usize = 10;
const BACKUP_PREFIX: &str = "bahasa-srs-";

#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    entries: BTreeMap<String, String>,
}

struct State {
    created_at: DateTime<Utc>,
    entries: BTreeMap<String, String>,
}

impl State {
    fn new_empty() -> Self {
        Self {
            created_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    fn from_image(img: FileImage) -> Self {
        Self {
            created_at: img.created_at,
            entries: img.entries,
        }
    }
}

/// Key-value store persisted as one JSON document on disk.
///
/// Every mutation rewrites the file through a temp file in the same
/// directory and drops a timestamped copy into the backups directory.
pub struct JsonFileStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    state: RwLock<State>,
}

impl JsonFileStore {
    pub fn open_default() -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, DEFAULT_MAX_BACKUPS)
    }

    pub fn open_in(root: PathBuf) -> Result<Self, CoreError> {
        let (file, backups) = paths::store_files_in(root);
        Self::open_with(file, backups, DEFAULT_MAX_BACKUPS)
    }

    pub fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let state = load_or_init(&path)?;
        info!(path = %path.display(), entries = state.entries.len(), "opened json store");
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Write `next` to disk and only then make it the live state.
    fn commit(&self, state: &mut State, next: BTreeMap<String, String>) -> Result<(), CoreError> {
        let img = FileImage {
            version: FILE_VERSION,
            created_at: state.created_at,
            updated_at: Utc::now(),
            entries: next,
        };
        write_with_backup(&self.path, &self.backups_dir, self.max_backups, &img).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "json store write failed");
            CoreError::Storage("io")
        })?;
        *state = State::from_image(img);
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.state.read().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut s = self.state.write();
        let mut next = s.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.commit(&mut s, next)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut s = self.state.write();
        if !s.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = s.entries.clone();
        next.remove(key);
        self.commit(&mut s, next)
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

fn load_or_init(path: &Path) -> Result<State, CoreError> {
    if !path.exists() {
        return Ok(State::new_empty());
    }
    let buf = fs::read_to_string(path).map_err(|_| CoreError::Storage("io"))?;
    match serde_json::from_str::<FileImage>(&buf) {
        Ok(img) => Ok(State::from_image(img)),
        Err(e) => {
            // Keep the unreadable file around for inspection and start empty.
            let aside = corrupt_path(path);
            warn!(
                path = %path.display(),
                moved_to = %aside.display(),
                error = %e,
                "json store is corrupt, starting empty"
            );
            fs::rename(path, &aside).map_err(|_| CoreError::Storage("io"))?;
            Ok(State::new_empty())
        }
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &FileImage,
) -> Result<(), std::io::Error> {
    let json = serde_json::to_vec_pretty(img)?;

    // Backup first: a failure leaves the live file untouched.
    fs::create_dir_all(backups_dir)?;
    write_atomic(&backups_dir.join(backup_name(img.updated_at)), &json)?;
    prune_backups(backups_dir, max_backups)?;

    write_atomic(path, &json)
}

/// Temp file in the target directory, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Millisecond UTC stamp; names sort in write order.
fn backup_name(at: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}.json", at.format("%Y%m%dT%H%M%S%3f"))
}

fn prune_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut names: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(".json"))
        })
        .collect();
    names.sort();
    let excess = names.len().saturating_sub(keep);
    for old in &names[..excess] {
        if let Err(e) = fs::remove_file(old) {
            warn!(path = %old.display(), error = %e, "could not prune backup");
        }
    }
    Ok(())
}
