use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the per-user data directory when set.
pub const DATA_DIR_ENV: &str = "BAHASA_SRS_DATA_DIR";

const STORE_FILE: &str = "bahasa-srs.json";
const BACKUPS_DIR: &str = "backups";

/// `$BAHASA_SRS_DATA_DIR`, then the platform data dir, then the working dir.
pub fn data_root() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("id", "bahasa", "BahasaSrs")
        .map(|pd| pd.data_dir().to_path_buf())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Store file and backups directory under `root`.
pub fn store_files_in(root: PathBuf) -> (PathBuf, PathBuf) {
    (root.join(STORE_FILE), root.join(BACKUPS_DIR))
}

pub fn default_store_file() -> (PathBuf, PathBuf) {
    store_files_in(data_root())
}
