use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::errors::{LedgerError, Result};
use crate::utils::paths::{ensure_dir, PathResolver};

use super::KeyValueStore;

const NAMESPACE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Root of the on-disk preference namespaces.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(namespace), NAMESPACE_EXTENSION))
    }

    /// Opens (or lazily creates) the file backing `namespace`.
    pub fn open(&self, namespace: &str) -> Result<JsonFileStore> {
        JsonFileStore::open(self.namespace_path(namespace))
    }
}

/// A preference namespace persisted as a single JSON object of string values.
///
/// Every `put` rewrites the whole document through a temporary file that is
/// renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let entries = read_entries(&path);
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .read()
            .map_err(|_| LedgerError::Storage("preference cache lock poisoned".into()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .write()
            .map_err(|_| LedgerError::Storage("preference cache lock poisoned".into()))
    }

    /// Picks up keys written through other handles so a flush only changes
    /// the key being written. A vanished file leaves the cache as it is.
    fn merge_from_disk(&self, entries: &mut BTreeMap<String, String>) {
        if self.path.exists() {
            *entries = read_entries(&self.path);
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_guard()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.write_guard()?;
        self.merge_from_disk(&mut entries);
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.write_guard()?;
        self.merge_from_disk(&mut entries);
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        let fresh = read_entries(&self.path);
        *self.write_guard()? = fresh;
        Ok(())
    }
}

/// Missing or malformed files read as an empty namespace.
fn read_entries(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unable to read preference file");
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&data) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring malformed preference file");
            BTreeMap::new()
        }
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "prefs".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn values_survive_reopen() {
        let (storage, _guard) = storage_with_temp_dir();
        let store = storage.open("IncomePrefs").expect("open namespace");
        store.put("categories", r#"["Salary"]"#).expect("put");

        let reopened = storage.open("IncomePrefs").expect("reopen namespace");
        assert_eq!(
            reopened.get("categories").unwrap().as_deref(),
            Some(r#"["Salary"]"#)
        );
        assert!(!tmp_path(reopened.path()).exists());
    }

    #[test]
    fn malformed_file_reads_as_empty() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.namespace_path("settings");
        fs::write(&path, "{not json").unwrap();
        let store = storage.open("settings").expect("open namespace");
        assert_eq!(store.get("currency").unwrap(), None);
    }

    #[test]
    fn refresh_observes_other_handles() {
        let (storage, _guard) = storage_with_temp_dir();
        let first = storage.open("ExpensePrefs").unwrap();
        let second = storage.open("ExpensePrefs").unwrap();
        first.put("categories", "[]").unwrap();
        assert_eq!(second.get("categories").unwrap(), None);
        second.refresh().unwrap();
        assert_eq!(second.get("categories").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn writes_keep_keys_from_other_handles() {
        let (storage, _guard) = storage_with_temp_dir();
        let first = storage.open("IncomePrefs").unwrap();
        let second = storage.open("IncomePrefs").unwrap();
        second.put("IncomeTransactions", "[]").unwrap();
        first.put("categories", r#"["Salary"]"#).unwrap();

        let reopened = storage.open("IncomePrefs").unwrap();
        assert_eq!(reopened.get("IncomeTransactions").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            reopened.get("categories").unwrap().as_deref(),
            Some(r#"["Salary"]"#)
        );
        assert_eq!(first.get("IncomeTransactions").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn namespace_names_cannot_escape_root() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.namespace_path("../outside");
        assert_eq!(path.parent(), Some(storage.base_dir()));
    }
}
