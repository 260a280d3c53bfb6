//! Key-value persistence for pins.

use crate::constants::pins::{KEY_PREFIX, RECORD_EXTENSION};
use crate::error::{Error, Result};
use crate::pins::listing::{PinIter, PinListing};
use crate::pins::{Coordinates, LocationProvider, PinRecord};
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// String-keyed, string-valued store scoped to one namespace.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// All keys in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reject keys that could escape the namespace or collide with temp files.
fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidStoreKey {
            key: key.to_string(),
        })
    }
}

/// Directory-backed store holding one `<key>.json` file per entry.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Namespace directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{RECORD_EXTENSION}"))
    }

    fn store_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::StoreIo {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::store_error(&path)(e)),
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| Error::MalformedPin {
                key: key.to_string(),
                reason: format!("value is not valid UTF-8: {e}"),
            })
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        fs::create_dir_all(&self.dir).map_err(Self::store_error(&self.dir))?;

        // Write beside the target and rename so readers never see a partial entry.
        let tmp_path = self.dir.join(format!(".{key}.tmp"));
        let path = self.entry_path(key);
        let written = write_synced(&tmp_path, value.as_bytes())
            .map_err(Self::store_error(&tmp_path))
            .and_then(|()| fs::rename(&tmp_path, &path).map_err(Self::store_error(&path)));

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        } else {
            debug!("Wrote {}", path.display());
        }
        written
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::store_error(&self.dir)(e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(Self::store_error(&self.dir))?.path();
            if !path.is_file() {
                continue;
            }
            let is_record = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORD_EXTENSION));
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if is_record && check_key(stem).is_ok() {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// In-process store, used for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|_| Error::Internal {
            message: "memory store lock poisoned".to_string(),
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

static KEY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unique, creation-ordered key for a new pin.
///
/// Millisecond time first so keys sort by creation, then the process id and a
/// per-process sequence so two pins in the same millisecond never collide.
pub fn next_pin_key() -> String {
    let millis = Utc::now().timestamp_millis().max(0);
    let seq = KEY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "{KEY_PREFIX}{millis:013}_{:010}_{seq:06}",
        std::process::id()
    )
}

/// Pin persistence over any [`KeyValueStore`].
pub struct PinStore<S> {
    store: S,
}

impl<S: KeyValueStore> PinStore<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub const fn inner(&self) -> &S {
        &self.store
    }

    /// Save a pin at the provider's last known location.
    ///
    /// Fails with [`Error::LocationUnavailable`] without writing anything when
    /// the provider has no fix.
    pub fn add_pin(&self, location: &dyn LocationProvider, label: &str) -> Result<PinRecord> {
        let coordinates = location
            .last_known_location()
            .ok_or(Error::LocationUnavailable)?;
        self.add_pin_at(coordinates, label)
    }

    /// Save a pin at explicit coordinates.
    pub fn add_pin_at(&self, coordinates: Coordinates, label: &str) -> Result<PinRecord> {
        let coordinates = Coordinates::new(coordinates.latitude, coordinates.longitude)?;
        let record = PinRecord::new(next_pin_key(), coordinates, label);
        self.store.put(&record.key, &record.encode()?)?;
        info!("Pinned '{}' at {} ({})", record.label, coordinates, record.key);
        Ok(record)
    }

    /// Lazily iterate over stored pins in key order.
    ///
    /// Each call takes a fresh snapshot of the keys, so listing can be repeated.
    /// Malformed entries surface as [`Error::MalformedPin`] items.
    pub fn list_pins(&self) -> Result<PinIter<'_, S>> {
        Ok(PinIter::new(&self.store, self.store.keys()?))
    }

    /// Collect all readable pins, skipping and counting malformed entries.
    pub fn listing(&self) -> Result<PinListing> {
        PinListing::collect(self.list_pins()?)
    }
}
