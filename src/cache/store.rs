// Cache store for search responses.
// Persists a URL -> raw payload map as JSON, with TTL expiry and size bounds.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;

/// Default entry lifetime: one day.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default maximum number of cached responses.
pub const DEFAULT_MAX_ENTRIES: usize = 20;

/// Default maximum size of the cache file. A full search page is a few
/// hundred KB, so this holds roughly a dozen of them.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// The `{` and `}` around the persisted map.
const MAP_OVERHEAD: usize = 2;

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Check if this cached data has expired. `None` never expires.
    ///
    /// A `cached_at` in the future (clock moved back) counts as expired.
    pub fn is_expired(&self, ttl: Option<Duration>) -> bool {
        let Some(ttl) = ttl else {
            return false;
        };

        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > ttl
    }
}

/// Expiry and size limits for the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Entry lifetime; `None` keeps entries forever.
    pub ttl: Option<Duration>,
    /// Maximum entries kept; `0` means unbounded.
    pub max_entries: usize,
    /// Maximum serialized size of the cache file; `0` means unbounded.
    pub max_bytes: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Some(DEFAULT_TTL),
            max_entries: DEFAULT_MAX_ENTRIES,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Search responses keyed by the exact request URL that produced them.
///
/// Writes happen on tokio's blocking pool when a runtime is available, so
/// the event loop never waits on serialization or fsync.
#[derive(Debug)]
pub struct ResponseCache {
    path: Option<PathBuf>,
    policy: CachePolicy,
    entries: BTreeMap<String, CachedData<Value>>,
    /// Serialized size of each entry, including its key and separator.
    sizes: BTreeMap<String, usize>,
    generation: u64,
    written: Arc<Mutex<u64>>,
    pending: Option<JoinHandle<()>>,
}

impl ResponseCache {
    /// Load the cache persisted at `path`.
    ///
    /// A missing file starts empty. An unreadable one is logged and replaced
    /// on the next write.
    pub fn open(path: PathBuf, policy: CachePolicy) -> Self {
        let entries = match read_cached::<BTreeMap<String, CachedData<Value>>>(&path) {
            Ok(Some(entries)) => entries,
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable search cache");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "search cache loaded");

        let sizes = entries
            .iter()
            .map(|(url, entry)| (url.clone(), entry_size(url, entry)))
            .collect();
        let mut cache = Self {
            path: Some(path),
            sizes,
            entries,
            ..Self::in_memory(policy)
        };
        cache.prune(None);
        cache
    }

    /// A cache that lives only for this process.
    pub fn in_memory(policy: CachePolicy) -> Self {
        Self {
            path: None,
            policy,
            entries: BTreeMap::new(),
            sizes: BTreeMap::new(),
            generation: 0,
            written: Arc::new(Mutex::new(0)),
            pending: None,
        }
    }

    /// Look up a still-valid payload for `url`.
    pub fn get(&self, url: &str) -> Option<&Value> {
        self.entries
            .get(url)
            .filter(|entry| !entry.is_expired(self.policy.ttl))
            .map(|entry| &entry.data)
    }

    /// Store `payload` for `url`, enforce the policy, and persist.
    ///
    /// Write failures are logged; the in-memory entry stays usable.
    pub fn insert(&mut self, url: &str, payload: Value) {
        let entry = CachedData::new(payload);
        self.sizes.insert(url.to_string(), entry_size(url, &entry));
        self.entries.insert(url.to_string(), entry);
        self.prune(Some(url));
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes the persisted file takes for the current entries.
    pub fn serialized_len(&self) -> usize {
        // Every entry carries a trailing comma except the last
        MAP_OVERHEAD + self.sizes.values().sum::<usize>() - usize::from(!self.sizes.is_empty())
    }

    /// Wait for the latest write to reach disk.
    pub async fn flush(&mut self) {
        let Some(handle) = self.pending.take() else {
            return;
        };
        if let Err(e) = handle.await {
            warn!(error = %e, "search cache writer failed");
        }
    }

    /// Drop expired entries, then the oldest ones until both bounds hold.
    ///
    /// `keep` is evicted last, and only if it alone breaks the byte bound.
    fn prune(&mut self, keep: Option<&str>) {
        let ttl = self.policy.ttl;
        let sizes = &mut self.sizes;
        self.entries.retain(|url, entry| {
            let live = !entry.is_expired(ttl);
            if !live {
                sizes.remove(url);
            }
            live
        });

        if !self.over_limit() {
            return;
        }

        let mut by_age: Vec<(bool, DateTime<Utc>, String)> = self
            .entries
            .iter()
            .map(|(url, entry)| (Some(url.as_str()) == keep, entry.cached_at, url.clone()))
            .collect();
        by_age.sort();

        for (_, _, url) in by_age {
            if !self.over_limit() {
                break;
            }
            debug!(url = %url, "evicting cached search");
            self.entries.remove(&url);
            self.sizes.remove(&url);
        }
    }

    fn over_limit(&self) -> bool {
        let CachePolicy {
            max_entries,
            max_bytes,
            ..
        } = self.policy;
        (max_entries > 0 && self.entries.len() > max_entries)
            || (max_bytes > 0 && self.serialized_len() > max_bytes)
    }

    fn persist(&mut self) {
        let Some(path) = self.path.clone() else {
            return;
        };

        self.generation += 1;
        let write = SnapshotWrite {
            path,
            generation: self.generation,
            written: Arc::clone(&self.written),
            entries: self.entries.clone(),
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self.pending = Some(handle.spawn_blocking(move || write.run())),
            Err(_) => write.run(),
        }
    }
}

/// One snapshot of the cache on its way to disk.
struct SnapshotWrite {
    path: PathBuf,
    generation: u64,
    written: Arc<Mutex<u64>>,
    entries: BTreeMap<String, CachedData<Value>>,
}

impl SnapshotWrite {
    /// Write unless a newer snapshot already landed.
    fn run(self) {
        let mut written = self.written.lock().unwrap_or_else(|e| e.into_inner());
        if *written >= self.generation {
            return;
        }
        match write_cached(&self.path, &self.entries) {
            Ok(()) => *written = self.generation,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to persist search cache")
            }
        }
    }
}

/// Serialized size of one map entry: key, colon, value, comma.
fn entry_size(url: &str, entry: &CachedData<Value>) -> usize {
    let key = serde_json::to_vec(url).map_or(url.len() + 2, |k| k.len());
    let value = serde_json::to_vec(entry).map_or(0, |v| v.len());
    key + 1 + value + 1
}

/// Read JSON data from a cache file. A missing file is `None`.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: T = serde_json::from_str(&contents)?;
    Ok(Some(cached))
}

/// Write data to a cache file as JSON.
pub fn write_cached<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(data)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
