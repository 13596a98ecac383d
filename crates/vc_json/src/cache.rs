//! Pluggable key/value caches for metadata and directives.
//!
//! - [`MemoryCache`]: in-process map.
//! - [`VoidCache`]: stores nothing.
//! - [`ChainCache`]: tiers tried in order, a hit backfills the faster tiers.
//! - [`FileCache`]: JSON files under a directory, for serializable values.
//!
//! A cache only changes speed. Failing tiers degrade to misses.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Write as _;
use core::marker::PhantomData;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use hashbrown::HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

// -----------------------------------------------------------------------------
// Cache

/// A shared key/value cache.
pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    fn set(&self, key: &str, value: V);

    fn clear(&self);
}

// -----------------------------------------------------------------------------
// MemoryCache

/// In-process cache backed by a hash map.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> MemoryCache<V> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<V> Default for MemoryCache<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: V) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(String::from(key), value);
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

// -----------------------------------------------------------------------------
// VoidCache

/// A cache that never hits.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidCache;

impl<V> Cache<V> for VoidCache {
    #[inline]
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    #[inline]
    fn set(&self, _key: &str, _value: V) {}

    #[inline]
    fn clear(&self) {}
}

// -----------------------------------------------------------------------------
// ChainCache

/// Tiers consulted in order, the fastest first.
///
/// A hit in a later tier is written back to every earlier tier.
pub struct ChainCache<V> {
    tiers: Vec<Arc<dyn Cache<V>>>,
}

impl<V> ChainCache<V> {
    #[inline]
    pub fn new(tiers: Vec<Arc<dyn Cache<V>>>) -> Self {
        Self { tiers }
    }
}

impl<V: Clone> Cache<V> for ChainCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Some(value) = tier.get(key) {
                for upper in &self.tiers[..index] {
                    upper.set(key, value.clone());
                }
                return Some(value);
            }
        }
        None
    }

    fn set(&self, key: &str, value: V) {
        for tier in &self.tiers {
            tier.set(key, value.clone());
        }
    }

    fn clear(&self) {
        for tier in &self.tiers {
            tier.clear();
        }
    }
}

// -----------------------------------------------------------------------------
// FileCache

/// Persistent tier storing one JSON file per key.
///
/// IO and decoding failures are logged and treated as misses.
pub struct FileCache<V> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> V>,
}

impl<V> FileCache<V> {
    /// Creates a cache rooted at `dir`. The directory is created on first write.
    #[inline]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(file_name(key))
    }
}

// Keys contain `::` and `\`, escape everything but `[A-Za-z0-9-]`.
fn file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            name.push(b as char);
        } else {
            let _ = write!(name, "_{b:02x}");
        }
    }
    name.push_str(".json");
    name
}

impl<V: Serialize + DeserializeOwned> Cache<V> for FileCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let path = self.path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("cannot read cache file {}: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("ignoring corrupt cache file {}: {err}", path.display());
                None
            }
        }
    }

    fn set(&self, key: &str, value: V) {
        let path = self.path(key);
        let result = fs::create_dir_all(&self.dir)
            .map_err(|e| e.to_string())
            .and_then(|()| serde_json::to_vec(&value).map_err(|e| e.to_string()))
            .and_then(|bytes| fs::write(&path, bytes).map_err(|e| e.to_string()));
        if let Err(err) = result {
            log::warn!("cannot write cache file {}: {err}", path.display());
        }
    }

    fn clear(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Err(err) = fs::remove_file(&path) {
                    log::warn!("cannot remove cache file {}: {err}", path.display());
                }
            }
        }
    }
}
