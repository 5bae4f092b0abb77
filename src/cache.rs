use crate::log::{Error, ErrorKind};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Stores serialized compiled templates between renders.
///
/// Keys are derived from the template source by the `Engine`, so a cache
/// entry is invalidated automatically when the source changes. The artifact
/// is an opaque string, a cache never inspects it.
pub trait Cache: Sync + Send {
    /// Return true when an artifact with the given key exists.
    fn has(&self, key: &str) -> bool;

    /// Return the artifact with the given key, if it exists.
    fn get(&self, key: &str) -> Option<String>;

    /// Store an artifact under the given key.
    fn set(&self, key: &str, artifact: String);
}

/// A [`Cache`] that keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    /// Create a new [`MemoryCache`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn has(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, artifact: String) {
        self.entries.lock().unwrap().insert(key.to_owned(), artifact);
    }
}

/// A [`Cache`] that keeps artifacts as files in a directory, one file per
/// key.
///
/// Reads and writes that fail behave as cache misses, the engine falls back
/// to compiling from source.
#[derive(Debug, Clone)]
pub struct DiskCache {
    path: PathBuf,
}

impl DiskCache {
    /// Create a new [`DiskCache`] over the given directory, creating it if
    /// necessary.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the directory cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path).map_err(|_| {
            Error::build(ErrorKind::Configuration, "invalid cache directory")
                .with_help(format!("unable to create `{}`", path.display()))
        })?;

        Ok(Self { path })
    }

    fn file(&self, key: &str) -> PathBuf {
        self.path.join(key)
    }
}

impl Cache for DiskCache {
    fn has(&self, key: &str) -> bool {
        self.file(key).is_file()
    }

    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file(key)).ok()
    }

    fn set(&self, key: &str, artifact: String) {
        let _ = fs::write(self.file(key), artifact);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cache, DiskCache, MemoryCache};

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        assert!(!cache.has("a"));
        assert_eq!(cache.get("a"), None);

        cache.set("a", "artifact".to_owned());
        assert!(cache.has("a"));
        assert_eq!(cache.get("a"), Some("artifact".to_owned()));
    }

    #[test]
    fn test_disk_cache() {
        let directory = std::env::temp_dir().join("vellum-cache-test");
        let cache = DiskCache::new(&directory).unwrap();

        cache.set("a", "artifact".to_owned());
        assert!(cache.has("a"));
        assert_eq!(cache.get("a"), Some("artifact".to_owned()));

        std::fs::remove_dir_all(&directory).unwrap();
    }
}
