//! Content-addressed cache for instrumentation output.
//!
//! Entries are keyed by the SHA-256 of the source text; a stale or corrupt
//! entry is never served. Writes are best-effort — cache failures only cost
//! a re-instrumentation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use crate::instrument::InstrumentedSource;

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub output: InstrumentedSource,
}

pub struct InstrumentationCache {
    cache_dir: PathBuf,
}

impl InstrumentationCache {
    /// The cache directory is supplied by the caller; there is no implicit
    /// dot-directory in the working directory.
    pub fn new(cache_dir: PathBuf) -> Self {
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).ok();
        }
        Self { cache_dir }
    }

    pub fn compute_hash(source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, file_path: &str) -> PathBuf {
        // Stable file name for the cache entry
        let safe_name = file_path.replace(['/', '\\', ':'], "_");
        self.cache_dir.join(format!("{}.json", safe_name))
    }

    /// Returns the cached output only when the stored hash still matches
    /// the present source.
    pub fn get(&self, file_path: &str, source: &str) -> Option<InstrumentedSource> {
        let entry_path = self.entry_path(file_path);
        if !entry_path.exists() {
            return None;
        }

        let data = match fs::read_to_string(&entry_path) {
            Ok(data) => data,
            Err(_) => return None,
        };

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(entry) => entry,
            Err(error) => {
                eprintln!(
                    "[EditorNative] Cache deserialization failed for {}: {}",
                    file_path, error
                );
                // Invalidate corrupt cache file
                fs::remove_file(entry_path).ok();
                return None;
            }
        };

        if entry.hash == Self::compute_hash(source) {
            Some(entry.output)
        } else {
            None
        }
    }

    pub fn set(&self, file_path: &str, source: &str, output: &InstrumentedSource) {
        let entry_path = self.entry_path(file_path);
        let entry = CacheEntry {
            hash: Self::compute_hash(source),
            output: output.clone(),
        };

        if let Ok(data) = serde_json::to_string(&entry) {
            fs::write(entry_path, data).ok();
        }
    }
}
