use crate::models::CacheFile;
use crate::store::CacheStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Hydrates a cache from `path`.
///
/// Never fails: a missing, unreadable or malformed file yields an empty cache.
pub fn load_cache<R>(path: &Path) -> CacheStore<R>
where
    R: Clone + DeserializeOwned,
{
    if !path.exists() {
        debug!(path = %path.display(), "no cache file, starting cold");
        return CacheStore::new();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache file exists but cannot be read");
            return CacheStore::new();
        }
    };

    match serde_json::from_str::<CacheFile<R>>(&content) {
        Ok(file) => {
            info!(
                path = %path.display(),
                exchanges = file.exchanges.len(),
                ranked = file.lunarcrush_pairs.is_some(),
                "cache loaded from file"
            );
            CacheStore::from(file)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache file exists but cannot be parsed");
            CacheStore::new()
        }
    }
}

/// Flushes `store` to `path`, creating the parent directory when needed.
///
/// Errors are logged and swallowed.
pub fn save_cache<R>(path: &Path, store: &CacheStore<R>)
where
    R: Clone + Serialize,
{
    match write_cache_file(path, &store.to_file()) {
        Ok(()) => info!(path = %path.display(), "cache saved to file"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to save cache to file"),
    }
}

fn write_cache_file<R: Serialize>(path: &Path, file: &CacheFile<R>) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(file)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}
