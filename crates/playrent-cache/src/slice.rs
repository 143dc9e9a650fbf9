//! Versioned slices of persisted client state.

use crate::{cache_key, Cache, CacheError};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Stored envelope of a slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceData<T> {
    /// Schema version of `data`.
    pub version: u32,
    /// The slice contents.
    pub data: T,
    /// When the slice was last written.
    pub saved_at: DateTime<Utc>,
}

/// Only the version of a stored slice, read before decoding the payload.
#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

/// A named piece of client state persisted across runs.
///
/// A stored slice whose version differs from `version` (or that no longer
/// decodes) is discarded and read back as `T::default()`.
///
/// # Example
///
/// ```rust,ignore
/// use playrent_cache::{Cache, Persisted};
///
/// #[derive(Serialize, Deserialize, Default, Clone)]
/// struct Session {
///     user: Option<UserProfile>,
/// }
///
/// let slice = Persisted::<Session>::new(Cache::open_dir(state_dir)?, "session", 1);
/// let mut session = slice.load()?;
/// session.user = Some(profile);
/// slice.save(&session)?;
/// ```
pub struct Persisted<T> {
    cache: Cache,
    name: String,
    version: u32,
    _phantom: PhantomData<T>,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(cache: Cache, name: impl Into<String>, version: u32) -> Self {
        Self {
            cache,
            name: name.into(),
            version,
            _phantom: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Load the slice, falling back to the default.
    pub fn load(&self) -> Result<T, CacheError> {
        Ok(self.load_versioned()?.map(|s| s.data).unwrap_or_default())
    }

    /// Load the full envelope if a current-version slice is stored.
    pub fn load_versioned(&self) -> Result<Option<SliceData<T>>, CacheError> {
        let key = self.key();
        let Some(raw) = self.cache.get::<serde_json::Value>(&key)? else {
            debug!(slice = %self.name, "no stored slice");
            return Ok(None);
        };

        let stored = serde_json::from_value::<VersionHeader>(raw.clone())
            .map(|p| p.version)
            .ok();
        if stored != Some(self.version) {
            warn!(
                slice = %self.name,
                stored = ?stored,
                expected = self.version,
                "discarding slice with foreign version"
            );
            self.cache.delete(&key)?;
            return Ok(None);
        }

        match serde_json::from_value::<SliceData<T>>(raw) {
            Ok(slice) => Ok(Some(slice)),
            Err(e) => {
                warn!(slice = %self.name, error = %e, "discarding undecodable slice");
                self.cache.delete(&key)?;
                Ok(None)
            }
        }
    }

    /// Overwrite the slice.
    pub fn save(&self, data: &T) -> Result<(), CacheError> {
        let slice = SliceData {
            version: self.version,
            data: data.clone(),
            saved_at: Utc::now(),
        };
        self.cache.set(&self.key(), &slice)
    }

    /// Read, modify and write back the slice.
    pub fn update<F>(&self, f: F) -> Result<T, CacheError>
    where
        F: FnOnce(&mut T),
    {
        let mut data = self.load()?;
        f(&mut data);
        self.save(&data)?;
        Ok(data)
    }

    /// Remove the stored slice.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(&self.key())
    }

    pub fn exists(&self) -> Result<bool, CacheError> {
        self.cache.exists(&self.key())
    }

    fn key(&self) -> String {
        cache_key!("slice", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Session {
        user: Option<String>,
        visits: u32,
    }

    #[test]
    fn test_missing_slice_is_default() {
        let slice = Persisted::<Session>::new(Cache::in_memory(), "session", 1);
        assert_eq!(slice.load().unwrap(), Session::default());
        assert!(!slice.exists().unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let slice = Persisted::<Session>::new(Cache::in_memory(), "session", 1);
        let session = Session {
            user: Some("ada".to_string()),
            visits: 3,
        };
        slice.save(&session).unwrap();

        assert_eq!(slice.load().unwrap(), session);
        assert_eq!(slice.load_versioned().unwrap().unwrap().version, 1);
    }

    #[test]
    fn test_foreign_version_loads_default() {
        let cache = Cache::in_memory();
        let old = Persisted::<Session>::new(cache.clone(), "session", 1);
        old.save(&Session {
            user: Some("ada".to_string()),
            visits: 9,
        })
        .unwrap();

        let current = Persisted::<Session>::new(cache, "session", 2);
        assert_eq!(current.load().unwrap(), Session::default());
        assert!(!current.exists().unwrap());
    }

    #[test]
    fn test_unversioned_document_loads_default() {
        let cache = Cache::in_memory();
        cache
            .set("slice:session", &serde_json::json!({ "user": "ada" }))
            .unwrap();
        let slice = Persisted::<Session>::new(cache, "session", 1);
        assert_eq!(slice.load().unwrap(), Session::default());
    }

    #[test]
    fn test_update_and_clear() {
        let slice = Persisted::<Session>::new(Cache::in_memory(), "session", 1);
        slice.update(|s| s.visits += 1).unwrap();
        let session = slice.update(|s| s.visits += 1).unwrap();
        assert_eq!(session.visits, 2);

        slice.clear().unwrap();
        assert_eq!(slice.load().unwrap().visits, 0);
    }

    #[test]
    fn test_slices_survive_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let slice = Persisted::<Session>::new(Cache::open_dir(dir.path()).unwrap(), "session", 1);
        slice.update(|s| s.user = Some("grace".to_string())).unwrap();

        let reopened =
            Persisted::<Session>::new(Cache::open_dir(dir.path()).unwrap(), "session", 1);
        assert_eq!(reopened.load().unwrap().user.as_deref(), Some("grace"));
    }
}
