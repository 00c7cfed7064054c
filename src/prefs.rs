//! Persisted user preferences: bookmarked stock codes and named screener
//! filters.
//!
//! The store sits on a plain key/value backend. Values are JSON text, one key
//! per collection, so a backend only has to move strings around. A value that
//! fails to parse reads as an empty collection.

use crate::error::AppResult;
use crate::models::SavedFilter;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const BOOKMARKS_KEY: &str = "bookmarks";
pub const SAVED_FILTERS_KEY: &str = "savedFilters";

/// Durable string storage underneath the preference store.
pub trait KeyValueBackend: Send {
    fn read(&self, key: &str) -> Result<Option<String>, rusqlite::Error>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), rusqlite::Error>;
}

/// Non-durable backend, handy for tests and throwaway instances.
#[derive(Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Ordered set of bookmarked stock codes. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet(Vec<String>);

impl BookmarkSet {
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    /// Returns false when the code was already present.
    pub fn insert(&mut self, code: &str) -> bool {
        if self.contains(code) {
            return false;
        }
        self.0.push(code.to_string());
        true
    }

    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != code);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for BookmarkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = BookmarkSet::default();
        for code in iter {
            set.insert(&code);
        }
        set
    }
}

/// Shared handle to the preference store.
#[derive(Clone)]
pub struct PreferenceStore(Arc<Mutex<Box<dyn KeyValueBackend>>>);

impl PreferenceStore {
    pub fn new<B: KeyValueBackend + 'static>(backend: B) -> Self {
        Self(Arc::new(Mutex::new(Box::new(backend))))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    pub async fn get_bookmarks(&self) -> AppResult<BookmarkSet> {
        let backend = self.0.lock().await;
        let codes: Vec<String> = read_json(&**backend, BOOKMARKS_KEY)?;
        Ok(codes.into_iter().collect())
    }

    pub async fn set_bookmarks(&self, bookmarks: &BookmarkSet) -> AppResult<()> {
        let mut backend = self.0.lock().await;
        write_json(&mut **backend, BOOKMARKS_KEY, &bookmarks.0)
    }

    /// Flip membership of `code` and persist the whole set.
    /// Returns whether the code is bookmarked afterwards.
    pub async fn toggle_bookmark(&self, code: &str) -> AppResult<bool> {
        // Read and write under one lock
        let mut backend = self.0.lock().await;
        let codes: Vec<String> = read_json(&**backend, BOOKMARKS_KEY)?;
        let mut bookmarks: BookmarkSet = codes.into_iter().collect();

        let bookmarked = if bookmarks.contains(code) {
            bookmarks.remove(code);
            false
        } else {
            bookmarks.insert(code);
            true
        };

        write_json(&mut **backend, BOOKMARKS_KEY, &bookmarks.0)?;
        tracing::debug!("Bookmark {} -> {}", code, bookmarked);
        Ok(bookmarked)
    }

    pub async fn get_saved_filters(&self) -> AppResult<Vec<SavedFilter>> {
        let backend = self.0.lock().await;
        read_json(&**backend, SAVED_FILTERS_KEY)
    }

    /// Append `filter` after every previously saved filter.
    pub async fn append_saved_filter(&self, filter: SavedFilter) -> AppResult<()> {
        let mut backend = self.0.lock().await;
        let mut filters: Vec<SavedFilter> = read_json(&**backend, SAVED_FILTERS_KEY)?;
        filters.push(filter);
        write_json(&mut **backend, SAVED_FILTERS_KEY, &filters)
    }
}

fn read_json<T>(backend: &dyn KeyValueBackend, key: &str) -> AppResult<Vec<T>>
where
    T: DeserializeOwned,
{
    let Some(raw) = backend.read(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(values) => Ok(values),
        Err(e) => {
            tracing::warn!("Malformed preference {}, treating as empty: {}", key, e);
            Ok(Vec::new())
        }
    }
}

fn write_json<T: serde::Serialize>(
    backend: &mut dyn KeyValueBackend,
    key: &str,
    values: &[T],
) -> AppResult<()> {
    let raw = serde_json::to_string(values)?;
    backend.write(key, &raw)?;
    Ok(())
}
