//! Listing flow persistence.
//!
//! Keeps the latest state of every listing that reached the backend, keyed
//! by backend identifier, so a restart mid-flow still shows the record as
//! created and its chain step as pending or failed.

use dashmap::DashMap;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::listing::state::ListingState;

/// Thread-safe map of backend id to listing state with optional file persistence.
#[derive(Clone, Default)]
pub struct ListingStore {
    inner: Arc<DashMap<String, ListingState>>,
    persistence_path: Option<PathBuf>,
}

impl ListingStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists; the file is also where later saves go.
    pub fn load_from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: HashMap<String, ListingState> = serde_json::from_reader(reader)?;
            for (backend_id, state) in map {
                store.inner.insert(backend_id, state);
            }
            tracing::debug!(count = store.inner.len(), "Loaded listings from store");
        }
        Ok(store)
    }

    /// Save to file. The new contents go to a sibling temp file that then
    /// replaces the store, so an interrupted save leaves the old file intact.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let map: HashMap<_, _> = self
                .inner
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect();

            let tmp_path = temp_path(path);
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, &map)?;
            writer.flush()?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
            fs::rename(&tmp_path, path)?;
            tracing::debug!(count = map.len(), "Saved listings to store");
        }
        Ok(())
    }

    /// Record a state and persist. States without a backend record are not kept.
    pub fn record(&self, state: &ListingState) -> std::io::Result<()> {
        let Some(backend_id) = state.backend_id() else {
            return Ok(());
        };
        self.inner.insert(backend_id.to_string(), state.clone());
        self.save_to_file()
    }

    pub fn get(&self, backend_id: &str) -> Option<ListingState> {
        self.inner.get(backend_id).map(|entry| entry.value().clone())
    }

    /// All listings, ordered by backend id.
    pub fn list(&self) -> Vec<(String, ListingState)> {
        let mut listings: Vec<_> = self
            .inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        listings.sort_by(|a, b| a.0.cmp(&b.0));
        listings
    }

    pub fn count(&self) -> usize {
        self.inner.len()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::state::FailedStep;

    #[test]
    fn test_idle_and_backend_failures_are_not_recorded() {
        let store = ListingStore::new(None);
        store.record(&ListingState::Idle).unwrap();
        store
            .record(&ListingState::Failed {
                backend_id: None,
                total_shares: 1,
                step: FailedStep::Backend,
                transaction: None,
                blockchain_id: None,
                error: "down".to_string(),
            })
            .unwrap();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_latest_state_wins() {
        let store = ListingStore::new(None);
        store
            .record(&ListingState::BackendCreated {
                backend_id: "P-1".to_string(),
                total_shares: 10,
            })
            .unwrap();
        store
            .record(&ListingState::ChainConfirmed {
                backend_id: "P-1".to_string(),
                total_shares: 10,
                blockchain_id: 3,
                tx_hash: Default::default(),
            })
            .unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.get("P-1").unwrap().status(), "chain_confirmed");
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("listings.json");

        let store = ListingStore::load_from_file(&path).unwrap();
        store
            .record(&ListingState::BackendCreated {
                backend_id: "P-2".to_string(),
                total_shares: 50,
            })
            .unwrap();
        store
            .record(&ListingState::BackendCreated {
                backend_id: "P-1".to_string(),
                total_shares: 10,
            })
            .unwrap();

        let loaded = ListingStore::load_from_file(&path).unwrap();
        let ids: Vec<_> = loaded.list().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["P-1", "P-2"]);
        assert!(loaded.get("P-2").unwrap().is_partial());
    }

    #[test]
    fn test_save_replaces_file_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        // Leftover from an interrupted save.
        fs::write(dir.path().join("listings.json.tmp"), "{\"P-9\": ").unwrap();

        let store = ListingStore::load_from_file(&path).unwrap();
        for n in 0..5 {
            store
                .record(&ListingState::BackendCreated {
                    backend_id: format!("P-{}", n),
                    total_shares: 10 + n,
                })
                .unwrap();
            let on_disk: HashMap<String, ListingState> =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(on_disk.len(), n as usize + 1);
        }

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["listings.json"]);
        assert_eq!(ListingStore::load_from_file(&path).unwrap().count(), 5);
    }
}
