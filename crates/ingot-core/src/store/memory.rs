//! In-memory document and container store
//!
//! Keeps every record in ordered maps behind a `parking_lot` lock. The whole
//! state can be saved and restored as JSON, which is how the CLI persists a
//! store between runs.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{StoreError, StoreResult};
use super::records::{
    Container, Entry, EntryUpdate, NewContainer, NewEntry, NewPage, Page, PageUpdate,
};
use super::traits::{ContainerStore, DocumentStore};

/// Serializable contents of a [`MemoryStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub containers: BTreeMap<String, Container>,
    #[serde(default)]
    pub entries: BTreeMap<String, Entry>,
    #[serde(default)]
    pub pages: BTreeMap<String, Page>,
    /// Counter for ids the store generates itself
    #[serde(default)]
    pub next_id: u64,
}

impl StoreSnapshot {
    fn generate_id(&mut self) -> String {
        self.next_id += 1;
        format!("mem{:013}", self.next_id)
    }
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.read().clone()
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&*self.state.read())?)
    }

    pub fn container_count(&self) -> usize {
        self.state.read().containers.len()
    }

    pub fn entry_count(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn page_count(&self) -> usize {
        self.state.read().pages.len()
    }

    /// Every page, ordered by id
    pub fn pages(&self) -> Vec<Page> {
        self.state.read().pages.values().cloned().collect()
    }

    /// Every entry, ordered by id
    pub fn entries(&self) -> Vec<Entry> {
        self.state.read().entries.values().cloned().collect()
    }

    /// Every container, ordered by id
    pub fn containers(&self) -> Vec<Container> {
        self.state.read().containers.values().cloned().collect()
    }
}

fn claim_id<T>(
    state: &mut StoreSnapshot,
    requested: Option<String>,
    kind: &'static str,
    existing: impl Fn(&StoreSnapshot) -> &BTreeMap<String, T>,
) -> StoreResult<String> {
    match requested {
        Some(id) if id.trim().is_empty() => {
            Err(StoreError::InvalidRecord(format!("empty {kind} id")))
        }
        Some(id) if existing(state).contains_key(&id) => Err(StoreError::conflict(kind, id)),
        Some(id) => Ok(id),
        None => Ok(state.generate_id()),
    }
}

#[async_trait]
impl ContainerStore for MemoryStore {
    async fn find_container(&self, id: &str) -> StoreResult<Option<Container>> {
        Ok(self.state.read().containers.get(id).cloned())
    }

    async fn find_container_by_name(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> StoreResult<Option<Container>> {
        Ok(self
            .state
            .read()
            .containers
            .values()
            .find(|c| c.name == name && c.parent.as_deref() == parent)
            .cloned())
    }

    async fn create_container(&self, new: NewContainer) -> StoreResult<Container> {
        let mut state = self.state.write();
        if let Some(parent) = &new.parent {
            if !state.containers.contains_key(parent) {
                return Err(StoreError::not_found("container", parent.clone()));
            }
        }
        let id = claim_id(&mut state, new.id, "container", |s| &s.containers)?;
        let container = Container {
            id: id.clone(),
            name: new.name,
            parent: new.parent,
            created_at: Utc::now(),
        };
        state.containers.insert(id, container.clone());
        Ok(container)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_entry(&self, id: &str) -> StoreResult<Option<Entry>> {
        Ok(self.state.read().entries.get(id).cloned())
    }

    async fn find_entry_by_name(
        &self,
        name: &str,
        container: Option<&str>,
    ) -> StoreResult<Option<Entry>> {
        Ok(self
            .state
            .read()
            .entries
            .values()
            .find(|e| e.name == name && e.container.as_deref() == container)
            .cloned())
    }

    async fn create_entry(&self, new: NewEntry) -> StoreResult<Entry> {
        let mut state = self.state.write();
        if let Some(container) = &new.container {
            if !state.containers.contains_key(container) {
                return Err(StoreError::not_found("container", container.clone()));
            }
        }
        let id = claim_id(&mut state, new.id, "entry", |s| &s.entries)?;
        let now = Utc::now();
        let entry = Entry {
            id: id.clone(),
            name: new.name,
            container: new.container,
            public: new.public,
            created_at: now,
            updated_at: now,
        };
        state.entries.insert(id, entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, id: &str, update: EntryUpdate) -> StoreResult<()> {
        let mut state = self.state.write();
        let entry = state
            .entries
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("entry", id))?;
        if let Some(public) = update.public {
            entry.public = public;
        }
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn find_page(&self, id: &str) -> StoreResult<Option<Page>> {
        Ok(self.state.read().pages.get(id).cloned())
    }

    async fn find_page_by_name(&self, name: &str, entry: &str) -> StoreResult<Option<Page>> {
        Ok(self
            .state
            .read()
            .pages
            .values()
            .find(|p| p.name == name && p.entry == entry)
            .cloned())
    }

    async fn create_page(&self, new: NewPage) -> StoreResult<Page> {
        let mut state = self.state.write();
        if !state.entries.contains_key(&new.entry) {
            return Err(StoreError::not_found("entry", new.entry));
        }
        let id = claim_id(&mut state, new.id, "page", |s| &s.pages)?;
        let page = Page {
            id: id.clone(),
            entry: new.entry,
            name: new.name,
            body: new.body,
            updated_at: Utc::now(),
        };
        state.pages.insert(id, page.clone());
        Ok(page)
    }

    async fn update_page(&self, id: &str, update: PageUpdate) -> StoreResult<()> {
        let mut state = self.state.write();
        let page = state
            .pages
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("page", id))?;
        if let Some(body) = update.body {
            page.body = body;
        }
        page.updated_at = Utc::now();
        Ok(())
    }
}
