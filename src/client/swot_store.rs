use uuid::Uuid;

use super::state::{StateCell, StoreState};
use super::subscription::{StoreEvent, Subscribers};
use super::ApiClient;
use crate::api::payloads::SwotEntryPayload;
use crate::entity::{SwotEntry, SwotType};
use crate::error::Result;

/// Cached SWOT entries of the current issue.
///
/// This store is the only client-side copy of SWOT entry content; other
/// views join against it by id.
pub struct SwotStore {
    api: ApiClient,
    state: StateCell<SwotEntry>,
    events: Subscribers<StoreEvent<SwotEntry>>,
}

impl SwotStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(),
            events: Subscribers::new(),
        }
    }

    pub fn state(&self) -> StoreState<SwotEntry> {
        self.state.snapshot()
    }

    pub fn entries(&self) -> Vec<SwotEntry> {
        self.state.read(|s| s.items.clone())
    }

    pub fn get(&self, id: &Uuid) -> Option<SwotEntry> {
        self.state
            .read(|s| s.items.iter().find(|e| e.base.id == *id).cloned())
    }

    /// Events fire after the cache is updated: `Updated` on edit,
    /// `Deleted` on removal.
    pub fn events(&self) -> &Subscribers<StoreEvent<SwotEntry>> {
        &self.events
    }

    /// The four quadrants in display order, each possibly empty.
    pub fn grouped_by_type(&self) -> Vec<(SwotType, Vec<SwotEntry>)> {
        self.state.read(|s| {
            SwotType::ORDER
                .iter()
                .map(|t| {
                    let entries = s
                        .items
                        .iter()
                        .filter(|e| e.swot_type == *t)
                        .cloned()
                        .collect();
                    (*t, entries)
                })
                .collect()
        })
    }

    pub async fn fetch_swot_entries(&self, issue_id: Uuid) -> Result<()> {
        self.state.begin();
        match self.api.list_swot_entries_by_issue(issue_id).await {
            Ok(entries) => {
                self.state.finish(|items| *items = entries);
                self.events.notify(&StoreEvent::Loaded);
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to fetch SWOT entries", e)),
        }
    }

    /// New entries go to the front of the list.
    pub async fn create_swot_entry(&self, entry: &SwotEntryPayload) -> Result<SwotEntry> {
        self.state.begin();
        match self.api.create_swot_entry(entry).await {
            Ok(created) => {
                self.state.finish(|items| items.insert(0, created.clone()));
                self.events.notify(&StoreEvent::Created(created.clone()));
                Ok(created)
            }
            Err(e) => Err(self.state.fail("Failed to create SWOT entry", e)),
        }
    }

    pub async fn update_swot_entry(&self, id: Uuid, description: &str) -> Result<SwotEntry> {
        self.state.begin();
        match self.api.update_swot_entry(id, description).await {
            Ok(updated) => {
                self.state.finish(|items| {
                    if let Some(slot) = items.iter_mut().find(|e| e.base.id == id) {
                        *slot = updated.clone();
                    }
                });
                self.events.notify(&StoreEvent::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state.fail("Failed to update SWOT entry", e)),
        }
    }

    pub async fn delete_swot_entry(&self, id: Uuid) -> Result<()> {
        self.state.begin();
        match self.api.delete_swot_entry(id).await {
            Ok(_) => {
                self.state.finish(|items| items.retain(|e| e.base.id != id));
                self.events.notify(&StoreEvent::Deleted(id));
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to delete SWOT entry", e)),
        }
    }
}
