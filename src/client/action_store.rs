use uuid::Uuid;

use super::state::{StateCell, StoreState};
use super::subscription::{StoreEvent, Subscribers};
use super::ApiClient;
use crate::api::payloads::ActionPayload;
use crate::entity::{Action, SwotEntry};
use crate::error::Result;

/// Cached actions of the current issue.
///
/// Actions hold SWOT entry ids only. Entry content lives in the SWOT store
/// and is joined in at read time by the store context.
pub struct ActionStore {
    api: ApiClient,
    state: StateCell<Action>,
    events: Subscribers<StoreEvent<Action>>,
}

impl ActionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(),
            events: Subscribers::new(),
        }
    }

    pub fn state(&self) -> StoreState<Action> {
        self.state.snapshot()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state.read(|s| s.items.clone())
    }

    pub fn get(&self, id: &Uuid) -> Option<Action> {
        self.state
            .read(|s| s.items.iter().find(|a| a.base.id == *id).cloned())
    }

    pub fn events(&self) -> &Subscribers<StoreEvent<Action>> {
        &self.events
    }

    pub async fn fetch_actions(&self, issue_id: Uuid) -> Result<()> {
        self.state.begin();
        match self.api.list_actions_by_issue(issue_id).await {
            Ok(populated) => {
                let actions = populated.into_iter().map(|a| a.into_action()).collect();
                self.state.finish(|items| *items = actions);
                self.events.notify(&StoreEvent::Loaded);
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to fetch actions", e)),
        }
    }

    /// New actions go to the front of the list.
    pub async fn create_action(&self, action: &ActionPayload) -> Result<Action> {
        self.state.begin();
        match self.api.create_action(action).await {
            Ok(created) => {
                self.state.finish(|items| items.insert(0, created.clone()));
                self.events.notify(&StoreEvent::Created(created.clone()));
                Ok(created)
            }
            Err(e) => Err(self.state.fail("Failed to create action", e)),
        }
    }

    pub async fn update_action(&self, id: Uuid, title: &str, description: &str) -> Result<()> {
        self.state.begin();
        match self.api.update_action(id, title, description).await {
            Ok(updated) => {
                let changed = self.state.finish(|items| {
                    let action = items.iter_mut().find(|a| a.base.id == id)?;
                    action.title = updated.title;
                    action.description = updated.description;
                    action.base.updated_at = updated.base.updated_at;
                    Some(action.clone())
                });
                self.notify_updated(changed);
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to update action", e)),
        }
    }

    pub async fn delete_action(&self, id: Uuid) -> Result<()> {
        self.state.begin();
        match self.api.delete_action(id).await {
            Ok(_) => {
                self.state.finish(|items| items.retain(|a| a.base.id != id));
                self.events.notify(&StoreEvent::Deleted(id));
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to delete action", e)),
        }
    }

    /// Link an entry; the cached id list is replaced by the server's.
    pub async fn add_swot_entry_to_action(&self, action_id: Uuid, swot_entry_id: Uuid) -> Result<()> {
        match self.api.attach_swot_entry(action_id, swot_entry_id).await {
            Ok(populated) => {
                self.replace_links(action_id, populated.into_action());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, %action_id, %swot_entry_id, "Failed to add SWOT entry");
                Err(e)
            }
        }
    }

    pub async fn remove_swot_entry_from_action(
        &self,
        action_id: Uuid,
        swot_entry_id: Uuid,
    ) -> Result<()> {
        match self.api.detach_swot_entry(action_id, swot_entry_id).await {
            Ok(populated) => {
                self.replace_links(action_id, populated.into_action());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, %action_id, %swot_entry_id, "Failed to remove SWOT entry");
                Err(e)
            }
        }
    }

    /// Drop a deleted SWOT entry from every cached action.
    pub fn remove_deleted_swot_entry(&self, swot_entry_id: Uuid) {
        let changed: Vec<Action> = self.state.write(|s| {
            s.items
                .iter_mut()
                .filter_map(|action| {
                    action
                        .detach_swot_entry(&swot_entry_id)
                        .then(|| action.clone())
                })
                .collect()
        });
        for action in changed {
            self.events.notify(&StoreEvent::Updated(action));
        }
    }

    /// Tell subscribers that actions linking `entry` now render differently.
    pub fn update_swot_entry_in_actions(&self, entry: &SwotEntry) {
        let affected: Vec<Action> = self.state.read(|s| {
            s.items
                .iter()
                .filter(|a| a.swot_entries.contains(&entry.base.id))
                .cloned()
                .collect()
        });
        for action in affected {
            self.events.notify(&StoreEvent::Updated(action));
        }
    }

    pub async fn fetch_action_detail(&self, id: Uuid) -> Result<String> {
        self.state.begin();
        match self.api.get_action_detail(id).await {
            Ok(detail) => {
                let changed = self.state.finish(|items| {
                    let action = items.iter_mut().find(|a| a.base.id == id)?;
                    action.detail = detail.clone();
                    Some(action.clone())
                });
                self.notify_updated(changed);
                Ok(detail)
            }
            Err(e) => Err(self.state.fail("Failed to fetch action detail", e)),
        }
    }

    pub async fn update_action_detail(&self, id: Uuid, detail: &str) -> Result<()> {
        self.state.begin();
        match self.api.update_action_detail(id, detail).await {
            Ok(_) => {
                let changed = self.state.finish(|items| {
                    let action = items.iter_mut().find(|a| a.base.id == id)?;
                    action.detail = detail.to_string();
                    Some(action.clone())
                });
                self.notify_updated(changed);
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to update action detail", e)),
        }
    }

    pub async fn delete_action_detail(&self, id: Uuid) -> Result<Action> {
        self.state.begin();
        match self.api.delete_action_detail(id).await {
            Ok(action) => {
                let changed = self.state.finish(|items| {
                    let cached = items.iter_mut().find(|a| a.base.id == id)?;
                    cached.detail.clear();
                    Some(cached.clone())
                });
                self.notify_updated(changed);
                Ok(action)
            }
            Err(e) => Err(self.state.fail("Failed to delete action detail", e)),
        }
    }

    fn replace_links(&self, action_id: Uuid, fresh: Action) {
        let changed = self.state.write(|s| {
            let action = s.items.iter_mut().find(|a| a.base.id == action_id)?;
            action.swot_entries = fresh.swot_entries;
            action.base.updated_at = fresh.base.updated_at;
            Some(action.clone())
        });
        self.notify_updated(changed);
    }

    fn notify_updated(&self, changed: Option<Action>) {
        if let Some(action) = changed {
            self.events.notify(&StoreEvent::Updated(action));
        }
    }
}
