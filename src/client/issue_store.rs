use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::state::{StateCell, StoreState};
use super::subscription::{StoreEvent, Subscribers};
use super::ApiClient;
use crate::api::payloads::IssuePayload;
use crate::entity::Issue;
use crate::error::Result;

/// Cached issues plus the issue currently open on the board.
pub struct IssueStore {
    api: ApiClient,
    state: StateCell<Issue>,
    current: RwLock<Option<Issue>>,
    events: Subscribers<StoreEvent<Issue>>,
}

impl IssueStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(),
            current: RwLock::new(None),
            events: Subscribers::new(),
        }
    }

    pub fn state(&self) -> StoreState<Issue> {
        self.state.snapshot()
    }

    pub fn issues(&self) -> Vec<Issue> {
        self.state.read(|s| s.items.clone())
    }

    pub fn current_issue(&self) -> Option<Issue> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn events(&self) -> &Subscribers<StoreEvent<Issue>> {
        &self.events
    }

    pub async fn fetch_issues(&self) -> Result<()> {
        self.state.begin();
        match self.api.list_issues().await {
            Ok(issues) => {
                self.state.finish(|items| *items = issues);
                self.events.notify(&StoreEvent::Loaded);
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to fetch issues", e)),
        }
    }

    /// Load one issue as the current issue.
    pub async fn fetch_issue(&self, id: Uuid) -> Result<Issue> {
        self.state.begin();
        match self.api.get_issue(id).await {
            Ok(issue) => {
                self.state.finish(|_| ());
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(issue.clone());
                Ok(issue)
            }
            Err(e) => Err(self.state.fail("Failed to fetch issue", e)),
        }
    }

    /// New issues go to the end of the list.
    pub async fn create_issue(&self, issue: &IssuePayload) -> Result<Issue> {
        self.state.begin();
        match self.api.create_issue(issue).await {
            Ok(created) => {
                self.state.finish(|items| items.push(created.clone()));
                self.events.notify(&StoreEvent::Created(created.clone()));
                Ok(created)
            }
            Err(e) => Err(self.state.fail("Failed to create issue", e)),
        }
    }

    pub async fn update_issue(&self, id: Uuid, updates: &IssuePayload) -> Result<Issue> {
        self.state.begin();
        match self.api.update_issue(id, updates).await {
            Ok(updated) => {
                self.state.finish(|items| {
                    if let Some(slot) = items.iter_mut().find(|i| i.base.id == id) {
                        *slot = updated.clone();
                    }
                });
                self.replace_current(&updated);
                self.events.notify(&StoreEvent::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state.fail("Failed to update issue", e)),
        }
    }

    pub async fn delete_issue(&self, id: Uuid) -> Result<()> {
        self.state.begin();
        match self.api.delete_issue(id).await {
            Ok(_) => {
                self.state.finish(|items| items.retain(|i| i.base.id != id));
                let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
                if current.as_ref().is_some_and(|i| i.base.id == id) {
                    *current = None;
                }
                drop(current);
                self.events.notify(&StoreEvent::Deleted(id));
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to delete issue", e)),
        }
    }

    fn replace_current(&self, updated: &Issue) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|i| i.base.id == updated.base.id) {
            *current = Some(updated.clone());
        }
    }
}
