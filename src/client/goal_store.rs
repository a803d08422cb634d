use uuid::Uuid;

use super::state::{StateCell, StoreState};
use super::subscription::{StoreEvent, Subscribers};
use super::ApiClient;
use crate::api::payloads::GoalPayload;
use crate::entity::{Goal, GoalType};
use crate::error::Result;

pub struct GoalStore {
    api: ApiClient,
    state: StateCell<Goal>,
    events: Subscribers<StoreEvent<Goal>>,
}

impl GoalStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(),
            events: Subscribers::new(),
        }
    }

    pub fn state(&self) -> StoreState<Goal> {
        self.state.snapshot()
    }

    pub fn goals(&self) -> Vec<Goal> {
        self.state.read(|s| s.items.clone())
    }

    pub fn goals_of_type(&self, goal_type: GoalType) -> Vec<Goal> {
        self.state.read(|s| {
            s.items
                .iter()
                .filter(|g| g.goal_type == goal_type)
                .cloned()
                .collect()
        })
    }

    pub fn events(&self) -> &Subscribers<StoreEvent<Goal>> {
        &self.events
    }

    pub async fn fetch_goals(&self, issue_id: Uuid) -> Result<()> {
        self.state.begin();
        match self.api.list_goals_by_issue(issue_id).await {
            Ok(goals) => {
                self.state.finish(|items| *items = goals);
                self.events.notify(&StoreEvent::Loaded);
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to fetch goals", e)),
        }
    }

    pub async fn create_goal(&self, goal: &GoalPayload) -> Result<Goal> {
        self.state.begin();
        match self.api.create_goal(goal).await {
            Ok(created) => {
                self.state.finish(|items| items.insert(0, created.clone()));
                self.events.notify(&StoreEvent::Created(created.clone()));
                Ok(created)
            }
            Err(e) => Err(self.state.fail("Failed to create goal", e)),
        }
    }

    pub async fn update_goal(&self, id: Uuid, updates: &GoalPayload) -> Result<Goal> {
        self.state.begin();
        match self.api.update_goal(id, updates).await {
            Ok(updated) => {
                self.state.finish(|items| {
                    if let Some(slot) = items.iter_mut().find(|g| g.base.id == id) {
                        *slot = updated.clone();
                    }
                });
                self.events.notify(&StoreEvent::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state.fail("Failed to update goal", e)),
        }
    }

    pub async fn delete_goal(&self, id: Uuid) -> Result<()> {
        self.state.begin();
        match self.api.delete_goal(id).await {
            Ok(_) => {
                self.state.finish(|items| items.retain(|g| g.base.id != id));
                self.events.notify(&StoreEvent::Deleted(id));
                Ok(())
            }
            Err(e) => Err(self.state.fail("Failed to delete goal", e)),
        }
    }
}
