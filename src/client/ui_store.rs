use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::subscription::Subscribers;

/// Hover state shared by the action list and the SWOT quadrants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverState {
    pub hovered_action_id: Option<Uuid>,
    pub hovered_swot_entry_id: Option<Uuid>,
    pub highlighted_swot_entry_ids: HashSet<Uuid>,
}

/// Process-wide UI state. Hovering an action highlights every entry it
/// links; hovering an entry highlights that entry alone.
#[derive(Default)]
pub struct UiStore {
    state: RwLock<HoverState>,
    events: Subscribers<HoverState>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> HoverState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn hovered_action_id(&self) -> Option<Uuid> {
        self.snapshot().hovered_action_id
    }

    pub fn hovered_swot_entry_id(&self) -> Option<Uuid> {
        self.snapshot().hovered_swot_entry_id
    }

    pub fn highlighted_swot_entry_ids(&self) -> HashSet<Uuid> {
        self.snapshot().highlighted_swot_entry_ids
    }

    pub fn events(&self) -> &Subscribers<HoverState> {
        &self.events
    }

    /// `None` clears the action hover and its highlights.
    pub fn set_hovered_action(&self, id: Option<Uuid>, swot_entry_ids: &[Uuid]) {
        self.update(|s| {
            s.hovered_action_id = id;
            s.highlighted_swot_entry_ids = match id {
                Some(_) => swot_entry_ids.iter().copied().collect(),
                None => HashSet::new(),
            };
        });
    }

    pub fn set_hovered_swot_entry(&self, id: Option<Uuid>) {
        self.update(|s| {
            s.hovered_swot_entry_id = id;
            s.highlighted_swot_entry_ids = id.into_iter().collect();
        });
    }

    pub fn is_swot_entry_highlighted(&self, id: &Uuid) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .highlighted_swot_entry_ids
            .contains(id)
    }

    /// Mouse left the board.
    pub fn clear(&self) {
        self.update(|s| *s = HoverState::default());
    }

    fn update(&self, f: impl FnOnce(&mut HoverState)) {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
            state.clone()
        };
        self.events.notify(&snapshot);
    }
}
