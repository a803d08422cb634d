//! Client side of the board: an HTTP client for the API and the
//! observable stores the UI renders from.
//!
//! Each store caches the records of the current issue and publishes a
//! [`StoreEvent`] after every change. [`StoreContext`] owns one of each
//! store and links them so that SWOT entry edits and deletions reach the
//! action views.

mod action_store;
mod context;
mod goal_store;
mod http;
mod issue_store;
mod state;
mod subscription;
mod swot_store;
mod ui_store;

pub use action_store::ActionStore;
pub use context::{ActionView, DragPayload, StoreContext, SwotGroup};
pub use goal_store::GoalStore;
pub use http::ApiClient;
pub use issue_store::IssueStore;
pub use state::StoreState;
pub use subscription::{StoreEvent, SubscriptionId, Subscribers};
pub use swot_store::SwotStore;
pub use ui_store::{HoverState, UiStore};
