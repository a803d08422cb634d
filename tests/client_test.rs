use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;
use uuid::Uuid;

use swot_board::api;
use swot_board::api::payloads::{ActionPayload, GoalPayload, IssuePayload, SwotEntryPayload};
use swot_board::client::{ApiClient, DragPayload, StoreContext, StoreEvent};
use swot_board::entity::{Action, GoalType, IssueStatus, SwotType};
use swot_board::storage::Repository;
use swot_board::SwotError;

async fn spawn_server() -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = api::router(Repository::in_memory());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ApiClient::new(format!("http://{}", addr))
}

async fn board() -> (StoreContext, Uuid) {
    let ctx = StoreContext::new(spawn_server().await);
    let issue = ctx
        .issues
        .create_issue(&IssuePayload {
            title: Some("Retention".into()),
            description: Some("Users drop after a week".into()),
            created_by: Some("sam".into()),
            status: None,
        })
        .await
        .unwrap();
    (ctx, issue.base.id)
}

fn entry_payload(issue_id: Uuid, swot_type: SwotType, description: &str) -> SwotEntryPayload {
    SwotEntryPayload {
        issue_id: Some(issue_id),
        swot_type: Some(swot_type),
        description: Some(description.into()),
        created_by: Some("sam".into()),
    }
}

fn action_payload(issue_id: Uuid, title: &str) -> ActionPayload {
    ActionPayload {
        issue_id: Some(issue_id),
        title: Some(title.into()),
        description: Some("Do it".into()),
        created_by: Some("sam".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_issue_store_flow() {
    let (ctx, issue_id) = board().await;
    let second = ctx
        .issues
        .create_issue(&IssuePayload {
            title: Some("Pricing".into()),
            description: Some("Too high".into()),
            created_by: Some("sam".into()),
            status: Some(IssueStatus::InProgress),
        })
        .await
        .unwrap();

    // Issues are appended
    let titles: Vec<String> = ctx.issues.issues().into_iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["Retention", "Pricing"]);

    ctx.issues.fetch_issue(issue_id).await.unwrap();
    assert_eq!(ctx.issues.current_issue().unwrap().base.id, issue_id);

    let updated = ctx
        .issues
        .update_issue(
            issue_id,
            &IssuePayload {
                status: Some(IssueStatus::Resolved),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, IssueStatus::Resolved);
    assert_eq!(ctx.issues.current_issue().unwrap().status, IssueStatus::Resolved);

    ctx.issues.delete_issue(issue_id).await.unwrap();
    assert!(ctx.issues.current_issue().is_none());

    ctx.issues.fetch_issues().await.unwrap();
    let state = ctx.issues.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].base.id, second.base.id);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_failed_request_records_error_and_keeps_cache() {
    let (ctx, issue_id) = board().await;
    ctx.issues.fetch_issues().await.unwrap();

    let err = ctx.issues.fetch_issue(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, SwotError::Api { status: 404, ref message } if message == "Issue not found"));

    let state = ctx.issues.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].base.id, issue_id);
    assert!(!state.loading);
    assert!(state.error.unwrap().contains("Issue not found"));

    let err = ctx
        .swot
        .update_swot_entry(Uuid::new_v4(), "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, SwotError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_swot_store_prepends_and_groups() {
    let (ctx, issue_id) = board().await;
    for (t, d) in [
        (SwotType::Threat, "competitor"),
        (SwotType::Strength, "brand"),
        (SwotType::Strength, "team"),
    ] {
        ctx.swot
            .create_swot_entry(&entry_payload(issue_id, t, d))
            .await
            .unwrap();
    }

    let descriptions: Vec<String> = ctx.swot.entries().into_iter().map(|e| e.description).collect();
    assert_eq!(descriptions, vec!["team", "brand", "competitor"]);

    let grouped = ctx.swot.grouped_by_type();
    let shape: Vec<(SwotType, usize)> = grouped.iter().map(|(t, e)| (*t, e.len())).collect();
    assert_eq!(
        shape,
        vec![
            (SwotType::Strength, 2),
            (SwotType::Weakness, 0),
            (SwotType::Opportunity, 0),
            (SwotType::Threat, 1),
        ]
    );

    // A fetch returns server order (oldest first)
    ctx.swot.fetch_swot_entries(issue_id).await.unwrap();
    let descriptions: Vec<String> = ctx.swot.entries().into_iter().map(|e| e.description).collect();
    assert_eq!(descriptions, vec!["competitor", "brand", "team"]);
}

#[tokio::test]
async fn test_goal_store() {
    let (ctx, issue_id) = board().await;
    let goal = ctx
        .goals
        .create_goal(&GoalPayload {
            issue_id: Some(issue_id),
            description: Some("Keep 80% of users".into()),
            goal_type: Some(GoalType::ShortTerm),
            created_by: Some("sam".into()),
        })
        .await
        .unwrap();

    ctx.goals
        .update_goal(
            goal.base.id,
            &GoalPayload {
                goal_type: Some(GoalType::LongTerm),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ctx.goals.goals_of_type(GoalType::LongTerm).len(), 1);
    assert!(ctx.goals.goals_of_type(GoalType::ShortTerm).is_empty());

    ctx.goals.delete_goal(goal.base.id).await.unwrap();
    ctx.goals.fetch_goals(issue_id).await.unwrap();
    assert!(ctx.goals.goals().is_empty());
}

#[tokio::test]
async fn test_action_views_join_swot_store() {
    let (ctx, issue_id) = board().await;
    let threat = ctx
        .swot
        .create_swot_entry(&entry_payload(issue_id, SwotType::Threat, "competitor"))
        .await
        .unwrap();
    let strength = ctx
        .swot
        .create_swot_entry(&entry_payload(issue_id, SwotType::Strength, "brand"))
        .await
        .unwrap();
    let action = ctx
        .actions
        .create_action(&action_payload(issue_id, "Loyalty program"))
        .await
        .unwrap();

    ctx.actions
        .add_swot_entry_to_action(action.base.id, threat.base.id)
        .await
        .unwrap();
    ctx.actions
        .add_swot_entry_to_action(action.base.id, strength.base.id)
        .await
        .unwrap();

    let view = ctx.action_view(&action.base.id).unwrap();
    let types: Vec<SwotType> = view.groups.iter().map(|g| g.swot_type).collect();
    assert_eq!(types, vec![SwotType::Strength, SwotType::Threat]);

    // Edits show up in the view without touching the action store
    ctx.swot
        .update_swot_entry(strength.base.id, "strong brand")
        .await
        .unwrap();
    let view = ctx.action_view(&action.base.id).unwrap();
    assert_eq!(view.groups[0].entries[0].description, "strong brand");

    ctx.actions
        .remove_swot_entry_from_action(action.base.id, threat.base.id)
        .await
        .unwrap();
    assert_eq!(ctx.actions.get(&action.base.id).unwrap().swot_entries, vec![strength.base.id]);
    assert_eq!(ctx.action_views().len(), 1);
}

#[tokio::test]
async fn test_swot_delete_reaches_action_store() {
    let (ctx, issue_id) = board().await;
    let entry = ctx
        .swot
        .create_swot_entry(&entry_payload(issue_id, SwotType::Weakness, "slow"))
        .await
        .unwrap();
    let action = ctx
        .actions
        .create_action(&action_payload(issue_id, "Speed up"))
        .await
        .unwrap();
    ctx.actions
        .add_swot_entry_to_action(action.base.id, entry.base.id)
        .await
        .unwrap();

    let updates: Arc<Mutex<Vec<Action>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    ctx.actions.events().subscribe(move |event| {
        if let StoreEvent::Updated(action) = event {
            sink.lock().unwrap().push(action.clone());
        }
    });

    ctx.swot
        .update_swot_entry(entry.base.id, "very slow")
        .await
        .unwrap();
    assert_eq!(updates.lock().unwrap().len(), 1);

    ctx.swot.delete_swot_entry(entry.base.id).await.unwrap();
    assert!(ctx.actions.get(&action.base.id).unwrap().swot_entries.is_empty());
    assert!(ctx.action_view(&action.base.id).unwrap().groups.is_empty());
    let seen = updates.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[1].swot_entries.is_empty());
}

#[tokio::test]
async fn test_action_detail_and_updates() {
    let (ctx, issue_id) = board().await;
    let first = ctx
        .actions
        .create_action(&action_payload(issue_id, "First"))
        .await
        .unwrap();
    let second = ctx
        .actions
        .create_action(&action_payload(issue_id, "Second"))
        .await
        .unwrap();

    // Actions are prepended
    let titles: Vec<String> = ctx.actions.actions().into_iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["Second", "First"]);

    ctx.actions
        .update_action(first.base.id, "First, renamed", "Now with detail")
        .await
        .unwrap();
    assert_eq!(ctx.actions.get(&first.base.id).unwrap().title, "First, renamed");

    ctx.actions
        .update_action_detail(first.base.id, "<ul><li>a</li></ul>")
        .await
        .unwrap();
    assert_eq!(
        ctx.actions.fetch_action_detail(first.base.id).await.unwrap(),
        "<ul><li>a</li></ul>"
    );

    let cleared = ctx.actions.delete_action_detail(first.base.id).await.unwrap();
    assert_eq!(cleared.detail, "");
    assert_eq!(ctx.actions.get(&first.base.id).unwrap().detail, "");

    ctx.actions.delete_action(second.base.id).await.unwrap();
    ctx.actions.fetch_actions(issue_id).await.unwrap();
    let ids: Vec<Uuid> = ctx.actions.actions().into_iter().map(|a| a.base.id).collect();
    assert_eq!(ids, vec![first.base.id]);
}

#[tokio::test]
async fn test_drop_and_hover() {
    let (ctx, issue_id) = board().await;
    let entry = ctx
        .swot
        .create_swot_entry(&entry_payload(issue_id, SwotType::Opportunity, "partners"))
        .await
        .unwrap();
    let action = ctx
        .actions
        .create_action(&action_payload(issue_id, "Partner program"))
        .await
        .unwrap();

    let drag = DragPayload::for_entry(&entry).to_json().unwrap();
    ctx.drop_swot_entry_on_action(action.base.id, &drag)
        .await
        .unwrap();
    assert_eq!(ctx.actions.get(&action.base.id).unwrap().swot_entries, vec![entry.base.id]);

    let err = ctx
        .drop_swot_entry_on_action(action.base.id, "plain text")
        .await
        .unwrap_err();
    assert!(matches!(err, SwotError::InvalidDragPayload(_)));

    ctx.hover_action(Some(action.base.id));
    assert!(ctx.ui.is_swot_entry_highlighted(&entry.base.id));
    ctx.hover_action(None);
    assert!(!ctx.ui.is_swot_entry_highlighted(&entry.base.id));

    ctx.hover_swot_entry(Some(entry.base.id));
    assert_eq!(ctx.ui.hovered_swot_entry_id(), Some(entry.base.id));
    ctx.ui.clear();
    assert!(ctx.ui.highlighted_swot_entry_ids().is_empty());
}

#[tokio::test]
async fn test_load_issue_and_relations_via_client() {
    let (ctx, issue_id) = board().await;
    let entry = ctx
        .swot
        .create_swot_entry(&entry_payload(issue_id, SwotType::Strength, "brand"))
        .await
        .unwrap();
    let action = ctx
        .actions
        .create_action(&action_payload(issue_id, "Campaign"))
        .await
        .unwrap();

    let relation = ctx
        .api
        .create_relation(&swot_board::api::payloads::RelationPayload {
            action_id: Some(action.base.id),
            swot_id: Some(entry.base.id),
            reasoning: None,
        })
        .await
        .unwrap();
    let relation = ctx
        .api
        .update_relation_reasoning(relation.base.id, Some("brand carries it"))
        .await
        .unwrap();
    assert_eq!(relation.reasoning.as_deref(), Some("brand carries it"));
    assert_eq!(ctx.api.list_relations_by_action(action.base.id).await.unwrap().len(), 1);
    assert_eq!(
        ctx.api.delete_relation(relation.base.id).await.unwrap(),
        "Relation deleted"
    );

    let fresh = StoreContext::new(ctx.api.clone());
    fresh.load_issue(issue_id).await.unwrap();
    assert_eq!(fresh.issues.current_issue().unwrap().base.id, issue_id);
    assert_eq!(fresh.swot.entries().len(), 1);
    assert_eq!(fresh.actions.actions().len(), 1);
    assert_eq!(fresh.api.health().await.unwrap()["status"], "ok");
}
