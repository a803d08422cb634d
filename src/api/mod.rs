//! REST API for the SWOT board.
//!
//! All resource routes live under `/api`. Each handler performs at most one
//! read and one write against the [`Repository`]; concurrent edits to the
//! same document are last-write-wins.

pub mod error;
pub mod payloads;

mod actions;
mod goals;
mod issues;
mod relations;
mod swot_entries;

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::entity::Record;
use crate::storage::Repository;
use error::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
}

/// Build the full application router.
pub fn router(repo: Repository) -> Router {
    let api = Router::new()
        .merge(issues::routes())
        .merge(swot_entries::routes())
        .merge(goals::routes())
        .merge(actions::routes())
        .merge(relations::routes());

    Router::new()
        .route("/", get(root))
        .route("/test", get(health))
        .nest("/api", api)
        .with_state(AppState { repo })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "API is working" }))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": GENERIC_ERROR_MESSAGE })),
    )
        .into_response()
}

/// Parse a path id. Anything that is not a UUID cannot name a document.
fn parse_id<T: Record>(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(T::LABEL))
}

async fn find_or_404<T: Record>(repo: &Repository, raw_id: &str) -> ApiResult<T> {
    let id = parse_id::<T>(raw_id)?;
    repo.get::<T>(&id)
        .await?
        .ok_or(ApiError::NotFound(T::LABEL))
}

/// Write back a modified record; the document may have been deleted meanwhile.
async fn save_or_404<T: Record>(repo: &Repository, record: &mut T) -> ApiResult<()> {
    if repo.save(record).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(T::LABEL))
    }
}

async fn delete_or_404<T: Record>(repo: &Repository, raw_id: &str) -> ApiResult<Json<Value>> {
    let id = parse_id::<T>(raw_id)?;
    if !repo.delete::<T>(&id).await? {
        return Err(ApiError::NotFound(T::LABEL));
    }
    tracing::info!(collection = %T::COLLECTION, %id, "deleted");
    Ok(Json(json!({ "message": format!("{} deleted", T::LABEL) })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_panic_payloads_map_to_generic_500() {
        let payloads: Vec<Box<dyn Any + Send>> = vec![
            Box::new("index out of bounds"),
            Box::new(String::from("lock poisoned")),
            Box::new(42_u8),
        ];
        for payload in payloads {
            let response = handle_panic(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(response).await,
                json!({ "message": GENERIC_ERROR_MESSAGE })
            );
        }
    }

    #[tokio::test]
    async fn test_panicking_route_answers_500() {
        async fn explode() -> Json<Value> {
            panic!("handler bug")
        }

        let app = Router::new()
            .route("/explode", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));
        let response = app
            .oneshot(Request::get("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Something went wrong!" })
        );
    }
}
