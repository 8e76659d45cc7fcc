use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::db;
use crate::err::{proceeds, replies, Payload};
use crate::models::{LabScore, ScoreOutcome, ScorePush};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Pushed {
    outcome: ScoreOutcome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabNameQuery {
    #[serde(default)]
    lab_name: String,
}

pub async fn push(
    user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<ScorePush>, JsonRejection>,
) -> Payload<Pushed> {
    let Json(body) = payload?;
    let outcome = db::scores::push(&state.pool, user.id, &body).await?;
    let (status, message) = match outcome {
        ScoreOutcome::Created => (StatusCode::CREATED, "score created"),
        ScoreOutcome::Updated => (StatusCode::CREATED, "score updated"),
        ScoreOutcome::Kept => (StatusCode::ACCEPTED, "keep high score"),
    };
    replies(status, message, Pushed { outcome })
}

pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    query: Result<Query<LabNameQuery>, QueryRejection>,
) -> Payload<LabScore> {
    let Query(query) = query?;
    proceeds(db::scores::for_lab(&state.pool, user.id, &query.lab_name).await?)
}
