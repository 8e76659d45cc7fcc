use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::auth::AdminUser;
use crate::db;
use crate::err::{breaks, proceeds, replies, Done, Error, Payload};
use crate::models::{NamePayload, Named};
use crate::routes::{required, IdQuery};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Classes {
    classes: Vec<Named>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassChanged {
    id: i32,
    class: String,
}

pub async fn list(_admin: AdminUser, State(state): State<AppState>) -> Payload<Classes> {
    let classes = db::classes::all(&state.pool).await?;
    if classes.is_empty() {
        return breaks(Error::not_found("Classes Not Found"));
    }
    proceeds(Classes { classes })
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> Payload<ClassChanged> {
    let Json(body) = payload?;
    let class = db::classes::create(&state.pool, &body.name).await?;
    replies(
        StatusCode::CREATED,
        "Success create class!",
        ClassChanged {
            id: class.id,
            class: class.name,
        },
    )
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> Payload<ClassChanged> {
    let Query(query) = query?;
    let class_id = required(query.class_id, "class_id")?;
    let Json(body) = payload?;
    db::classes::rename(&state.pool, class_id, &body.name).await?;
    replies(
        StatusCode::OK,
        "Success update class!",
        ClassChanged {
            id: class_id,
            class: body.name,
        },
    )
}

pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Payload<Done> {
    let Query(query) = query?;
    let class_id = required(query.class_id, "class_id")?;
    db::classes::delete(&state.pool, class_id).await?;
    replies(StatusCode::OK, "Success delete class!", Done {})
}
