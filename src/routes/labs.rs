use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::auth::{AdminUser, AuthUser};
use crate::db;
use crate::err::{breaks, proceeds, replies, Done, Error, Payload};
use crate::models::{Lab, Named, NewLab, UpdateLab};
use crate::routes::{required, IdQuery};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct CourseLabs {
    course: String,
    labs: Vec<Named>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabChanged {
    id: i32,
}

pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Payload<CourseLabs> {
    let Query(query) = query?;
    let course_id = required(query.course_id, "course_id")?;
    let course = db::courses::name_of(&state.pool, course_id).await?;
    let labs = db::labs::for_course(&state.pool, course_id).await?;
    if labs.is_empty() {
        return breaks(Error::not_found("Labs Not Found"));
    }
    proceeds(CourseLabs { course, labs })
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<NewLab>, JsonRejection>,
) -> Payload<Lab> {
    let Json(body) = payload?;
    let lab = db::labs::create(&state.pool, &body).await?;
    replies(StatusCode::CREATED, "Success create labs!", lab)
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateLab>, JsonRejection>,
) -> Payload<LabChanged> {
    let Query(query) = query?;
    let lab_id = required(query.id, "id")?;
    let Json(body) = payload?;
    db::labs::update(&state.pool, lab_id, &body).await?;
    replies(StatusCode::OK, "Success update labs!", LabChanged { id: lab_id })
}

pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Payload<Done> {
    let Query(query) = query?;
    let lab_id = required(query.id, "id")?;
    db::labs::delete(&state.pool, lab_id).await?;
    replies(StatusCode::OK, "Success delete labs!", Done {})
}
