use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::auth::{AdminUser, AuthUser};
use crate::db;
use crate::err::{breaks, proceeds, replies, Done, Error, Payload};
use crate::models::{NamePayload, Named};
use crate::routes::{required, IdQuery};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Courses {
    courses: Vec<Named>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseChanged {
    id: i32,
    course: String,
}

async fn all_courses(state: &AppState) -> Payload<Courses> {
    let courses = db::courses::all(&state.pool).await?;
    if courses.is_empty() {
        return breaks(Error::not_found("Course Not Found"));
    }
    proceeds(Courses { courses })
}

pub async fn list(_user: AuthUser, State(state): State<AppState>) -> Payload<Courses> {
    all_courses(&state).await
}

pub async fn list_all(_admin: AdminUser, State(state): State<AppState>) -> Payload<Courses> {
    all_courses(&state).await
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> Payload<CourseChanged> {
    let Json(body) = payload?;
    let course = db::courses::create(&state.pool, &body.name).await?;
    replies(
        StatusCode::CREATED,
        "Success create course!",
        CourseChanged {
            id: course.id,
            course: course.name,
        },
    )
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> Payload<CourseChanged> {
    let Query(query) = query?;
    let course_id = required(query.id, "id")?;
    let Json(body) = payload?;
    db::courses::rename(&state.pool, course_id, &body.name).await?;
    replies(
        StatusCode::OK,
        "Success update course!",
        CourseChanged {
            id: course_id,
            course: body.name,
        },
    )
}

pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Payload<Done> {
    let Query(query) = query?;
    let course_id = required(query.id, "id")?;
    db::courses::delete(&state.pool, course_id).await?;
    replies(StatusCode::OK, "Success delete course!", Done {})
}
