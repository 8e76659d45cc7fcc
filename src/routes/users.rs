use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::auth::AdminUser;
use crate::db;
use crate::err::{breaks, proceeds, replies, Done, Error, Payload};
use crate::models::{NewUser, Student, UpdateUser};
use crate::routes::{required, IdQuery};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ClassStudents {
    class: String,
    students: Vec<Student>,
}

pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Payload<ClassStudents> {
    let Query(query) = query?;
    let class_id = required(query.class_id, "class_id")?;
    let class = db::classes::name_of(&state.pool, class_id).await?;
    let students = db::users::in_class(&state.pool, class_id).await?;
    if students.is_empty() {
        return breaks(Error::not_found("Users Not Found"));
    }
    proceeds(ClassStudents { class, students })
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Payload<Student> {
    let Json(body) = payload?;
    let student = db::users::create(&state.pool, &body).await?;
    replies(StatusCode::CREATED, "successful create user", student)
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Payload<Done> {
    let Query(query) = query?;
    let user_id = required(query.user_id, "user_id")?;
    let Json(body) = payload?;
    db::users::update(&state.pool, user_id, &body).await?;
    replies(StatusCode::OK, "Success update user", Done {})
}

pub async fn delete(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Payload<Done> {
    let Query(query) = query?;
    let user_id = required(query.id, "id")?;
    if user_id == admin.id {
        return breaks(Error::conflict("Cannot delete the signed in admin"));
    }
    db::users::delete(&state.pool, user_id).await?;
    replies(StatusCode::OK, "Success delete user", Done {})
}
