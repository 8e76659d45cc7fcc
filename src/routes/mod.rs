use std::time::Instant;

use axum::error_handling::HandleErrorLayer;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tower::ServiceBuilder;

use crate::auth;
use crate::err::{self, Error};
use crate::state::AppState;

pub mod classes;
pub mod courses;
pub mod export;
pub mod info;
pub mod labs;
pub mod scores;
pub mod users;

pub fn router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/info", get(info::info))
        .nest("/v1", v1())
        .fallback(err::handler404)
        .layer(middleware::from_fn(log_request))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(err::handle_timeout))
                .timeout(timeout),
        )
        .with_state(state)
}

fn v1() -> Router<AppState> {
    Router::new()
        .route("/auth/check", post(auth::check))
        .route("/course", get(courses::list))
        .route("/labs", get(labs::list))
        .route("/score", get(scores::get).post(scores::push))
        .nest("/admin", admin())
}

fn admin() -> Router<AppState> {
    Router::new()
        .route("/check", post(auth::check_admin))
        .route(
            "/user",
            get(users::list)
                .post(users::create)
                .put(users::update)
                .delete(users::delete),
        )
        .route(
            "/class",
            get(classes::list)
                .post(classes::create)
                .put(classes::update)
                .delete(classes::delete),
        )
        .route(
            "/course",
            get(courses::list_all)
                .post(courses::create)
                .put(courses::update)
                .delete(courses::delete),
        )
        .route(
            "/labs",
            post(labs::create).put(labs::update).delete(labs::delete),
        )
        .route("/export", get(export::export))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();
    let response = next.run(request).await;
    log::info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Query string carrying a row id, under whichever key the route uses.
#[derive(Debug, Clone, Deserialize)]
pub struct IdQuery {
    pub id: Option<i32>,
    pub user_id: Option<i32>,
    pub class_id: Option<i32>,
    pub course_id: Option<i32>,
}

pub(crate) fn required(value: Option<i32>, name: &str) -> Result<i32, Error> {
    value.ok_or_else(|| Error::empty(format!("{} cannot be empty", name)))
}
