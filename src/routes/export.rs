use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use crate::auth::AdminUser;
use crate::err::{proceeds, Payload};
use crate::report::{self, Export};
use crate::routes::{required, IdQuery};
use crate::state::AppState;

pub async fn export(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Payload<Export> {
    let Query(query) = query?;
    let class_id = required(query.class_id, "class_id")?;
    let course_id = required(query.course_id, "course_id")?;
    proceeds(report::export(&state.pool, course_id, class_id).await?)
}
