use sqlx::PgPool;

use crate::db::{labs, users};
use crate::err::Error;
use crate::models::{LabScore, Score, ScoreOutcome, ScorePush, SubmittedScore};

/// Inserts the first score for (user, lab) or raises the stored one; a lower
/// or equal score leaves the row and its `updated_at` alone. Runs as one
/// statement so concurrent pushes cannot duplicate or lose a row.
const MERGE_SCORE: &str = "\
    INSERT INTO scores (user_id, lab_id, score, created_at, updated_at) \
    VALUES ($1, $2, $3, now(), now()) \
    ON CONFLICT (user_id, lab_id) DO UPDATE \
        SET score = EXCLUDED.score, updated_at = now() \
        WHERE scores.score < EXCLUDED.score \
    RETURNING (xmax = 0) AS inserted";

/// Records a score pushed by `caller`, who may only push for themselves.
pub async fn push(pool: &PgPool, caller: i32, push: &ScorePush) -> Result<ScoreOutcome, Error> {
    let score = push.validate()?;

    let lab = labs::find_by_name(pool, &push.lab)
        .await?
        .ok_or_else(|| Error::not_found(format!("Lab `{}` does not exist", push.lab)))?;
    let user = users::find_by_username(pool, &push.username)
        .await?
        .ok_or_else(|| Error::not_found(format!("User `{}` does not exist", push.username)))?;

    if user.id != caller {
        log::warn!(
            "user {} tried to push a score for `{}`",
            caller,
            push.username
        );
        return Err(Error::unauthorized("Cannot push a score for another user"));
    }

    let inserted = sqlx::query_scalar::<_, bool>(MERGE_SCORE)
        .bind(user.id)
        .bind(lab.id)
        .bind(score)
        .fetch_optional(pool)
        .await?;
    let outcome = ScoreOutcome::from_upsert(inserted);
    log::debug!(
        "score {} for user {} on `{}`: {:?}",
        score,
        user.id,
        lab.name,
        outcome
    );
    Ok(outcome)
}

pub async fn find(pool: &PgPool, user_id: i32, lab_id: i32) -> Result<Option<Score>, Error> {
    Ok(sqlx::query_as::<_, Score>(
        "SELECT id, user_id, lab_id, score, created_at, updated_at FROM scores \
         WHERE user_id = $1 AND lab_id = $2",
    )
    .bind(user_id)
    .bind(lab_id)
    .fetch_optional(pool)
    .await?)
}

/// Best score of `user_id` for the lab called `lab_name`.
pub async fn for_lab(pool: &PgPool, user_id: i32, lab_name: &str) -> Result<LabScore, Error> {
    if lab_name.is_empty() {
        return Err(Error::empty("lab_name cannot be empty"));
    }

    let lab = labs::find_by_name(pool, lab_name)
        .await?
        .ok_or_else(|| Error::not_found(format!("Lab `{}` does not exist", lab_name)))?;
    let score = find(pool, user_id, lab.id)
        .await?
        .ok_or_else(|| Error::not_found("score not found"))?;
    Ok(LabScore {
        lab_name: lab.name,
        score: score.score,
        updated_at: score.updated_at,
    })
}

/// Scores of every student of `class_id` on labs of `course_id`.
pub async fn for_class_course(
    pool: &PgPool,
    class_id: i32,
    course_id: i32,
) -> Result<Vec<SubmittedScore>, Error> {
    Ok(sqlx::query_as::<_, SubmittedScore>(
        "SELECT s.user_id, s.lab_id, s.score FROM scores s \
         JOIN labs l ON l.id = s.lab_id \
         JOIN users u ON u.id = s.user_id \
         WHERE l.course_id = $1 AND u.class_id = $2",
    )
    .bind(course_id)
    .bind(class_id)
    .fetch_all(pool)
    .await?)
}
