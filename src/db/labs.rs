use sqlx::PgPool;

use crate::db::{delete_error, write_error};
use crate::err::Error;
use crate::models::{Lab, Named, NewLab, UpdateLab};

pub async fn create(pool: &PgPool, lab: &NewLab) -> Result<Lab, Error> {
    if lab.name.is_empty() || lab.course_id == 0 {
        return Err(Error::empty("Lab name and course_id cannot be empty"));
    }

    let lab = sqlx::query_as::<_, Lab>(
        "INSERT INTO labs (name, course_id) VALUES ($1, $2) RETURNING id, name, course_id",
    )
    .bind(&lab.name)
    .bind(lab.course_id)
    .fetch_one(pool)
    .await
    .map_err(|err| write_error(err, "Lab already exists", "Course Not Found"))?;
    log::info!("created lab `{}` for course {}", lab.name, lab.course_id);
    Ok(lab)
}

/// Labs of a course in creation order.
pub async fn for_course(pool: &PgPool, course_id: i32) -> Result<Vec<Named>, Error> {
    Ok(
        sqlx::query_as::<_, Named>("SELECT id, name FROM labs WHERE course_id = $1 ORDER BY id")
            .bind(course_id)
            .fetch_all(pool)
            .await?,
    )
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Lab>, Error> {
    Ok(
        sqlx::query_as::<_, Lab>("SELECT id, name, course_id FROM labs WHERE name = $1 LIMIT 1")
            .bind(name)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn update(pool: &PgPool, lab_id: i32, lab: &UpdateLab) -> Result<(), Error> {
    if matches!(&lab.name, Some(name) if name.is_empty()) || lab.course_id == Some(0) {
        return Err(Error::empty("Lab name and course_id cannot be empty"));
    }

    let res = sqlx::query(
        "UPDATE labs SET name = COALESCE($2, name), course_id = COALESCE($3, course_id) WHERE id = $1",
    )
    .bind(lab_id)
    .bind(&lab.name)
    .bind(lab.course_id)
    .execute(pool)
    .await
    .map_err(|err| write_error(err, "Lab already exists", "Course Not Found"))?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("Lab Not Found"));
    }
    Ok(())
}

pub async fn delete(pool: &PgPool, lab_id: i32) -> Result<(), Error> {
    let res = sqlx::query("DELETE FROM labs WHERE id = $1")
        .bind(lab_id)
        .execute(pool)
        .await
        .map_err(|err| delete_error(err, "Lab is still referenced"))?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("Lab Not Found"));
    }
    log::info!("deleted lab {}", lab_id);
    Ok(())
}
