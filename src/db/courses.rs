use sqlx::PgPool;

use crate::db::{delete_error, write_error};
use crate::err::Error;
use crate::models::Named;

pub async fn create(pool: &PgPool, name: &str) -> Result<Named, Error> {
    if name.is_empty() {
        return Err(Error::empty("Course name cannot be empty"));
    }

    let course = sqlx::query_as::<_, Named>("INSERT INTO courses (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|err| write_error(err, "Course already exists", "Course Not Found"))?;
    log::info!("created course `{}` ({})", course.name, course.id);
    Ok(course)
}

pub async fn all(pool: &PgPool) -> Result<Vec<Named>, Error> {
    Ok(sqlx::query_as::<_, Named>("SELECT id, name FROM courses ORDER BY id")
        .fetch_all(pool)
        .await?)
}

pub async fn name_of(pool: &PgPool, course_id: i32) -> Result<String, Error> {
    sqlx::query_scalar::<_, String>("SELECT name FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::not_found("Course Not Found"))
}

pub async fn rename(pool: &PgPool, course_id: i32, name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::empty("Course name cannot be empty"));
    }

    let res = sqlx::query("UPDATE courses SET name = $2 WHERE id = $1")
        .bind(course_id)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|err| write_error(err, "Course already exists", "Course Not Found"))?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("Course Not Found"));
    }
    Ok(())
}

pub async fn delete(pool: &PgPool, course_id: i32) -> Result<(), Error> {
    let res = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id)
        .execute(pool)
        .await
        .map_err(|err| delete_error(err, "Course still has labs"))?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("Course Not Found"));
    }
    log::info!("deleted course {}", course_id);
    Ok(())
}
