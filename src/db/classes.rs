use sqlx::PgPool;

use crate::db::{delete_error, write_error};
use crate::err::Error;
use crate::models::Named;

pub async fn create(pool: &PgPool, name: &str) -> Result<Named, Error> {
    if name.is_empty() {
        return Err(Error::empty("Class name cannot be empty"));
    }

    let class = sqlx::query_as::<_, Named>("INSERT INTO classes (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|err| write_error(err, "Class already exists", "Class Not Found"))?;
    log::info!("created class `{}` ({})", class.name, class.id);
    Ok(class)
}

pub async fn all(pool: &PgPool) -> Result<Vec<Named>, Error> {
    Ok(sqlx::query_as::<_, Named>("SELECT id, name FROM classes ORDER BY id")
        .fetch_all(pool)
        .await?)
}

pub async fn name_of(pool: &PgPool, class_id: i32) -> Result<String, Error> {
    sqlx::query_scalar::<_, String>("SELECT name FROM classes WHERE id = $1")
        .bind(class_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::not_found("Class Not Found"))
}

pub async fn rename(pool: &PgPool, class_id: i32, name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::empty("Class name cannot be empty"));
    }

    let res = sqlx::query("UPDATE classes SET name = $2 WHERE id = $1")
        .bind(class_id)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|err| write_error(err, "Class already exists", "Class Not Found"))?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("Class Not Found"));
    }
    Ok(())
}

pub async fn delete(pool: &PgPool, class_id: i32) -> Result<(), Error> {
    let res = sqlx::query("DELETE FROM classes WHERE id = $1")
        .bind(class_id)
        .execute(pool)
        .await
        .map_err(|err| delete_error(err, "Class still has students"))?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("Class Not Found"));
    }
    log::info!("deleted class {}", class_id);
    Ok(())
}
