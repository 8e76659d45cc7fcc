use sqlx::PgPool;

use crate::auth::hash_password;
use crate::db::seed::ADMIN_ROLE;
use crate::db::write_error;
use crate::err::Error;
use crate::models::{NewUser, Student, UpdateUser, User};

const MISSING_REFERENCE: &str = "Role or class does not exist";

pub async fn create(pool: &PgPool, user: &NewUser) -> Result<Student, Error> {
    user.validate()?;

    let password_hash = hash_password(&user.password)?;
    let student = sqlx::query_as::<_, Student>(
        "INSERT INTO users (username, password, name, role_id, class_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id, username, name",
    )
    .bind(&user.username)
    .bind(&password_hash)
    .bind(&user.name)
    .bind(user.role_id)
    .bind(user.class_id)
    .fetch_one(pool)
    .await
    .map_err(|err| write_error(err, "User already exists", MISSING_REFERENCE))?;
    log::info!("created user `{}` ({})", student.username, student.id);
    Ok(student)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, Error> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT id, username, password, name, role_id, class_id FROM users WHERE username = $1 LIMIT 1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?)
}

/// Users of a class in creation order, without credentials.
pub async fn in_class(pool: &PgPool, class_id: i32) -> Result<Vec<Student>, Error> {
    Ok(sqlx::query_as::<_, Student>(
        "SELECT id, username, name FROM users WHERE class_id = $1 ORDER BY id",
    )
    .bind(class_id)
    .fetch_all(pool)
    .await?)
}

pub async fn is_admin(pool: &PgPool, user_id: i32) -> Result<bool, Error> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users u JOIN roles r ON r.id = u.role_id \
         WHERE u.id = $1 AND r.name = $2)",
    )
    .bind(user_id)
    .bind(ADMIN_ROLE)
    .fetch_one(pool)
    .await?)
}

pub async fn update(pool: &PgPool, user_id: i32, user: &UpdateUser) -> Result<(), Error> {
    user.validate()?;

    let password_hash = match &user.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    let res = sqlx::query(
        "UPDATE users SET \
            username = COALESCE($2, username), \
            password = COALESCE($3, password), \
            name = COALESCE($4, name), \
            role_id = COALESCE($5, role_id), \
            class_id = COALESCE($6, class_id) \
         WHERE id = $1",
    )
    .bind(user_id)
    .bind(&user.username)
    .bind(&password_hash)
    .bind(&user.name)
    .bind(user.role_id)
    .bind(user.class_id)
    .execute(pool)
    .await
    .map_err(|err| write_error(err, "User already exists", MISSING_REFERENCE))?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("User Not Found"));
    }
    Ok(())
}

/// Deletes a user; their scores go with them.
pub async fn delete(pool: &PgPool, user_id: i32) -> Result<(), Error> {
    let res = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if res.rows_affected() < 1 {
        return Err(Error::not_found("User Not Found"));
    }
    log::info!("deleted user {}", user_id);
    Ok(())
}
