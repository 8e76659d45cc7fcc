//! Queries against the Postgres store.
//!
//! Every function validates its input before touching the pool and turns
//! store failures into [`Error`] kinds the HTTP layer can answer with.

pub mod classes;
pub mod courses;
pub mod labs;
pub mod scores;
pub mod seed;
pub mod users;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::err::Error;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect(options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations applied");
    Ok(())
}

/// Maps a failed insert or update: a taken name is a conflict, a dangling
/// reference is a missing entity.
pub(crate) fn write_error(err: sqlx::Error, taken: &str, missing: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return Error::conflict(taken);
        }
        if db_err.is_foreign_key_violation() {
            return Error::not_found(missing);
        }
    }
    Error::from(err)
}

/// Maps a failed delete: rows that still reference the target block it.
pub(crate) fn delete_error(err: sqlx::Error, referenced: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return Error::conflict(referenced);
        }
    }
    Error::from(err)
}
