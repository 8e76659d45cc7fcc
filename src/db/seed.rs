use sqlx::PgPool;

use crate::auth::hash_password;

pub const ADMIN_ROLE: &str = "admin";
pub const STUDENT_ROLE: &str = "student";
pub const DEFAULT_CLASS: &str = "Shopiea";
pub const DEFAULT_COURSE: &str = "golang";
pub const DEFAULT_LAB: &str = "golang-001";
pub const ADMIN_USERNAME: &str = "admin";

/// Inserts the reference rows the server expects. Rows that already exist
/// are left untouched, so seeding twice is harmless.
pub async fn seed(pool: &PgPool, admin_password: &str) -> anyhow::Result<()> {
    for role in [ADMIN_ROLE, STUDENT_ROLE] {
        insert_named(pool, "roles", role).await?;
    }
    insert_named(pool, "classes", DEFAULT_CLASS).await?;

    let password_hash = hash_password(admin_password)
        .map_err(|err| anyhow::anyhow!("could not hash admin password: {:?}", err))?;
    let res = sqlx::query(
        "INSERT INTO users (username, password, name, role_id, class_id) \
         SELECT $1, $2, 'Administrator', r.id, c.id FROM roles r, classes c \
         WHERE r.name = $3 AND c.name = $4 \
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(ADMIN_USERNAME)
    .bind(&password_hash)
    .bind(ADMIN_ROLE)
    .bind(DEFAULT_CLASS)
    .execute(pool)
    .await?;
    if res.rows_affected() > 0 {
        log::warn!(
            "Created admin user: {} (default password set - change immediately!)",
            ADMIN_USERNAME
        );
    } else {
        log::info!("User already exists: {}", ADMIN_USERNAME);
    }

    insert_named(pool, "courses", DEFAULT_COURSE).await?;

    let res = sqlx::query(
        "INSERT INTO labs (name, course_id) SELECT $1, id FROM courses WHERE name = $2 \
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(DEFAULT_LAB)
    .bind(DEFAULT_COURSE)
    .execute(pool)
    .await?;
    if res.rows_affected() > 0 {
        log::info!("Created lab: {} for course {}", DEFAULT_LAB, DEFAULT_COURSE);
    } else {
        log::info!("Lab already exists: {}", DEFAULT_LAB);
    }

    log::info!("Database seeding completed successfully");
    Ok(())
}

async fn insert_named(pool: &PgPool, table: &'static str, name: &str) -> anyhow::Result<()> {
    let res = sqlx::query(&format!(
        "INSERT INTO {} (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        table
    ))
    .bind(name)
    .execute(pool)
    .await?;
    if res.rows_affected() > 0 {
        log::info!("Created {} row: {}", table, name);
    } else {
        log::info!("{} row already exists: {}", table, name);
    }
    Ok(())
}
