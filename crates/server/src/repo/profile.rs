use chrono::{DateTime, Utc};
use shared_types::{AppError, Profile, Role};
use sqlx::{FromRow, Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// Row shape of `profiles`. The role column is plain text guarded by a
/// CHECK constraint, so it is parsed after the fetch.
#[derive(FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            email: row.email,
            role: Role::from_str_or_default(&row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Role stored for `id`, or `None` when no profile exists.
pub async fn find_role(pool: &Pool<Postgres>, id: &str) -> Result<Option<Role>, AppError> {
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(role.map(|r| Role::from_str_or_default(&r)))
}

/// Find a profile by identity id.
pub async fn find_by_id(pool: &Pool<Postgres>, id: &str) -> Result<Option<Profile>, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, email, role, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row.map(Profile::from))
}

/// Insert a profile unless one already exists for `id`.
///
/// Returns `true` when this call created the row. An existing row is left
/// untouched, including its role.
pub async fn insert_if_absent(
    pool: &Pool<Postgres>,
    id: &str,
    email: &str,
    role: Role,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO profiles (id, email, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(role.as_str())
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() == 1)
}

/// List all profiles, oldest first.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<Profile>, AppError> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, email, role, created_at, updated_at
        FROM profiles
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows.into_iter().map(Profile::from).collect())
}

/// Assign a role. Returns the updated profile or `None` if `id` is unknown.
pub async fn set_role(
    pool: &Pool<Postgres>,
    id: &str,
    role: Role,
) -> Result<Option<Profile>, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles
        SET role = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, role, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(role.as_str())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row.map(Profile::from))
}
