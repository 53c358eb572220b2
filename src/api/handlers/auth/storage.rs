//! Database helpers for user records.

use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::types::UserResponse;
use super::utils::is_unique_violation;

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub(super) enum RegisterOutcome {
    Created(UserRecord),
    Conflict,
}

/// Public fields of a user row; the password hash stays in `CredentialRecord`.
#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) created_at: String,
}

impl UserRecord {
    /// Converts the row into the wire shape used by auth responses.
    pub(super) fn into_response(self) -> UserResponse {
        UserResponse {
            id: self.id.to_string(),
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }

    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        }
    }
}

/// Fields needed to check a login attempt.
pub(super) struct CredentialRecord {
    pub(super) user: UserRecord,
    pub(super) password_hash: String,
}

const USER_COLUMNS: &str = r#"id, name, email,
        to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at"#;

/// Insert a new user, detecting duplicate emails via the unique constraint
/// instead of a racy pre-check.
pub(super) async fn insert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<RegisterOutcome, sqlx::Error> {
    let query = format!(
        r"
        INSERT INTO users (name, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING {USER_COLUMNS}
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(RegisterOutcome::Created(UserRecord::from_row(&row))),
        Err(err) if is_unique_violation(&err) => Ok(RegisterOutcome::Conflict),
        Err(err) => Err(err),
    }
}

/// Look up login data by email.
pub(super) async fn lookup_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>, sqlx::Error> {
    let query = format!(
        r"
        SELECT {USER_COLUMNS}, password_hash
        FROM users
        WHERE email = $1
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(|row| CredentialRecord {
        user: UserRecord::from_row(&row),
        password_hash: row.get("password_hash"),
    }))
}

/// Resolve a user id decoded from a bearer token.
/// `None` means the account no longer exists and the token is dead.
pub(crate) async fn find_user_by_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let query = format!(
        r"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(|row| UserRecord::from_row(&row)))
}
