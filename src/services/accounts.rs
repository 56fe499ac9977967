//! Account profiles — registration, credentials, profile updates.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::session;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("email already registered")]
    EmailTaken,
    #[error("profile not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// End-user account row, as returned by the API (never carries the
/// password hash).
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub research_interests: Option<Vec<String>>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub(crate) const PROFILE_COLUMNS: &str =
    "id, email, full_name, institution, department, position, research_interests, bio, avatar_url";

pub(crate) fn profile_from_row(row: &PgRow) -> ProfileRecord {
    ProfileRecord {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        institution: row.get("institution"),
        department: row.get("department"),
        position: row.get("position"),
        research_interests: row.get("research_interests"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
    }
}

pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub research_interests: Option<Vec<String>>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Register a new account.
///
/// # Errors
///
/// `InvalidEmail` when the address does not parse, `EmailTaken` when a
/// profile already exists for it, `Database` on query failure.
pub async fn register(pool: &PgPool, account: NewAccount) -> Result<ProfileRecord, AccountError> {
    let email = session::normalize_email(&account.email).ok_or(AccountError::InvalidEmail)?;

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM profiles WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AccountError::EmailTaken);
    }

    let password_hash = session::hash_password(&account.password);
    let row = sqlx::query(&format!(
        "INSERT INTO profiles (email, password_hash, full_name, institution, department)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {PROFILE_COLUMNS}",
    ))
    .bind(&email)
    .bind(&password_hash)
    .bind(&account.full_name)
    .bind(&account.institution)
    .bind(&account.department)
    .fetch_one(pool)
    .await?;

    Ok(profile_from_row(&row))
}

/// Look up login credentials by email. Returns the profile id and stored
/// password hash when the account exists.
pub async fn find_credentials(pool: &PgPool, email: &str) -> Result<Option<(Uuid, String)>, AccountError> {
    let Some(email) = session::normalize_email(email) else {
        return Ok(None);
    };

    let row = sqlx::query("SELECT id, password_hash FROM profiles WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| (r.get("id"), r.get("password_hash"))))
}

/// Fetch one profile by id.
///
/// # Errors
///
/// `NotFound` when no such profile exists.
pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<ProfileRecord, AccountError> {
    let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::NotFound(id))?;

    Ok(profile_from_row(&row))
}

/// Partially update a profile; unset fields keep their current values.
///
/// # Errors
///
/// `NotFound` when no such profile exists.
pub async fn update_profile(pool: &PgPool, id: Uuid, update: ProfileUpdate) -> Result<ProfileRecord, AccountError> {
    let row = sqlx::query(&format!(
        "UPDATE profiles SET
             full_name = COALESCE($2, full_name),
             institution = COALESCE($3, institution),
             department = COALESCE($4, department),
             position = COALESCE($5, position),
             research_interests = COALESCE($6, research_interests),
             bio = COALESCE($7, bio),
             avatar_url = COALESCE($8, avatar_url),
             updated_at = now()
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}",
    ))
    .bind(id)
    .bind(&update.full_name)
    .bind(&update.institution)
    .bind(&update.department)
    .bind(&update.position)
    .bind(&update.research_interests)
    .bind(&update.bio)
    .bind(&update.avatar_url)
    .fetch_optional(pool)
    .await?
    .ok_or(AccountError::NotFound(id))?;

    Ok(profile_from_row(&row))
}
