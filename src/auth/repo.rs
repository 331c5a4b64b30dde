use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// User record in the database. Created on registration, deleted on account
/// deletion, never updated in between.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub company: String,
    pub age: i64,
    pub dob: String,
    pub profile_image: String,
    pub created_at: OffsetDateTime,
}

/// Field set for inserting a new user row.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub company: &'a str,
    pub age: i64,
    pub dob: &'a str,
    pub profile_image: &'a str,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, company, age, dob, profile_image, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user row; the store's UNIQUE(email) constraint is the
    /// only duplicate guard.
    pub async fn create(db: &SqlitePool, new_user: NewUser<'_>) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, company, age, dob, profile_image, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, company, age, dob, profile_image, created_at
            "#,
        )
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.company)
        .bind(new_user.age)
        .bind(new_user.dob)
        .bind(new_user.profile_image)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Delete-if-present; succeeds whether or not a row existed.
    pub async fn delete_by_email(db: &SqlitePool, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email)
            .execute(db)
            .await?;
        Ok(())
    }
}

/// Pending OTP record awaiting verification. Challenges are never marked
/// consumed and never deleted; a code stays valid until its expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtpChallenge {
    pub id: i64,
    pub user_id: i64,
    pub code: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

/// The user's most recent challenge joined with the profile fields the
/// welcome response needs.
#[derive(Debug, Clone, FromRow)]
pub struct CurrentChallenge {
    pub code: String,
    pub expires_at: OffsetDateTime,
    pub name: String,
    pub company: String,
}

impl OtpChallenge {
    pub async fn create(
        db: &SqlitePool,
        user_id: i64,
        code: &str,
        expires_at: OffsetDateTime,
    ) -> Result<OtpChallenge, sqlx::Error> {
        sqlx::query_as::<_, OtpChallenge>(
            r#"
            INSERT INTO otp_challenges (user_id, code, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, code, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Most recent challenge for the account with that email, if any.
    pub async fn current_for_email(
        db: &SqlitePool,
        email: &str,
    ) -> Result<Option<CurrentChallenge>, sqlx::Error> {
        sqlx::query_as::<_, CurrentChallenge>(
            r#"
            SELECT otp_challenges.code, otp_challenges.expires_at, users.name, users.company
            FROM otp_challenges
            JOIN users ON otp_challenges.user_id = users.id
            WHERE users.email = ?
            ORDER BY otp_challenges.id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }
}
