use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{DeleteAccountRequest, LoginRequest, VerifyOtpRequest, WelcomeResponse},
        otp,
        password::{hash_password, verify_password},
        repo::{NewUser, OtpChallenge, User},
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-otp", post(verify_otp))
        .route("/delete-account", post(delete_account))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB, covers the profile image
}

fn bad_form(err: axum::extract::multipart::MultipartError) -> ApiError {
    warn!(error = %err, "malformed multipart form");
    ApiError::Validation("Invalid form data".into())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{field} is required"))),
    }
}

/// POST /register (multipart)
/// Fields: name, email, password, company, age, dob, profile_image (file).
#[instrument(skip(state, multipart))]
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<&'static str, ApiError> {
    let mut name = None;
    let mut email = None;
    let mut password = None;
    let mut company = None;
    let mut age = None;
    let mut dob = None;
    let mut image: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };
        match field_name.as_str() {
            "profile_image" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(bad_form)?;
                image = Some((original_name, data));
            }
            "name" => name = Some(field.text().await.map_err(bad_form)?),
            "email" => email = Some(field.text().await.map_err(bad_form)?),
            "password" => password = Some(field.text().await.map_err(bad_form)?),
            "company" => company = Some(field.text().await.map_err(bad_form)?),
            "age" => age = Some(field.text().await.map_err(bad_form)?),
            "dob" => dob = Some(field.text().await.map_err(bad_form)?),
            _ => {}
        }
    }

    // The image check comes first: it rejects regardless of the other fields.
    let (original_name, data) =
        image.ok_or_else(|| ApiError::Validation("Image upload is required".into()))?;
    let name = required(name, "name")?;
    let email = required(email, "email")?;
    let password = required(password, "password")?;
    let company = required(company, "company")?;
    let age: i64 = required(age, "age")?
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("age must be a number".into()))?;
    let dob = required(dob, "dob")?;

    let password_hash =
        hash_password(&password).map_err(ApiError::internal("Error registering user"))?;

    // Persist the image before touching the store; the row references the
    // generated filename.
    let profile_image = state
        .storage
        .save(data, &original_name)
        .await
        .map_err(ApiError::internal("Error storing profile image"))?;

    match User::create(
        &state.db,
        NewUser {
            name: &name,
            email: &email,
            password_hash: &password_hash,
            company: &company,
            age,
            dob: &dob,
            profile_image: &profile_image,
        },
    )
    .await
    {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok("User registered successfully")
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %email, "duplicate registration");
            Err(ApiError::Conflict("User already exists"))
        }
        Err(e) => Err(ApiError::store("Error registering user")(e)),
    }
}

/// POST /login
/// Unknown email and wrong password produce the same response on purpose.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<&'static str, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::store("Error looking up user"))?;
    let Some(user) = user else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::Auth("Invalid credentials"));
    };

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(ApiError::internal("Error verifying credentials"))?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Auth("Invalid credentials"));
    }

    let code = otp::generate_code();
    let expires_at = otp::expiry_from(OffsetDateTime::now_utc());
    OtpChallenge::create(&state.db, user.id, &code, expires_at)
        .await
        .map_err(ApiError::store("Error generating OTP"))?;

    info!(user_id = %user.id, "OTP challenge issued");
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_otp(&user.email, &code).await {
            warn!(error = %e, user_id = %user.id, "OTP email delivery failed");
        }
    });

    Ok("OTP sent to email")
}

/// POST /verify-otp
/// Checks the most recent challenge; a missing row, an expired code and a
/// wrong code all produce the same response.
#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<WelcomeResponse>, ApiError> {
    let challenge = OtpChallenge::current_for_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::store("Error verifying OTP"))?;
    let Some(challenge) = challenge else {
        warn!(email = %payload.email, "OTP verification without challenge");
        return Err(ApiError::Auth("Invalid OTP"));
    };

    let expired = challenge.expires_at < OffsetDateTime::now_utc();
    if expired || payload.otp != challenge.code {
        warn!(email = %payload.email, "OTP verification failed");
        return Err(ApiError::Auth("Invalid OTP"));
    }

    info!(email = %payload.email, "OTP verified");
    Ok(Json(WelcomeResponse {
        message: format!("Welcome, {}!", challenge.name),
        company: challenge.company,
    }))
}

/// POST /delete-account
/// Delete-if-present; succeeds whether or not the account existed.
#[instrument(skip(state, payload))]
pub async fn delete_account(
    State(state): State<AppState>,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<&'static str, ApiError> {
    User::delete_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::store("Error deleting account"))?;
    info!(email = %payload.email, "account deleted");
    Ok("Account deleted successfully")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_response_serialization() {
        let response = WelcomeResponse {
            message: "Welcome, Alice!".to_string(),
            company: "Acme".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("Welcome, Alice!"));
        assert!(json.contains("company"));
    }

    #[test]
    fn required_rejects_missing_and_blank_fields() {
        assert!(required(None, "name").is_err());
        assert!(required(Some("   ".into()), "name").is_err());
        assert_eq!(required(Some("Alice".into()), "name").unwrap(), "Alice");
    }
}
