use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for OTP verification.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Request body for account deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub email: String,
}

/// Response returned after successful OTP verification.
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub company: String,
}
