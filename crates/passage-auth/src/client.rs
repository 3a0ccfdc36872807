//! HTTP client for the auth backend.
//!
//! Three endpoints, JSON bodies, success decided by a 2xx status:
//! send-OTP, register (verify OTP), and login.

use crate::error::{AuthError, AuthResult};
use crate::forms::RegistrationForm;
use serde::{Deserialize, Serialize};

/// Fallback shown when a failed login has no structured message.
pub const LOGIN_FALLBACK: &str = "Invalid credentials";

/// Fallback shown when sending an OTP fails without a structured message.
pub const SEND_OTP_FALLBACK: &str = "Error sending OTP";

/// Fallback shown when OTP verification fails without a structured message.
pub const REGISTER_FALLBACK: &str = "OTP verification failed";

/// Client for the auth backend's user endpoints.
#[derive(Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: String,
}

/// Identity returned by a successful registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    /// Opaque session token
    pub token: String,
    /// Email the account was registered with
    pub email: String,
}

/// Body shape shared by send-OTP responses and all failure responses.
#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    data: RegisteredUser,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    token: String,
}

#[derive(Debug, Serialize)]
struct SendOtpRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Registration form merged with the user's OTP.
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    #[serde(flatten)]
    form: &'a RegistrationForm,
    otp: &'a str,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Arguments
    /// * `base_url` - The backend base URL (e.g., `https://api.passage.app`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Build the URL for a users endpoint.
    fn users_url(&self, op: &str) -> String {
        format!("{}/api/v1/users/{}", self.base_url.trim_end_matches('/'), op)
    }

    /// Ask the backend to email an OTP to the given address.
    ///
    /// Returns the backend's confirmation message.
    pub async fn send_otp(&self, email: &str) -> AuthResult<String> {
        let url = self.users_url("send-otp");

        tracing::debug!(url = %url, "Requesting OTP");

        let response = self
            .http_client
            .post(&url)
            .json(&SendOtpRequest { email })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, SEND_OTP_FALLBACK).await);
        }

        let body: MessageBody = response.json().await?;
        Ok(body.message.unwrap_or_else(|| "OTP sent".to_string()))
    }

    /// Complete registration by submitting the form together with the OTP.
    pub async fn register(&self, form: &RegistrationForm, otp: &str) -> AuthResult<RegisteredUser> {
        let url = self.users_url("register");

        tracing::debug!(url = %url, "Submitting registration");

        let response = self
            .http_client
            .post(&url)
            .json(&RegisterRequest { form, otp })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, REGISTER_FALLBACK).await);
        }

        let body: RegisterBody = response.json().await?;
        tracing::debug!(email = %body.data.email, "Registration accepted");
        Ok(body.data)
    }

    /// Log in with email and password. Returns the session token.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<String> {
        let url = self.users_url("login");

        tracing::debug!(url = %url, "Attempting login");

        let response = self
            .http_client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, LOGIN_FALLBACK).await);
        }

        let body: LoginBody = response.json().await?;
        Ok(body.token)
    }

    /// Turn a non-2xx response into a backend error, extracting the
    /// structured message when one is present.
    async fn rejection(response: reqwest::Response, fallback: &str) -> AuthError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "Auth request rejected");

        let message = serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(|b| b.message);
        AuthError::Backend(message.unwrap_or_else(|| fallback.to_string()))
    }
}
