//! Auth flow orchestration: login, signup with OTP verification, logout.

use crate::client::{BackendClient, LOGIN_FALLBACK, REGISTER_FALLBACK, SEND_OTP_FALLBACK};
use crate::error::{AuthError, AuthResult};
use crate::forms::{LoginCredentials, OtpInput, RegistrationForm};
use crate::store::{Session, SessionStore};
use garde::Validate;
use passage_storage::{CredentialStore, SessionRecord};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Orchestrates the authentication sequences.
///
/// Every operation follows the same shape: reject when another attempt is
/// in flight, clear the previous error and mark loading, validate locally,
/// call the backend, then either mutate the session store or record a
/// user-facing error message. The controller is the only writer of the
/// session store; in-memory state is authoritative, persistence failures
/// are logged and never override it.
pub struct AuthFlow {
    client: BackendClient,
    store: Arc<SessionStore>,
    credentials: CredentialStore,
    /// Registration form held between "send OTP" and "verify OTP".
    pending: Mutex<Option<RegistrationForm>>,
}

impl AuthFlow {
    /// Create a new auth flow controller.
    pub fn new(
        client: BackendClient,
        store: Arc<SessionStore>,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            client,
            store,
            credentials,
            pending: Mutex::new(None),
        }
    }

    /// The session store this controller writes to.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Rehydrate the in-memory session from the credential store.
    ///
    /// Called once at startup for session continuity across restarts.
    /// Purely local: a stored session is trusted until explicit logout.
    /// Returns whether a session was restored.
    pub fn restore_session(&self) -> AuthResult<bool> {
        match self.credentials.get_session()? {
            Some(record) => {
                debug!(email = %record.email, "Restoring persisted session");
                self.store.set_session(Session {
                    credential: record.token,
                    identity: record.email,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Log in with email and password.
    ///
    /// On success the returned token plus the submitted email become the
    /// new session. On failure the backend's message (or a generic
    /// "Invalid credentials") is recorded on the store.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<()> {
        if !self.store.begin_attempt() {
            return Err(AuthError::Busy);
        }

        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(report) = credentials.validate() {
            return Err(self.fail(AuthError::Validation(report.to_string()), LOGIN_FALLBACK));
        }

        match self.client.login(email, password).await {
            Ok(token) => {
                self.persist_session(&token, email);
                self.store.set_session(Session {
                    credential: token,
                    identity: email.to_string(),
                });
                self.store.finish_attempt();
                info!(email = %email, "Login successful");
                Ok(())
            }
            Err(e) => Err(self.fail(e, LOGIN_FALLBACK)),
        }
    }

    /// Request an OTP for the given registration form.
    ///
    /// On success the form is held as the pending registration (in memory
    /// and in the credential store) and the backend's confirmation message
    /// is returned so the caller can advance to the verification step.
    pub async fn request_otp(&self, form: RegistrationForm) -> AuthResult<String> {
        if !self.store.begin_attempt() {
            return Err(AuthError::Busy);
        }

        if let Err(report) = form.validate() {
            return Err(self.fail(AuthError::Validation(report.to_string()), SEND_OTP_FALLBACK));
        }

        match self.client.send_otp(&form.email).await {
            Ok(message) => {
                if let Err(e) = self.credentials.set_pending_registration(&(&form).into()) {
                    // The in-memory copy still serves this run; only
                    // restart continuity is lost.
                    warn!("Failed to persist pending registration: {}", e);
                }
                *self.pending.lock().unwrap() = Some(form);
                self.store.finish_attempt();
                info!("OTP requested");
                Ok(message)
            }
            Err(e) => Err(self.fail(e, SEND_OTP_FALLBACK)),
        }
    }

    /// Verify the OTP and complete registration.
    ///
    /// Requires a pending registration from [`request_otp`]; fails without
    /// contacting the backend otherwise. On success the returned identity
    /// becomes the new session and the pending registration is discarded;
    /// on failure it is retained so the user can retry.
    ///
    /// [`request_otp`]: AuthFlow::request_otp
    pub async fn verify_otp_and_register(&self, otp: &str) -> AuthResult<()> {
        if !self.store.begin_attempt() {
            return Err(AuthError::Busy);
        }

        let input = OtpInput {
            code: otp.to_string(),
        };
        if let Err(report) = input.validate() {
            return Err(self.fail(AuthError::Validation(report.to_string()), REGISTER_FALLBACK));
        }

        let Some(form) = self.pending_form() else {
            return Err(self.fail(
                AuthError::State("No pending registration. Request an OTP first.".to_string()),
                REGISTER_FALLBACK,
            ));
        };

        match self.client.register(&form, otp).await {
            Ok(user) => {
                *self.pending.lock().unwrap() = None;
                if let Err(e) = self.credentials.clear_pending_registration() {
                    warn!("Failed to clear stored registration: {}", e);
                }
                self.persist_session(&user.token, &user.email);
                self.store.set_session(Session {
                    credential: user.token,
                    identity: user.email,
                });
                self.store.finish_attempt();
                info!("Registration verified");
                Ok(())
            }
            // The pending registration stays so the user can retry.
            Err(e) => Err(self.fail(e, REGISTER_FALLBACK)),
        }
    }

    /// Check whether a registration is awaiting verification.
    pub fn has_pending_registration(&self) -> bool {
        self.pending_form().is_some()
    }

    /// Log out.
    ///
    /// The in-memory session (and any pending registration) clears
    /// unconditionally; a storage failure is reported to the caller but
    /// never blocks the logout.
    pub fn logout(&self) -> AuthResult<()> {
        self.store.clear_session();
        *self.pending.lock().unwrap() = None;

        match self.credentials.clear_session() {
            Ok(()) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!("Failed to clear stored credentials on logout: {}", e);
                Err(AuthError::Storage(e))
            }
        }
    }

    /// The pending form, preferring the in-memory copy and falling back to
    /// the persisted one so a restart between the two signup steps doesn't
    /// strand the user.
    fn pending_form(&self) -> Option<RegistrationForm> {
        if let Some(form) = self.pending.lock().unwrap().clone() {
            return Some(form);
        }
        match self.credentials.get_pending_registration() {
            Ok(Some(record)) => Some(record.into()),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read stored registration: {}", e);
                None
            }
        }
    }

    fn persist_session(&self, token: &str, email: &str) {
        let record = SessionRecord {
            token: token.to_string(),
            email: email.to_string(),
        };
        if let Err(e) = self.credentials.set_session(&record) {
            warn!("Failed to persist session: {}", e);
        }
    }

    /// Record a failure on the store and hand the error back to the caller.
    fn fail(&self, error: AuthError, fallback: &str) -> AuthError {
        let message = error.user_message(fallback);
        warn!(error = %error, "Auth operation failed");
        self.store.fail_attempt(message);
        error
    }
}
