//! In-memory session state shared between the auth flows and navigation.

use std::sync::Mutex;

/// The authenticated identity and credential held after a successful
/// login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session token issued by the backend
    pub credential: String,
    /// Email the session belongs to
    pub identity: String,
}

/// Callback invoked with the new presence whenever the session is set or
/// cleared.
pub type PresenceCallback = Box<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct StoreState {
    session: Option<Session>,
    loading: bool,
    last_error: Option<String>,
}

/// Holds the current session plus transient loading/error flags.
///
/// The auth flow controller is the single writer. The navigation router
/// observes presence through the registered callback, which is invoked
/// synchronously after the state lock is released.
#[derive(Default)]
pub struct SessionStore {
    state: Mutex<StoreState>,
    observer: Mutex<Option<PresenceCallback>>,
}

impl SessionStore {
    /// Create an empty store (unauthenticated, not loading, no error).
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, if any. Presence means "authenticated".
    pub fn session(&self) -> Option<Session> {
        self.state.lock().unwrap().session.clone()
    }

    /// Whether an auth operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// Message from the last failed operation, absent after a success.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().last_error.clone()
    }

    /// Register the presence observer. Single slot; a later call replaces
    /// the previous observer.
    pub fn set_observer(&self, callback: PresenceCallback) {
        let mut observer = self.observer.lock().unwrap();
        *observer = Some(callback);
    }

    /// Replace the current session and notify the observer.
    pub fn set_session(&self, session: Session) {
        {
            let mut state = self.state.lock().unwrap();
            state.session = Some(session);
        }
        self.notify(true);
    }

    /// Remove the current session and notify the observer. Idempotent.
    pub fn clear_session(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.session = None;
        }
        self.notify(false);
    }

    /// Begin an attempt: returns false when one is already in flight,
    /// otherwise clears the previous error and marks loading.
    pub(crate) fn begin_attempt(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.loading {
            return false;
        }
        state.loading = true;
        state.last_error = None;
        true
    }

    /// Finish the in-flight attempt successfully.
    pub(crate) fn finish_attempt(&self) {
        let mut state = self.state.lock().unwrap();
        state.loading = false;
    }

    /// Finish the in-flight attempt with a user-facing error message.
    pub(crate) fn fail_attempt(&self, message: String) {
        let mut state = self.state.lock().unwrap();
        state.loading = false;
        state.last_error = Some(message);
    }

    fn notify(&self, present: bool) {
        let observer = self.observer.lock().unwrap();
        if let Some(callback) = observer.as_ref() {
            callback(present);
        }
    }
}
