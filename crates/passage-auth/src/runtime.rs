//! Assembly of the auth stack for a hosting runtime.

use crate::client::BackendClient;
use crate::error::AuthResult;
use crate::flow::AuthFlow;
use crate::nav::NavigationRouter;
use crate::store::SessionStore;
use passage_core::{Config, Paths};
use std::sync::Arc;

/// The wired-up auth stack: flow controller, session store, and router.
///
/// The hosting UI runtime builds one of these at startup, hands the flow
/// controller to its screens, and renders whichever subtree the router
/// selects.
pub struct AuthRuntime {
    /// Flow controller driven by the screens.
    pub flow: Arc<AuthFlow>,
    /// Shared session state.
    pub store: Arc<SessionStore>,
    /// Navigation projection of the session state.
    pub router: Arc<NavigationRouter>,
}

impl AuthRuntime {
    /// Wire the auth stack together and restore any persisted session.
    pub fn initialize(config: &Config, paths: &Paths) -> AuthResult<Self> {
        paths.ensure_dirs()?;

        let base_url = config.api_base_url()?;
        let credentials = passage_storage::create_credential_store(paths.credentials_file())?;

        let store = Arc::new(SessionStore::new());
        let router = NavigationRouter::attach(&store);
        let flow = Arc::new(AuthFlow::new(
            BackendClient::new(base_url.as_str()),
            Arc::clone(&store),
            credentials,
        ));

        if flow.restore_session()? {
            tracing::info!("Restored persisted session on startup");
        }

        Ok(Self {
            flow,
            store,
            router,
        })
    }
}
