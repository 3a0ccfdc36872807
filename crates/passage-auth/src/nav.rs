//! Navigation state machine driven by session presence.
//!
//! The router selects between the authenticated and unauthenticated screen
//! subtrees. It holds no state of its own beyond the machine position and
//! is a pure projection of the session store's presence signal.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐  SessionEstablished   ┌─────────────────┐
//! │ Unauthenticated │ ────────────────────► │  Authenticated  │
//! │    (initial)    │ ◄──────────────────── │                 │
//! └─────────────────┘    SessionCleared     └─────────────────┘
//! ```

use crate::store::SessionStore;
use rust_fsm::*;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `nav_machine` with:
// - nav_machine::State (enum)
// - nav_machine::Input (enum)
// - nav_machine::StateMachine (type alias)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub nav_machine(Unauthenticated)

    Unauthenticated => {
        SessionEstablished => Authenticated
    },
    Authenticated => {
        SessionCleared => Unauthenticated
    }
}

// Re-export the generated types with clearer names
pub use nav_machine::Input as NavInput;
pub use nav_machine::State as NavState;
pub use nav_machine::StateMachine as NavMachine;

/// Screen subtree selected by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Main screens, shown while a session is present.
    Authenticated,
    /// Login/signup screens, shown while no session is present.
    Unauthenticated,
}

impl Route {
    /// Returns true for the authenticated subtree.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Route::Authenticated)
    }
}

impl From<&NavState> for Route {
    fn from(state: &NavState) -> Self {
        match state {
            NavState::Authenticated => Route::Authenticated,
            NavState::Unauthenticated => Route::Unauthenticated,
        }
    }
}

/// Projects session presence onto the two navigation subtrees.
pub struct NavigationRouter {
    fsm: Mutex<NavMachine>,
}

impl NavigationRouter {
    /// Create a router in the initial (unauthenticated) position.
    pub fn new() -> Self {
        Self {
            fsm: Mutex::new(NavMachine::new()),
        }
    }

    /// Create a router and register it as the store's presence observer.
    pub fn attach(store: &SessionStore) -> Arc<Self> {
        let router = Arc::new(Self::new());
        let observer = Arc::clone(&router);
        store.set_observer(Box::new(move |present| observer.observe_presence(present)));
        router
    }

    /// Route currently selected.
    pub fn current_route(&self) -> Route {
        let fsm = self.fsm.lock().unwrap();
        Route::from(fsm.state())
    }

    /// Feed a presence report into the machine.
    ///
    /// A report matching the current route leaves the machine untouched, so
    /// redundant store notifications never produce extra transitions.
    pub fn observe_presence(&self, present: bool) {
        let mut fsm = self.fsm.lock().unwrap();
        let input = match (fsm.state(), present) {
            (NavState::Unauthenticated, true) => NavInput::SessionEstablished,
            (NavState::Authenticated, false) => NavInput::SessionCleared,
            _ => return,
        };
        let _ = fsm.consume(&input);
        tracing::debug!(route = ?Route::from(fsm.state()), "Navigation route changed");
    }
}

impl Default for NavigationRouter {
    fn default() -> Self {
        Self::new()
    }
}
