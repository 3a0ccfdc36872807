//! Authentication core for the Passage app.
//!
//! This crate provides:
//! - A backend client for the OTP/login wire contract
//! - An observable in-memory session store
//! - The auth flow controller (login, signup with OTP, logout)
//! - A two-state navigation router projected from session presence

mod client;
mod error;
mod flow;
mod forms;
mod nav;
mod runtime;
mod store;

pub use client::{
    BackendClient, RegisteredUser, LOGIN_FALLBACK, REGISTER_FALLBACK, SEND_OTP_FALLBACK,
};
pub use error::{AuthError, AuthResult};
pub use flow::AuthFlow;
pub use forms::{LoginCredentials, OtpInput, RegistrationForm};
pub use nav::nav_machine;
pub use nav::{NavInput, NavMachine, NavState, NavigationRouter, Route};
pub use runtime::AuthRuntime;
pub use store::{PresenceCallback, Session, SessionStore};
