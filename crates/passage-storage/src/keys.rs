//! Storage key constants.

/// Storage keys used by the credential store
pub struct StorageKeys;

impl StorageKeys {
    /// Bare session token
    pub const USER_TOKEN: &'static str = "userToken";

    /// Pending registration form data (JSON)
    pub const USER_DETAILS: &'static str = "userDetails";

    /// Session identity record (JSON)
    pub const USER: &'static str = "user";
}
