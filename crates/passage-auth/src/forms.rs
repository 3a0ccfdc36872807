//! Validated user input for the auth flows.
//!
//! Validation runs locally, before any network call; a form that fails
//! here is never sent to the backend.

use garde::Validate;
use passage_storage::RegistrationRecord;
use serde::{Deserialize, Serialize};

/// Login input. Both fields must be present; anything stricter is the
/// backend's call.
#[derive(Debug, Clone, Validate)]
pub struct LoginCredentials {
    /// Email address
    #[garde(length(min = 1))]
    pub email: String,
    /// Password
    #[garde(length(min = 1))]
    pub password: String,
}

/// Registration form collected before the OTP is requested.
///
/// Serialized camelCase to match the wire contract and the persisted
/// `userDetails` value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Display name for the new account
    #[garde(length(min = 1))]
    pub full_name: String,
    /// Email the OTP will be sent to
    #[garde(email, custom(address_has_tld))]
    pub email: String,
    /// Optional phone number
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Password for the new account
    #[garde(length(min = 1))]
    pub password: String,
}

/// One-time code entered during verification.
#[derive(Debug, Clone, Validate)]
pub struct OtpInput {
    /// The 6-digit code from the user's email
    #[garde(custom(six_digit_code))]
    pub code: String,
}

// The email rule alone accepts bare hostnames; OTP delivery needs a
// routable local@domain.tld address.
fn address_has_tld(value: &str, _context: &()) -> garde::Result {
    let well_formed = value
        .rsplit_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.ends_with('.')
        });
    if well_formed {
        Ok(())
    } else {
        Err(garde::Error::new("must be a valid email address"))
    }
}

fn six_digit_code(value: &str, _context: &()) -> garde::Result {
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(garde::Error::new("must be a 6-digit numeric code"))
    }
}

impl From<&RegistrationForm> for RegistrationRecord {
    fn from(form: &RegistrationForm) -> Self {
        Self {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            password: form.password.clone(),
        }
    }
}

impl From<RegistrationRecord> for RegistrationForm {
    fn from(record: RegistrationRecord) -> Self {
        Self {
            full_name: record.full_name,
            email: record.email,
            phone: record.phone,
            password: record.password,
        }
    }
}
