//! Registration form entity posted to the user-register endpoint.

use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Maximum accepted length for the mobile number field
pub const MOBILE_NO_MAX_LEN: usize = 10;

/// Registration details for a new user
///
/// Field names follow the wire contract of the register endpoint, which
/// expects an array containing exactly one of these objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "ServiceNo")]
    pub service_no: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "MobileNo")]
    pub mobile_no: String,

    pub company: String,

    pub role: String,

    pub status: String,

    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "SLocation")]
    pub s_location: String,

    pub password: String,

    pub qr: String,
}

impl Default for Registration {
    fn default() -> Self {
        Self {
            service_no: String::new(),
            name: String::new(),
            mobile_no: String::new(),
            company: String::new(),
            role: "A".to_string(),
            status: "A".to_string(),
            location: "DM".to_string(),
            s_location: String::new(),
            password: String::new(),
            qr: "N".to_string(),
        }
    }
}

impl Registration {
    /// Validates the form before it is posted
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.service_no.trim().is_empty() {
            return Err(AuthError::InvalidRegistration {
                reason: "Service number is required.".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(AuthError::InvalidRegistration {
                reason: "Name is required.".to_string(),
            });
        }
        if self.mobile_no.trim().is_empty() {
            return Err(AuthError::InvalidRegistration {
                reason: "Mobile number is required.".to_string(),
            });
        }
        if self.mobile_no.chars().count() > MOBILE_NO_MAX_LEN {
            return Err(AuthError::InvalidRegistration {
                reason: "Mobile number must be at most 10 characters.".to_string(),
            });
        }
        if self.password.is_empty() {
            return Err(AuthError::InvalidRegistration {
                reason: "Password is required.".to_string(),
            });
        }
        Ok(())
    }
}
