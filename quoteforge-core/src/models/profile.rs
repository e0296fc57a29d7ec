//! Business profile shown in the quote header.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// The contractor's business identity.
///
/// Every field except the business name and phone is optional; the sync
/// store's profile merge treats empty strings the same as absent fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BusinessProfile {
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Logo image as base64 text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl BusinessProfile {
    pub fn new(business_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Set the logo from base64 text. Returns false (and leaves the prior
    /// logo in place) when the data is not valid base64.
    pub fn set_logo(&mut self, data: impl Into<String>) -> bool {
        let data = data.into();
        if base64::engine::general_purpose::STANDARD.decode(&data).is_ok() {
            self.logo = Some(data);
            true
        } else {
            false
        }
    }

    pub fn clear_logo(&mut self) {
        self.logo = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile() {
        let profile = BusinessProfile::new("Acme", "050-1234567");
        assert_eq!(profile.business_name, "Acme");
        assert_eq!(profile.phone, "050-1234567");
        assert!(profile.logo.is_none());
    }

    #[test]
    fn test_set_logo_valid_base64() {
        let mut profile = BusinessProfile::default();
        let data = base64::engine::general_purpose::STANDARD.encode(b"fake-png-bytes");
        assert!(profile.set_logo(data.clone()));
        assert_eq!(profile.logo, Some(data));
    }

    #[test]
    fn test_set_logo_invalid_base64_rejected() {
        let mut profile = BusinessProfile::default();
        assert!(!profile.set_logo("not valid base64!!!"));
        assert!(profile.logo.is_none());
    }

    #[test]
    fn test_empty_optionals_absent_in_json() {
        let profile = BusinessProfile::new("Acme", "050-1");
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("email").is_none());
        assert!(json.get("logo").is_none());
    }
}
