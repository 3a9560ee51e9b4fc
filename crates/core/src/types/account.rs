//! Admin and shopper profile records.
//!
//! The backend answers login and profile calls with a user object. A record
//! counts as authenticated only when it carries an `_id`; anything else is
//! treated as "no session".

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{AdminId, UserId};

/// Raw profile payload where every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<Email>,
}

impl ProfileResponse {
    fn into_parts(self) -> Option<(String, String, Email)> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let email = self.email.unwrap_or_else(|| Email::parse_unchecked(""));
        Some((id, self.name.unwrap_or_default(), email))
    }

    /// Convert into an admin session record when `_id` is present.
    #[must_use]
    pub fn into_admin(self) -> Option<AdminProfile> {
        self.into_parts().map(|(id, name, email)| AdminProfile {
            id: AdminId::new(id),
            name,
            email,
        })
    }

    /// Convert into a shopper session record when `_id` is present.
    #[must_use]
    pub fn into_shopper(self) -> Option<ShopperProfile> {
        self.into_parts().map(|(id, name, email)| ShopperProfile {
            id: UserId::new(id),
            name,
            email,
        })
    }
}

/// Shopper login payload: either the bare user or `{ "user": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Wrapped { user: ProfileResponse },
    Bare(ProfileResponse),
}

impl LoginResponse {
    /// The user carried by the response, however it was wrapped.
    #[must_use]
    pub fn into_profile(self) -> ProfileResponse {
        match self {
            Self::Wrapped { user } => user,
            Self::Bare(profile) => profile,
        }
    }
}

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(rename = "_id")]
    pub id: AdminId,
    pub name: String,
    pub email: Email,
}

/// Session-stored shopper identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopperProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

impl ShopperProfile {
    /// Name to greet the shopper with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.email.as_str()
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_profile_with_id_becomes_admin() {
        let raw: ProfileResponse = serde_json::from_value(json!({
            "_id": "a1", "name": "Root", "email": "root@ark.shop", "role": "admin"
        }))
        .unwrap();
        let admin = raw.into_admin().unwrap();
        assert_eq!(admin.id.as_str(), "a1");
        assert_eq!(admin.email.as_str(), "root@ark.shop");
    }

    #[test]
    fn test_profile_without_id_is_rejected() {
        let raw: ProfileResponse =
            serde_json::from_value(json!({ "message": "Not authorized" })).unwrap();
        assert!(raw.into_admin().is_none());

        let raw: ProfileResponse = serde_json::from_value(json!({ "_id": "" })).unwrap();
        assert!(raw.into_shopper().is_none());
    }

    #[test]
    fn test_login_response_accepts_both_shapes() {
        let bare: LoginResponse =
            serde_json::from_value(json!({ "_id": "u1", "email": "a@b.c" })).unwrap();
        assert_eq!(bare.into_profile().id.as_deref(), Some("u1"));

        let wrapped: LoginResponse = serde_json::from_value(json!({
            "user": { "_id": "u2", "name": "Kim", "email": "kim@b.c" },
            "message": "Login successful"
        }))
        .unwrap();
        let shopper = wrapped.into_profile().into_shopper().unwrap();
        assert_eq!(shopper.display_name(), "Kim");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let shopper = ShopperProfile {
            id: UserId::new("u1"),
            name: String::new(),
            email: Email::parse("kim@b.c").unwrap(),
        };
        assert_eq!(shopper.display_name(), "kim@b.c");
    }
}
