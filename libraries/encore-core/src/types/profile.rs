//! User profile types

use crate::error::{EncoreError, Result};
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// A user's public profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Whether there is anything to send
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.display_name.is_none()
            && self.avatar_url.is_none()
            && self.bio.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(EncoreError::validation("profile", "nothing to update"));
        }

        if let Some(username) = &self.username {
            let len = username.chars().count();
            if !(3..=30).contains(&len) {
                return Err(EncoreError::validation(
                    "username",
                    "must be between 3 and 30 characters",
                ));
            }
            if !username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(EncoreError::validation(
                    "username",
                    "only letters, digits and underscores are allowed",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_username(name: &str) -> ProfileUpdate {
        ProfileUpdate {
            username: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn username_rules() {
        assert!(with_username("dj_nova").validate().is_ok());
        assert!(with_username("ab").validate().is_err());
        assert!(with_username("has space").validate().is_err());
        assert!(with_username(&"a".repeat(31)).validate().is_err());
    }

    #[test]
    fn empty_update_rejected() {
        assert!(ProfileUpdate::default().validate().is_err());
    }

    #[test]
    fn bio_only_update_is_valid() {
        let update = ProfileUpdate {
            bio: Some("lofi beats".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "bio": "lofi beats" }));
    }
}
