use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DatabaseError;

/// Role attached to a principal. The bootstrap account is always `Admin`;
/// `Editor` exists for externally-provisioned accounts with reduced access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            _ => Err(DatabaseError::InvalidEnum {
                field: "role".into(),
                value: s.into(),
            }),
        }
    }
}

/// A stored administrative account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Projection with the credential material stripped.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// User shape returned to clients (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Input for creating an account. The password is plaintext here; the
/// credential service hashes it before anything reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl NewUser {
    /// Field validation mirroring the account schema rules: email present
    /// and plausible, name present, password at least 6 characters.
    /// Returns a field → message map for aggregate error reporting.
    pub fn validate(&self) -> Result<(), BTreeMap<String, String>> {
        let mut details = BTreeMap::new();
        if self.email.trim().is_empty() {
            details.insert("email".into(), "Email is required".into());
        } else if !self.email.contains('@') {
            details.insert("email".into(), "Email must be a valid address".into());
        }
        if self.password.len() < 6 {
            details.insert(
                "password".into(),
                "Password must be at least 6 characters long".into(),
            );
        }
        if self.name.trim().is_empty() {
            details.insert("name".into(), "Name is required".into());
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new_user() -> NewUser {
        NewUser {
            email: "admin@example.com".into(),
            password: "admin123".into(),
            name: "Admin User".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Editor] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn public_projection_drops_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            password_hash: "secret".into(),
            name: "Admin User".into(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let public = user.public();
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "admin@example.com");
    }

    #[test]
    fn valid_user_passes_validation() {
        assert!(valid_new_user().validate().is_ok());
    }

    #[test]
    fn validation_aggregates_all_failures() {
        let user = NewUser {
            email: "".into(),
            password: "abc".into(),
            name: " ".into(),
            role: Role::Admin,
        };
        let details = user.validate().unwrap_err();
        assert_eq!(details.len(), 3);
        assert!(details.contains_key("email"));
        assert!(details.contains_key("password"));
        assert!(details.contains_key("name"));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut user = valid_new_user();
        user.password = "12345".into();
        let details = user.validate().unwrap_err();
        assert_eq!(details.len(), 1);
        assert!(details["password"].contains("6 characters"));
    }
}
