//! User model
//!
//! Demo users: administrators, parents and children. A child points at its
//! parent through `parent_id`; `children` is filled in by lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three roles of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Parent,
    Child,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Parent => "parent",
            UserRole::Child => "child",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "parent" => Ok(UserRole::Parent),
            "child" => Ok(UserRole::Child),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public view of a user (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

/// A user together with its stored credential
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let user = User {
            id: "1".to_string(),
            username: "admin".to_string(),
            role: UserRole::Admin,
            name: "Admin User".to_string(),
            email: None,
            age: None,
            school: None,
            grade: None,
            parent_id: None,
            children: vec![],
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("parentId").is_none());
        assert!(json.get("children").is_none());
    }
}
