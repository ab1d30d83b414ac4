//! Registered user model (read-only login directory)

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::repository::Record;

/// Role stored in the session for users without an explicit role
pub const DEFAULT_ROLE: &str = "Staff";

/// Role that unlocks the admin dashboard
pub const ADMIN_ROLE: &str = "Admin";

/// Registered identity used for login lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    /// External lookup key; numeric ids in the document are read as strings
    #[serde(deserialize_with = "string_or_number")]
    pub student_id: String,
    #[serde(default = "default_role")]
    pub role: String,
}

impl Record for User {
    fn id(&self) -> i64 {
        self.id
    }
}

impl User {
    /// Case-insensitive, whitespace-tolerant student id comparison
    pub fn matches_student_id(&self, student_id: &str) -> bool {
        normalize_student_id(&self.student_id) == normalize_student_id(student_id)
    }
}

pub fn normalize_student_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

/// Login form
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub student_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_defaults_to_staff() {
        let user: User = serde_json::from_value(json!({"id": 1, "student_id": "2021-0001"})).unwrap();
        assert_eq!(user.role, DEFAULT_ROLE);
    }

    #[test]
    fn test_numeric_student_id() {
        let user: User =
            serde_json::from_value(json!({"id": 2, "student_id": 20210002, "role": "Admin"})).unwrap();
        assert_eq!(user.student_id, "20210002");
        assert!(user.matches_student_id("20210002"));
        assert_eq!(user.role, ADMIN_ROLE);
    }

    #[test]
    fn test_matching_is_case_normalized() {
        let user: User = serde_json::from_value(json!({"id": 3, "student_id": "ab-123"})).unwrap();
        assert!(user.matches_student_id(" AB-123 "));
        assert!(!user.matches_student_id("ab-124"));
    }
}
