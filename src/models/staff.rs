//! Staff roster model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::repository::Record;

/// Staff member who may assist with claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    /// Free-text role label, e.g. "Admin" or "Staff"
    #[serde(default)]
    pub role: String,
    #[schema(value_type = String, example = "2024-03-01T14:05:00")]
    pub date_added: NaiveDateTime,
}

impl Record for Staff {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Staff list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StaffQuery {
    /// Exact role (case-insensitive)
    pub role: Option<String>,
}

/// Create staff request (form encoded)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStaff {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}
