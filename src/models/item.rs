//! Found item model and related types

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::datetime::{format_datetime, time_stored, DISPLAY_FORMAT};
use crate::repository::Record;

/// Item lifecycle status. `Unclaimed -> Claimed` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
pub enum ItemStatus {
    #[default]
    Unclaimed,
    Claimed,
}

/// Found item record as stored in `items.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
    #[schema(value_type = String, example = "2024-03-01T14:05:00")]
    pub date_found: NaiveDateTime,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub assisting_staff: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_section: Option<String>,
    /// Already formatted for display, e.g. "March 01, 2024 02:05 PM"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,
    /// ISO-8601 upload time of the proof image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_uploaded_at: Option<String>,
}

impl Record for Item {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Item {
    pub fn is_claimed(&self) -> bool {
        self.status == ItemStatus::Claimed
    }

    /// Category as a comparable string ("" when absent)
    pub fn category_str(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Build the list/detail representation with display-only fields
    pub fn to_view(&self, now: NaiveDateTime) -> ItemView {
        ItemView {
            time_stored: time_stored(self.date_found, now),
            date_found_display: self.date_found.format(DISPLAY_FORMAT).to_string(),
            proof_uploaded_display: self.proof_uploaded_at.as_deref().map(format_datetime),
            item: self.clone(),
        }
    }
}

/// Item with derived display state
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    /// Age since found, e.g. "3 days ago"
    pub time_stored: String,
    pub date_found_display: String,
    pub proof_uploaded_display: Option<String>,
}

/// Item list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ItemQuery {
    /// Substring searched in name and category
    pub q: Option<String>,
    /// Exact category (case-insensitive)
    pub category: Option<String>,
}

/// Fields submitted when creating or editing an item
#[derive(Debug, Clone, Validate, ToSchema)]
pub struct ItemForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: String,
    pub category: Option<String>,
}

/// Claimant details submitted on the claim form
#[derive(Debug, Clone, Validate, ToSchema)]
pub struct ClaimForm {
    /// Assisting staff name, picked from the staff list
    pub staff: String,
    #[validate(length(min = 1, message = "Claimer name is required"))]
    pub claimer_name: String,
    pub college: String,
    pub course: String,
    pub year_section: String,
}

/// Treat missing, null and blank strings alike
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Normalize an optional free-text form value
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
