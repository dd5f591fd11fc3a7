use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::{Date, macros::format_description};
use validator::{Validate, ValidationError};

use crate::plan::{Assignment, TaskFrequency};

/// Accepts calendar dates written as `yyyy-mm-dd` only.
fn validate_start_date(value: &str) -> Result<(), ValidationError> {
    let format = format_description!("[year]-[month]-[day]");

    if value.len() != 10 || Date::parse(value, &format).is_err() {
        return Err(ValidationError::new("start_date")
            .with_message(format!("{value} is not a valid yyyy-mm-dd date").into()));
    }

    Ok(())
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[validate(range(min = 1, max = 31))]
    pub duration_days: u8,
    #[validate(custom(function = "validate_start_date"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub plan_id: String,
    pub assignments: Vec<Assignment>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub success: bool,
    #[serde(default)]
    pub assignments_created: u32,
}

#[derive(
    Serialize, Deserialize, EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PatchAction {
    Add,
    Remove,
    Reassign,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPatch {
    pub action: PatchAction,
    pub task_name: String,
    pub member_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_member_id: Option<String>,
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub frequency: TaskFrequency,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTask {
    pub id: String,
    pub name: String,
}
