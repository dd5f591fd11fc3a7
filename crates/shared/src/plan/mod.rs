use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Duration, OffsetDateTime};

use crate::AssignmentKey;

pub const MANUAL_ADD_REASON: &str = "added manually";
pub const MANUAL_REASSIGN_REASON: &str = "reassigned manually";

#[derive(
    Serialize,
    Deserialize,
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MemberType {
    #[default]
    Adult,
    Teen,
    Child,
}

#[derive(
    Serialize,
    Deserialize,
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PlanStatus {
    #[default]
    Pending,
    Applied,
}

#[derive(
    Serialize,
    Deserialize,
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TaskFrequency {
    Daily,
    #[default]
    Weekly,
    Biweekly,
    Monthly,
    Once,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub member_type: MemberType,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub task_name: String,
    pub member_id: String,
    pub member_name: String,
    pub member_type: MemberType,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl Assignment {
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey::new(
            &self.task_name,
            &self.member_id,
            self.day_of_week,
            self.start_time.as_deref(),
        )
    }

    /// A `start_time` of `None` matches any slot on that day.
    pub fn matches(
        &self,
        task_name: &str,
        member_id: &str,
        day_of_week: Option<u8>,
        start_time: Option<&str>,
    ) -> bool {
        self.task_name == task_name
            && self.member_id == member_id
            && self.day_of_week == day_of_week
            && start_time.is_none_or(|start| self.start_time.as_deref() == Some(start))
    }

    pub fn is_adult(&self) -> bool {
        self.member_type == MemberType::Adult
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedTask {
    pub task_name: String,
    pub frequency: TaskFrequency,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FairnessDetails {
    pub adult_distribution: BTreeMap<String, u32>,
    pub is_symmetric: bool,
    pub max_difference: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub status: PlanStatus,
    pub balance_score: u8,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    pub duration_days: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub excluded_tasks: Vec<ExcludedTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fairness_details: Option<FairnessDetails>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub applied_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Plan {
    pub fn is_pending(&self) -> bool {
        self.status == PlanStatus::Pending
    }

    pub fn is_applied(&self) -> bool {
        self.status == PlanStatus::Applied
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.is_pending() && now >= self.expires_at
    }
}

/// Plan as returned by the preview endpoint, before the client takes
/// ownership of it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreview {
    pub id: String,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub balance_score: u8,
    #[serde(default)]
    pub notes: Vec<String>,
    pub duration_days: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub excluded_tasks: Vec<ExcludedTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fairness_details: Option<FairnessDetails>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl PlanPreview {
    /// Previews always enter the client as pending; the expiry is derived
    /// from the plan window.
    pub fn into_pending(self, now: OffsetDateTime) -> Plan {
        let created_at = self.created_at.unwrap_or(now);

        Plan {
            id: self.id,
            status: PlanStatus::Pending,
            balance_score: self.balance_score.min(100),
            notes: self.notes,
            assignments: self.assignments,
            duration_days: self.duration_days,
            start_date: self.start_date,
            excluded_tasks: self.excluded_tasks,
            fairness_details: self.fairness_details,
            created_at,
            applied_at: None,
            expires_at: created_at + Duration::days(self.duration_days as i64),
        }
    }
}
