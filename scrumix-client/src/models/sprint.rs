use super::{require_text, Validate};
use crate::error::Error;
use chrono::{DateTime, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};
use utils::QueryParams;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SprintStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct Sprint {
    id: i64,
    #[serde(alias = "sprintName", alias = "name")]
    sprint_name: String,
    #[serde(default, alias = "sprintGoal")]
    sprint_goal: Option<String>,
    #[serde(alias = "startDate")]
    start_date: DateTime<Utc>,
    #[serde(alias = "endDate")]
    end_date: DateTime<Utc>,
    #[serde(default)]
    status: SprintStatus,
    #[serde(default, alias = "sprintCapacity")]
    sprint_capacity: Option<u32>,
    #[serde(default, alias = "projectId")]
    project_id: Option<i64>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl Sprint {
    pub fn is_active(&self) -> bool {
        self.status == SprintStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintCreate {
    pub sprint_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_goal: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: SprintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_capacity: Option<u32>,
    /// Falls back to the session's project when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

impl SprintCreate {
    pub fn new(
        sprint_name: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            sprint_name: sprint_name.into(),
            sprint_goal: None,
            start_date,
            end_date,
            status: SprintStatus::Planning,
            sprint_capacity: None,
            project_id: None,
        }
    }
}

impl Validate for SprintCreate {
    fn validate(&self) -> Result<(), Error> {
        require_text("sprint_name", &self.sprint_name, 100)?;
        validate_dates(Some(self.start_date), Some(self.end_date))?;
        if self.project_id.is_none() {
            return Err(Error::validation("project_id is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SprintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SprintStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_capacity: Option<u32>,
}

impl Validate for SprintUpdate {
    fn validate(&self) -> Result<(), Error> {
        if *self == SprintUpdate::default() {
            return Err(Error::validation("Sprint update has no fields to change"));
        }
        if let Some(name) = &self.sprint_name {
            require_text("sprint_name", name, 100)?;
        }
        validate_dates(self.start_date, self.end_date)
    }
}

fn validate_dates(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<(), Error> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => {
            Err(Error::validation("end_date must be after start_date"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SprintFilter {
    pub project_id: Option<i64>,
    pub status: Option<SprintStatus>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl SprintFilter {
    pub(crate) fn to_query(&self, default_project: Option<i64>) -> QueryParams {
        QueryParams::new()
            .with_opt("project_id", self.project_id.or(default_project))
            .with_opt("status", self.status)
            .with_opt("skip", self.skip)
            .with_opt("limit", self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_sprint_aliases() {
        let sprint: Sprint = serde_json::from_value(json!({
            "id": 4,
            "sprintName": "Sprint 4",
            "startDate": "2026-10-01T00:00:00Z",
            "endDate": "2026-10-15T00:00:00Z",
            "status": "active"
        }))
        .unwrap();

        assert_eq!(sprint.sprint_name(), "Sprint 4");
        assert!(sprint.is_active());
    }

    #[test]
    fn test_dates_must_be_ordered() {
        let start = Utc::now();
        let mut create = SprintCreate::new("Sprint 1", start, start - Duration::days(1));
        create.project_id = Some(1);
        assert_eq!(create.validate().unwrap_err().message(), "end_date must be after start_date");

        create.end_date = start + Duration::days(14);
        assert!(create.validate().is_ok());
    }
}
