use super::{require_text, Validate};
use crate::error::Error;
use chrono::{DateTime, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};
use utils::QueryParams;

const MAX_TITLE_LEN: usize = 200;
const MAX_STORY_POINTS: u32 = 100;

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
pub enum BacklogStatus {
    #[default]
    Todo,
    InProgress,
    InReview,
    Done,
    Cancelled,
}

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
pub enum BacklogPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

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
pub enum BacklogType {
    Epic,
    #[default]
    Story,
    Task,
    Bug,
}

/// A backlog item (epic, story, task or bug)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct Backlog {
    id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: BacklogStatus,
    #[serde(default)]
    priority: BacklogPriority,
    #[serde(default, alias = "itemType")]
    item_type: BacklogType,
    #[serde(default, alias = "storyPoint", alias = "story_points")]
    story_point: Option<u32>,
    #[serde(default, alias = "projectId")]
    project_id: Option<i64>,
    #[serde(default, alias = "sprintId")]
    sprint_id: Option<i64>,
    #[serde(default, alias = "parentId")]
    parent_id: Option<i64>,
    #[serde(default, alias = "assignedToId")]
    assigned_to_id: Option<i64>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklogCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: BacklogStatus,
    pub priority: BacklogPriority,
    pub item_type: BacklogType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_point: Option<u32>,
    /// Falls back to the session's project when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BacklogCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Validate for BacklogCreate {
    fn validate(&self) -> Result<(), Error> {
        require_text("title", &self.title, MAX_TITLE_LEN)?;
        validate_story_point(self.story_point)?;
        if self.project_id.is_none() {
            return Err(Error::validation("project_id is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BacklogStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<BacklogPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<BacklogType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_point: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Validate for BacklogUpdate {
    fn validate(&self) -> Result<(), Error> {
        if *self == BacklogUpdate::default() {
            return Err(Error::validation("Backlog update has no fields to change"));
        }
        if let Some(title) = &self.title {
            require_text("title", title, MAX_TITLE_LEN)?;
        }
        validate_story_point(self.story_point)
    }
}

fn validate_story_point(story_point: Option<u32>) -> Result<(), Error> {
    match story_point {
        Some(points) if points > MAX_STORY_POINTS => Err(Error::validation(format!(
            "story_point must be at most {}",
            MAX_STORY_POINTS
        ))),
        _ => Ok(()),
    }
}

/// Filters for listing backlog items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacklogFilter {
    pub project_id: Option<i64>,
    pub status: Option<BacklogStatus>,
    pub priority: Option<BacklogPriority>,
    pub item_type: Option<BacklogType>,
    pub sprint_id: Option<i64>,
    pub search: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl BacklogFilter {
    pub(crate) fn to_query(&self, default_project: Option<i64>) -> QueryParams {
        QueryParams::new()
            .with_opt("project_id", self.project_id.or(default_project))
            .with_opt("status", self.status)
            .with_opt("priority", self.priority)
            .with_opt("item_type", self.item_type)
            .with_opt("sprint_id", self.sprint_id)
            .with_opt("search", self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()))
            .with_opt("skip", self.skip)
            .with_opt("limit", self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backlog_accepts_camel_case() {
        let item: Backlog = serde_json::from_value(json!({
            "id": 12,
            "title": "Login page",
            "status": "in_progress",
            "itemType": "task",
            "storyPoint": 5,
            "projectId": 3,
            "sprintId": null
        }))
        .unwrap();

        assert_eq!(*item.status(), BacklogStatus::InProgress);
        assert_eq!(*item.item_type(), BacklogType::Task);
        assert_eq!(*item.story_point(), Some(5));
        assert_eq!(*item.project_id(), Some(3));
        assert_eq!(*item.priority(), BacklogPriority::Medium);
    }

    #[test]
    fn test_create_validation() {
        let mut create = BacklogCreate::new("  ");
        create.project_id = Some(1);
        assert_eq!(create.validate().unwrap_err().message(), "title must not be empty");

        create.title = "Checkout flow".to_string();
        create.story_point = Some(500);
        assert!(create.validate().is_err());

        create.story_point = Some(8);
        assert!(create.validate().is_ok());

        create.project_id = None;
        assert!(create.validate().is_err());
    }

    #[test]
    fn test_filter_query() {
        let filter = BacklogFilter {
            status: Some(BacklogStatus::InReview),
            search: Some("  ".to_string()),
            limit: Some(20),
            ..Default::default()
        };

        assert_eq!(filter.to_query(Some(9)).canonical(), "limit=20&project_id=9&status=in_review");
    }
}
