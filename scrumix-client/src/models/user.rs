use super::{require_text, Validate};
use crate::error::Error;
use chrono::{DateTime, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct User {
    id: i64,
    email: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default, alias = "fullName")]
    full_name: Option<String>,
    #[serde(default, alias = "avatarUrl")]
    avatar_url: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), Error> {
        if *self == ProfileUpdate::default() {
            return Err(Error::validation("Profile update has no fields to change"));
        }
        if let Some(username) = &self.username {
            require_text("username", username, 50)?;
        }
        if let Some(full_name) = &self.full_name {
            require_text("full_name", full_name, 100)?;
        }
        Ok(())
    }
}
