use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::err::Error;

pub const MAX_SCORE: i32 = 100;
pub const MAX_USERNAME_LEN: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub role_id: i32,
    pub class_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i32,
    pub username: String,
    pub name: String,
}

/// A row of any table that is just an id and a unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Named {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lab {
    pub id: i32,
    pub name: String,
    pub course_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Score {
    pub id: i32,
    pub user_id: i32,
    pub lab_id: i32,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Score of one student for one lab, as read for reports.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SubmittedScore {
    pub user_id: i32,
    pub lab_id: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role_id: i32,
    #[serde(default)]
    pub class_id: i32,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty()
            || self.username.is_empty()
            || self.password.is_empty()
            || self.role_id == 0
            || self.class_id == 0
        {
            return Err(Error::empty(
                "username, password, name, role_id and class_id cannot be empty",
            ));
        }
        check_username(&self.username)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role_id: Option<i32>,
    pub class_id: Option<i32>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), Error> {
        let blank = [&self.username, &self.password, &self.name]
            .into_iter()
            .any(|field| matches!(field, Some(value) if value.is_empty()));
        if blank || self.role_id == Some(0) || self.class_id == Some(0) {
            return Err(Error::empty("updated fields cannot be empty"));
        }
        match &self.username {
            Some(username) => check_username(username),
            None => Ok(()),
        }
    }
}

fn check_username(username: &str) -> Result<(), Error> {
    let valid = username.len() <= MAX_USERNAME_LEN
        && username.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidPayload {
            message: format!(
                "username must contain only alphanumeric characters (at most {})",
                MAX_USERNAME_LEN
            ),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamePayload {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLab {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub course_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLab {
    pub name: Option<String>,
    pub course_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScorePush {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub lab: String,
    pub score: i64,
}

impl ScorePush {
    /// Shape checks that run before the store is touched. Yields the score
    /// narrowed to the column type.
    pub fn validate(&self) -> Result<i32, Error> {
        if self.username.is_empty() || self.lab.is_empty() {
            return Err(Error::empty("username and lab cannot be empty"));
        }
        match i32::try_from(self.score) {
            Ok(score) if (0..=MAX_SCORE).contains(&score) => Ok(score),
            _ => Err(Error::ScoreOutOfRange {
                message: format!("score must be between 0 and {}", MAX_SCORE),
            }),
        }
    }
}

/// What a score push did to the stored best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreOutcome {
    Created,
    Updated,
    Kept,
}

impl ScoreOutcome {
    /// Reads the `RETURNING (xmax = 0)` column of the merging upsert: no row
    /// means the conditional update was skipped.
    pub fn from_upsert(inserted: Option<bool>) -> Self {
        match inserted {
            Some(true) => ScoreOutcome::Created,
            Some(false) => ScoreOutcome::Updated,
            None => ScoreOutcome::Kept,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabScore {
    pub lab_name: String,
    pub score: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportScore {
    pub lab_name: String,
    pub score: i32,
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<ReportScore>,
    pub average: f64,
    pub total: i64,
}
