use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::{double_option, require_text};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum CourseKind {
    #[default]
    Programming,
    SoftwareDevelopment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub code: i64,
    pub name: String,
    pub credits: i64,
    pub kind: CourseKind,
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub code: i64,
    pub name: String,
    pub credits: i64,
    #[serde(default)]
    pub kind: CourseKind,
    #[serde(default)]
    pub schedule: Option<String>,
}

impl NewCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)
    }
}

/// Partial course payload. `schedule: null` clears the schedule, an absent
/// `schedule` leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub credits: Option<i64>,
    pub kind: Option<CourseKind>,
    #[serde(default, deserialize_with = "double_option")]
    pub schedule: Option<Option<String>>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        Ok(())
    }

    pub fn apply_to(self, course: &mut Course) {
        if let Some(code) = self.code {
            course.code = code;
        }
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(credits) = self.credits {
            course.credits = credits;
        }
        if let Some(kind) = self.kind {
            course.kind = kind;
        }
        if let Some(schedule) = self.schedule {
            course.schedule = schedule;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilter {
    #[serde(rename = "credito")]
    pub credits: Option<i64>,
    #[serde(rename = "codigo")]
    pub code: Option<i64>,
}
