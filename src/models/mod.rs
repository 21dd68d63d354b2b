pub mod course;
pub mod student;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

pub use course::{Course, CourseFilter, CourseKind, NewCourseRequest, UpdateCourseRequest};
pub use student::{
    Enrollment, NewStudentRequest, Student, StudentCourse, StudentFilter, UpdateStudentRequest,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// Present-but-null becomes Some(None); absence is handled by #[serde(default)].
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
