use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::{Course, double_option, require_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub semester: i64,
    pub course_id: Option<i64>,
}

/// Enrollment is exclusive: a student sits in at most one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrollment {
    Unenrolled,
    Enrolled(i64),
}

impl Student {
    pub fn enrollment(&self) -> Enrollment {
        match self.course_id {
            Some(course_id) => Enrollment::Enrolled(course_id),
            None => Enrollment::Unenrolled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub semester: i64,
    #[serde(default)]
    pub course_id: Option<i64>,
}

impl NewStudentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)
    }

    pub fn into_student(self) -> Student {
        Student {
            id: self.id,
            name: self.name,
            email: self.email,
            semester: self.semester,
            course_id: self.course_id,
        }
    }
}

/// Partial student payload. `course_id: null` unenrolls the student; moving an
/// enrolled student to another course is not done here, see
/// `services::students::enroll` and `disenroll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub semester: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub course_id: Option<Option<i64>>,
}

impl UpdateStudentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(email) = &self.email {
            require_text("email", email)?;
        }
        Ok(())
    }

    pub fn apply_to(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(semester) = self.semester {
            student.semester = semester;
        }
        if let Some(course_id) = self.course_id {
            student.course_id = course_id;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    #[serde(rename = "semestre")]
    pub semester: Option<i64>,
}

/// A student together with the course they are enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentCourse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub semester: i64,
    pub course: Course,
}

impl StudentCourse {
    pub fn new(student: Student, course: Course) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
            semester: student.semester,
            course,
        }
    }
}
