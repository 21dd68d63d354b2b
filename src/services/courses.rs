use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    Course, CourseFilter, MessageResponse, NewCourseRequest, Student, UpdateCourseRequest,
};

const COURSE_NOT_FOUND: &str = "Course not found";
const DUPLICATE_CODE: &str = "A course with that code already exists";

pub async fn create_course(db: &SqlitePool, req: NewCourseRequest) -> Result<Course, AppError> {
    req.validate()?;
    let mut tx = db.begin().await?;

    if repository::find_course_by_code(&mut *tx, req.code).await?.is_some() {
        warn!(code = req.code, "rejected course with duplicate code");
        return Err(AppError::conflict(DUPLICATE_CODE));
    }

    let course = repository::insert_course(&mut *tx, req).await?;
    tx.commit().await?;

    info!(course_id = course.id, code = course.code, "course created");
    Ok(course)
}

/// Lists courses matching every supplied filter. An empty result is reported
/// as `NotFound`, not as an empty list.
pub async fn list_courses(db: &SqlitePool, filter: CourseFilter) -> Result<Vec<Course>, AppError> {
    let mut tx = db.begin().await?;
    let courses = repository::fetch_courses(&mut *tx, &filter).await?;
    tx.commit().await?;

    if courses.is_empty() {
        return Err(AppError::not_found("No courses match those filters"));
    }
    Ok(courses)
}

pub async fn get_course(db: &SqlitePool, id: i64) -> Result<Course, AppError> {
    let mut tx = db.begin().await?;
    let course = repository::find_course_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(COURSE_NOT_FOUND))?;
    tx.commit().await?;
    Ok(course)
}

pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    req: UpdateCourseRequest,
) -> Result<Course, AppError> {
    req.validate()?;
    let mut tx = db.begin().await?;

    let mut course = repository::find_course_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(COURSE_NOT_FOUND))?;

    if let Some(code) = req.code.filter(|code| *code != course.code) {
        if let Some(other) = repository::find_course_by_code(&mut *tx, code).await? {
            warn!(course_id = id, taken_by = other.id, code, "rejected course code change");
            return Err(AppError::conflict(DUPLICATE_CODE));
        }
    }

    req.apply_to(&mut course);
    repository::update_course(&mut *tx, &course).await?;
    tx.commit().await?;

    info!(course_id = id, "course updated");
    Ok(course)
}

/// Deletes a course, first releasing every student enrolled in it.
pub async fn delete_course(db: &SqlitePool, id: i64) -> Result<MessageResponse, AppError> {
    let mut tx = db.begin().await?;

    if repository::find_course_by_id(&mut *tx, id).await?.is_none() {
        return Err(AppError::not_found(COURSE_NOT_FOUND));
    }

    let released = repository::clear_course_enrollments(&mut *tx, id).await?;
    repository::delete_course(&mut *tx, id).await?;
    tx.commit().await?;

    info!(course_id = id, released, "course deleted");
    Ok(MessageResponse::new("Course deleted successfully"))
}

pub async fn list_enrolled_students(db: &SqlitePool, id: i64) -> Result<Vec<Student>, AppError> {
    let mut tx = db.begin().await?;

    if repository::find_course_by_id(&mut *tx, id).await?.is_none() {
        return Err(AppError::not_found(COURSE_NOT_FOUND));
    }

    let students = repository::fetch_students_in_course(&mut *tx, id).await?;
    tx.commit().await?;

    if students.is_empty() {
        return Err(AppError::not_found("No students are enrolled in this course"));
    }
    Ok(students)
}
