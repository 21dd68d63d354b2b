use axum::extract::State;
use axum::http::StatusCode;

use super::extract::{Json, Path, Query};
use crate::error::AppError;
use crate::models::{
    Course, CourseFilter, MessageResponse, NewCourseRequest, Student, UpdateCourseRequest,
};
use crate::services::courses;
use crate::state::AppState;

pub(super) async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = courses::create_course(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(super) async fn list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = courses::list_courses(&state.db, filter).await?;
    Ok(Json(courses))
}

pub(super) async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = courses::get_course(&state.db, id).await?;
    Ok(Json(course))
}

pub(super) async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = courses::update_course(&state.db, id, req).await?;
    Ok(Json(course))
}

pub(super) async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = courses::delete_course(&state.db, id).await?;
    Ok(Json(message))
}

pub(super) async fn list_enrolled_students(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = courses::list_enrolled_students(&state.db, id).await?;
    Ok(Json(students))
}
