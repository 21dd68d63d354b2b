use axum::extract::State;
use axum::http::StatusCode;

use super::extract::{Json, Path, Query};
use crate::error::AppError;
use crate::models::{
    MessageResponse, NewStudentRequest, Student, StudentCourse, StudentFilter,
    UpdateStudentRequest,
};
use crate::services::students;
use crate::state::AppState;

pub(super) async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = students::create_student(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub(super) async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = students::list_students(&state.db, filter).await?;
    Ok(Json(students))
}

pub(super) async fn get_student(
    State(state): State<AppState>,
    Path(cedula): Path<i64>,
) -> Result<Json<Student>, AppError> {
    let student = students::get_student(&state.db, cedula).await?;
    Ok(Json(student))
}

pub(super) async fn update_student(
    State(state): State<AppState>,
    Path(cedula): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let student = students::update_student(&state.db, cedula, req).await?;
    Ok(Json(student))
}

pub(super) async fn delete_student(
    State(state): State<AppState>,
    Path(cedula): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = students::delete_student(&state.db, cedula).await?;
    Ok(Json(message))
}

pub(super) async fn get_student_course(
    State(state): State<AppState>,
    Path(cedula): Path<i64>,
) -> Result<Json<StudentCourse>, AppError> {
    let detail = students::get_student_course(&state.db, cedula).await?;
    Ok(Json(detail))
}

pub(super) async fn enroll(
    State(state): State<AppState>,
    Path((cedula, curso_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = students::enroll(&state.db, cedula, curso_id).await?;
    Ok(Json(message))
}

pub(super) async fn disenroll(
    State(state): State<AppState>,
    Path(cedula): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = students::disenroll(&state.db, cedula).await?;
    Ok(Json(message))
}
