mod courses;
pub mod extract;
mod students;

use axum::{Json, Router, extract::State, http::StatusCode, routing::{get, post}};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::models::MessageResponse;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/cursos", get(courses::list_courses).post(courses::create_course))
        .route("/cursos/", get(courses::list_courses).post(courses::create_course))
        .route(
            "/cursos/{id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/cursos/{id}/estudiantes", get(courses::list_enrolled_students))
        .route("/estudiantes", get(students::list_students).post(students::create_student))
        .route("/estudiantes/", get(students::list_students).post(students::create_student))
        .route(
            "/estudiantes/{cedula}",
            get(students::get_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        .route("/estudiantes/{cedula}/curso", get(students::get_student_course))
        .route(
            "/estudiantes/{cedula}/matricular/{curso_id}",
            post(students::enroll),
        )
        .route("/estudiantes/{cedula}/desmatricular", post(students::disenroll))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Academic records API is running"))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
