use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    Enrollment, MessageResponse, NewStudentRequest, Student, StudentCourse, StudentFilter,
    UpdateStudentRequest,
};

const STUDENT_NOT_FOUND: &str = "Student not found";
const NOT_ENROLLED: &str = "The student is not enrolled in any course";
const ENROLLED_ELSEWHERE: &str = "The student is already enrolled in another course";

pub async fn create_student(db: &SqlitePool, req: NewStudentRequest) -> Result<Student, AppError> {
    req.validate()?;
    let mut tx = db.begin().await?;

    if repository::find_student_by_id(&mut *tx, req.id).await?.is_some() {
        warn!(student_id = req.id, "rejected student with duplicate id");
        return Err(AppError::conflict("A student with that id already exists"));
    }

    if let Some(course_id) = req.course_id {
        if repository::find_course_by_id(&mut *tx, course_id).await?.is_none() {
            return Err(AppError::not_found("The specified course does not exist"));
        }
    }

    let student = req.into_student();
    repository::insert_student(&mut *tx, &student).await?;
    tx.commit().await?;

    info!(student_id = student.id, course_id = ?student.course_id, "student created");
    Ok(student)
}

/// Lists students, optionally restricted to one semester. An empty result is
/// reported as `NotFound`.
pub async fn list_students(db: &SqlitePool, filter: StudentFilter) -> Result<Vec<Student>, AppError> {
    let mut tx = db.begin().await?;
    let students = repository::fetch_students(&mut *tx, &filter).await?;
    tx.commit().await?;

    if students.is_empty() {
        return Err(AppError::not_found("No students found for that semester"));
    }
    Ok(students)
}

pub async fn get_student(db: &SqlitePool, id: i64) -> Result<Student, AppError> {
    let mut tx = db.begin().await?;
    let student = repository::find_student_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(STUDENT_NOT_FOUND))?;
    tx.commit().await?;
    Ok(student)
}

/// Applies a partial update. A `course_id` may only enroll a student that is
/// currently unenrolled and `course_id: null` unenrolls; moving between
/// courses goes through [`disenroll`] and [`enroll`].
pub async fn update_student(
    db: &SqlitePool,
    id: i64,
    req: UpdateStudentRequest,
) -> Result<Student, AppError> {
    req.validate()?;
    let mut tx = db.begin().await?;

    let mut student = repository::find_student_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(STUDENT_NOT_FOUND))?;

    if let Some(Some(course_id)) = req.course_id {
        match student.enrollment() {
            Enrollment::Enrolled(current) if current != course_id => {
                warn!(student_id = id, current, requested = course_id, "rejected course reassignment");
                return Err(AppError::conflict(ENROLLED_ELSEWHERE));
            }
            Enrollment::Enrolled(_) => {}
            Enrollment::Unenrolled => {
                if repository::find_course_by_id(&mut *tx, course_id).await?.is_none() {
                    return Err(AppError::not_found("The specified course does not exist"));
                }
            }
        }
    }

    req.apply_to(&mut student);
    repository::update_student(&mut *tx, &student).await?;
    tx.commit().await?;

    info!(student_id = id, course_id = ?student.course_id, "student updated");
    Ok(student)
}

pub async fn delete_student(db: &SqlitePool, id: i64) -> Result<MessageResponse, AppError> {
    let mut tx = db.begin().await?;

    if !repository::delete_student(&mut *tx, id).await? {
        return Err(AppError::not_found(STUDENT_NOT_FOUND));
    }
    tx.commit().await?;

    info!(student_id = id, "student deleted");
    Ok(MessageResponse::new("Student deleted successfully"))
}

pub async fn get_student_course(db: &SqlitePool, id: i64) -> Result<StudentCourse, AppError> {
    let mut tx = db.begin().await?;

    let student = repository::find_student_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(STUDENT_NOT_FOUND))?;

    let Enrollment::Enrolled(course_id) = student.enrollment() else {
        return Err(AppError::not_found(NOT_ENROLLED));
    };

    // Course deletion clears enrollments, so a dangling reference is an anomaly.
    let Some(course) = repository::find_course_by_id(&mut *tx, course_id).await? else {
        warn!(student_id = id, course_id, "student references a missing course");
        return Err(AppError::not_found("The assigned course does not exist"));
    };
    tx.commit().await?;

    Ok(StudentCourse::new(student, course))
}

/// Unenrolled -> Enrolled(course_id). Enrolling into the current course again
/// succeeds without change.
pub async fn enroll(
    db: &SqlitePool,
    student_id: i64,
    course_id: i64,
) -> Result<MessageResponse, AppError> {
    let mut tx = db.begin().await?;

    let mut student = repository::find_student_by_id(&mut *tx, student_id)
        .await?
        .ok_or_else(|| AppError::not_found(STUDENT_NOT_FOUND))?;

    let course = repository::find_course_by_id(&mut *tx, course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    match student.enrollment() {
        Enrollment::Enrolled(current) if current == course_id => {}
        Enrollment::Enrolled(current) => {
            warn!(student_id, current, requested = course_id, "rejected enrollment");
            return Err(AppError::conflict(ENROLLED_ELSEWHERE));
        }
        Enrollment::Unenrolled => {
            student.course_id = Some(course_id);
            repository::update_student(&mut *tx, &student).await?;
        }
    }
    tx.commit().await?;

    info!(student_id, course_id, "student enrolled");
    Ok(MessageResponse::new(format!(
        "Student {} enrolled in {}",
        student.name, course.name
    )))
}

/// Enrolled(*) -> Unenrolled.
pub async fn disenroll(db: &SqlitePool, student_id: i64) -> Result<MessageResponse, AppError> {
    let mut tx = db.begin().await?;

    let mut student = repository::find_student_by_id(&mut *tx, student_id)
        .await?
        .ok_or_else(|| AppError::not_found(STUDENT_NOT_FOUND))?;

    if student.enrollment() == Enrollment::Unenrolled {
        return Err(AppError::not_found(NOT_ENROLLED));
    }

    student.course_id = None;
    repository::update_student(&mut *tx, &student).await?;
    tx.commit().await?;

    info!(student_id, "student disenrolled");
    Ok(MessageResponse::new(format!(
        "Student {} disenrolled successfully",
        student.name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::models::{Course, CourseKind, NewCourseRequest};
    use crate::services::courses;

    async fn seed_course(db: &SqlitePool, code: i64) -> Course {
        courses::create_course(
            db,
            NewCourseRequest {
                code,
                name: format!("Course {code}"),
                credits: 3,
                kind: CourseKind::Programming,
                schedule: None,
            },
        )
        .await
        .expect("Failed to create course")
    }

    fn student_req(id: i64, semester: i64, course_id: Option<i64>) -> NewStudentRequest {
        NewStudentRequest {
            id,
            name: format!("Student {id}"),
            email: format!("s{id}@uni.edu"),
            semester,
            course_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_student_id_conflicts() {
        let pool = connect_in_memory().await.unwrap();
        create_student(&pool, student_req(1, 1, None)).await.unwrap();

        let err = create_student(&pool, student_req(1, 4, None)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_with_unknown_course_is_not_found() {
        let pool = connect_in_memory().await.unwrap();

        let err = create_student(&pool, student_req(1, 1, Some(42))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(get_student(&pool, 1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_by_semester() {
        let pool = connect_in_memory().await.unwrap();
        create_student(&pool, student_req(1, 1, None)).await.unwrap();
        create_student(&pool, student_req(2, 3, None)).await.unwrap();

        let third = list_students(&pool, StudentFilter { semester: Some(3) }).await.unwrap();
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].id, 2);

        let err = list_students(&pool, StudentFilter { semester: Some(8) }).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_enroll_then_get_course() {
        let pool = connect_in_memory().await.unwrap();
        let course = seed_course(&pool, 101).await;
        create_student(&pool, student_req(1, 2, None)).await.unwrap();

        enroll(&pool, 1, course.id).await.unwrap();

        let detail = get_student_course(&pool, 1).await.unwrap();
        assert_eq!(detail.id, 1);
        assert_eq!(detail.course, course);
    }

    #[tokio::test]
    async fn test_enroll_elsewhere_conflicts_and_keeps_state() {
        let pool = connect_in_memory().await.unwrap();
        let first = seed_course(&pool, 101).await;
        let second = seed_course(&pool, 102).await;
        create_student(&pool, student_req(1, 2, None)).await.unwrap();

        enroll(&pool, 1, first.id).await.unwrap();
        // Same course again is a no-op.
        enroll(&pool, 1, first.id).await.unwrap();

        let err = enroll(&pool, 1, second.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(get_student(&pool, 1).await.unwrap().course_id, Some(first.id));
    }

    #[tokio::test]
    async fn test_enroll_unknown_ids() {
        let pool = connect_in_memory().await.unwrap();
        let course = seed_course(&pool, 101).await;
        create_student(&pool, student_req(1, 2, None)).await.unwrap();

        assert!(matches!(enroll(&pool, 9, course.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(enroll(&pool, 1, 999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_disenroll() {
        let pool = connect_in_memory().await.unwrap();
        let course = seed_course(&pool, 101).await;
        create_student(&pool, student_req(1, 2, Some(course.id))).await.unwrap();

        disenroll(&pool, 1).await.unwrap();
        assert_eq!(get_student(&pool, 1).await.unwrap().course_id, None);

        let err = disenroll(&pool, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(disenroll(&pool, 77).await, Err(AppError::NotFound(_))));
        assert!(matches!(get_student_course(&pool, 1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let pool = connect_in_memory().await.unwrap();
        let course = seed_course(&pool, 101).await;
        create_student(&pool, student_req(1, 2, Some(course.id))).await.unwrap();

        let patch = UpdateStudentRequest {
            email: Some("new@uni.edu".to_string()),
            ..Default::default()
        };
        let updated = update_student(&pool, 1, patch).await.unwrap();

        assert_eq!(updated.email, "new@uni.edu");
        assert_eq!(updated.name, "Student 1");
        assert_eq!(updated.semester, 2);
        assert_eq!(updated.course_id, Some(course.id));
        assert_eq!(get_student(&pool, 1).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_cannot_move_between_courses() {
        let pool = connect_in_memory().await.unwrap();
        let first = seed_course(&pool, 101).await;
        let second = seed_course(&pool, 102).await;
        create_student(&pool, student_req(1, 2, Some(first.id))).await.unwrap();
        create_student(&pool, student_req(2, 2, None)).await.unwrap();

        let moving = UpdateStudentRequest { course_id: Some(Some(second.id)), ..Default::default() };
        let err = update_student(&pool, 1, moving.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // An unenrolled student may pick up a course through an update.
        let joined = update_student(&pool, 2, moving).await.unwrap();
        assert_eq!(joined.course_id, Some(second.id));

        let dangling = UpdateStudentRequest { course_id: Some(Some(500)), ..Default::default() };
        create_student(&pool, student_req(3, 2, None)).await.unwrap();
        assert!(matches!(update_student(&pool, 3, dangling).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_with_null_course_unenrolls() {
        let pool = connect_in_memory().await.unwrap();
        let course = seed_course(&pool, 101).await;
        create_student(&pool, student_req(7, 2, Some(course.id))).await.unwrap();

        let patch = UpdateStudentRequest { course_id: Some(None), ..Default::default() };
        let updated = update_student(&pool, 7, patch).await.unwrap();
        assert_eq!(updated.course_id, None);
        assert_eq!(updated.semester, 2);

        assert_eq!(get_student(&pool, 7).await.unwrap().course_id, None);
        assert!(matches!(disenroll(&pool, 7).await, Err(AppError::NotFound(_))));

        // Absent course_id leaves an enrollment alone.
        enroll(&pool, 7, course.id).await.unwrap();
        let patch = UpdateStudentRequest { name: Some("Eva".to_string()), ..Default::default() };
        assert_eq!(update_student(&pool, 7, patch).await.unwrap().course_id, Some(course.id));
    }

    #[tokio::test]
    async fn test_get_course_with_dangling_reference() {
        let pool = connect_in_memory().await.unwrap();
        {
            let mut conn = pool.acquire().await.unwrap();
            sqlx::query("PRAGMA foreign_keys = OFF").execute(&mut *conn).await.unwrap();
            repository::insert_student(
                &mut conn,
                &Student {
                    id: 5,
                    name: "Orphan".to_string(),
                    email: "orphan@uni.edu".to_string(),
                    semester: 1,
                    course_id: Some(999),
                },
            )
            .await
            .unwrap();
            sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await.unwrap();
        }

        match get_student_course(&pool, 5).await {
            Err(AppError::NotFound(message)) => {
                assert_eq!(message, "The assigned course does not exist")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_student() {
        let pool = connect_in_memory().await.unwrap();
        create_student(&pool, student_req(1, 2, None)).await.unwrap();

        delete_student(&pool, 1).await.unwrap();
        assert!(matches!(get_student(&pool, 1).await, Err(AppError::NotFound(_))));
        assert!(matches!(delete_student(&pool, 1).await, Err(AppError::NotFound(_))));
    }
}
