use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::models::{Course, CourseFilter, NewCourseRequest, Student, StudentFilter};

const COURSE_COLUMNS: &str = "id, code, name, credits, kind, schedule";
const STUDENT_COLUMNS: &str = "id, name, email, semester, course_id";

pub async fn find_course_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_course_by_code(
    conn: &mut SqliteConnection,
    code: i64,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE code = ?"))
        .bind(code)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_courses(
    conn: &mut SqliteConnection,
    filter: &CourseFilter,
) -> Result<Vec<Course>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {COURSE_COLUMNS} FROM courses WHERE 1 = 1"));
    if let Some(credits) = filter.credits {
        query.push(" AND credits = ").push_bind(credits);
    }
    if let Some(code) = filter.code {
        query.push(" AND code = ").push_bind(code);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Course>().fetch_all(conn).await
}

pub async fn insert_course(
    conn: &mut SqliteConnection,
    req: NewCourseRequest,
) -> Result<Course, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO courses (code, name, credits, kind, schedule)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(req.code)
    .bind(&req.name)
    .bind(req.credits)
    .bind(req.kind)
    .bind(&req.schedule)
    .execute(conn)
    .await?
    .last_insert_rowid();

    Ok(Course {
        id,
        code: req.code,
        name: req.name,
        credits: req.credits,
        kind: req.kind,
        schedule: req.schedule,
    })
}

pub async fn update_course(conn: &mut SqliteConnection, course: &Course) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET code = ?1,
            name = ?2,
            credits = ?3,
            kind = ?4,
            schedule = ?5
        WHERE id = ?6
        "#,
    )
    .bind(course.code)
    .bind(&course.name)
    .bind(course.credits)
    .bind(course.kind)
    .bind(&course.schedule)
    .bind(course.id)
    .execute(conn)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_course(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn find_student_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_students(
    conn: &mut SqliteConnection,
    filter: &StudentFilter,
) -> Result<Vec<Student>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {STUDENT_COLUMNS} FROM students WHERE 1 = 1"));
    if let Some(semester) = filter.semester {
        query.push(" AND semester = ").push_bind(semester);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Student>().fetch_all(conn).await
}

pub async fn fetch_students_in_course(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE course_id = ? ORDER BY id"
    ))
    .bind(course_id)
    .fetch_all(conn)
    .await
}

pub async fn insert_student(conn: &mut SqliteConnection, student: &Student) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO students (id, name, email, semester, course_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(student.id)
    .bind(&student.name)
    .bind(&student.email)
    .bind(student.semester)
    .bind(student.course_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update_student(conn: &mut SqliteConnection, student: &Student) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET name = ?1,
            email = ?2,
            semester = ?3,
            course_id = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&student.name)
    .bind(&student.email)
    .bind(student.semester)
    .bind(student.course_id)
    .bind(student.id)
    .execute(conn)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_student(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Sets `course_id` to NULL for every student enrolled in the course and
/// returns how many were released.
pub async fn clear_course_enrollments(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE students SET course_id = NULL WHERE course_id = ?")
        .bind(course_id)
        .execute(conn)
        .await?
        .rows_affected();

    Ok(result)
}
