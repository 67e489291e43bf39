use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::students::repo_types::{ConflictField, NewStudent, Student, StudentRow};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint on phone or email rejected the write. `None` when
    /// the violated constraint could not be attributed to a field.
    #[error("duplicate {}", duplicate_label(.0))]
    Duplicate(Option<ConflictField>),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

fn duplicate_label(field: &Option<ConflictField>) -> &'static str {
    field.map(|f| f.as_str()).unwrap_or("record")
}

/// Persistent collection of attendance records.
///
/// `insert` must enforce phone and email uniqueness atomically: it is the only
/// guard that holds under concurrent submissions.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Field of an existing record that clashes with `phone` or `email`.
    async fn find_conflict(&self, phone: &str, email: &str)
        -> Result<Option<ConflictField>, StoreError>;
    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError>;
    async fn list_all(&self) -> Result<Vec<Student>, StoreError>;
}

#[derive(Clone)]
pub struct PgStudentStore {
    db: PgPool,
}

impl PgStudentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_sqlx_error(err: sqlx::Error, op: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            debug!(constraint = ?db_err.constraint(), "unique violation on {op}");
            let field = db_err.constraint().and_then(ConflictField::from_constraint);
            return StoreError::Duplicate(field);
        }
    }
    StoreError::Backend(anyhow::Error::new(err).context(op))
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn find_conflict(
        &self,
        phone: &str,
        email: &str,
    ) -> Result<Option<ConflictField>, StoreError> {
        let row = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT phone, email
              FROM students
             WHERE phone = $1 OR email = $2
             LIMIT 1
            "#,
        )
        .bind(phone)
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_sqlx_error(e, "find conflicting student"))?;

        Ok(row.map(|(existing_phone, _)| {
            if existing_phone == phone {
                ConflictField::Phone
            } else {
                ConflictField::Email
            }
        }))
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students (name, year, institute, department, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, year, institute, department, phone, email,
                      created_at, updated_at
            "#,
        )
        .bind(student.name())
        .bind(student.year().as_str())
        .bind(student.institute())
        .bind(student.department())
        .bind(student.phone())
        .bind(student.email())
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_sqlx_error(e, "insert student"))?;

        Ok(Student::try_from(row).context("decode inserted student")?)
    }

    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, year, institute, department, phone, email,
                   created_at, updated_at
              FROM students
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(|e| map_sqlx_error(e, "list students"))?;

        let students = rows
            .into_iter()
            .map(Student::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .context("decode student rows")?;
        Ok(students)
    }
}
