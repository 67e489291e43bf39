use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::students::dto::SubmitRequest;
use crate::students::repo::{StoreError, StudentStore};
use crate::students::repo_types::Student;
use crate::students::validate::validate_submission;

/// Validates a submission and writes exactly one record, or nothing.
///
/// With `precheck` set, an existing phone or email short-circuits before the
/// insert. The insert itself is still guarded by the store's uniqueness
/// constraints, which is what keeps concurrent duplicates out.
pub async fn submit(
    store: &dyn StudentStore,
    precheck: bool,
    req: SubmitRequest,
) -> Result<Student, AppError> {
    let candidate = validate_submission(req).map_err(|errors| {
        let fields: Vec<_> = errors.fields().collect();
        warn!(?fields, "submission failed validation");
        AppError::Validation(errors)
    })?;

    if precheck {
        match store.find_conflict(candidate.phone(), candidate.email()).await {
            Ok(Some(field)) => {
                warn!(field = field.as_str(), "already registered (precheck)");
                return Err(AppError::Conflict(Some(field)));
            }
            Ok(None) => {}
            Err(e) => return Err(store_failure(e, "find_conflict")),
        }
    }

    match store.insert(&candidate).await {
        Ok(student) => {
            info!(student_id = %student.id, year = %student.year, "attendance recorded");
            Ok(student)
        }
        Err(StoreError::Duplicate(field)) => {
            warn!(field = field.map(|f| f.as_str()), "already registered (constraint)");
            Err(AppError::Conflict(field))
        }
        Err(e) => Err(store_failure(e, "insert")),
    }
}

pub async fn list_all(store: &dyn StudentStore) -> Result<Vec<Student>, AppError> {
    let students = store
        .list_all()
        .await
        .map_err(|e| store_failure(e, "list_all"))?;
    debug!(count = students.len(), "students listed");
    Ok(students)
}

fn store_failure(e: StoreError, op: &'static str) -> AppError {
    error!(error = %e, op, "store operation failed");
    AppError::from(e)
}
