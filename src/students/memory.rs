use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::students::repo::{StoreError, StudentStore};
use crate::students::repo_types::{ConflictField, NewStudent, Student};

/// In-process `StudentStore`. The uniqueness check and the push happen under
/// one lock, so it gives the same guarantee as the Postgres constraints.
#[derive(Default)]
pub struct MemoryStudentStore {
    students: Mutex<Vec<Student>>,
    offline: AtomicBool,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the database were unreachable.
    #[cfg(test)]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("memory store is offline").into());
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Student>>, StoreError> {
        self.students
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned").into())
    }
}

fn conflict_in(students: &[Student], phone: &str, email: &str) -> Option<ConflictField> {
    students.iter().find_map(|s| {
        if s.phone == phone {
            Some(ConflictField::Phone)
        } else if s.email == email {
            Some(ConflictField::Email)
        } else {
            None
        }
    })
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find_conflict(
        &self,
        phone: &str,
        email: &str,
    ) -> Result<Option<ConflictField>, StoreError> {
        self.ensure_online()?;
        let students = self.lock()?;
        Ok(conflict_in(&students, phone, email))
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError> {
        self.ensure_online()?;
        let mut students = self.lock()?;
        if let Some(field) = conflict_in(&students, student.phone(), student.email()) {
            return Err(StoreError::Duplicate(Some(field)));
        }

        let now = OffsetDateTime::now_utc();
        let created = Student {
            id: Uuid::new_v4(),
            name: student.name().to_string(),
            year: student.year(),
            institute: student.institute().to_string(),
            department: student.department().to_string(),
            phone: student.phone().to_string(),
            email: student.email().to_string(),
            created_at: now,
            updated_at: now,
        };
        students.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        self.ensure_online()?;
        Ok(self.lock()?.clone())
    }
}
