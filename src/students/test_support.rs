use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::error::AppError;
use crate::students::dto::SubmitRequest;
use crate::students::repo::{StoreError, StudentStore};
use crate::students::repo_types::{ConflictField, NewStudent, Student};
use crate::students::services;

pub fn request(phone: &str, email: &str) -> SubmitRequest {
    SubmitRequest {
        name: Some("Alice".into()),
        year: Some("2".into()),
        institute: Some("X".into()),
        department: Some("CS".into()),
        phone: Some(phone.into()),
        email: Some(email.into()),
    }
}

/// Holds every caller at `find_conflict` until `parties` callers have
/// finished their lookup, so all of them see the store before anyone inserts.
pub struct RacingStore<S> {
    inner: S,
    gate: Barrier,
}

impl<S> RacingStore<S> {
    pub fn new(inner: S, parties: usize) -> Self {
        Self {
            inner,
            gate: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl<S: StudentStore> StudentStore for RacingStore<S> {
    async fn find_conflict(
        &self,
        phone: &str,
        email: &str,
    ) -> Result<Option<ConflictField>, StoreError> {
        let found = self.inner.find_conflict(phone, email).await;
        self.gate.wait().await;
        found
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError> {
        self.inner.insert(student).await
    }

    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        self.inner.list_all().await
    }
}

/// Submits two candidates sharing one phone from two tasks at once and
/// returns `(successes, conflicts)`.
pub async fn race_same_phone<S>(store: Arc<S>, precheck: bool) -> (usize, usize)
where
    S: StudentStore + 'static,
{
    let start = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for email in ["alice@x.com", "alice2@x.com"] {
        let store = Arc::clone(&store);
        let start = Arc::clone(&start);
        handles.push(tokio::spawn(async move {
            start.wait().await;
            services::submit(store.as_ref(), precheck, request("9876543210", email)).await
        }));
    }

    let mut ok = 0;
    let mut conflicts = 0;
    for h in handles {
        match h.await.expect("submit task panicked") {
            Ok(_) => ok += 1,
            Err(AppError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    (ok, conflicts)
}
