use career_fit::assessment::{
    RepositoryError, SessionId, SessionRecord, SessionRepository, SessionStatus,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store. Sessions are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl InMemorySessionRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session.id.clone(), record.clone());
        Ok(record)
    }

    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.lock()?;
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        let value = change(&mut draft)?;
        *stored = draft;
        Ok(value)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.remove(id))
    }

    fn count(&self, status: SessionStatus) -> Result<usize, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .values()
            .filter(|record| record.session.status == status)
            .count())
    }

    fn purge(
        &self,
        status: SessionStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, record| {
            record.session.status != status || record.session.last_activity() >= cutoff
        });
        Ok(before - guard.len())
    }
}
