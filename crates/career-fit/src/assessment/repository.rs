use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::domain::{Answer, Question};
use super::recommendation::AssessmentResult;
use super::session::{AssessmentSession, SessionId, SessionProgress, SessionStatus};

/// Repository record containing the session and, once submitted, its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session: AssessmentSession,
    pub result: Option<AssessmentResult>,
}

impl SessionRecord {
    pub fn new(session: AssessmentSession) -> Self {
        Self {
            session,
            result: None,
        }
    }

    pub fn view(&self, catalog: &QuestionCatalog) -> SessionView {
        SessionView {
            session_id: self.session.id.clone(),
            status: self.session.status.label(),
            progress: self.session.progress(catalog),
            current_question: self.session.current_question(catalog).cloned(),
            current_answer: self.session.current_answer(catalog).cloned(),
            result: self.result.clone(),
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;

    /// Apply `change` to the stored record while holding the store exclusively.
    ///
    /// The change runs against a copy that is written back only when it returns `Ok`, so a
    /// rejected change leaves the stored record untouched.
    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, E>,
        E: From<RepositoryError>;

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    fn count(&self, status: SessionStatus) -> Result<usize, RepositoryError>;

    /// Drop records with `status` whose [`AssessmentSession::last_activity`] is before
    /// `cutoff`, returning how many were removed.
    fn purge(&self, status: SessionStatus, cutoff: DateTime<Utc>)
        -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("too many open sessions (limit {0})")]
    Capacity(usize),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub progress: SessionProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_answer: Option<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AssessmentResult>,
}
