use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::catalog::QuestionCatalog;
use super::domain::{Answer, Question, QuestionId, Response};
use super::recommendation::AssessmentResult;
use super::repository::{RepositoryError, SessionRecord, SessionRepository, SessionView};
use super::scoring::ValidationError;
use super::session::{AssessmentSession, SessionError, SessionId, SessionStatus};
use super::AssessmentEngine;

/// Default ceiling on concurrently open sessions.
pub const DEFAULT_SESSION_CAPACITY: usize = 1000;
/// Default idle time before an unsubmitted session is discarded.
pub const DEFAULT_SESSION_IDLE_MINUTES: u32 = 60;
/// Default time a submitted result stays retrievable.
pub const DEFAULT_RESULT_RETENTION_MINUTES: u32 = 24 * 60;

/// Capacity and expiry settings for stored sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub capacity: usize,
    /// Unsubmitted sessions with no activity for this long are evicted.
    pub idle_timeout: Duration,
    /// Submitted sessions are evicted this long after completion.
    pub result_retention: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SESSION_CAPACITY,
            idle_timeout: Duration::minutes(i64::from(DEFAULT_SESSION_IDLE_MINUTES)),
            result_retention: Duration::minutes(i64::from(DEFAULT_RESULT_RETENTION_MINUTES)),
        }
    }
}

/// Service composing the question catalog, session repository, and scoring engine.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    engine: Arc<AssessmentEngine>,
    limits: SessionLimits,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<R> AssessmentService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: QuestionCatalog) -> Self {
        Self::with_limits(repository, catalog, SessionLimits::default())
    }

    pub fn with_capacity(repository: Arc<R>, catalog: QuestionCatalog, capacity: usize) -> Self {
        let limits = SessionLimits {
            capacity,
            ..SessionLimits::default()
        };
        Self::with_limits(repository, catalog, limits)
    }

    pub fn with_limits(
        repository: Arc<R>,
        catalog: QuestionCatalog,
        limits: SessionLimits,
    ) -> Self {
        Self {
            repository,
            engine: Arc::new(AssessmentEngine::new(catalog)),
            limits,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        self.engine.catalog()
    }

    /// Open a new session positioned at the first question.
    ///
    /// Expired sessions are evicted first so abandoned ones do not hold capacity.
    pub fn start(&self) -> Result<SessionView, AssessmentServiceError> {
        let now = Utc::now();
        self.evict_expired(now)?;

        let open = self.repository.count(SessionStatus::InProgress)?;
        if open >= self.limits.capacity {
            return Err(RepositoryError::Capacity(self.limits.capacity).into());
        }

        let session = AssessmentSession::new(next_session_id(), now);
        let stored = self.repository.insert(SessionRecord::new(session))?;
        info!(session_id = %stored.session.id.0, "assessment session started");
        Ok(stored.view(self.catalog()))
    }

    /// Drop idle unsubmitted sessions and results past their retention window.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> Result<usize, AssessmentServiceError> {
        let abandoned = self
            .repository
            .purge(SessionStatus::InProgress, now - self.limits.idle_timeout)?;
        let retired = self
            .repository
            .purge(SessionStatus::Completed, now - self.limits.result_retention)?;

        if abandoned + retired > 0 {
            info!(abandoned, retired, "expired assessment sessions evicted");
        }
        Ok(abandoned + retired)
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionView, AssessmentServiceError> {
        let record = self.load(session_id)?;
        Ok(record.view(self.catalog()))
    }

    /// Question under the session cursor, `None` once every question has been answered.
    pub fn current(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Question>, AssessmentServiceError> {
        let record = self.load(session_id)?;
        Ok(record.session.current_question(self.catalog()).cloned())
    }

    /// Record or revise an answer.
    pub fn answer(
        &self,
        session_id: &SessionId,
        question_id: QuestionId,
        answer: Answer,
    ) -> Result<SessionView, AssessmentServiceError> {
        let catalog = self.catalog();
        self.repository.modify(
            session_id,
            |record| -> Result<SessionView, AssessmentServiceError> {
                record
                    .session
                    .record(catalog, question_id, answer, Utc::now())?;
                Ok(record.view(catalog))
            },
        )
    }

    /// Step back to the previous question.
    pub fn back(&self, session_id: &SessionId) -> Result<SessionView, AssessmentServiceError> {
        let catalog = self.catalog();
        self.repository.modify(
            session_id,
            |record| -> Result<SessionView, AssessmentServiceError> {
                record.session.back(catalog)?;
                Ok(record.view(catalog))
            },
        )
    }

    /// Close the session and score it. The result stays attached to the stored session.
    pub fn submit(
        &self,
        session_id: &SessionId,
    ) -> Result<AssessmentResult, AssessmentServiceError> {
        let engine = &self.engine;
        let result = self.repository.modify(
            session_id,
            |record| -> Result<AssessmentResult, AssessmentServiceError> {
                let responses = record.session.submit(engine.catalog(), Utc::now())?;
                let result = engine.evaluate(&responses)?;
                record.result = Some(result.clone());
                Ok(result)
            },
        )?;

        info!(
            session_id = %session_id.0,
            recommendation = result.recommendation.label(),
            overall = result.scores.overall,
            confidence = result.confidence,
            "assessment submitted"
        );
        Ok(result)
    }

    /// Score a response list collected elsewhere.
    pub fn evaluate(&self, responses: &[Response]) -> Result<AssessmentResult, ValidationError> {
        debug!(responses = responses.len(), "evaluating detached responses");
        self.engine.evaluate(responses)
    }

    fn load(&self, session_id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
