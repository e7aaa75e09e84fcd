use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response as HttpResponse;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::assessment::domain::{Answer, AnswerFormat, AnswerKey, Question, Response};
use crate::assessment::repository::{RepositoryError, SessionRecord, SessionRepository};
use crate::assessment::session::{SessionId, SessionStatus};
use crate::assessment::{assessment_router, AssessmentService, QuestionCatalog};

pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::standard()
}

pub(super) fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 10, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Answer patterns used across the scenario tests.
#[derive(Debug, Clone, Copy)]
pub(super) enum Profile {
    /// Top rating everywhere and the best-credited option on every choice question.
    Perfect,
    /// Neutral ratings, correct technical answers, half credit on the real-world item.
    Borderline,
    /// Lowest rating everywhere and the least-credited option on every choice question.
    Weak,
}

fn option_credit(key: &AnswerKey, option: &str) -> u8 {
    if let Some(credit) = key.partial_credit.get(option) {
        return *credit;
    }
    match &key.correct {
        Some(correct) if correct == option => 100,
        _ => 0,
    }
}

pub(super) fn answer_for(question: &Question, profile: Profile) -> Answer {
    match &question.format {
        AnswerFormat::Likert { scale } => Answer::Rating(match profile {
            Profile::Perfect => scale.max,
            Profile::Borderline => (scale.min + scale.max) / 2,
            Profile::Weak => scale.min,
        }),
        AnswerFormat::MultipleChoice { options, key } => {
            let chosen = match profile {
                Profile::Perfect => options.iter().max_by_key(|option| option_credit(key, option)),
                Profile::Borderline if !key.partial_credit.is_empty() => options
                    .iter()
                    .find(|option| option_credit(key, option) == 50),
                Profile::Borderline => key.correct.as_ref(),
                Profile::Weak => options.iter().min_by_key(|option| option_credit(key, option)),
            };
            Answer::Choice(chosen.cloned().expect("choice question has options"))
        }
    }
}

pub(super) fn responses(profile: Profile) -> Vec<Response> {
    catalog()
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| Response {
            question_id: question.id.clone(),
            answer: answer_for(question, profile),
            timestamp: at(index as u32),
        })
        .collect()
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone(), catalog());
    (service, repository)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryRepository>) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        let value = change(&mut draft)?;
        *stored = draft;
        Ok(value)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id))
    }

    fn count(&self, status: SessionStatus) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|_, record| {
            record.session.status != status || record.session.last_activity() >= cutoff
        });
        Ok(before - guard.len())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify<T, E, F>(&self, _id: &SessionId, _change: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count(&self, _status: SessionStatus) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn purge(
        &self,
        _status: SessionStatus,
        _cutoff: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Walk a fresh session through the whole catalog with `profile` answers.
pub(super) fn complete_session(
    service: &AssessmentService<MemoryRepository>,
    profile: Profile,
) -> SessionId {
    let view = service.start().expect("session starts");
    for question in service.catalog().questions() {
        service
            .answer(
                &view.session_id,
                question.id.clone(),
                answer_for(question, profile),
            )
            .expect("answer recorded");
    }
    view.session_id
}

pub(super) async fn read_json_body(response: HttpResponse) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
