use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::domain::{Answer, Question, QuestionId, Response};
use super::scoring::rules::validate_answer;
use super::scoring::ValidationError;

/// Identifier wrapper for in-progress assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

/// Position within the catalog for progress indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub answered: usize,
    pub total: usize,
    pub current_index: usize,
    pub percent: u8,
}

/// Collects one response per catalog question, in catalog order.
///
/// The cursor marks the question on screen. Any question up to the first unanswered one may be
/// (re)answered; answering the question under the cursor moves it forward by one, so stepping
/// through earlier answers after `back` shows each of them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub id: SessionId,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    cursor: usize,
    responses: Vec<Response>,
}

impl AssessmentSession {
    pub fn new(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: SessionStatus::InProgress,
            started_at,
            completed_at: None,
            cursor: 0,
            responses: Vec::new(),
        }
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Completion time once submitted, otherwise the latest answer or the start time.
    pub fn last_activity(&self) -> DateTime<Utc> {
        if let Some(completed_at) = self.completed_at {
            return completed_at;
        }
        self.responses
            .iter()
            .map(|response| response.timestamp)
            .fold(self.started_at, |latest, at| latest.max(at))
    }

    pub fn current_question<'c>(&self, catalog: &'c QuestionCatalog) -> Option<&'c Question> {
        catalog.question_at(self.cursor)
    }

    pub fn answer_for(&self, question_id: &QuestionId) -> Option<&Answer> {
        self.responses
            .iter()
            .find(|response| &response.question_id == question_id)
            .map(|response| &response.answer)
    }

    /// Answer already recorded for the question under the cursor, for pre-selection.
    pub fn current_answer(&self, catalog: &QuestionCatalog) -> Option<&Answer> {
        self.current_question(catalog)
            .and_then(|question| self.answer_for(&question.id))
    }

    fn frontier(&self, catalog: &QuestionCatalog) -> usize {
        let answered: HashSet<&QuestionId> = self
            .responses
            .iter()
            .map(|response| &response.question_id)
            .collect();
        catalog
            .questions()
            .iter()
            .position(|question| !answered.contains(&question.id))
            .unwrap_or(catalog.len())
    }

    pub fn record(
        &mut self,
        catalog: &QuestionCatalog,
        question_id: QuestionId,
        answer: Answer,
        at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.status == SessionStatus::Completed {
            return Err(SessionError::Completed);
        }

        let position = catalog
            .position(&question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.clone()))?;
        let frontier = self.frontier(catalog);
        if position > frontier {
            return Err(SessionError::OutOfOrder {
                question_id,
                position,
                frontier,
            });
        }

        if let Some(question) = catalog.question_at(position) {
            validate_answer(question, &answer)?;
        }

        let response = Response {
            question_id,
            answer,
            timestamp: at,
        };
        match self
            .responses
            .iter_mut()
            .find(|existing| existing.question_id == response.question_id)
        {
            Some(existing) => *existing = response,
            None => self.responses.push(response),
        }

        if position == self.cursor {
            self.cursor = (self.cursor + 1).min(catalog.len());
        }

        Ok(())
    }

    /// Step back one question, returning its recorded answer. No-op at the first question.
    pub fn back(&mut self, catalog: &QuestionCatalog) -> Result<Option<Answer>, SessionError> {
        if self.status == SessionStatus::Completed {
            return Err(SessionError::Completed);
        }
        if self.cursor == 0 {
            return Ok(None);
        }

        self.cursor -= 1;
        Ok(self.current_answer(catalog).cloned())
    }

    pub fn progress(&self, catalog: &QuestionCatalog) -> SessionProgress {
        let total = catalog.len();
        let shown = (self.cursor + 1).min(total);
        let percent = if total == 0 {
            100
        } else {
            ((shown as f64 / total as f64) * 100.0).round() as u8
        };

        SessionProgress {
            answered: self.responses.len(),
            total,
            current_index: self.cursor,
            percent,
        }
    }

    /// Close the session, handing back the final response list.
    pub fn submit(
        &mut self,
        catalog: &QuestionCatalog,
        at: DateTime<Utc>,
    ) -> Result<Vec<Response>, SessionError> {
        if self.status == SessionStatus::Completed {
            return Err(SessionError::Completed);
        }

        let missing: Vec<QuestionId> = catalog
            .questions()
            .iter()
            .filter(|question| self.answer_for(&question.id).is_none())
            .map(|question| question.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(SessionError::Incomplete { missing });
        }

        self.status = SessionStatus::Completed;
        self.completed_at = Some(at);
        Ok(self.responses.clone())
    }
}

/// Errors raised while collecting responses.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("question {0} is not part of this assessment")]
    UnknownQuestion(QuestionId),
    #[error("question {question_id} (#{}) cannot be answered before question #{}", .position + 1, .frontier + 1)]
    OutOfOrder {
        question_id: QuestionId,
        position: usize,
        frontier: usize,
    },
    #[error("assessment already submitted")]
    Completed,
    #[error("{} question(s) still unanswered", .missing.len())]
    Incomplete { missing: Vec<QuestionId> },
}
