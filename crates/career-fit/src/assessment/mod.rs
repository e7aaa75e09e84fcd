//! Career-fit assessment: question catalog, response collection, scoring, and recommendations.
//!
//! Scoring and recommendation are pure functions of their inputs. The session service is the
//! only stateful piece and keeps its state behind [`SessionRepository`].

pub mod catalog;
pub mod domain;
pub mod import;
pub mod recommendation;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, QuestionCatalog};
pub use domain::{
    Answer, AnswerFormat, AnswerKey, Question, QuestionCategory, QuestionId, RatingScale,
    Response, WiscarFacet, LIKERT_LABELS,
};
pub use import::{ResponseFormat, ResponseImportError, ResponseImporter};
pub use recommendation::{
    recommend, AssessmentResult, Importance, Readiness, Recommendation, SkillGap,
};
pub use repository::{RepositoryError, SessionRecord, SessionRepository, SessionView};
pub use router::assessment_router;
pub use scoring::{score, AssessmentScores, Expectation, ValidationError, WiscarScores};
pub use service::{
    AssessmentService, AssessmentServiceError, SessionLimits, DEFAULT_RESULT_RETENTION_MINUTES,
    DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_IDLE_MINUTES,
};
pub use session::{AssessmentSession, SessionError, SessionId, SessionProgress, SessionStatus};

/// Score and recommend in one pass.
pub fn evaluate(
    responses: &[Response],
    catalog: &QuestionCatalog,
) -> Result<AssessmentResult, ValidationError> {
    let scores = score(responses, catalog)?;
    Ok(recommend(scores))
}

/// Stateless evaluator bound to a catalog.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    catalog: QuestionCatalog,
}

impl AssessmentEngine {
    pub fn new(catalog: QuestionCatalog) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(QuestionCatalog::standard())
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn score(&self, responses: &[Response]) -> Result<AssessmentScores, ValidationError> {
        score(responses, &self.catalog)
    }

    pub fn evaluate(&self, responses: &[Response]) -> Result<AssessmentResult, ValidationError> {
        evaluate(responses, &self.catalog)
    }
}
