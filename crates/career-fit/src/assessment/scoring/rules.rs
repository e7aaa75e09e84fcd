use tracing::warn;

use super::super::domain::{Answer, AnswerFormat, AnswerKey, Question};
use super::{Expectation, ValidationError};

/// Check that `answer` fits the question's declared format.
pub(crate) fn validate_answer(question: &Question, answer: &Answer) -> Result<(), ValidationError> {
    let valid = match (&question.format, answer) {
        (AnswerFormat::Likert { scale }, Answer::Rating(value)) => scale.contains(*value),
        (AnswerFormat::MultipleChoice { options, .. }, Answer::Choice(label)) => {
            options.iter().any(|option| option == label)
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidAnswerValue {
            question_id: question.id.clone(),
            value: answer.clone(),
            expected: Expectation::for_format(&question.format),
        })
    }
}

/// Unweighted 0-100 score for a single answer.
pub(crate) fn item_score(question: &Question, answer: &Answer) -> Result<f64, ValidationError> {
    validate_answer(question, answer)?;

    let score = match (&question.format, answer) {
        (AnswerFormat::Likert { scale }, Answer::Rating(value)) => scale.normalize(*value),
        (AnswerFormat::MultipleChoice { key, .. }, Answer::Choice(label)) => {
            choice_score(question, key, label)
        }
        _ => 0.0,
    };

    Ok(score)
}

fn choice_score(question: &Question, key: &AnswerKey, label: &str) -> f64 {
    if let Some(credit) = key.partial_credit.get(label) {
        return f64::from((*credit).min(100));
    }

    match &key.correct {
        Some(correct) if correct == label => 100.0,
        Some(_) => 0.0,
        None => {
            warn!(
                question_id = %question.id,
                answer = label,
                "choice question has no correct answer or partial credit configured; scoring 0"
            );
            0.0
        }
    }
}
