//! Weighted category scoring for a response list.
//!
//! Every answered catalog question contributes `item_score * weight` to its category (or
//! WISCAR facet), and each bucket resolves to `round(sum / weight)`. The overall score averages
//! the two scalar categories with the facet mean, so the six facets together carry one third of
//! the overall and each facet 1/18.

pub(crate) mod rules;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::QuestionCatalog;
use super::domain::{Answer, AnswerFormat, QuestionCategory, QuestionId, Response, WiscarFacet};

/// Category-level percentages for one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessmentScores {
    pub psychometric: u8,
    pub technical: u8,
    pub wiscar: WiscarScores,
    pub overall: u8,
}

/// Per-facet percentages within the WISCAR framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WiscarScores {
    pub will: u8,
    pub interest: u8,
    pub skill: u8,
    pub cognitive: u8,
    pub ability_to_learn: u8,
    pub real_world: u8,
}

impl WiscarScores {
    pub fn get(&self, facet: WiscarFacet) -> u8 {
        match facet {
            WiscarFacet::Will => self.will,
            WiscarFacet::Interest => self.interest,
            WiscarFacet::Skill => self.skill,
            WiscarFacet::Cognitive => self.cognitive,
            WiscarFacet::AbilityToLearn => self.ability_to_learn,
            WiscarFacet::RealWorld => self.real_world,
        }
    }

    fn slot(&mut self, facet: WiscarFacet) -> &mut u8 {
        match facet {
            WiscarFacet::Will => &mut self.will,
            WiscarFacet::Interest => &mut self.interest,
            WiscarFacet::Skill => &mut self.skill,
            WiscarFacet::Cognitive => &mut self.cognitive,
            WiscarFacet::AbilityToLearn => &mut self.ability_to_learn,
            WiscarFacet::RealWorld => &mut self.real_world,
        }
    }

    /// Facet scores in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (WiscarFacet, u8)> + '_ {
        WiscarFacet::ALL.into_iter().map(|facet| (facet, self.get(facet)))
    }

    /// Unrounded mean of the six facets.
    pub fn mean(&self) -> f64 {
        let total: f64 = self.iter().map(|(_, score)| f64::from(score)).sum();
        total / WiscarFacet::ALL.len() as f64
    }
}

impl AssessmentScores {
    /// Builds a score set from explicit component values, deriving `overall`.
    pub fn from_components(psychometric: u8, technical: u8, wiscar: WiscarScores) -> Self {
        let overall = round_percent(
            (f64::from(psychometric) + f64::from(technical) + wiscar.mean()) / 3.0,
        );
        Self {
            psychometric,
            technical,
            wiscar,
            overall,
        }
    }
}

/// Description of the values a question accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    Rating { min: i64, max: i64 },
    OneOf { options: Vec<String> },
}

impl Expectation {
    pub(crate) fn for_format(format: &AnswerFormat) -> Self {
        match format {
            AnswerFormat::Likert { scale } => Expectation::Rating {
                min: scale.min,
                max: scale.max,
            },
            AnswerFormat::MultipleChoice { options, .. } => Expectation::OneOf {
                options: options.clone(),
            },
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Rating { min, max } => write!(f, "a rating in {min}..={max}"),
            Expectation::OneOf { options } => {
                let quoted: Vec<String> = options.iter().map(|option| format!("'{option}'")).collect();
                write!(f, "one of [{}]", quoted.join(", "))
            }
        }
    }
}

/// Malformed answer supplied for a catalog question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid answer {value} for question {question_id}: expected {expected}")]
    InvalidAnswerValue {
        question_id: QuestionId,
        value: Answer,
        expected: Expectation,
    },
}

impl ValidationError {
    pub fn question_id(&self) -> &QuestionId {
        match self {
            ValidationError::InvalidAnswerValue { question_id, .. } => question_id,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    weighted: f64,
    weight: f64,
}

impl Tally {
    fn add(&mut self, score: f64, weight: f64) {
        self.weighted += score * weight;
        self.weight += weight;
    }

    fn percent(&self) -> u8 {
        if self.weight > 0.0 {
            round_percent(self.weighted / self.weight)
        } else {
            0
        }
    }
}

pub(crate) fn round_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Resolve duplicate answers: the latest timestamp wins, ties go to the later list entry.
fn latest_responses(responses: &[Response]) -> HashMap<&QuestionId, &Response> {
    let mut latest: HashMap<&QuestionId, &Response> = HashMap::with_capacity(responses.len());
    for response in responses {
        match latest.get(&response.question_id) {
            Some(existing) if existing.timestamp > response.timestamp => {}
            _ => {
                latest.insert(&response.question_id, response);
            }
        }
    }
    latest
}

/// Score `responses` against `catalog`.
///
/// Questions without a response are skipped and do not enter any denominator. Responses for ids
/// missing from the catalog are ignored.
pub fn score(
    responses: &[Response],
    catalog: &QuestionCatalog,
) -> Result<AssessmentScores, ValidationError> {
    let latest = latest_responses(responses);

    for id in latest.keys() {
        if catalog.get(id).is_none() {
            debug!(question_id = %id, "ignoring response for question missing from catalog");
        }
    }

    let mut psychometric = Tally::default();
    let mut technical = Tally::default();
    let mut facets: HashMap<WiscarFacet, Tally> = HashMap::new();

    for question in catalog.questions() {
        let Some(response) = latest.get(&question.id) else {
            continue;
        };

        let item = rules::item_score(question, &response.answer)?;

        match question.category {
            QuestionCategory::Psychometric => psychometric.add(item, question.weight),
            QuestionCategory::Technical => technical.add(item, question.weight),
            QuestionCategory::Wiscar => match question.facet() {
                Some(facet) => facets.entry(facet).or_default().add(item, question.weight),
                None => debug!(
                    question_id = %question.id,
                    subcategory = %question.subcategory,
                    "WISCAR question names no known facet; excluded from scoring"
                ),
            },
        }
    }

    let mut wiscar = WiscarScores::default();
    for (facet, tally) in &facets {
        *wiscar.slot(*facet) = tally.percent();
    }

    let scores =
        AssessmentScores::from_components(psychometric.percent(), technical.percent(), wiscar);

    debug!(
        answered = latest.len(),
        psychometric = scores.psychometric,
        technical = scores.technical,
        overall = scores.overall,
        "scored assessment responses"
    );

    Ok(scores)
}
