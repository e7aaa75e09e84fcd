use std::collections::HashSet;

use serde::Serialize;

use super::domain::{
    AnswerFormat, AnswerKey, Question, QuestionCategory, QuestionId, RatingScale, WiscarFacet,
};

/// Ordered, immutable question set presented to every respondent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The Customer Insights Analyst question set.
    pub fn standard() -> Self {
        Self::new(standard_questions())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| &question.id == id)
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Strict structural check. Unscored choice questions are reported here even though
    /// scoring tolerates them with an explicit zero.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();

        for question in &self.questions {
            if !seen.insert(&question.id) {
                return Err(CatalogError::DuplicateId(question.id.clone()));
            }

            if !(question.weight.is_finite() && question.weight > 0.0) {
                return Err(CatalogError::InvalidWeight {
                    question_id: question.id.clone(),
                    weight: question.weight,
                });
            }

            if question.category == QuestionCategory::Wiscar && question.facet().is_none() {
                return Err(CatalogError::UnknownFacet {
                    question_id: question.id.clone(),
                    subcategory: question.subcategory.clone(),
                });
            }

            match &question.format {
                AnswerFormat::Likert { scale } => {
                    if scale.min >= scale.max {
                        return Err(CatalogError::EmptyScale {
                            question_id: question.id.clone(),
                            scale: *scale,
                        });
                    }
                }
                AnswerFormat::MultipleChoice { options, key } => {
                    validate_choice(&question.id, options, key)?;
                }
            }
        }

        Ok(())
    }
}

fn validate_choice(
    question_id: &QuestionId,
    options: &[String],
    key: &AnswerKey,
) -> Result<(), CatalogError> {
    if options.is_empty() {
        return Err(CatalogError::MissingOptions(question_id.clone()));
    }

    if key.is_unscored() {
        return Err(CatalogError::UnscoredChoice(question_id.clone()));
    }

    let keyed = key.correct.iter().chain(key.partial_credit.keys());
    for label in keyed {
        if !options.contains(label) {
            return Err(CatalogError::UnknownKeyOption {
                question_id: question_id.clone(),
                label: label.clone(),
            });
        }
    }

    if let Some((label, credit)) = key.partial_credit.iter().find(|(_, credit)| **credit > 100) {
        return Err(CatalogError::CreditOutOfRange {
            question_id: question_id.clone(),
            label: label.clone(),
            credit: *credit,
        });
    }

    Ok(())
}

/// Structural defects in a question catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),
    #[error("question {question_id} has non-positive weight {weight}")]
    InvalidWeight { question_id: QuestionId, weight: f64 },
    #[error("question {question_id} names unknown WISCAR facet '{subcategory}'")]
    UnknownFacet {
        question_id: QuestionId,
        subcategory: String,
    },
    #[error("question {question_id} has an empty rating scale {}..={}", .scale.min, .scale.max)]
    EmptyScale {
        question_id: QuestionId,
        scale: RatingScale,
    },
    #[error("choice question {0} has no options")]
    MissingOptions(QuestionId),
    #[error("choice question {0} has no correct answer or partial credit configured")]
    UnscoredChoice(QuestionId),
    #[error("answer key for question {question_id} references unknown option '{label}'")]
    UnknownKeyOption {
        question_id: QuestionId,
        label: String,
    },
    #[error("partial credit {credit} for '{label}' on question {question_id} exceeds 100")]
    CreditOutOfRange {
        question_id: QuestionId,
        label: String,
        credit: u8,
    },
}

fn likert(
    id: &str,
    category: QuestionCategory,
    subcategory: &str,
    prompt: &str,
    weight: f64,
) -> Question {
    Question {
        id: QuestionId::from(id),
        category,
        subcategory: subcategory.to_string(),
        prompt: prompt.to_string(),
        format: AnswerFormat::Likert {
            scale: RatingScale::likert(),
        },
        weight,
    }
}

fn choice(
    id: &str,
    category: QuestionCategory,
    subcategory: &str,
    prompt: &str,
    options: &[&str],
    key: AnswerKey,
    weight: f64,
) -> Question {
    Question {
        id: QuestionId::from(id),
        category,
        subcategory: subcategory.to_string(),
        prompt: prompt.to_string(),
        format: AnswerFormat::MultipleChoice {
            options: options.iter().map(|option| option.to_string()).collect(),
            key,
        },
        weight,
    }
}

const REAL_WORLD_EXTREMELY: &str = "Extremely important - it drives all key business decisions";
const REAL_WORLD_VERY: &str = "Very important - it influences many decisions";
const REAL_WORLD_MODERATELY: &str = "Moderately important - useful but not critical";
const REAL_WORLD_NOT_VERY: &str = "Not very important - businesses can succeed without it";

fn standard_questions() -> Vec<Question> {
    use QuestionCategory::{Psychometric, Technical, Wiscar};

    vec![
        likert(
            "psych_interest_1",
            Psychometric,
            "interest",
            "I find it fascinating to understand why customers behave the way they do.",
            1.2,
        ),
        likert(
            "psych_interest_2",
            Psychometric,
            "interest",
            "I enjoy analyzing patterns in data to discover insights.",
            1.1,
        ),
        likert(
            "psych_interest_3",
            Psychometric,
            "interest",
            "I would be excited to present data findings to business stakeholders.",
            1.0,
        ),
        likert(
            "psych_personality_1",
            Psychometric,
            "personality",
            "I prefer structured, step-by-step approaches to solving problems.",
            1.0,
        ),
        likert(
            "psych_personality_2",
            Psychometric,
            "personality",
            "I am naturally curious and like to ask \"why\" questions.",
            1.1,
        ),
        likert(
            "psych_personality_3",
            Psychometric,
            "personality",
            "I pay close attention to details and accuracy in my work.",
            1.2,
        ),
        choice(
            "tech_general_1",
            Technical,
            "general_aptitude",
            "If a survey of 1000 customers shows 65% satisfaction, approximately how many customers were satisfied?",
            &["550", "650", "750", "850"],
            AnswerKey::correct("650"),
            1.0,
        ),
        choice(
            "tech_general_2",
            Technical,
            "general_aptitude",
            "What does it mean when we say data shows a \"correlation\" between two variables?",
            &[
                "One causes the other",
                "They tend to change together",
                "They are exactly the same",
                "They are completely unrelated",
            ],
            AnswerKey::correct("They tend to change together"),
            1.1,
        ),
        choice(
            "tech_domain_1",
            Technical,
            "domain_knowledge",
            "What is an NPS (Net Promoter Score)?",
            &[
                "A measure of customer loyalty and satisfaction",
                "A sales performance metric",
                "A website traffic measurement",
                "A social media engagement score",
            ],
            AnswerKey::correct("A measure of customer loyalty and satisfaction"),
            1.2,
        ),
        choice(
            "tech_domain_2",
            Technical,
            "domain_knowledge",
            "What is the main difference between qualitative and quantitative data?",
            &[
                "Qualitative is numerical, quantitative is descriptive",
                "Qualitative is descriptive, quantitative is numerical",
                "There is no difference",
                "Qualitative is more reliable than quantitative",
            ],
            AnswerKey::correct("Qualitative is descriptive, quantitative is numerical"),
            1.1,
        ),
        likert(
            "wiscar_will_1",
            Wiscar,
            "will",
            "I am highly motivated to develop skills in data analysis and customer research.",
            1.2,
        ),
        likert(
            "wiscar_will_2",
            Wiscar,
            "will",
            "I would be willing to spend evenings and weekends learning new analytics tools.",
            1.0,
        ),
        likert(
            "wiscar_interest_1",
            Wiscar,
            "interest",
            "I enjoy exploring consumer psychology and behavioral economics.",
            1.1,
        ),
        likert(
            "wiscar_skill_1",
            Wiscar,
            "skill",
            "I am comfortable using Excel or Google Sheets for data analysis.",
            1.0,
        ),
        likert(
            "wiscar_cognitive_1",
            Wiscar,
            "cognitive",
            "I can easily spot trends and patterns in data or information.",
            1.1,
        ),
        likert(
            "wiscar_learning_1",
            Wiscar,
            WiscarFacet::AbilityToLearn.key(),
            "I learn new software and tools quickly and enjoy the challenge.",
            1.0,
        ),
        choice(
            "wiscar_realworld_1",
            Wiscar,
            WiscarFacet::RealWorld.key(),
            "How important is understanding customer behavior for business success?",
            &[
                REAL_WORLD_EXTREMELY,
                REAL_WORLD_VERY,
                REAL_WORLD_MODERATELY,
                REAL_WORLD_NOT_VERY,
            ],
            AnswerKey::correct(REAL_WORLD_EXTREMELY)
                .with_partial_credit(REAL_WORLD_EXTREMELY, 100)
                .with_partial_credit(REAL_WORLD_VERY, 75)
                .with_partial_credit(REAL_WORLD_MODERATELY, 50)
                .with_partial_credit(REAL_WORLD_NOT_VERY, 25),
            1.1,
        ),
    ]
}
