use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog questions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Top-level grouping for questions. Psychometric items measure trait fit, technical items
/// measure aptitude, and WISCAR items feed the six framework facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Psychometric,
    Technical,
    Wiscar,
}

impl QuestionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionCategory::Psychometric => "psychometric",
            QuestionCategory::Technical => "technical",
            QuestionCategory::Wiscar => "wiscar",
        }
    }
}

/// Facets of the WISCAR framework, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiscarFacet {
    Will,
    Interest,
    Skill,
    Cognitive,
    AbilityToLearn,
    RealWorld,
}

impl WiscarFacet {
    pub const ALL: [WiscarFacet; 6] = [
        WiscarFacet::Will,
        WiscarFacet::Interest,
        WiscarFacet::Skill,
        WiscarFacet::Cognitive,
        WiscarFacet::AbilityToLearn,
        WiscarFacet::RealWorld,
    ];

    /// Subcategory key used by catalog questions.
    pub const fn key(self) -> &'static str {
        match self {
            WiscarFacet::Will => "will",
            WiscarFacet::Interest => "interest",
            WiscarFacet::Skill => "skill",
            WiscarFacet::Cognitive => "cognitive",
            WiscarFacet::AbilityToLearn => "ability_to_learn",
            WiscarFacet::RealWorld => "real_world",
        }
    }

    /// Lower-case phrase for use inside sentences.
    pub const fn phrase(self) -> &'static str {
        match self {
            WiscarFacet::Will => "will",
            WiscarFacet::Interest => "interest",
            WiscarFacet::Skill => "skill",
            WiscarFacet::Cognitive => "cognitive",
            WiscarFacet::AbilityToLearn => "ability to learn",
            WiscarFacet::RealWorld => "real world",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WiscarFacet::Will => "Will",
            WiscarFacet::Interest => "Interest",
            WiscarFacet::Skill => "Skill",
            WiscarFacet::Cognitive => "Cognitive",
            WiscarFacet::AbilityToLearn => "Ability to Learn",
            WiscarFacet::RealWorld => "Real World",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.key() == key)
    }
}

/// Inclusive integer range accepted by a rating question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: i64,
    pub max: i64,
}

/// Labels shown for the default five-point agreement scale.
pub const LIKERT_LABELS: [(i64, &str); 5] = [
    (1, "Strongly Disagree"),
    (2, "Disagree"),
    (3, "Neutral"),
    (4, "Agree"),
    (5, "Strongly Agree"),
];

impl RatingScale {
    pub const fn likert() -> Self {
        Self { min: 1, max: 5 }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Linear rescale of `value` onto 0-100. Callers check `contains` first.
    pub fn normalize(&self, value: i64) -> f64 {
        let span = (self.max - self.min) as f64;
        if span <= 0.0 {
            return 0.0;
        }
        (value - self.min) as f64 / span * 100.0
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::likert()
    }
}

/// Scoring configuration attached to a single-choice question.
///
/// Partial credit takes precedence; any other answer is compared with `correct`. A key with
/// neither configured marks the question as unscored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub partial_credit: BTreeMap<String, u8>,
}

impl AnswerKey {
    pub fn correct(answer: &str) -> Self {
        Self {
            correct: Some(answer.to_string()),
            partial_credit: BTreeMap::new(),
        }
    }

    pub fn unscored() -> Self {
        Self::default()
    }

    pub fn with_partial_credit(mut self, answer: &str, credit: u8) -> Self {
        self.partial_credit.insert(answer.to_string(), credit);
        self
    }

    pub fn is_unscored(&self) -> bool {
        self.correct.is_none() && self.partial_credit.is_empty()
    }
}

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerFormat {
    Likert {
        #[serde(default)]
        scale: RatingScale,
    },
    MultipleChoice {
        options: Vec<String>,
        #[serde(default)]
        key: AnswerKey,
    },
}

impl AnswerFormat {
    pub const fn label(&self) -> &'static str {
        match self {
            AnswerFormat::Likert { .. } => "likert",
            AnswerFormat::MultipleChoice { .. } => "multiple_choice",
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: QuestionCategory,
    pub subcategory: String,
    pub prompt: String,
    #[serde(flatten)]
    pub format: AnswerFormat,
    pub weight: f64,
}

impl Question {
    pub fn options(&self) -> Option<&[String]> {
        match &self.format {
            AnswerFormat::MultipleChoice { options, .. } => Some(options),
            AnswerFormat::Likert { .. } => None,
        }
    }

    /// Facet fed by this question, when it is a WISCAR item with a known subcategory.
    pub fn facet(&self) -> Option<WiscarFacet> {
        match self.category {
            QuestionCategory::Wiscar => WiscarFacet::from_key(&self.subcategory),
            _ => None,
        }
    }

    /// Section heading used when presenting the question.
    pub fn section_label(&self) -> &'static str {
        match (self.category, self.subcategory.as_str()) {
            (QuestionCategory::Psychometric, "interest") => "Interest Assessment",
            (QuestionCategory::Psychometric, _) => "Personality Fit",
            (QuestionCategory::Technical, "general_aptitude") => "General Aptitude",
            (QuestionCategory::Technical, _) => "Domain Knowledge",
            (QuestionCategory::Wiscar, _) => "WISCAR Framework",
        }
    }
}

/// Raw answer value: a rating on the question's scale or an option label taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Rating(i64),
    Choice(String),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Rating(value) => write!(f, "{value}"),
            Answer::Choice(label) => write!(f, "'{label}'"),
        }
    }
}

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(alias = "questionId")]
    pub question_id: QuestionId,
    pub answer: Answer,
    pub timestamp: DateTime<Utc>,
}

impl Response {
    pub fn new(question_id: impl Into<String>, answer: Answer, timestamp: DateTime<Utc>) -> Self {
        Self {
            question_id: QuestionId(question_id.into()),
            answer,
            timestamp,
        }
    }
}
