mod guidance;
mod policy;

use serde::{Deserialize, Serialize};

use super::scoring::AssessmentScores;

/// Three-valued fit recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    #[serde(alias = "yes")]
    Strong,
    #[serde(alias = "maybe")]
    Borderline,
    #[serde(alias = "no")]
    Weak,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Strong => "strong",
            Recommendation::Borderline => "borderline",
            Recommendation::Weak => "weak",
        }
    }

    /// The yes/maybe/no answer to "should I pursue this career?".
    pub const fn answer(self) -> &'static str {
        match self {
            Recommendation::Strong => "yes",
            Recommendation::Borderline => "maybe",
            Recommendation::Weak => "no",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Recommendation::Strong => "Strong Match!",
            Recommendation::Borderline => "Potential Fit",
            Recommendation::Weak => "Consider Alternatives",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    High,
    Moderate,
    Low,
}

impl Readiness {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => Readiness::High,
            50..=74 => Readiness::Moderate,
            _ => Readiness::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub importance: Importance,
    pub readiness: Readiness,
}

/// Terminal output of an assessment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub scores: AssessmentScores,
    pub recommendation: Recommendation,
    pub confidence: u8,
    pub feedback: String,
    pub career_paths: Vec<String>,
    pub next_steps: Vec<String>,
    pub skill_gaps: Vec<SkillGap>,
}

/// Derive every recommendation field from the scores alone.
pub fn recommend(scores: AssessmentScores) -> AssessmentResult {
    let recommendation = policy::decide_tier(&scores);

    AssessmentResult {
        recommendation,
        confidence: policy::confidence(&scores),
        feedback: guidance::feedback(&scores, recommendation),
        career_paths: guidance::career_paths(&scores),
        next_steps: guidance::next_steps(&scores, recommendation),
        skill_gaps: guidance::skill_gaps(&scores),
        scores,
    }
}
