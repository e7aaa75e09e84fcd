use super::super::scoring::{round_percent, AssessmentScores};
use super::Recommendation;

struct TierRule {
    tier: Recommendation,
    applies: fn(&AssessmentScores) -> bool,
}

/// Evaluated top-down; the first matching rule wins and anything else is weak.
fn tier_ladder() -> [TierRule; 2] {
    [
        TierRule {
            tier: Recommendation::Strong,
            applies: |scores| {
                scores.overall >= 75 && scores.psychometric >= 70 && scores.technical >= 60
            },
        },
        TierRule {
            tier: Recommendation::Borderline,
            applies: |scores| {
                scores.overall >= 60 && (scores.psychometric >= 60 || scores.technical >= 50)
            },
        },
    ]
}

pub(crate) fn decide_tier(scores: &AssessmentScores) -> Recommendation {
    tier_ladder()
        .into_iter()
        .find(|rule| (rule.applies)(scores))
        .map(|rule| rule.tier)
        .unwrap_or(Recommendation::Weak)
}

/// Agreement between psychometric, technical and the facet mean, blended with the overall score.
pub(crate) fn confidence(scores: &AssessmentScores) -> u8 {
    let components = [
        f64::from(scores.psychometric),
        f64::from(scores.technical),
        scores.wiscar.mean(),
    ];
    let count = components.len() as f64;
    let mean = components.iter().sum::<f64>() / count;
    let variance = components
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;

    let consistency = (100.0 - variance * 2.0).max(0.0);
    round_percent((consistency + f64::from(scores.overall)) / 2.0)
}
