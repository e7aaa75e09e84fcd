use super::super::domain::WiscarFacet;
use super::super::scoring::AssessmentScores;
use super::{Importance, Readiness, Recommendation, SkillGap};

const MAX_CAREER_PATHS: usize = 5;

const FALLBACK_CAREER_PATHS: [&str; 3] = [
    "Data-Driven Marketing Specialist",
    "Business Analyst",
    "Product Research Coordinator",
];

struct PathRule {
    applies: fn(&AssessmentScores) -> bool,
    paths: &'static [&'static str],
}

/// Checked in order; the order defines the ranking of suggested paths.
fn career_path_rules() -> [PathRule; 5] {
    [
        PathRule {
            applies: |scores| scores.overall >= 60,
            paths: &["Customer Insights Analyst"],
        },
        PathRule {
            applies: |scores| scores.technical >= 65,
            paths: &["Marketing Data Analyst"],
        },
        PathRule {
            applies: |scores| scores.psychometric >= 70,
            paths: &["Market Research Analyst", "Consumer Behavior Specialist"],
        },
        PathRule {
            applies: |scores| scores.wiscar.cognitive >= 75,
            paths: &["Business Intelligence Analyst"],
        },
        PathRule {
            applies: |scores| scores.wiscar.interest >= 80,
            paths: &["UX Research Analyst"],
        },
    ]
}

pub(crate) fn career_paths(scores: &AssessmentScores) -> Vec<String> {
    let mut paths: Vec<String> = career_path_rules()
        .into_iter()
        .filter(|rule| (rule.applies)(scores))
        .flat_map(|rule| rule.paths.iter().map(|path| path.to_string()))
        .take(MAX_CAREER_PATHS)
        .collect();

    if paths.is_empty() {
        paths = FALLBACK_CAREER_PATHS
            .iter()
            .map(|path| path.to_string())
            .collect();
    }

    paths
}

pub(crate) fn feedback(scores: &AssessmentScores, tier: Recommendation) -> String {
    let AssessmentScores {
        psychometric,
        technical,
        ..
    } = *scores;

    match tier {
        Recommendation::Strong => format!(
            "Excellent! You demonstrate strong alignment with Customer Insights Analyst roles. \
             Your psychological fit ({psychometric}%) and technical readiness ({technical}%) \
             indicate you're well-positioned to succeed in this field. Your high motivation and \
             analytical thinking make you an ideal candidate."
        ),
        Recommendation::Borderline if psychometric > technical => {
            "You show good personality fit for analytics roles, but your technical skills need \
             development. Focus on building foundational data analysis skills through courses in \
             Excel, statistics, and data visualization tools."
                .to_string()
        }
        Recommendation::Borderline => {
            "Your technical aptitude is promising, but consider whether your interests and \
             motivations align with day-to-day customer insights work. Explore the field more \
             through informational interviews or project-based learning."
                .to_string()
        }
        Recommendation::Weak => {
            let strength = strongest_facet(scores)
                .map(WiscarFacet::phrase)
                .unwrap_or("your broader profile");
            format!(
                "Based on your responses, Customer Insights Analysis may not be the best fit. \
                 However, your strength in {strength} suggests you might excel in related fields \
                 like UX research, marketing strategy, or data-driven product management."
            )
        }
    }
}

/// Highest-scoring facet; ties keep the earlier facet and an all-zero profile has none.
fn strongest_facet(scores: &AssessmentScores) -> Option<WiscarFacet> {
    let mut best: Option<(WiscarFacet, u8)> = None;
    for (facet, score) in scores.wiscar.iter() {
        let current = best.map(|(_, value)| value).unwrap_or(0);
        if score > current {
            best = Some((facet, score));
        }
    }
    best.map(|(facet, _)| facet)
}

pub(crate) fn next_steps(scores: &AssessmentScores, tier: Recommendation) -> Vec<String> {
    let steps: Vec<&str> = match tier {
        Recommendation::Strong => vec![
            "Start with advanced Excel and Google Sheets courses",
            "Learn SQL for database querying",
            "Study customer psychology and behavioral economics",
            "Practice data visualization with Tableau or Power BI",
            "Build a portfolio with real customer analysis projects",
        ],
        Recommendation::Borderline => {
            let mut steps = Vec::new();
            if scores.technical < 60 {
                steps.extend([
                    "Begin with Excel basics and data analysis fundamentals",
                    "Take an introductory statistics course",
                    "Learn survey design and analysis methods",
                ]);
            }
            if scores.psychometric < 60 {
                steps.extend([
                    "Explore customer research through online courses",
                    "Shadow a current analyst or researcher",
                    "Read case studies in consumer behavior",
                ]);
            }
            steps.push("Consider informational interviews with professionals in the field");
            steps
        }
        Recommendation::Weak => vec![
            "Explore alternative careers in marketing or business analysis",
            "Consider UX research or product management paths",
            "Develop foundational business and analytical thinking skills",
            "Take personality and career assessments to find better-aligned roles",
        ],
    };

    steps.into_iter().map(str::to_string).collect()
}

pub(crate) fn skill_gaps(scores: &AssessmentScores) -> Vec<SkillGap> {
    let gap = |skill: &str, importance: Importance, source: u8| SkillGap {
        skill: skill.to_string(),
        importance,
        readiness: Readiness::from_score(source),
    };

    vec![
        gap("Excel/Data Analysis Tools", Importance::High, scores.technical),
        gap(
            "Customer Psychology Understanding",
            Importance::Medium,
            scores.wiscar.interest,
        ),
        gap(
            "Data Storytelling & Visualization",
            Importance::High,
            scores.wiscar.cognitive,
        ),
        gap("Statistical Analysis", Importance::Medium, scores.technical),
    ]
}
