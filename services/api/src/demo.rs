use crate::infra::InMemorySessionRepository;
use career_fit::assessment::{
    Answer, AnswerFormat, AssessmentResult, AssessmentService, AssessmentServiceError,
    LIKERT_LABELS, Question, QuestionCatalog, Response, ResponseFormat, ResponseImporter,
};
use career_fit::error::AppError;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Saved response list (JSON array or CSV with question_id,answer,timestamp)
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Input format; guessed from the file extension when omitted
    #[arg(long, value_enum)]
    pub(crate) format: Option<InputFormat>,
    /// Print the raw result as JSON instead of the formatted report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Scripted respondent to walk through the assessment
    #[arg(long, value_enum, default_value_t = DemoProfile::Strong)]
    pub(crate) profile: DemoProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum InputFormat {
    Json,
    Csv,
}

impl From<InputFormat> for ResponseFormat {
    fn from(value: InputFormat) -> Self {
        match value {
            InputFormat::Json => ResponseFormat::Json,
            InputFormat::Csv => ResponseFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DemoProfile {
    /// Enthusiastic respondent who knows the material
    Strong,
    /// Neutral respondent with solid technical answers
    Borderline,
    /// Disinterested respondent who misses the technical questions
    Weak,
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    let catalog = QuestionCatalog::standard();
    let mut section = "";

    println!("Customer Insights Analyst assessment ({} questions)", catalog.len());
    for (index, question) in catalog.questions().iter().enumerate() {
        if question.section_label() != section {
            section = question.section_label();
            println!("\n{} | {}", question.category.label(), section);
        }
        println!("{:>2}. {}", index + 1, question.prompt);
        match &question.format {
            AnswerFormat::Likert { .. } => {
                let scale: Vec<String> = LIKERT_LABELS
                    .iter()
                    .map(|(value, label)| format!("{value}={label}"))
                    .collect();
                println!("    [{}]", scale.join(", "));
            }
            AnswerFormat::MultipleChoice { options, .. } => {
                for option in options {
                    println!("    - {option}");
                }
            }
        }
    }

    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        responses,
        format,
        json,
    } = args;

    let catalog = QuestionCatalog::standard();
    let format = format
        .map(ResponseFormat::from)
        .unwrap_or_else(|| ResponseFormat::from_path(&responses));
    let loaded = ResponseImporter::new(&catalog).from_path(&responses, format)?;
    let result = career_fit::assessment::evaluate(&loaded, &catalog)?;

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Result payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Scored {} responses from {}", loaded.len(), responses.display());
    if let Some(span) = response_span(&loaded) {
        println!("{span}");
    }
    for line in report_lines(&result) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Career fit demo ({:?} respondent)", args.profile);

    let service = AssessmentService::new(
        Arc::new(InMemorySessionRepository::default()),
        QuestionCatalog::standard(),
    );
    let result = run_scripted_session(&service, args.profile)?;
    for line in report_lines(&result) {
        println!("{line}");
    }

    Ok(())
}

/// Answer every question through the session collector, then submit.
pub(crate) fn run_scripted_session(
    service: &AssessmentService<InMemorySessionRepository>,
    profile: DemoProfile,
) -> Result<AssessmentResult, AssessmentServiceError> {
    let started = service.start()?;
    let session_id = started.session_id;
    let questions = service.catalog().questions().to_vec();

    for question in &questions {
        let Some(answer) = scripted_answer(question, profile) else {
            println!("  No scripted answer for {}", question.id);
            continue;
        };
        let view = service.answer(&session_id, question.id.clone(), answer)?;
        println!(
            "  [{:>3}%] {} -> answered",
            view.progress.percent, question.id
        );
    }

    service.submit(&session_id)
}

fn scripted_answer(question: &Question, profile: DemoProfile) -> Option<Answer> {
    match &question.format {
        AnswerFormat::Likert { scale } => Some(Answer::Rating(match profile {
            DemoProfile::Strong => scale.max,
            DemoProfile::Borderline => scale.min + (scale.max - scale.min) / 2,
            DemoProfile::Weak => scale.min,
        })),
        AnswerFormat::MultipleChoice { options, key } => {
            let correct = key.correct.as_ref();
            let label = match profile {
                DemoProfile::Strong => correct.or_else(|| options.first()),
                DemoProfile::Borderline => key
                    .partial_credit
                    .iter()
                    .find(|(_, credit)| **credit == 50)
                    .map(|(label, _)| label)
                    .or(correct),
                DemoProfile::Weak => {
                    let credit_of = |option: &String| {
                        key.partial_credit
                            .get(option)
                            .copied()
                            .unwrap_or(if Some(option) == correct { 100 } else { 0 })
                    };
                    options.iter().min_by_key(|option| credit_of(*option))
                }
            };
            label.cloned().map(Answer::Choice)
        }
    }
}

fn response_span(responses: &[Response]) -> Option<String> {
    let first = responses.iter().map(|response| response.timestamp).min()?;
    let last = responses.iter().map(|response| response.timestamp).max()?;
    Some(format!(
        "Answered between {} and {} UTC",
        first.format("%Y-%m-%d %H:%M"),
        last.format("%Y-%m-%d %H:%M")
    ))
}

pub(crate) fn report_lines(result: &AssessmentResult) -> Vec<String> {
    let scores = &result.scores;
    let mut lines = vec![
        String::new(),
        format!(
            "{} (should you pursue this career? {})",
            result.recommendation.title(),
            result.recommendation.answer()
        ),
        format!(
            "Overall {}% | confidence {}%",
            scores.overall, result.confidence
        ),
        format!(
            "Psychological fit {}% | Technical readiness {}%",
            scores.psychometric, scores.technical
        ),
        String::new(),
        "WISCAR profile".to_string(),
    ];

    for (facet, value) in scores.wiscar.iter() {
        lines.push(format!("- {}: {}%", facet.label(), value));
    }

    lines.push(String::new());
    lines.push(result.feedback.clone());

    lines.push(String::new());
    lines.push("Suggested career paths".to_string());
    lines.extend(result.career_paths.iter().map(|path| format!("- {path}")));

    lines.push(String::new());
    lines.push("Next steps".to_string());
    lines.extend(
        result
            .next_steps
            .iter()
            .enumerate()
            .map(|(index, step)| format!("{}. {step}", index + 1)),
    );

    lines.push(String::new());
    lines.push("Skill gaps".to_string());
    lines.extend(result.skill_gaps.iter().map(|gap| {
        format!(
            "- {} (importance {:?}, readiness {:?})",
            gap.skill, gap.importance, gap.readiness
        )
    }));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use career_fit::assessment::{Recommendation, RepositoryError};

    fn scripted(profile: DemoProfile) -> Result<AssessmentResult, AssessmentServiceError> {
        let service = AssessmentService::new(
            Arc::new(InMemorySessionRepository::default()),
            QuestionCatalog::standard(),
        );
        run_scripted_session(&service, profile)
    }

    #[test]
    fn scripted_profiles_land_in_their_tiers() {
        let strong = scripted(DemoProfile::Strong).expect("strong session");
        assert_eq!(strong.recommendation, Recommendation::Strong);
        assert_eq!(strong.scores.overall, 100);

        let borderline = scripted(DemoProfile::Borderline).expect("borderline");
        assert_eq!(borderline.recommendation, Recommendation::Borderline);
        assert_eq!(borderline.scores.overall, 67);
        assert_eq!(borderline.confidence, 34);
        assert_eq!(borderline.next_steps.len(), 4);

        let weak = scripted(DemoProfile::Weak).expect("weak session");
        assert_eq!(weak.recommendation, Recommendation::Weak);
        assert!(weak.feedback.contains("real world"));
    }

    #[test]
    fn failed_sessions_surface_as_errors() {
        let service = AssessmentService::with_capacity(
            Arc::new(InMemorySessionRepository::default()),
            QuestionCatalog::standard(),
            1,
        );
        service.start().expect("first session");

        let err = AppError::from(
            run_scripted_session(&service, DemoProfile::Strong).expect_err("no capacity left"),
        );
        assert!(matches!(
            err,
            AppError::Assessment(AssessmentServiceError::Repository(RepositoryError::Capacity(1)))
        ));
    }

    #[test]
    fn report_uses_titles_and_facet_labels() {
        let result = scripted(DemoProfile::Strong).expect("strong session");
        let lines = report_lines(&result);

        assert!(lines
            .iter()
            .any(|line| line.starts_with("Strong Match! (should you pursue this career? yes)")));
        assert!(lines.iter().any(|line| line == "- Ability to Learn: 100%"));
        assert!(lines.iter().any(|line| line == "- Customer Insights Analyst"));
        assert!(lines.iter().any(|line| line.starts_with("5. ")));
    }

    #[test]
    fn weak_respondent_picks_lowest_credit_options() {
        let catalog = QuestionCatalog::standard();
        let real_world = catalog
            .get(&"wiscar_realworld_1".into())
            .expect("real-world question");
        assert_eq!(
            scripted_answer(real_world, DemoProfile::Weak),
            Some(Answer::Choice(
                "Not very important - businesses can succeed without it".to_string()
            ))
        );

        let aptitude = catalog
            .get(&"tech_general_1".into())
            .expect("aptitude question");
        assert_eq!(
            scripted_answer(aptitude, DemoProfile::Weak),
            Some(Answer::Choice("550".to_string()))
        );
    }

    #[test]
    fn response_span_covers_first_and_last_answer() {
        use chrono::{TimeZone, Utc};

        let at = |minute| {
            Utc.with_ymd_and_hms(2025, 9, 24, 10, minute, 0)
                .single()
                .expect("valid timestamp")
        };
        let responses = vec![
            Response::new("psych_interest_2", Answer::Rating(3), at(7)),
            Response::new("psych_interest_1", Answer::Rating(4), at(2)),
        ];

        assert_eq!(
            response_span(&responses).as_deref(),
            Some("Answered between 2025-09-24 10:02 and 2025-09-24 10:07 UTC")
        );
        assert_eq!(response_span(&[]), None);
    }
}
