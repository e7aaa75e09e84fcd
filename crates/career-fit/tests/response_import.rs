use career_fit::assessment::{
    evaluate, Answer, QuestionCatalog, Recommendation, ResponseFormat, ResponseImportError,
    ResponseImporter, WiscarFacet,
};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

#[test]
fn csv_export_imports_and_scores_as_strong_match() {
    let catalog = QuestionCatalog::standard();
    let path = format!("{FIXTURES}/strong_candidate.csv");
    let responses = ResponseImporter::new(&catalog)
        .from_path(&path, ResponseFormat::from_path(&path))
        .expect("csv fixture imports");

    assert_eq!(responses.len(), 18);
    assert_eq!(
        responses[9].answer,
        Answer::Choice("Qualitative is descriptive, quantitative is numerical".to_string())
    );

    let result = evaluate(&responses, &catalog).expect("fixture answers are valid");
    assert_eq!(result.scores.psychometric, 96);
    assert_eq!(result.scores.technical, 100);
    assert_eq!(result.scores.wiscar.will, 89);
    assert_eq!(result.scores.wiscar.get(WiscarFacet::RealWorld), 75);
    assert_eq!(result.scores.overall, 94);
    assert_eq!(result.recommendation, Recommendation::Strong);
    assert_eq!(result.confidence, 61);
    assert_eq!(result.career_paths.len(), 5);
}

#[test]
fn json_export_imports_and_scores_as_weak_match() {
    let catalog = QuestionCatalog::standard();
    let path = format!("{FIXTURES}/weak_candidate.json");
    let responses = ResponseImporter::new(&catalog)
        .from_path(&path, ResponseFormat::from_path(&path))
        .expect("json fixture imports");

    assert_eq!(responses.len(), 17);

    let result = evaluate(&responses, &catalog).expect("fixture answers are valid");
    assert_eq!(result.scores.psychometric, 25);
    assert_eq!(result.scores.technical, 0);
    assert_eq!(result.scores.overall, 22);
    assert_eq!(result.recommendation, Recommendation::Weak);
    assert!(result.feedback.contains("your strength in ability to learn"));
    assert_eq!(result.career_paths[0], "Data-Driven Marketing Specialist");
}

#[test]
fn missing_files_surface_io_errors() {
    let catalog = QuestionCatalog::standard();
    let err = ResponseImporter::new(&catalog)
        .from_path(format!("{FIXTURES}/absent.json"), ResponseFormat::Json)
        .expect_err("file does not exist");
    assert!(matches!(err, ResponseImportError::Io(_)));
}

#[test]
fn malformed_json_is_reported() {
    let catalog = QuestionCatalog::standard();
    let err = ResponseImporter::new(&catalog)
        .from_reader(&b"{\"responses\": []}"[..], ResponseFormat::Json)
        .expect_err("object instead of array");
    assert!(matches!(err, ResponseImportError::Json(_)));
}
