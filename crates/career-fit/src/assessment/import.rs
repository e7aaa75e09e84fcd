use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use super::catalog::QuestionCatalog;
use super::domain::{Answer, AnswerFormat, QuestionId, Response};

/// Encoding of a saved response list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Csv,
}

impl ResponseFormat {
    /// Guess from the file extension, defaulting to JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => ResponseFormat::Csv,
            _ => ResponseFormat::Json,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseImportError {
    #[error("failed to read responses: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid response CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unparsable timestamp '{value}'")]
    Timestamp { row: usize, value: String },
}

/// Loads response lists saved by a collector (JSON array) or exported to CSV with the headers
/// `question_id,answer,timestamp`.
///
/// CSV cells are untyped, so answers are read against the catalog: choice questions keep the
/// raw label and everything else is read as a rating when it parses as an integer.
pub struct ResponseImporter<'c> {
    catalog: &'c QuestionCatalog,
}

impl<'c> ResponseImporter<'c> {
    pub fn new(catalog: &'c QuestionCatalog) -> Self {
        Self { catalog }
    }

    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
        format: ResponseFormat,
    ) -> Result<Vec<Response>, ResponseImportError> {
        let file = std::fs::File::open(path)?;
        self.from_reader(file, format)
    }

    pub fn from_reader<R: Read>(
        &self,
        reader: R,
        format: ResponseFormat,
    ) -> Result<Vec<Response>, ResponseImportError> {
        match format {
            ResponseFormat::Json => Ok(serde_json::from_reader(reader)?),
            ResponseFormat::Csv => self.parse_csv(reader),
        }
    }

    fn parse_csv<R: Read>(&self, reader: R) -> Result<Vec<Response>, ResponseImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut responses = Vec::new();

        for (index, record) in csv_reader.deserialize::<ResponseRow>().enumerate() {
            let row = record?;
            let timestamp =
                parse_timestamp(&row.timestamp).ok_or_else(|| ResponseImportError::Timestamp {
                    row: index + 1,
                    value: row.timestamp.clone(),
                })?;
            let question_id = QuestionId(row.question_id);
            let answer = self.interpret_answer(&question_id, row.answer);

            responses.push(Response {
                question_id,
                answer,
                timestamp,
            });
        }

        Ok(responses)
    }

    fn interpret_answer(&self, question_id: &QuestionId, raw: String) -> Answer {
        let is_choice = matches!(
            self.catalog.get(question_id).map(|question| &question.format),
            Some(AnswerFormat::MultipleChoice { .. })
        );
        if is_choice {
            return Answer::Choice(raw);
        }

        match raw.parse::<i64>() {
            Ok(rating) => Answer::Rating(rating),
            Err(_) => Answer::Choice(raw),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseRow {
    question_id: String,
    answer: String,
    timestamp: String,
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn csv_rows_split_ratings_and_choices() {
        let csv = "question_id,answer,timestamp\n\
                   psych_interest_1,4,2025-09-24T10:00:00Z\n\
                   tech_general_1,650,2025-09-24 10:01:00\n\
                   tech_general_2,They tend to change together,2025-09-24\n";

        let catalog = QuestionCatalog::standard();
        let responses = ResponseImporter::new(&catalog)
            .from_reader(Cursor::new(csv), ResponseFormat::Csv)
            .expect("parses");

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].answer, Answer::Rating(4));
        assert_eq!(responses[1].answer, Answer::Choice("650".to_string()));
        assert_eq!(
            responses[2].answer,
            Answer::Choice("They tend to change together".to_string())
        );
    }

    #[test]
    fn csv_unknown_questions_fall_back_to_numeric_guess() {
        let csv = "question_id,answer,timestamp\nretired_1,\"3\",2025-09-24\nretired_2,Often,2025-09-24\n";
        let catalog = QuestionCatalog::standard();
        let responses = ResponseImporter::new(&catalog)
            .from_reader(Cursor::new(csv), ResponseFormat::Csv)
            .expect("parses");
        assert_eq!(responses[0].answer, Answer::Rating(3));
        assert_eq!(responses[1].answer, Answer::Choice("Often".to_string()));
    }

    #[test]
    fn csv_rejects_bad_timestamps() {
        let csv = "question_id,answer,timestamp\npsych_interest_1,4,yesterday\n";
        let catalog = QuestionCatalog::standard();
        match ResponseImporter::new(&catalog).from_reader(Cursor::new(csv), ResponseFormat::Csv) {
            Err(ResponseImportError::Timestamp { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ResponseFormat::from_path("answers.CSV"), ResponseFormat::Csv);
        assert_eq!(ResponseFormat::from_path("answers.json"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_path("answers"), ResponseFormat::Json);
    }
}
