//! Offline backend with canned responses, for trying the client without a
//! running server.

use serde_json::Value;

use super::{ClientError, UploadForm};
use crate::model::{SyllabusStatus, TextbookStatus, UploadSummary, ValidationResult};

pub const DEMO_QUESTION_PAPER_PATH: &str = "demo_mode";

pub fn upload(form: &UploadForm) -> Result<UploadSummary, ClientError> {
    if form.syllabus.is_none() || form.question_paper.is_none() {
        return Err(ClientError::MissingFiles);
    }
    Ok(UploadSummary {
        syllabus_docs: 12,
        textbook_docs: 450,
        question_paper_path: DEMO_QUESTION_PAPER_PATH.to_string(),
    })
}

fn record(
    id: &str,
    text: &str,
    syllabus: SyllabusStatus,
    syllabus_reasoning: &str,
    textbook: TextbookStatus,
    textbook_reasoning: &str,
) -> ValidationResult {
    ValidationResult {
        question_id: Value::String(id.to_string()).into(),
        question_text: text.to_string().into(),
        syllabus_status: syllabus.into(),
        syllabus_reasoning: syllabus_reasoning.to_string().into(),
        textbook_status: textbook.into(),
        textbook_reasoning: textbook_reasoning.to_string().into(),
        extra: Default::default(),
    }
}

pub fn results() -> Vec<ValidationResult> {
    vec![
        record(
            "Unit I - 1a",
            "Define Software Engineering. Discuss the four important attributes and ethical responsibilities.",
            SyllabusStatus::InSyllabus,
            "This question is covered under Unit I 'Professional software development' and 'Software engineering ethics' sections.",
            TextbookStatus::InTextbook,
            "Chapter 1 of the textbook covers software engineering definitions and professional ethics in detail.",
        ),
        record(
            "Unit I - 1b",
            "Explain the working of a waterfall model with a neat diagram.",
            SyllabusStatus::InSyllabus,
            "Covered under Unit I 'Software process models' section.",
            TextbookStatus::InTextbook,
            "Chapter 2 section 2.1 explains waterfall model with diagrams.",
        ),
        record(
            "Unit II - 2a",
            "What is advanced quantum computing in software?",
            SyllabusStatus::OutOfSyllabus,
            "Quantum computing is not mentioned in any syllabus unit.",
            TextbookStatus::NotApplicable,
            "",
        ),
    ]
}
