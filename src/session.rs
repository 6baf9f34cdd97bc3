use std::path::Path;

use crate::client::{Backend, ClientError, UploadForm};
use crate::filter::{self, StatusFilter};
use crate::model::{SummaryStats, UploadSummary, ValidationResult};

/// One client session: the stored question-paper path from the last upload
/// and the results of the last validation.
#[derive(Clone, Debug)]
pub struct Session {
    backend: Backend,
    question_paper_path: Option<String>,
    results: Vec<ValidationResult>,
}

impl Session {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            question_paper_path: None,
            results: Vec::new(),
        }
    }

    pub fn question_paper_path(&self) -> Option<&str> {
        self.question_paper_path.as_deref()
    }

    /// Use a question paper that is already stored on the server.
    pub fn set_question_paper_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.question_paper_path = if path.trim().is_empty() {
            None
        } else {
            Some(path)
        };
    }

    pub async fn handle_upload(&mut self, form: &UploadForm) -> Result<UploadSummary, ClientError> {
        if form.syllabus.is_none() || form.question_paper.is_none() {
            return Err(ClientError::MissingFiles);
        }
        let summary = self.backend.upload(form).await?;
        self.set_question_paper_path(summary.question_paper_path.clone());
        Ok(summary)
    }

    /// Runs validation for the stored question paper. On failure the
    /// previous results are left untouched.
    pub async fn start_validation(&mut self) -> Result<&[ValidationResult], ClientError> {
        let path = self
            .question_paper_path
            .as_deref()
            .ok_or(ClientError::NoQuestionPaper)?;
        let results = self.backend.validate(path).await?;
        self.results = results;
        Ok(&self.results)
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn replace_results(&mut self, results: Vec<ValidationResult>) {
        self.results = results;
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats::from_results(&self.results)
    }

    pub fn visible(&self, filter: &StatusFilter) -> Vec<&ValidationResult> {
        filter::filter_results(&self.results, filter)
    }

    /// Pretty JSON of every result, regardless of any active filter.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.results)
    }
}

pub fn default_export_file_name() -> String {
    format!(
        "validation_results_{}.json",
        chrono::Utc::now().date_naive().format("%Y-%m-%d")
    )
}

pub async fn load_results_file(path: &Path) -> Result<Vec<ValidationResult>, String> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("failed to read results file '{}': {e}", path.display()))?;
    serde_json::from_str::<Vec<ValidationResult>>(&contents)
        .map_err(|e| format!("failed to parse results file '{}': {e}", path.display()))
}
