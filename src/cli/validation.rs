use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.results.is_some() {
        if args.syllabus.is_some() || args.question_paper.is_some() || !args.textbook.is_empty() {
            return Err("--results cannot be combined with upload files".to_string());
        }
        if args.question_paper_path.is_some() {
            return Err("--results cannot be combined with --question-paper-path".to_string());
        }
        if args.skip_validation {
            return Err("--results cannot be combined with --skip-validation".to_string());
        }
    }
    if let Some(raw) = args.filter.as_deref() {
        crate::filter::StatusFilter::parse(raw).map_err(|e| format!("invalid --filter: {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.server.as_deref() {
        if reqwest::Url::parse(raw.trim()).is_err() {
            return Err(format!("invalid --server '{raw}'"));
        }
    }
    Ok(())
}
