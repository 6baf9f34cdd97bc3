pub mod demo;

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{UploadSummary, ValidationResult};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5002";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Validation,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Upload => "upload",
            Stage::Validation => "validation",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Stage::Upload => "Upload failed",
            Stage::Validation => "Validation failed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please select both syllabus and question paper files.")]
    MissingFiles,

    #[error("No question paper available for validation")]
    NoQuestionPaper,

    #[error("failed to read {field} file: {}: {source}", .path.display())]
    FileRead {
        field: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error during {stage}: {source}")]
    Network {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {stage} response: {source}")]
    InvalidResponse {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    Server {
        stage: Stage,
        status: u16,
        message: String,
    },

    #[error("API Key Expired: please get a new Gemini API key from Google AI Studio and update the server configuration.")]
    ApiKeyExpired,

    #[error("API Quota Exceeded: the daily request limit for the free tier has been reached. Wait until tomorrow or upgrade the plan.")]
    QuotaExceeded,

    #[error("invalid server URL: {url}")]
    InvalidServerUrl { url: String },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

/// Files for one `/upload` call.
#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    pub syllabus: Option<PathBuf>,
    pub question_paper: Option<PathBuf>,
    pub textbooks: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub server: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            proxy: None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ValidateBody {
    #[serde(default)]
    results: Vec<ValidationResult>,
}

/// Async client for the scrutiniser server's two JSON endpoints.
#[derive(Clone, Debug)]
pub struct ScrutinyClient {
    http: reqwest::Client,
    base: reqwest::Url,
}

impl ScrutinyClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let server = options.server.trim();
        let mut base = reqwest::Url::parse(server).map_err(|_| ClientError::InvalidServerUrl {
            url: server.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidServerUrl {
                url: server.to_string(),
            });
        }
        // endpoints are joined relative to the base, so it must end in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "qpscrutiniser/",
                env!("CARGO_PKG_VERSION")
            )),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(options.timeout_seconds.max(1)));

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ClientError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::HttpClientBuild { source: e })?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        self.base
            .join(path)
            .map_err(|_| ClientError::InvalidServerUrl {
                url: self.base.to_string(),
            })
    }

    pub async fn upload(&self, form: &UploadForm) -> Result<UploadSummary, ClientError> {
        let (syllabus, question_paper) = match (&form.syllabus, &form.question_paper) {
            (Some(s), Some(q)) => (s, q),
            _ => return Err(ClientError::MissingFiles),
        };

        let mut multipart = Form::new()
            .part("syllabus", file_part("syllabus", syllabus).await?)
            .part(
                "question_paper",
                file_part("question_paper", question_paper).await?,
            );
        for textbook in form.textbooks.iter() {
            multipart = multipart.part("textbooks", file_part("textbooks", textbook).await?);
        }

        let response = self
            .http
            .post(self.endpoint("upload")?)
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| ClientError::Network {
                stage: Stage::Upload,
                source: e,
            })?;

        let (status, body) = read_body(response, Stage::Upload).await?;
        if !status.is_success() {
            return Err(server_error(Stage::Upload, status, &body));
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse {
            stage: Stage::Upload,
            source: e,
        })
    }

    pub async fn validate(
        &self,
        question_paper_path: &str,
    ) -> Result<Vec<ValidationResult>, ClientError> {
        let response = self
            .http
            .post(self.endpoint("validate")?)
            .json(&serde_json::json!({ "question_paper_path": question_paper_path }))
            .send()
            .await
            .map_err(|e| ClientError::Network {
                stage: Stage::Validation,
                source: e,
            })?;

        let (status, body) = read_body(response, Stage::Validation).await?;
        if !status.is_success() {
            return Err(server_error(Stage::Validation, status, &body));
        }
        let parsed: ValidateBody =
            serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse {
                stage: Stage::Validation,
                source: e,
            })?;
        Ok(parsed.results)
    }
}

async fn file_part(field: &'static str, path: &Path) -> Result<Part, ClientError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::FileRead {
            field,
            path: path.to_path_buf(),
            source: e,
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| field.to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

async fn read_body(
    response: reqwest::Response,
    stage: Stage,
) -> Result<(StatusCode, Vec<u8>), ClientError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::Network { stage, source: e })?;
    Ok((status, body.to_vec()))
}

fn server_error(stage: Stage, status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| stage.fallback_message().to_string());

    if stage == Stage::Validation {
        if status == StatusCode::BAD_REQUEST && message.contains("API key expired") {
            return ClientError::ApiKeyExpired;
        }
        if status == StatusCode::TOO_MANY_REQUESTS && message.contains("quota exceeded") {
            return ClientError::QuotaExceeded;
        }
    }

    ClientError::Server {
        stage,
        status: status.as_u16(),
        message,
    }
}

/// Where uploads and validations are sent.
#[derive(Clone, Debug)]
pub enum Backend {
    Http(ScrutinyClient),
    Demo,
}

impl Backend {
    pub async fn upload(&self, form: &UploadForm) -> Result<UploadSummary, ClientError> {
        match self {
            Backend::Http(client) => client.upload(form).await,
            Backend::Demo => demo::upload(form),
        }
    }

    pub async fn validate(
        &self,
        question_paper_path: &str,
    ) -> Result<Vec<ValidationResult>, ClientError> {
        match self {
            Backend::Http(client) => client.validate(question_paper_path).await,
            Backend::Demo => Ok(demo::results()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Backend::Http(client) => client.base_url().to_string(),
            Backend::Demo => "demo (offline)".to_string(),
        }
    }
}
