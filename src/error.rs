use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to store upload: {0}")]
    FileError(String),

    #[error("Failed to extract text: {0}")]
    ExtractionError(String),

    #[error("LLM processing error: {0}")]
    LlmError(String),

    #[error("Invalid request: {0}")]
    RequestError(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::FileError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExtractionError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LlmError(_) => StatusCode::BAD_GATEWAY,
            AppError::RequestError(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::TemplateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::FileError(_) => "file",
            AppError::ExtractionError(_) => "extraction",
            AppError::LlmError(_) => "llm",
            AppError::RequestError(_) => "request",
            AppError::PayloadTooLarge(_) => "request",
            AppError::TemplateError(_) => "template",
            AppError::ConfigError(_) => "config",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::LlmError(err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::TemplateError(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::RequestError(err.body_text())
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::RequestError(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
