use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::upload::UploadOutcome;

#[derive(Serialize)]
pub struct IndexPage<'a> {
    pub prompt: &'a str,
}

#[derive(Serialize)]
pub struct FilePage {
    pub file_name: String,
    pub content: String,
    /// Already-rendered HTML.
    pub ai: String,
    pub prompt: String,
    pub cached: bool,
    pub rendered_at: DateTime<Utc>,
}

impl From<UploadOutcome> for FilePage {
    fn from(outcome: UploadOutcome) -> Self {
        Self {
            file_name: outcome.file_name,
            content: outcome.content,
            ai: outcome.ai,
            prompt: outcome.prompt,
            cached: outcome.cached,
            rendered_at: Utc::now(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorPage<'a> {
    pub error: &'a str,
    pub status_code: u16,
    pub prompt: Option<&'a str>,
}
