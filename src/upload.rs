use std::time::Instant;

use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::extract::{self, ContentKind};
use crate::llm;
use crate::render::markdown_to_html;
use crate::AppState;

/// Shown in place of an excerpt when the upload had no text to extract.
pub const EMPTY_CONTENT: &str = "Failed to extract text";

#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOutcome {
    pub file_name: String,
    pub content: String,
    pub ai: String,
    pub prompt: String,
    pub cached: bool,
}

/// Stores an upload, extracts its excerpt, and describes it through the cache.
pub async fn process_upload(state: &AppState, upload: UploadedFile) -> Result<UploadOutcome> {
    let UploadedFile { file_name, content_type, bytes } = upload;
    let kind = ContentKind::from_mime(content_type.as_deref());
    let prompt = state.config.ai.prompt.clone();

    let stored = state.store.save(&file_name, &bytes).await?;
    info!(
        upload_id = %stored.id,
        file = %stored.display_name,
        path = %stored.path.display(),
        ?kind,
        "Stored upload"
    );

    let extract_start = Instant::now();
    let max_chars = state.config.excerpt_chars;
    let excerpt = tokio::task::spawn_blocking(move || {
        extract::extract(&bytes, kind).map(|text| extract::excerpt(&text, max_chars))
    })
    .await
    .map_err(|e| AppError::ExtractionError(format!("extraction task failed: {}", e)))??;
    debug!(elapsed = ?extract_start.elapsed(), "Extraction finished");

    let Some(excerpt) = excerpt else {
        info!(upload_id = %stored.id, "No text extracted, skipping AI call");
        return Ok(UploadOutcome {
            file_name: stored.display_name,
            content: EMPTY_CONTENT.to_string(),
            ai: String::new(),
            prompt,
            cached: false,
        });
    };

    if let Some(hit) = state.cache.get(&excerpt) {
        info!(upload_id = %stored.id, stored_at = %hit.stored_at, "Cache hit");
        return Ok(UploadOutcome {
            file_name: stored.display_name,
            content: excerpt,
            ai: hit.html,
            prompt,
            cached: true,
        });
    }

    info!(upload_id = %stored.id, chars = excerpt.chars().count(), "Cache miss, calling AI");
    let reply = llm::describe(state.ai.as_ref(), &state.config.ai, &excerpt).await?;
    let html = markdown_to_html(&reply);

    state.cache.put(excerpt.clone(), html.clone());
    debug!(entries = state.cache.len(), "Cached description");

    Ok(UploadOutcome {
        file_name: stored.display_name,
        content: excerpt,
        ai: html,
        prompt,
        cached: false,
    })
}
