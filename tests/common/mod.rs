#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use file_describer::config::Config;
use file_describer::error::{AppError, Result};
use file_describer::llm::{CompletionClient, CompletionRequest};
use file_describer::AppState;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const BOUNDARY: &str = "X-FILE-DESCRIBER-BOUNDARY";

/// Answers every request with the same reply and counts the calls.
pub struct ScriptedClient {
    calls: AtomicUsize,
    reply: std::result::Result<String, String>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Ok(reply.to_string()),
            delay: None,
        })
    }

    /// Replies only after `delay` has passed.
    pub fn slow(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Ok(reply.to_string()),
            delay: Some(delay),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Err(message.to_string()),
            delay: None,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map_err(AppError::LlmError)
    }
}

pub fn test_config(upload_dir: &Path, extra: &[(&str, &str)]) -> Config {
    let upload_dir = upload_dir.to_string_lossy().into_owned();
    Config::from_lookup(|key| {
        if let Some((_, value)) = extra.iter().find(|(k, _)| *k == key) {
            return Some(value.to_string());
        }
        match key {
            "API_KEY" => Some("test-key".to_string()),
            "UPLOAD_DIR" => Some(upload_dir.clone()),
            _ => None,
        }
    })
    .unwrap()
}

pub fn test_state(upload_dir: &Path, client: Arc<ScriptedClient>) -> AppState {
    AppState::new(test_config(upload_dir, &[]), client)
}

pub fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body("file", file_name, content_type, bytes)))
        .unwrap()
}

/// Builds a PDF with one line of text per page. An empty string gives a
/// page with an empty content stream.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let media_box: Vec<Object> = vec![0.into(), 0.into(), 595.into(), 842.into()];
    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
