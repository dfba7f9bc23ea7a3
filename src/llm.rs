use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// A generative text backend. Implementations return the raw reply text,
/// which callers treat as markdown.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat-completions client for OpenRouter and other OpenAI-compatible APIs.
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(AppError::LlmError(format!("provider returned {}: {}", status, detail)));
        }

        let json: serde_json::Value = res.json().await?;
        parse_reply(&json)
    }
}

fn parse_reply(json: &serde_json::Value) -> Result<String> {
    if let Some(message) = json["error"]["message"].as_str() {
        return Err(AppError::LlmError(message.to_string()));
    }

    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::LlmError("Invalid response format from LLM".to_string()))
}

/// How an excerpt is turned into AI output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiMode {
    /// One prompt embedding the excerpt.
    Describe,
    /// Repeated English -> German -> English translation of the excerpt.
    RoundTrip,
}

impl FromStr for AiMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "describe" | "single-shot" => Ok(AiMode::Describe),
            "round-trip" | "roundtrip" | "translate" => Ok(AiMode::RoundTrip),
            other => Err(AppError::ConfigError(format!("Unknown AI_MODE: {}", other))),
        }
    }
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiMode::Describe => f.write_str("describe"),
            AiMode::RoundTrip => f.write_str("round-trip"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AiSettings {
    pub mode: AiMode,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub rounds: usize,
}

pub async fn describe(
    client: &dyn CompletionClient,
    settings: &AiSettings,
    excerpt: &str,
) -> Result<String> {
    let start = Instant::now();
    let reply = match settings.mode {
        AiMode::Describe => describe_once(client, settings, excerpt).await?,
        AiMode::RoundTrip => round_trip(client, excerpt, settings.rounds).await?,
    };
    info!(mode = %settings.mode, elapsed = ?start.elapsed(), "AI call finished");
    Ok(reply)
}

pub fn build_prompt(instruction: &str, excerpt: &str) -> String {
    let mut result = String::with_capacity(instruction.len() + excerpt.len() + 2);
    result.push_str(instruction);
    result.push_str("\n\n");
    result.push_str(excerpt);
    result
}

async fn describe_once(
    client: &dyn CompletionClient,
    settings: &AiSettings,
    excerpt: &str,
) -> Result<String> {
    let request = CompletionRequest {
        messages: vec![ChatMessage::user(build_prompt(&settings.prompt, excerpt))],
        temperature: Some(settings.temperature),
        max_tokens: Some(settings.max_tokens),
    };
    client.complete(request).await
}

struct Translation {
    language: &'static str,
    example_source: &'static str,
    example_target: &'static str,
}

const TO_GERMAN: Translation = Translation {
    language: "German",
    example_source: "Hello! How are you?",
    example_target: "Hallo! Wie geht's?",
};

const TO_ENGLISH: Translation = Translation {
    language: "English",
    example_source: "Hallo! Wie geht's?",
    example_target: "Hello! How are you?",
};

async fn round_trip(client: &dyn CompletionClient, excerpt: &str, rounds: usize) -> Result<String> {
    let mut text = excerpt.to_string();
    for round in 0..rounds {
        debug!(round, "translating to German");
        text = translate(client, &TO_GERMAN, &text).await?;
        debug!(round, "translating back to English");
        text = translate(client, &TO_ENGLISH, &text).await?;
    }
    Ok(text)
}

async fn translate(client: &dyn CompletionClient, to: &Translation, text: &str) -> Result<String> {
    let instruction = format!("Translate the following text to {}.", to.language);
    let request = CompletionRequest {
        messages: vec![
            ChatMessage::user(build_prompt(&instruction, to.example_source)),
            ChatMessage::assistant(to.example_target),
            ChatMessage::user(build_prompt(&instruction, text)),
        ],
        temperature: None,
        max_tokens: None,
    };
    client.complete(request).await
}
