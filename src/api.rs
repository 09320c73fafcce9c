//! Chat-completion API interaction.
//!
//! This module owns everything on the wire between the tool and an
//! OpenAI-compatible chat endpoint: the fixed prompts that constrain the
//! model to a strict JSON article array, the request/response envelope
//! types, and the HTTP client.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`ChatCompletions`]: Core trait defining one system+user exchange
//! - [`ChatClient`]: reqwest-backed implementation talking to
//!   `{base_url}/chat/completions` with bearer authentication
//!
//! The search workflow is generic over [`ChatCompletions`], so tests inject
//! scripted implementations instead of a live endpoint. Requests are not
//! retried and carry no timeout beyond reqwest's defaults; a failed topic
//! fails the whole search.

use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Result, ScoutError};
use crate::utils::truncate_for_log;

/// System message sent with every request.
///
/// The wording is deliberately rigid: the model must reply with nothing but a
/// JSON array of five-field article objects, or the reply is discarded.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides recent news articles. You must ALWAYS respond with a valid JSON array containing article objects. Each article object must have exactly these fields: title (string), url (string), summary (string), published_date (string), and published_by (string). Only include articles from websites with a Domain Authority (DA) score of 70 or higher. Do not include any text before or after the JSON array.";

/// Build the user message for one topic.
///
/// Embeds the per-topic article count, the topic itself, and the earliest
/// acceptable publication date, and repeats the required JSON shape with an
/// example object.
pub fn user_prompt(topic: &str, count: u32, start_date: NaiveDate) -> String {
    format!(
        "Find {count} recent articles about {topic} published after {start_date}. \
         Only include articles from high-authority websites with a Domain Authority (DA) score of 70 or higher. \
         Return ONLY a JSON array of article objects, each with title, url, summary, published_date, and published_by fields. \
         Example format: [{{\"title\": \"Article Title\", \"url\": \"https://example.com\", \"summary\": \"Article summary...\", \"published_date\": \"2024-01-01\", \"published_by\": \"article source name\"}}]"
    )
}

/// Trait for one chat-completion exchange.
///
/// Implementors send a system+user message pair and return the assistant's
/// reply text. The search workflow is written against this trait so the
/// model backend can be swapped or scripted.
pub trait ChatCompletions {
    /// Send one exchange and return the assistant's reply, trimmed.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// reqwest-backed [`ChatCompletions`] implementation.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    api_key: String,
}

impl ChatClient {
    /// Create a client for an OpenAI-compatible endpoint.
    ///
    /// `base_url` is the API root (e.g. `https://api.perplexity.ai`); the
    /// `/chat/completions` path is appended per request.
    pub fn new(base_url: &str, model: &str, temperature: f64, api_key: String) -> Self {
        ChatClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            api_key,
        }
    }
}

impl ChatCompletions for ChatClient {
    #[instrument(level = "info", skip_all)]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate_for_log(&body, 300),
                "Completion request rejected"
            );
            return Err(ScoutError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ScoutError::EmptyCompletion)?;

        let dt = t0.elapsed();
        debug!(
            elapsed_ms = dt.as_millis() as u128,
            bytes = content.len(),
            "Completion received"
        );
        Ok(content.trim().to_string())
    }
}
