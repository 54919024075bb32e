use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CoachConfig;

/// One turn of a coach conversation. The full history travels with every
/// request; the server holds no conversation state between requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[async_trait]
pub trait CoachClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> anyhow::Result<String>;
}

/// Chat-completions client for the upstream LLM API.
pub struct HttpCoachClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

impl HttpCoachClient {
    pub fn new(config: &CoachConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("build coach http client")?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CoachClient for HttpCoachClient {
    async fn chat(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: 0.7,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("send coach request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("coach API returned {status}: {body}");
        }

        let completion: CompletionResponse =
            response.json().await.context("decode coach response")?;
        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("coach response had no choices")?;
        Ok(reply)
    }
}
