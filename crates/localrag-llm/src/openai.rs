use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use localrag_core::config::GenerationSettings;
use localrag_core::error::{Error, Result};
use localrag_core::traits::AnswerProvider;

const PROVIDER: &str = "openai-chat";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenAiChat {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system_prompt: String,
}

impl OpenAiChat {
    pub fn new(settings: &GenerationSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.endpoint.timeout_secs))
            .build()
            .map_err(|e| Error::provider(PROVIDER, e))?;
        Ok(Self {
            client,
            base_url: settings.endpoint.base_url.trim_end_matches('/').to_string(),
            api_key: settings.endpoint.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            system_prompt: settings.system_prompt.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AnswerProvider for OpenAiChat {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| Error::provider(PROVIDER, "no API key configured"))?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: &self.system_prompt },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "requesting completion");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::provider(PROVIDER, format!("request to {} failed: {}", url, e)))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(Error::provider(PROVIDER, format!("HTTP {}: {}", status, text.trim())));
        }

        let parsed: ChatResponse =
            resp.json().map_err(|e| Error::provider(PROVIDER, format!("invalid response body: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::provider(PROVIDER, "response contained no answer"))
    }
}
