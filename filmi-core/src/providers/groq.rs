use std::{fmt, time::Duration};

use async_trait::async_trait;
use filmi_model::EditorialBlog;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BlogGenerator, status_error};
use crate::{details::PrimaryDetails, error::ProviderError};

pub const GROQ_OPENAI_BASE: &str = "https://api.groq.com/openai/v1";

const SYSTEM_PROMPT: &str =
    "You are an expert Indian movie critic and SEO blogger.";

#[derive(Clone)]
pub struct GroqSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl fmt::Debug for GroqSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "llama3-70b-8192".to_string(),
            base_url: GROQ_OPENAI_BASE.to_string(),
            temperature: 0.6,
            max_tokens: 900,
            request_timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Builds the review prompt from the handful of detail fields the generator
/// needs. Missing values are rendered as `N/A`.
fn blog_prompt(details: &PrimaryDetails) -> String {
    let rating = details.rating();
    let rating = if rating > 0.0 {
        format!("{rating:.1}")
    } else {
        "N/A".to_string()
    };
    let cast = details.cast_names();
    let cast = if cast.is_empty() {
        "N/A".to_string()
    } else {
        cast.join(", ")
    };

    format!(
        r#"Reply with a single JSON object and nothing else, using exactly these keys:

{{
  "synopsis": "three or four line story summary",
  "performance": "acting, direction and music",
  "pros": ["strength", "strength", "strength"],
  "cons": ["weakness", "weakness"],
  "verdict": "final critical opinion",
  "audience": "who should watch it"
}}

Movie:
Title: {title}
Overview: {overview}
Release date: {release}
Language: {language}
Rating: {rating}
Cast: {cast}
"#,
        title = details.title().unwrap_or("Unknown"),
        overview = details.overview().unwrap_or("N/A"),
        release = details.release_date().unwrap_or("N/A"),
        language = details.original_language().unwrap_or("N/A"),
    )
}

/// Extracts the outermost `{ … }` span from model output and parses it.
///
/// Models routinely wrap JSON in prose or markdown fences; anything outside
/// the first `{` and the last `}` is ignored.
pub fn parse_editorial_blog(raw: &str) -> Result<EditorialBlog, ProviderError> {
    let (Some(first), Some(last)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(ProviderError::Parse(
            "no JSON object in generator output".to_string(),
        ));
    };
    if last < first {
        return Err(ProviderError::Parse(
            "unbalanced JSON object in generator output".to_string(),
        ));
    }

    serde_json::from_str(&raw[first..=last])
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Editorial blog generator backed by Groq's OpenAI-compatible chat API.
pub struct GroqBlogGenerator {
    http: reqwest::Client,
    settings: GroqSettings,
}

impl fmt::Debug for GroqBlogGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqBlogGenerator")
            .field("settings", &self.settings)
            .finish()
    }
}

impl GroqBlogGenerator {
    pub fn new(settings: GroqSettings) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::Unconfigured("GROQ_API_KEY"))?;

        let request = ChatRequest {
            model: &self.settings.model,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!(model = %self.settings.model, "Requesting editorial blog");
        let response = self
            .http
            .post(format!("{}/chat/completions", self.settings.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| {
                format!("Groq request failed with status {status}")
            });
            return Err(status_error(status, message));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[async_trait]
impl BlogGenerator for GroqBlogGenerator {
    async fn editorial_blog(
        &self,
        details: &PrimaryDetails,
    ) -> Result<EditorialBlog, ProviderError> {
        let raw = self.complete(&blog_prompt(details)).await?;
        parse_editorial_blog(&raw)
    }
}
