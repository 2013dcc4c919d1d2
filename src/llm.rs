//! Content generation provider client
//!
//! Talks to an OpenAI-compatible chat-completions endpoint for two jobs:
//! deriving a style profile from learning samples, and drafting a post from
//! the gathered bundle (style profile, photos, notes, crawl data).
//!
//! Configuration priority (highest to lowest):
//! 1. Environment variable BLOGCRAFT_LLM_API_KEY (via app_config)
//! 2. Config file (config.toml)
//! 3. Legacy OPENAI_API_KEY environment variable
//!
//! Absence of a key is detectable up front via [`is_configured`]; callers
//! fail fast instead of issuing a doomed request.

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;

/// Resolved provider configuration.
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

pub static LLM_SETTINGS: Lazy<LlmSettings> = Lazy::new(|| {
    let config = crate::app_config::llm();

    let api_key = if !config.api_key.is_empty() {
        config.api_key.clone()
    } else {
        std::env::var("OPENAI_API_KEY").unwrap_or_default()
    };

    if api_key.is_empty() {
        log::warn!("No LLM API key configured; content generation is disabled.");
    }

    LlmSettings {
        api_key,
        base_url: config.base_url,
        model: config.model,
    }
});

/// Check whether the provider can be called at all.
pub fn is_configured() -> bool {
    !LLM_SETTINGS.api_key.is_empty()
}

/// Content generation error
#[derive(Debug)]
pub enum LlmError {
    /// No API key configured
    NotConfigured,
    /// Network error talking to the provider
    Network(String),
    /// The provider answered with something unusable
    BadResponse(String),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::NotConfigured => write!(f, "Content generation service is not configured"),
            LlmError::Network(e) => write!(f, "Content generation network error: {}", e),
            LlmError::BadResponse(e) => write!(f, "Content generation bad response: {}", e),
        }
    }
}

impl std::error::Error for LlmError {}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// One chat-completions call returning the raw assistant message content.
/// The provider is asked for a JSON object response.
async fn chat_json(system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
    if !is_configured() {
        return Err(LlmError::NotConfigured);
    }

    let client = reqwest::Client::new();
    let body = json!({
        "model": LLM_SETTINGS.model,
        "response_format": { "type": "json_object" },
        "max_tokens": max_tokens,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
    });

    let response = client
        .post(format!("{}/chat/completions", LLM_SETTINGS.base_url))
        .bearer_auth(&LLM_SETTINGS.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| LlmError::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        return Err(LlmError::BadResponse(format!("{}: {}", status, detail)));
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|e| LlmError::BadResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| LlmError::BadResponse("empty choices".to_owned()))
}

const STYLE_PROFILE_SYSTEM: &str = "You are an expert at analyzing blog writing style. \
Analyze the given blog samples and produce a writing style profile as JSON.\n\n\
Respond with exactly this JSON structure:\n\
{\n\
  \"tone\": \"overall tone of the writing (e.g. friendly, professional, casual)\",\n\
  \"sentenceStyle\": \"sentence style characteristics\",\n\
  \"vocabularyLevel\": \"vocabulary level (basic/intermediate/advanced)\",\n\
  \"paragraphStructure\": \"paragraph composition pattern\",\n\
  \"expressionPatterns\": [\"frequently used expressions\"],\n\
  \"emojiUsage\": \"emoji frequency and pattern\",\n\
  \"headingStyle\": \"title and subheading style\",\n\
  \"photoDescriptionStyle\": \"how photos are described\",\n\
  \"callToAction\": \"reader engagement patterns\",\n\
  \"uniqueTraits\": [\"traits unique to this writer\"]\n\
}";

/// Derive a style profile from raw text samples. Returns the provider's
/// JSON as an opaque string; the schema is not enforced here.
pub async fn generate_style_profile(samples: &[String]) -> Result<String, LlmError> {
    let sample_texts = samples
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let clipped: String = text.chars().take(2000).collect();
            format!("--- Sample {} ---\n{}", i + 1, clipped)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let user = format!(
        "Analyze the writing style of the following blog samples:\n\n{}",
        sample_texts
    );

    chat_json(STYLE_PROFILE_SYSTEM, &user, 1000).await
}

/// Everything the draft request carries to the provider.
pub struct GenerationRequest {
    /// Opaque style profile JSON; "{}" when the user has none yet.
    pub style_profile: String,
    pub location_name: String,
    pub overall_note: String,
    /// (original file name, memo) per photo, in display order.
    pub photos: Vec<(String, String)>,
    pub crawl_summary: Option<String>,
    /// (provider name, snippet) pairs.
    pub crawl_sources: Vec<(String, String)>,
    pub prompt_note: Option<String>,
}

/// A generated draft.
#[derive(Debug, Clone)]
pub struct GeneratedPost {
    pub title: String,
    pub content_markdown: String,
}

const POST_SYSTEM: &str = "You are an expert blog writer. Write a place review blog post \
matching the given style profile.\n\n\
Respond with exactly this JSON structure:\n\
{\n\
  \"title\": \"blog post title\",\n\
  \"contentMarkdown\": \"blog post body in markdown (1500-3000 characters)\"\n\
}\n\n\
Writing rules:\n\
- Follow the tone and expression patterns of the style profile\n\
- Weave the photo descriptions naturally into the body\n\
- Use an SEO-conscious title and subheadings\n\
- Repeat the place name naturally (keyword density)\n\
- Use the collected information as reference without plagiarizing it";

/// Draft a post. On an unparseable provider payload the location name
/// stands in as the title and the raw payload as the body, so the caller
/// still gets something to persist.
pub async fn generate_post_content(request: GenerationRequest) -> Result<GeneratedPost, LlmError> {
    let photo_descriptions = request
        .photos
        .iter()
        .enumerate()
        .map(|(i, (file_name, memo))| {
            let label = if memo.is_empty() { file_name } else { memo };
            format!("Photo {}: {}", i + 1, label)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let crawl_info = match &request.crawl_summary {
        Some(summary) => format!("\n\nReference summary:\n{}", summary),
        None => String::new(),
    };

    let source_snippets = if request.crawl_sources.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nCollected information:\n{}",
            request
                .crawl_sources
                .iter()
                .map(|(provider, snippet)| format!("[{}] {}", provider, snippet))
                .collect::<Vec<_>>()
                .join("\n")
        )
    };

    let additional_note = match &request.prompt_note {
        Some(note) if !note.is_empty() => format!("\n\nAdditional request: {}", note),
        _ => String::new(),
    };

    let user = format!(
        "Style profile:\n{}\n\nPlace: {}\nAuthor's notes: {}\n\nPhoto list:\n{}{}{}{}",
        request.style_profile,
        request.location_name,
        request.overall_note,
        photo_descriptions,
        crawl_info,
        source_snippets,
        additional_note,
    );

    let content = chat_json(POST_SYSTEM, &user, 4000).await?;

    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(parsed) => {
            let title = parsed
                .get("title")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or(&request.location_name)
                .to_owned();
            let content_markdown = parsed
                .get("contentMarkdown")
                .and_then(|c| c.as_str())
                .unwrap_or_default()
                .to_owned();
            Ok(GeneratedPost {
                title,
                content_markdown,
            })
        }
        Err(_) => Ok(GeneratedPost {
            title: request.location_name.clone(),
            content_markdown: content,
        }),
    }
}
