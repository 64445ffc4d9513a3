//! Gemini content-generation API client
//!
//! Four request kinds: metadata synthesis, character lookup, news digest and
//! chat. All are single-shot request/response over HTTPS; responses are
//! treated as untrusted and validated before anything reaches app state.

#![allow(dead_code)]

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{Character, ChatMessage, ChatRole, NewsDigest, NewsSource};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fast model for structured output and chat
pub const MODEL_FLASH: &str = "gemini-3-flash-preview";
/// Search-grounded model for the news digest
pub const MODEL_PRO: &str = "gemini-3-pro-preview";

const CHAT_SYSTEM_PROMPT: &str = "You are \"AnimeDost\", the official AI assistant for \
    \"Anime Lover\". Help users find Hindi dubs and explain plots. You respond in a mix of \
    Hindi and English.";

const NEWS_PROMPT: &str = "What is the latest news about Hindi dubbed anime releases in India? \
    Provide a summary of 5 top news items.";

/// Structured metadata returned by the synthesis call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeMetadata {
    pub description_hindi: String,
    pub description_english: String,
    pub genres: Vec<String>,
}

pub struct GeminiClient {
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    fn generate(&self, model: &str, body: &Value) -> Result<Value, String> {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(120)))
            .timeout_connect(Some(Duration::from_secs(30)))
            .build()
            .new_agent();

        let payload = body.to_string();
        let mut response = agent
            .post(&self.endpoint(model))
            .header("Content-Type", "application/json")
            .send(payload.as_bytes())
            .map_err(|e| format!("Request failed: {}", e))?;

        if response.status() != 200 {
            return Err(format!("HTTP error: {}", response.status()));
        }

        let content = response
            .body_mut()
            .read_to_string()
            .map_err(|e| format!("Read failed: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Invalid JSON response: {}", e))
    }

    /// Synthesize bilingual synopses and genre tags for a title
    pub fn generate_metadata(&self, title: &str) -> Result<AnimeMetadata, String> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{
                    "text": format!("Generate metadata for the anime \"{}\". Format as JSON.", title)
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "descriptionHindi": { "type": "STRING" },
                        "descriptionEnglish": { "type": "STRING" },
                        "genres": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["descriptionHindi", "descriptionEnglish", "genres"]
                }
            }
        });

        let response = self.generate(MODEL_FLASH, &body)?;
        let text = extract_text(&response)?;
        parse_metadata_response(&text)
    }

    /// List the main characters for a title
    pub fn get_characters(&self, title: &str) -> Result<Vec<Character>, String> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{
                    "text": format!(
                        "List 4 main characters from the anime \"{}\". For each, provide their \
                         name, role (Protagonist, Antagonist, etc.), and a 1-sentence bio in \
                         Hindi. Format as JSON.",
                        title
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "role": { "type": "STRING" },
                            "description": { "type": "STRING" }
                        },
                        "required": ["name", "role", "description"]
                    }
                }
            }
        });

        let response = self.generate(MODEL_FLASH, &body)?;
        let text = extract_text(&response)?;
        parse_characters_response(&text)
    }

    /// Search-grounded news summary with source citations
    pub fn fetch_news(&self) -> Result<NewsDigest, String> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": NEWS_PROMPT }]
            }],
            "tools": [{ "google_search": {} }]
        });

        let response = self.generate(MODEL_PRO, &body)?;
        parse_news_response(&response)
    }

    /// One chat turn. The full prior transcript is re-sent every call; the
    /// provider is stateless and its apparent memory is this transcript.
    pub fn send_chat(&self, message: &str, transcript: &[ChatMessage]) -> Result<String, String> {
        let mut contents: Vec<Value> = transcript
            .iter()
            .map(|msg| {
                json!({
                    "role": match msg.role {
                        ChatRole::User => "user",
                        ChatRole::Model => "model",
                    },
                    "parts": [{ "text": msg.content }]
                })
            })
            .collect();
        contents.push(json!({
            "role": "user",
            "parts": [{ "text": message }]
        }));

        let body = json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": CHAT_SYSTEM_PROMPT }]
            }
        });

        let response = self.generate(MODEL_FLASH, &body)?;
        extract_text(&response)
    }
}

/// Concatenated text parts of the first candidate. Empty text is an error:
/// a reply with nothing in it is indistinguishable from a broken response.
pub fn extract_text(response: &Value) -> Result<String, String> {
    let parts = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or("Response has no candidate parts")?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err("Empty response text".to_string());
    }
    Ok(text)
}

/// Validate and decode the metadata payload. Either the whole shape is
/// accepted or the call fails; genres are never merged without the synopses.
pub fn parse_metadata_response(text: &str) -> Result<AnimeMetadata, String> {
    let metadata: AnimeMetadata =
        serde_json::from_str(text).map_err(|e| format!("Malformed metadata: {}", e))?;

    if metadata.description_hindi.trim().is_empty()
        || metadata.description_english.trim().is_empty()
    {
        return Err("Metadata missing description text".to_string());
    }
    Ok(metadata)
}

/// Validate and decode the character list payload
pub fn parse_characters_response(text: &str) -> Result<Vec<Character>, String> {
    let characters: Vec<Character> =
        serde_json::from_str(text).map_err(|e| format!("Malformed character list: {}", e))?;

    if characters.iter().any(|c| c.name.trim().is_empty()) {
        return Err("Character entry missing name".to_string());
    }
    Ok(characters)
}

/// Digest text plus grounding citations. Chunks without a web URI are
/// skipped; a digest with no text at all is a failure.
pub fn parse_news_response(response: &Value) -> Result<NewsDigest, String> {
    let text = extract_text(response)?;

    let sources = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("groundingMetadata"))
        .and_then(|g| g.get("groundingChunks"))
        .and_then(|g| g.as_array())
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|chunk| {
                    let web = chunk.get("web")?;
                    let url = web.get("uri")?.as_str()?.to_string();
                    let title = web
                        .get("title")
                        .and_then(|t| t.as_str())
                        .unwrap_or("External Source")
                        .to_string();
                    Some(NewsSource { title, url })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(NewsDigest { text, sources })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate_with_text(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[test]
    fn test_extract_text() {
        let response = candidate_with_text("hello");
        assert_eq!(extract_text(&response).unwrap(), "hello");
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Namaste " }, { "text": "dost" }] }
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "Namaste dost");
    }

    #[test]
    fn test_extract_text_rejects_empty() {
        assert!(extract_text(&candidate_with_text("   ")).is_err());
        assert!(extract_text(&json!({"candidates": []})).is_err());
        assert!(extract_text(&json!({})).is_err());
    }

    #[test]
    fn test_parse_metadata() {
        let text = r#"{
            "descriptionHindi": "एक कहानी",
            "descriptionEnglish": "A story",
            "genres": ["Action", "Fantasy"]
        }"#;
        let metadata = parse_metadata_response(text).unwrap();
        assert_eq!(metadata.description_english, "A story");
        assert_eq!(metadata.genres, vec!["Action", "Fantasy"]);
    }

    #[test]
    fn test_parse_metadata_rejects_missing_field() {
        let text = r#"{ "descriptionHindi": "x", "genres": [] }"#;
        assert!(parse_metadata_response(text).is_err());
    }

    #[test]
    fn test_parse_metadata_rejects_blank_description() {
        let text = r#"{ "descriptionHindi": "", "descriptionEnglish": "x", "genres": [] }"#;
        assert!(parse_metadata_response(text).is_err());
    }

    #[test]
    fn test_parse_metadata_rejects_non_json() {
        assert!(parse_metadata_response("not json at all").is_err());
    }

    #[test]
    fn test_parse_characters() {
        let text = r#"[
            { "name": "Tanjiro", "role": "Protagonist", "description": "दयालु योद्धा" },
            { "name": "Muzan", "role": "Antagonist", "description": "राक्षसों का राजा" }
        ]"#;
        let characters = parse_characters_response(text).unwrap();
        assert_eq!(characters.len(), 2);
        assert_eq!(characters[0].role, "Protagonist");
    }

    #[test]
    fn test_parse_characters_rejects_missing_role() {
        let text = r#"[{ "name": "Tanjiro", "description": "x" }]"#;
        assert!(parse_characters_response(text).is_err());
    }

    #[test]
    fn test_parse_characters_rejects_blank_name() {
        let text = r#"[{ "name": " ", "role": "Hero", "description": "x" }]"#;
        assert!(parse_characters_response(text).is_err());
    }

    #[test]
    fn test_parse_news_with_sources() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Big dub announcements this week." }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com/a", "title": "Anime Site" } },
                        { "web": { "uri": "https://example.com/b" } },
                        { "retrievedContext": { "uri": "ignored" } }
                    ]
                }
            }]
        });
        let digest = parse_news_response(&response).unwrap();
        assert_eq!(digest.text, "Big dub announcements this week.");
        assert_eq!(digest.sources.len(), 2);
        assert_eq!(digest.sources[0].title, "Anime Site");
        assert_eq!(digest.sources[1].title, "External Source");
    }

    #[test]
    fn test_parse_news_without_grounding() {
        let digest = parse_news_response(&candidate_with_text("just text")).unwrap();
        assert!(digest.sources.is_empty());
    }

    #[test]
    fn test_parse_news_rejects_empty_text() {
        assert!(parse_news_response(&candidate_with_text("")).is_err());
    }
}
