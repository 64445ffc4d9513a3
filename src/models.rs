//! Data models for AnimeLover Desktop

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Active view selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    SeriesDetail,
    Player,
    Chat,
    News,
    Upload,
}

/// One playable unit within an anime entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub episode_number: u32,
    pub title: String,
    pub video_url: String,
    pub source_website: Option<String>,
}

/// One browsable catalog entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: String,
    pub title: String,
    pub description_hindi: String,
    pub description_english: String,
    pub thumbnail: String,
    pub genres: Vec<String>,
    pub dubbed: bool,
    pub subbed: bool,
    pub is_series: bool,
    /// Non-empty; a single synthetic entry for feature films
    pub episodes: Vec<Episode>,
    /// Millisecond timestamp, used only for recency ordering
    pub added_at: i64,
}

/// AI-derived character info, replaced wholesale per detail view
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Character {
    pub name: String,
    pub role: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsSource {
    pub title: String,
    pub url: String,
}

/// News summary plus citations, replaced wholesale on refresh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsDigest {
    pub text: String,
    pub sources: Vec<NewsSource>,
}

/// Current time in milliseconds since the epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Mint a process-unique identifier. The counter keeps ids distinct even
/// when two are minted within the same millisecond.
pub fn mint_id(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, now_millis(), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_id_unique() {
        let a = mint_id("anime");
        let b = mint_id("anime");
        assert_ne!(a, b);
        assert!(a.starts_with("anime-"));
    }
}
