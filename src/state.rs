//! View state and request orchestration
//!
//! `AppState` is the single container for everything the UI renders: the
//! active view, the catalog, the current selections and the transient
//! AI-derived data. User navigation goes through the transition methods;
//! asynchronous results come back as `TaskResult` messages and are merged
//! through `apply`, the only mutation path for background work.

use crate::api::AnimeMetadata;
use crate::catalog::{seed_catalog, DEFAULT_POSTER, DEFAULT_VIDEO_URL};
use crate::models::{
    mint_id, now_millis, Anime, Character, ChatMessage, ChatRole, Episode, NewsDigest, View,
};

const CHAT_GREETING: &str = "Namaste! Welcome to Anime Lover. How can I help you today?";

/// Background task messages
#[derive(Debug, Clone)]
pub enum TaskResult {
    CharactersLoaded {
        seq: u64,
        characters: Vec<Character>,
    },
    CharactersFailed {
        seq: u64,
        error: String,
    },
    NewsLoaded(NewsDigest),
    NewsFailed(String),
    ChatReply(String),
    ChatFailed(String),
    MetadataLoaded {
        title: String,
        poster_url: String,
        metadata: AnimeMetadata,
    },
    MetadataFailed(String),
}

/// Token for one character-lookup dispatch. The sequence number lets stale
/// responses from a superseded selection be discarded instead of overwriting
/// a newer selection's results.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRequest {
    pub seq: u64,
    pub title: String,
}

pub struct AppState {
    pub view: View,
    pub anime_list: Vec<Anime>,
    pub selected_anime: Option<Anime>,
    pub active_episode: Option<Episode>,

    // Transient AI-derived data
    pub characters: Vec<Character>,
    pub news: NewsDigest,
    pub chat_messages: Vec<ChatMessage>,

    // Filter inputs
    pub search_query: String,
    pub active_mood: Option<String>,

    // Upload form, retained across a failed synthesis for retry
    pub upload_title: String,
    pub upload_poster_url: String,

    // Per-kind in-flight flags
    pub loading_characters: bool,
    pub loading_news: bool,
    pub is_typing: bool,
    pub is_uploading: bool,

    char_seq: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Dashboard,
            anime_list: seed_catalog(),
            selected_anime: None,
            active_episode: None,
            characters: Vec::new(),
            news: NewsDigest::default(),
            chat_messages: vec![ChatMessage {
                role: ChatRole::Model,
                content: CHAT_GREETING.to_string(),
                timestamp: now_millis(),
            }],
            search_query: String::new(),
            active_mood: None,
            upload_title: String::new(),
            upload_poster_url: String::new(),
            loading_characters: false,
            loading_news: false,
            is_typing: false,
            is_uploading: false,
            char_seq: 0,
        }
    }

    /// Switch the active view. Selections are untouched, so returning to the
    /// detail view later still shows the previous entry. Returns true when
    /// entering the news view should trigger an automatic fetch: at most one
    /// per activation, skipped while a digest is already present or loading.
    pub fn select_view(&mut self, view: View) -> bool {
        self.view = view;
        view == View::News && self.news.text.is_empty() && !self.loading_news
    }

    /// Select an entry and enter the detail view. The transient character
    /// list is cleared in the same step, so nothing stale from a previous
    /// title is ever shown. The caller dispatches the returned request.
    pub fn select_anime(&mut self, anime: &Anime) -> CharacterRequest {
        self.selected_anime = Some(anime.clone());
        self.view = View::SeriesDetail;
        self.characters.clear();
        self.char_seq += 1;
        self.loading_characters = true;
        CharacterRequest {
            seq: self.char_seq,
            title: anime.title.clone(),
        }
    }

    /// Select an episode and enter the player. The episode must belong to
    /// the entry; callers pass one of `anime.episodes`.
    pub fn select_episode(&mut self, anime: &Anime, episode: &Episode) {
        self.selected_anime = Some(anime.clone());
        self.active_episode = Some(episode.clone());
        self.view = View::Player;
    }

    pub fn toggle_mood(&mut self, genre: &str) {
        if self.active_mood.as_deref() == Some(genre) {
            self.active_mood = None;
        } else {
            self.active_mood = Some(genre.to_string());
        }
    }

    /// Mark a news fetch in flight. The caller dispatches the request.
    pub fn begin_news_fetch(&mut self) {
        self.loading_news = true;
    }

    /// Append the user message and mark a reply outstanding. Returns the
    /// message to send, or None for blank input (nothing is appended and no
    /// flag is set).
    pub fn begin_chat_turn(&mut self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        self.chat_messages.push(ChatMessage {
            role: ChatRole::User,
            content: message.to_string(),
            timestamp: now_millis(),
        });
        self.is_typing = true;
        Some(message.to_string())
    }

    /// Validate the upload form and mark a synthesis in flight. Returns
    /// (title, poster URL) to dispatch, or None for a blank title.
    pub fn begin_upload(&mut self) -> Option<(String, String)> {
        let title = self.upload_title.trim();
        if title.is_empty() {
            return None;
        }
        self.is_uploading = true;
        Some((title.to_string(), self.upload_poster_url.trim().to_string()))
    }

    /// Merge one background result. Returns a log line describing what
    /// happened. Failures clear the relevant in-flight flag and leave the
    /// rest of the state exactly as it was; nothing is ever merged partially.
    pub fn apply(&mut self, result: TaskResult) -> String {
        match result {
            TaskResult::CharactersLoaded { seq, characters } => {
                if seq != self.char_seq {
                    return format!(
                        "[WARN] Discarded stale character response (seq {} != {})",
                        seq, self.char_seq
                    );
                }
                let count = characters.len();
                self.characters = characters;
                self.loading_characters = false;
                format!("[INFO] Loaded {} characters", count)
            }
            TaskResult::CharactersFailed { seq, error } => {
                if seq != self.char_seq {
                    return format!("[WARN] Discarded stale character error: {}", error);
                }
                self.loading_characters = false;
                format!("[ERROR] Character lookup failed: {}", error)
            }
            TaskResult::NewsLoaded(digest) => {
                let sources = digest.sources.len();
                self.news = digest;
                self.loading_news = false;
                format!("[INFO] News digest loaded ({} sources)", sources)
            }
            TaskResult::NewsFailed(error) => {
                self.loading_news = false;
                format!("[ERROR] News fetch failed: {}", error)
            }
            TaskResult::ChatReply(text) => {
                self.chat_messages.push(ChatMessage {
                    role: ChatRole::Model,
                    content: text,
                    timestamp: now_millis(),
                });
                self.is_typing = false;
                "[INFO] Chat reply received".to_string()
            }
            TaskResult::ChatFailed(error) => {
                // The user message stays in the transcript; only the reply
                // is missing and the user may simply send again.
                self.is_typing = false;
                format!("[ERROR] Chat turn failed: {}", error)
            }
            TaskResult::MetadataLoaded {
                title,
                poster_url,
                metadata,
            } => {
                let anime = build_uploaded_anime(&title, &poster_url, metadata);
                let log = format!("[INFO] Added \"{}\" to the catalog", anime.title);
                self.anime_list.insert(0, anime);
                self.upload_title.clear();
                self.upload_poster_url.clear();
                self.is_uploading = false;
                self.view = View::Dashboard;
                log
            }
            TaskResult::MetadataFailed(error) => {
                self.is_uploading = false;
                format!("[ERROR] Metadata synthesis failed: {}", error)
            }
        }
    }
}

/// New catalog entry from a successful synthesis. Fresh unique id, default
/// availability flags, one placeholder episode, prepended by the caller so
/// it becomes the most recent entry.
fn build_uploaded_anime(title: &str, poster_url: &str, metadata: AnimeMetadata) -> Anime {
    let thumbnail = if poster_url.is_empty() {
        DEFAULT_POSTER.to_string()
    } else {
        poster_url.to_string()
    };

    Anime {
        id: mint_id("anime"),
        title: title.to_string(),
        description_hindi: metadata.description_hindi,
        description_english: metadata.description_english,
        thumbnail,
        genres: metadata.genres,
        dubbed: true,
        subbed: true,
        is_series: true,
        episodes: vec![Episode {
            id: mint_id("ep"),
            episode_number: 1,
            title: "Trailer / Episode 1".to_string(),
            video_url: DEFAULT_VIDEO_URL.to_string(),
            source_website: None,
        }],
        added_at: now_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(genres: &[&str]) -> AnimeMetadata {
        AnimeMetadata {
            description_hindi: "हिंदी सारांश".to_string(),
            description_english: "English synopsis".to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn character(name: &str) -> Character {
        Character {
            name: name.to_string(),
            role: "Protagonist".to_string(),
            description: "bio".to_string(),
        }
    }

    fn assert_view_invariant(state: &AppState) {
        if matches!(state.view, View::SeriesDetail | View::Player) {
            assert!(state.selected_anime.is_some());
        }
        if state.view == View::Player {
            assert!(state.active_episode.is_some());
        }
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::new();
        assert_eq!(state.view, View::Dashboard);
        assert_eq!(state.anime_list.len(), 2);
        assert!(state.selected_anime.is_none());
        assert_eq!(state.chat_messages.len(), 1);
        assert_eq!(state.chat_messages[0].role, ChatRole::Model);
        assert!(!state.loading_characters);
        assert!(!state.loading_news);
        assert!(!state.is_typing);
        assert!(!state.is_uploading);
        assert_view_invariant(&state);
    }

    #[test]
    fn test_select_view_keeps_selections() {
        let mut state = AppState::new();
        let anime = state.anime_list[0].clone();
        state.select_anime(&anime);

        state.select_view(View::News);
        assert_eq!(state.view, View::News);
        assert!(state.selected_anime.is_some());

        state.select_view(View::SeriesDetail);
        assert_view_invariant(&state);
    }

    #[test]
    fn test_select_anime_enters_detail_and_clears_characters() {
        let mut state = AppState::new();
        state.characters = vec![character("Old")];
        let anime = state.anime_list[1].clone();

        let request = state.select_anime(&anime);
        assert_eq!(state.view, View::SeriesDetail);
        assert_eq!(request.title, anime.title);
        assert!(state.characters.is_empty());
        assert!(state.loading_characters);
        assert_view_invariant(&state);
    }

    #[test]
    fn test_select_episode_enters_player() {
        let mut state = AppState::new();
        let anime = state.anime_list[0].clone();
        let episode = anime.episodes[0].clone();

        state.select_episode(&anime, &episode);
        assert_eq!(state.view, View::Player);
        assert_eq!(state.active_episode.as_ref().unwrap().id, episode.id);
        assert_view_invariant(&state);
    }

    #[test]
    fn test_character_flag_clears_on_success_and_failure() {
        let mut state = AppState::new();
        let anime = state.anime_list[0].clone();

        let request = state.select_anime(&anime);
        assert!(state.loading_characters);
        state.apply(TaskResult::CharactersLoaded {
            seq: request.seq,
            characters: vec![character("Naruto")],
        });
        assert!(!state.loading_characters);
        assert_eq!(state.characters.len(), 1);

        let request = state.select_anime(&anime);
        state.apply(TaskResult::CharactersFailed {
            seq: request.seq,
            error: "network".to_string(),
        });
        assert!(!state.loading_characters);
        assert!(state.characters.is_empty());
        assert_view_invariant(&state);
    }

    #[test]
    fn test_stale_character_response_discarded() {
        let mut state = AppState::new();
        let first = state.anime_list[0].clone();
        let second = state.anime_list[1].clone();

        // Rapid double selection: the first lookup is still outstanding
        let old_request = state.select_anime(&first);
        let new_request = state.select_anime(&second);

        // The slow first response arrives after the second selection
        state.apply(TaskResult::CharactersLoaded {
            seq: old_request.seq,
            characters: vec![character("Naruto")],
        });
        assert!(state.characters.is_empty());
        assert!(state.loading_characters); // newer request still in flight

        state.apply(TaskResult::CharactersLoaded {
            seq: new_request.seq,
            characters: vec![character("Taki")],
        });
        assert_eq!(state.characters[0].name, "Taki");
        assert!(!state.loading_characters);
    }

    #[test]
    fn test_stale_character_failure_keeps_flag() {
        let mut state = AppState::new();
        let first = state.anime_list[0].clone();
        let second = state.anime_list[1].clone();

        let old_request = state.select_anime(&first);
        state.select_anime(&second);

        state.apply(TaskResult::CharactersFailed {
            seq: old_request.seq,
            error: "timeout".to_string(),
        });
        assert!(state.loading_characters);
    }

    #[test]
    fn test_news_fetch_once_per_activation() {
        let mut state = AppState::new();

        assert!(state.select_view(View::News));
        state.begin_news_fetch();

        // Re-entering while the fetch is in flight must not start another
        state.select_view(View::Dashboard);
        assert!(!state.select_view(View::News));

        state.apply(TaskResult::NewsLoaded(NewsDigest {
            text: "digest".to_string(),
            sources: Vec::new(),
        }));
        assert!(!state.loading_news);

        // A digest is present now; no automatic refetch
        state.select_view(View::Dashboard);
        assert!(!state.select_view(View::News));
    }

    #[test]
    fn test_news_failure_keeps_previous_digest() {
        let mut state = AppState::new();
        state.begin_news_fetch();
        state.apply(TaskResult::NewsLoaded(NewsDigest {
            text: "old digest".to_string(),
            sources: Vec::new(),
        }));

        state.begin_news_fetch();
        state.apply(TaskResult::NewsFailed("boom".to_string()));
        assert!(!state.loading_news);
        assert_eq!(state.news.text, "old digest");
    }

    #[test]
    fn test_chat_append_law_success() {
        let mut state = AppState::new();
        let before = state.chat_messages.clone();

        let sent = state.begin_chat_turn("hi").unwrap();
        assert_eq!(sent, "hi");
        assert!(state.is_typing);
        state.apply(TaskResult::ChatReply("Namaste!".to_string()));

        assert!(!state.is_typing);
        assert_eq!(state.chat_messages.len(), before.len() + 2);
        let tail = &state.chat_messages[before.len()..];
        assert_eq!(tail[0].role, ChatRole::User);
        assert_eq!(tail[0].content, "hi");
        assert_eq!(tail[1].role, ChatRole::Model);
        assert_eq!(tail[1].content, "Namaste!");
        assert_eq!(&state.chat_messages[..before.len()], &before[..]);
    }

    #[test]
    fn test_chat_append_law_failure() {
        let mut state = AppState::new();
        let before = state.chat_messages.len();

        state.begin_chat_turn("hi").unwrap();
        state.apply(TaskResult::ChatFailed("network".to_string()));

        assert!(!state.is_typing);
        assert_eq!(state.chat_messages.len(), before + 1);
        assert_eq!(state.chat_messages.last().unwrap().role, ChatRole::User);
    }

    #[test]
    fn test_blank_chat_input_rejected_before_dispatch() {
        let mut state = AppState::new();
        let before = state.chat_messages.len();
        assert!(state.begin_chat_turn("   ").is_none());
        assert!(!state.is_typing);
        assert_eq!(state.chat_messages.len(), before);
    }

    #[test]
    fn test_upload_scenario() {
        let mut state = AppState::new();
        let existing_ids: Vec<String> =
            state.anime_list.iter().map(|a| a.id.clone()).collect();

        state.upload_title = "Demon Slayer".to_string();
        let (title, poster) = state.begin_upload().unwrap();
        assert!(state.is_uploading);

        state.apply(TaskResult::MetadataLoaded {
            title,
            poster_url: poster,
            metadata: metadata(&["Action", "Fantasy"]),
        });

        assert!(!state.is_uploading);
        assert_eq!(state.view, View::Dashboard);
        let newest = &state.anime_list[0];
        assert_eq!(newest.title, "Demon Slayer");
        assert_eq!(newest.genres, vec!["Action", "Fantasy"]);
        assert!(!existing_ids.contains(&newest.id));
        assert!(!newest.episodes.is_empty());
        assert!(state.upload_title.is_empty());
    }

    #[test]
    fn test_upload_failure_retains_input() {
        let mut state = AppState::new();
        state.upload_title = "Demon Slayer".to_string();
        state.upload_poster_url = "https://example.com/p.jpg".to_string();
        let count = state.anime_list.len();

        state.begin_upload().unwrap();
        state.apply(TaskResult::MetadataFailed("schema violation".to_string()));

        assert!(!state.is_uploading);
        assert_eq!(state.anime_list.len(), count);
        assert_eq!(state.upload_title, "Demon Slayer");
        assert_eq!(state.upload_poster_url, "https://example.com/p.jpg");
    }

    #[test]
    fn test_blank_upload_title_rejected() {
        let mut state = AppState::new();
        state.upload_title = "  ".to_string();
        assert!(state.begin_upload().is_none());
        assert!(!state.is_uploading);
    }

    #[test]
    fn test_uploaded_anime_uses_default_poster() {
        let mut state = AppState::new();
        state.upload_title = "Demon Slayer".to_string();
        let (title, poster) = state.begin_upload().unwrap();
        state.apply(TaskResult::MetadataLoaded {
            title,
            poster_url: poster,
            metadata: metadata(&[]),
        });
        assert_eq!(state.anime_list[0].thumbnail, crate::catalog::DEFAULT_POSTER);
    }

    #[test]
    fn test_toggle_mood() {
        let mut state = AppState::new();
        state.toggle_mood("Action");
        assert_eq!(state.active_mood.as_deref(), Some("Action"));
        state.toggle_mood("Romance");
        assert_eq!(state.active_mood.as_deref(), Some("Romance"));
        state.toggle_mood("Romance");
        assert!(state.active_mood.is_none());
    }

    #[test]
    fn test_failures_never_break_view_invariant() {
        let mut state = AppState::new();
        let anime = state.anime_list[0].clone();
        let request = state.select_anime(&anime);
        state.apply(TaskResult::CharactersFailed {
            seq: request.seq,
            error: "down".to_string(),
        });
        assert_view_invariant(&state);
        assert_eq!(state.view, View::SeriesDetail);
    }
}
