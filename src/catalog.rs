//! Seed catalog, mood table and the pure catalog filter

use crate::models::{now_millis, Anime, Episode};

/// Poster used when an upload supplies no URL
pub const DEFAULT_POSTER: &str =
    "https://images.unsplash.com/photo-1578632738980-28c3fbf0698c?q=80&w=1000";

/// Placeholder stream for freshly posted entries
pub const DEFAULT_VIDEO_URL: &str = "https://www.w3schools.com/html/mov_bbb.mp4";

/// Mood shortcut mapped to a genre keyword
pub struct Mood {
    pub label: &'static str,
    pub genre: &'static str,
}

pub const MOODS: &[Mood] = &[
    Mood { label: "Hyped ⚡", genre: "Action" },
    Mood { label: "Emotional 💧", genre: "Romance" },
    Mood { label: "Adventurous 🗺", genre: "Adventure" },
    Mood { label: "Chilled 🌙", genre: "Slice of Life" },
];

/// Case-insensitive substring check without allocation
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Entries shipped with the app so the dashboard is never empty on first run
pub fn seed_catalog() -> Vec<Anime> {
    let now = now_millis();
    vec![
        Anime {
            id: "seed-1".to_string(),
            title: "Naruto Shippuden (Hindi)".to_string(),
            description_hindi: "नारुतो उज़ुमाकी की कहानी जो होकागे बनने का सपना देखता है। \
                इसमें एक्शन और भावनाओं का अद्भुत संगम है।"
                .to_string(),
            description_english:
                "The legendary journey of Naruto Uzumaki as he seeks to become the Hokage."
                    .to_string(),
            thumbnail:
                "https://images.unsplash.com/photo-1541562232579-512a21360020?q=80&w=1000"
                    .to_string(),
            genres: vec![
                "Action".to_string(),
                "Adventure".to_string(),
                "Ninjas".to_string(),
            ],
            dubbed: true,
            subbed: true,
            is_series: true,
            episodes: vec![Episode {
                id: "seed-1-ep1".to_string(),
                episode_number: 1,
                title: "Homecoming".to_string(),
                video_url: DEFAULT_VIDEO_URL.to_string(),
                source_website: Some("AnimeWorld".to_string()),
            }],
            added_at: now,
        },
        Anime {
            id: "seed-2".to_string(),
            title: "Your Name (Hindi)".to_string(),
            description_hindi: "दो अजनबियों की कहानी जो रहस्यमय तरीके से एक-दूसरे के शरीर में \
                बदलने लगते हैं। एक गहरी प्रेम कहानी।"
                .to_string(),
            description_english:
                "Two teenagers share a profound, magical connection upon discovering they are \
                 swapping bodies."
                    .to_string(),
            thumbnail:
                "https://images.unsplash.com/photo-1518709268805-4e9042af9f23?q=80&w=1000"
                    .to_string(),
            genres: vec![
                "Romance".to_string(),
                "Drama".to_string(),
                "Supernatural".to_string(),
            ],
            dubbed: true,
            subbed: true,
            is_series: false,
            episodes: vec![Episode {
                id: "seed-2-m1".to_string(),
                episode_number: 1,
                title: "Full Movie".to_string(),
                video_url: DEFAULT_VIDEO_URL.to_string(),
                source_website: None,
            }],
            added_at: now,
        },
    ]
}

/// Derive the visible subset of the catalog. Pure: never mutates or reorders
/// the input, identical inputs yield identical output.
///
/// An entry passes when the query (case-insensitive substring of the title or
/// any genre, empty matches all) AND the mood criterion (some genre contains
/// the keyword, `None` passes all) both hold.
pub fn filter_catalog<'a>(
    entries: &'a [Anime],
    query: &str,
    mood_genre: Option<&str>,
) -> Vec<&'a Anime> {
    entries
        .iter()
        .filter(|anime| {
            let mood_match = match mood_genre {
                Some(keyword) => anime
                    .genres
                    .iter()
                    .any(|g| contains_ignore_case(g, keyword)),
                None => true,
            };
            let query_match = contains_ignore_case(&anime.title, query)
                || anime.genres.iter().any(|g| contains_ignore_case(g, query));
            mood_match && query_match
        })
        .collect()
}
