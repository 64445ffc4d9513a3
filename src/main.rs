//! AnimeLover Desktop
//! A catalog browser for Hindi-dubbed anime with Gemini-powered metadata,
//! character lookup, news and chat

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::process::{Command, Stdio};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;

mod api;
mod catalog;
mod config;
mod models;
mod state;

use api::GeminiClient;
use catalog::{filter_catalog, MOODS};
use config::AppConfig;
use models::{Anime, ChatRole, Episode, View};
use state::{AppState, CharacterRequest, TaskResult};

/// Get current time as HH:MM:SS (UTC)
fn timestamp_now() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let secs = now % 86400;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Generated application icon: indigo tile with a white play triangle
fn load_icon() -> egui::IconData {
    let size: usize = 64;
    let mut rgba = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            let nx = x as f32 / size as f32;
            let ny = y as f32 / size as f32;

            // Rounded corners
            let corner_radius = 0.125;
            let dx = if nx < corner_radius {
                corner_radius - nx
            } else if nx > 1.0 - corner_radius {
                nx - (1.0 - corner_radius)
            } else {
                0.0
            };
            let dy = if ny < corner_radius {
                corner_radius - ny
            } else if ny > 1.0 - corner_radius {
                ny - (1.0 - corner_radius)
            } else {
                0.0
            };
            if dx * dx + dy * dy > corner_radius * corner_radius {
                continue;
            }

            // Indigo gradient (#6366f1 to #4338ca)
            let t = nx * 0.5 + ny * 0.5;
            let r = (99.0 + (67.0 - 99.0) * t) as u8;
            let g = (102.0 + (56.0 - 102.0) * t) as u8;
            let b = (241.0 + (202.0 - 241.0) * t) as u8;

            // Play triangle
            let px = nx - 0.38;
            let py = ny - 0.5;
            let in_play = px >= 0.0 && px <= 0.3 && py.abs() <= (0.3 - px) * 0.7;

            if in_play {
                rgba[idx] = 255;
                rgba[idx + 1] = 255;
                rgba[idx + 2] = 255;
                rgba[idx + 3] = 255;
            } else {
                rgba[idx] = r;
                rgba[idx + 1] = g;
                rgba[idx + 2] = b;
                rgba[idx + 3] = 255;
            }
        }
    }

    egui::IconData {
        rgba,
        width: size as u32,
        height: size as u32,
    }
}

fn main() -> Result<(), eframe::Error> {
    // Force X11 backend on Linux before any windowing code runs
    #[cfg(target_os = "linux")]
    {
        std::env::set_var("WINIT_UNIX_BACKEND", "x11");
        std::env::remove_var("WAYLAND_DISPLAY");
    }

    let icon = load_icon();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([860.0, 540.0])
            .with_icon(icon),
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        ..Default::default()
    };

    eframe::run_native(
        "AnimeLover Desktop",
        options,
        Box::new(|cc| {
            // Devanagari and emoji coverage from system fonts where available
            let mut fonts = egui::FontDefinitions::default();

            #[cfg(target_os = "windows")]
            {
                for (name, path) in [
                    ("devanagari", "C:\\Windows\\Fonts\\Nirmala.ttf"),
                    ("emoji", "C:\\Windows\\Fonts\\seguiemj.ttf"),
                ] {
                    if let Ok(font_data) = std::fs::read(path) {
                        fonts.font_data.insert(
                            name.to_owned(),
                            egui::FontData::from_owned(font_data).into(),
                        );
                        fonts
                            .families
                            .entry(egui::FontFamily::Proportional)
                            .or_default()
                            .push(name.to_owned());
                    }
                }
            }

            #[cfg(target_os = "linux")]
            {
                let fallback_paths = [
                    "/usr/share/fonts/truetype/noto/NotoSansDevanagari-Regular.ttf",
                    "/usr/share/fonts/noto/NotoSansDevanagari-Regular.ttf",
                    "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
                    "/usr/share/fonts/noto-emoji/NotoColorEmoji.ttf",
                    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                ];

                for (i, path) in fallback_paths.iter().enumerate() {
                    if let Ok(font_data) = std::fs::read(path) {
                        let name = format!("fallback-{}", i);
                        fonts.font_data.insert(
                            name.clone(),
                            egui::FontData::from_owned(font_data).into(),
                        );
                        fonts
                            .families
                            .entry(egui::FontFamily::Proportional)
                            .or_default()
                            .push(name);
                    }
                }
            }

            #[cfg(target_os = "macos")]
            {
                if let Ok(font_data) = std::fs::read("/System/Library/Fonts/Supplemental/Kohinoor.ttc")
                {
                    fonts.font_data.insert(
                        "devanagari".to_owned(),
                        egui::FontData::from_owned(font_data).into(),
                    );
                    fonts
                        .families
                        .entry(egui::FontFamily::Proportional)
                        .or_default()
                        .push("devanagari".to_owned());
                }
            }

            cc.egui_ctx.set_fonts(fonts);

            let config = AppConfig::load();
            if config.dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }
            cc.egui_ctx.set_zoom_factor(config.font_size as f32 / 14.0);

            Ok(Box::new(AnimeLoverApp::new(config)))
        }),
    )
}

/// Context for background fetch operations
struct FetchContext {
    api_key: String,
    sender: Sender<TaskResult>,
}

impl FetchContext {
    fn client(&self) -> GeminiClient {
        GeminiClient::new(&self.api_key)
    }
}

struct AnimeLoverApp {
    state: AppState,

    // Background task channel
    task_receiver: Receiver<TaskResult>,
    task_sender: Sender<TaskResult>,

    config: AppConfig,
    api_key_input: String,

    chat_input: String,
    status_message: String,
    console_log: Vec<String>,
    show_settings: bool,
}

impl AnimeLoverApp {
    fn new(config: AppConfig) -> Self {
        let (task_sender, task_receiver) = channel();
        let api_key_input = config.effective_api_key();

        let mut app = Self {
            state: AppState::new(),
            task_receiver,
            task_sender,
            config,
            api_key_input,
            chat_input: String::new(),
            status_message: "Ready".to_string(),
            console_log: vec!["[INFO] AnimeLover Desktop started".to_string()],
            show_settings: false,
        };

        if app.api_key_input.is_empty() {
            app.log("[WARN] No Gemini API key configured - AI features will fail");
            app.status_message =
                "Set GEMINI_API_KEY or add an api_key in Settings".to_string();
        }
        app
    }

    fn log(&mut self, message: &str) {
        let timestamp = timestamp_now();
        self.console_log.push(format!("[{}] {}", timestamp, message));
        // Keep last 500 lines
        if self.console_log.len() > 500 {
            self.console_log.remove(0);
        }
    }

    fn fetch_context(&self) -> FetchContext {
        FetchContext {
            api_key: self.api_key_input.clone(),
            sender: self.task_sender.clone(),
        }
    }

    fn fetch_characters(&mut self, request: CharacterRequest) {
        self.log(&format!(
            "[INFO] Looking up characters for \"{}\"",
            request.title
        ));
        self.status_message = "Loading characters...".to_string();

        let ctx = self.fetch_context();
        thread::spawn(move || {
            let client = ctx.client();
            match client.get_characters(&request.title) {
                Ok(characters) => {
                    let _ = ctx.sender.send(TaskResult::CharactersLoaded {
                        seq: request.seq,
                        characters,
                    });
                }
                Err(error) => {
                    let _ = ctx.sender.send(TaskResult::CharactersFailed {
                        seq: request.seq,
                        error,
                    });
                }
            }
        });
    }

    fn fetch_news(&mut self) {
        self.state.begin_news_fetch();
        self.log("[INFO] Fetching anime news digest");
        self.status_message = "Fetching news...".to_string();

        let ctx = self.fetch_context();
        thread::spawn(move || {
            let client = ctx.client();
            match client.fetch_news() {
                Ok(digest) => {
                    let _ = ctx.sender.send(TaskResult::NewsLoaded(digest));
                }
                Err(error) => {
                    let _ = ctx.sender.send(TaskResult::NewsFailed(error));
                }
            }
        });
    }

    fn send_chat_turn(&mut self) {
        let input = std::mem::take(&mut self.chat_input);
        // Transcript before this turn's user message; the provider is
        // stateless, so this is its entire conversational memory.
        let prior = self.state.chat_messages.clone();
        let message = match self.state.begin_chat_turn(&input) {
            Some(message) => message,
            None => return,
        };

        let ctx = self.fetch_context();
        thread::spawn(move || {
            let client = ctx.client();
            match client.send_chat(&message, &prior) {
                Ok(reply) => {
                    let _ = ctx.sender.send(TaskResult::ChatReply(reply));
                }
                Err(error) => {
                    let _ = ctx.sender.send(TaskResult::ChatFailed(error));
                }
            }
        });
    }

    fn submit_upload(&mut self) {
        let (title, poster_url) = match self.state.begin_upload() {
            Some(request) => request,
            None => {
                self.status_message = "Please enter a series title".to_string();
                return;
            }
        };

        self.log(&format!("[INFO] Generating metadata for \"{}\"", title));
        self.status_message = "Generating metadata...".to_string();

        let ctx = self.fetch_context();
        thread::spawn(move || {
            let client = ctx.client();
            match client.generate_metadata(&title) {
                Ok(metadata) => {
                    let _ = ctx.sender.send(TaskResult::MetadataLoaded {
                        title,
                        poster_url,
                        metadata,
                    });
                }
                Err(error) => {
                    let _ = ctx.sender.send(TaskResult::MetadataFailed(error));
                }
            }
        });
    }

    fn launch_player(&mut self, url: &str) {
        let player = self.config.effective_player();
        let mut parts = player.split_whitespace();
        let command = match parts.next() {
            Some(command) => command.to_string(),
            None => return,
        };
        let args: Vec<String> = parts.map(|s| s.to_string()).collect();

        match Command::new(&command)
            .args(&args)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => {
                self.log(&format!("[INFO] Launched {} for playback", command));
                self.status_message = format!("Playing in {}", command);
            }
            Err(e) => {
                self.log(&format!("[ERROR] Failed to launch player: {}", e));
                self.status_message =
                    format!("Could not start \"{}\" - check Settings", command);
            }
        }
    }

    fn save_settings(&mut self) {
        self.config.api_key = self.api_key_input.clone();
        self.config.save();
        self.log("[INFO] Settings saved");
        self.status_message = "Settings saved".to_string();
    }

    fn navigate(&mut self, view: View) {
        if self.state.select_view(view) {
            self.fetch_news();
        }
    }

    fn show_nav(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("AnimeLover")
                    .strong()
                    .size(20.0)
                    .color(egui::Color32::from_rgb(129, 140, 248)),
            );
        });
        ui.add_space(12.0);
        ui.separator();

        let entries = [
            ("🏠 Discover", View::Dashboard),
            ("📰 Anime News", View::News),
            ("💬 AI Guide", View::Chat),
            ("📤 Post", View::Upload),
        ];

        let mut target: Option<View> = None;
        for (label, view) in entries {
            let active = self.state.view == view
                || (view == View::Dashboard
                    && matches!(self.state.view, View::SeriesDetail | View::Player));
            if ui.selectable_label(active, label).clicked() {
                target = Some(view);
            }
        }
        if let Some(view) = target {
            self.navigate(view);
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            ui.add_space(8.0);
            if ui.selectable_label(self.show_settings, "⚙ Settings").clicked() {
                self.show_settings = !self.show_settings;
            }
        });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut save_clicked = false;
        let mut dark_mode = self.config.dark_mode;

        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Gemini API key");
                ui.add(
                    egui::TextEdit::singleline(&mut self.api_key_input)
                        .password(true)
                        .desired_width(280.0),
                );
                ui.add_space(6.0);

                ui.label("External player command");
                ui.add(
                    egui::TextEdit::singleline(&mut self.config.external_player)
                        .hint_text("mpv")
                        .desired_width(280.0),
                );
                ui.add_space(6.0);

                ui.checkbox(&mut dark_mode, "Dark mode");
                ui.add_space(8.0);

                if ui.button("Save").clicked() {
                    save_clicked = true;
                }

                ui.add_space(8.0);
                ui.collapsing("Console", |ui| {
                    egui::ScrollArea::vertical()
                        .max_height(160.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in &self.console_log {
                                ui.label(egui::RichText::new(line).monospace().small());
                            }
                        });
                });
            });

        if dark_mode != self.config.dark_mode {
            self.config.dark_mode = dark_mode;
            ctx.set_visuals(if dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
        }
        if save_clicked {
            self.save_settings();
        }
        self.show_settings = open;
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading(egui::RichText::new("Find your dubbed vibe").size(28.0).strong());
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("HOW ARE YOU FEELING TODAY?")
                .small()
                .weak(),
        );
        ui.add_space(4.0);

        // Mood shortcuts
        let mut toggled: Option<&'static str> = None;
        ui.horizontal_wrapped(|ui| {
            for mood in MOODS {
                let active = self.state.active_mood.as_deref() == Some(mood.genre);
                if ui.selectable_label(active, mood.label).clicked() {
                    toggled = Some(mood.genre);
                }
            }
        });
        if let Some(genre) = toggled {
            self.state.toggle_mood(genre);
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            let section = match &self.state.active_mood {
                Some(genre) => format!("{} Picks", genre),
                None => "Latest Additions".to_string(),
            };
            ui.heading(section);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.state.search_query)
                        .hint_text("Search catalog...")
                        .desired_width(220.0),
                );
            });
        });
        ui.separator();

        let filtered: Vec<Anime> = filter_catalog(
            &self.state.anime_list,
            &self.state.search_query,
            self.state.active_mood.as_deref(),
        )
        .into_iter()
        .cloned()
        .collect();

        if filtered.is_empty() {
            ui.add_space(20.0);
            ui.label("No titles match - try another search or mood.");
        }

        let mut clicked: Option<Anime> = None;
        for anime in &filtered {
            ui.add_space(6.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(&anime.title).strong().size(16.0));
                            if anime.dubbed {
                                ui.label(
                                    egui::RichText::new("HINDI DUB")
                                        .small()
                                        .color(egui::Color32::from_rgb(129, 140, 248)),
                                );
                            }
                            if anime.subbed {
                                ui.label(egui::RichText::new("SUB").small().weak());
                            }
                        });
                        ui.label(egui::RichText::new(anime.genres.join(" • ")).weak());
                        let kind = if anime.is_series {
                            format!("Series • {} episode(s)", anime.episodes.len())
                        } else {
                            "Feature film".to_string()
                        };
                        ui.label(egui::RichText::new(kind).small().weak());
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("View ▶").clicked() {
                            clicked = Some(anime.clone());
                        }
                    });
                });
            });
        }

        if let Some(anime) = clicked {
            let request = self.state.select_anime(&anime);
            self.fetch_characters(request);
        }
    }

    fn show_detail(&mut self, ui: &mut egui::Ui) {
        let anime = match self.state.selected_anime.clone() {
            Some(anime) => anime,
            None => {
                self.navigate(View::Dashboard);
                return;
            }
        };

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new(&anime.title).size(26.0).strong());
        });
        ui.label(egui::RichText::new(anime.genres.join(" • ")).weak());
        ui.add_space(8.0);

        let mut play: Option<Episode> = None;
        ui.horizontal(|ui| {
            if ui.button("▶ Watch Now").clicked() {
                if let Some(first) = anime.episodes.first() {
                    play = Some(first.clone());
                }
            }
            if ui.button("← Return Home").clicked() {
                self.state.select_view(View::Dashboard);
            }
        });

        ui.add_space(12.0);
        ui.label(egui::RichText::new("सारांश (HINDI PLOT)").small().strong());
        ui.label(egui::RichText::new(&anime.description_hindi).size(15.0));
        ui.add_space(8.0);
        ui.label(egui::RichText::new("SYNOPSIS").small().strong());
        ui.label(&anime.description_english);

        ui.add_space(12.0);
        ui.separator();
        ui.label(egui::RichText::new("CHARACTER EXPLORER (AI)").small().strong());
        if self.state.loading_characters {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Asking Gemini about the cast...");
            });
        } else if self.state.characters.is_empty() {
            ui.label(egui::RichText::new("No character info available.").weak());
        } else {
            ui.horizontal_wrapped(|ui| {
                for character in &self.state.characters {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_max_width(200.0);
                        ui.vertical(|ui| {
                            ui.label(
                                egui::RichText::new(&character.role)
                                    .small()
                                    .color(egui::Color32::from_rgb(129, 140, 248)),
                            );
                            ui.label(egui::RichText::new(&character.name).strong());
                            ui.label(egui::RichText::new(&character.description).small());
                        });
                    });
                }
            });
        }

        ui.add_space(12.0);
        ui.separator();
        ui.heading("Episodes");
        for episode in &anime.episodes {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("{:>2}", episode.episode_number)).monospace());
                ui.label(egui::RichText::new(&episode.title).strong());
                if let Some(source) = &episode.source_website {
                    ui.label(egui::RichText::new(source).small().weak());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("PLAY ▶").clicked() {
                        play = Some(episode.clone());
                    }
                });
            });
        }

        if let Some(episode) = play {
            self.state.select_episode(&anime, &episode);
        }
    }

    fn show_player(&mut self, ui: &mut egui::Ui) {
        let (anime, episode) = match (
            self.state.selected_anime.clone(),
            self.state.active_episode.clone(),
        ) {
            (Some(anime), Some(episode)) => (anime, episode),
            _ => {
                self.navigate(View::Dashboard);
                return;
            }
        };

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("← Stop Watching").clicked() {
                self.state.select_view(View::SeriesDetail);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new("1080P • HINDI").small().weak());
            });
        });
        ui.add_space(12.0);

        ui.label(
            egui::RichText::new(anime.title.to_uppercase())
                .small()
                .color(egui::Color32::from_rgb(129, 140, 248)),
        );
        ui.heading(format!(
            "EPISODE {}: {}",
            episode.episode_number, episode.title
        ));
        ui.add_space(16.0);

        let mut launch = false;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                if ui
                    .button(egui::RichText::new("▶ Play in External Player").size(18.0))
                    .clicked()
                {
                    launch = true;
                }
                ui.add_space(8.0);
                ui.label(egui::RichText::new(&episode.video_url).monospace().weak());
                ui.add_space(24.0);
            });
        });
        if launch {
            self.launch_player(&episode.video_url);
        }
    }

    fn show_chat(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading("AnimeDost");
            ui.label(egui::RichText::new("HINDI DUB EXPERT AI").small().weak());
        });
        ui.separator();

        let input_height = 48.0;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .max_height(ui.available_height() - input_height)
            .show(ui, |ui| {
                for msg in &self.state.chat_messages {
                    let (align, name, color) = match msg.role {
                        ChatRole::User => (
                            egui::Align::Max,
                            "You",
                            egui::Color32::from_rgb(99, 102, 241),
                        ),
                        ChatRole::Model => (
                            egui::Align::Min,
                            "AnimeDost",
                            egui::Color32::from_rgb(148, 163, 184),
                        ),
                    };
                    ui.with_layout(egui::Layout::top_down(align), |ui| {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.set_max_width(ui.available_width() * 0.75);
                            ui.label(egui::RichText::new(name).small().color(color));
                            ui.label(&msg.content);
                        });
                    });
                    ui.add_space(4.0);
                }
                if self.state.is_typing {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(egui::RichText::new("Thinking...").weak());
                    });
                }
            });

        ui.separator();
        let mut send = false;
        ui.horizontal(|ui| {
            let response = ui.add_sized(
                [ui.available_width() - 70.0, 24.0],
                egui::TextEdit::singleline(&mut self.chat_input)
                    .hint_text("Ask anything about anime..."),
            );
            let pressed_enter =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(!self.state.is_typing, egui::Button::new("Send"))
                .clicked();
            if (pressed_enter || clicked) && !self.state.is_typing {
                send = true;
                response.request_focus();
            }
        });
        if send {
            self.send_chat_turn();
        }
    }

    fn show_news(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading("Anime News India");
        ui.label(
            egui::RichText::new("Powered by Google Search & Gemini. Fresh updates on Hindi dubbing.")
                .weak(),
        );
        ui.separator();

        if self.state.loading_news {
            ui.add_space(20.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Summarizing the latest headlines...");
            });
            return;
        }

        if self.state.news.text.is_empty() {
            ui.add_space(20.0);
            ui.label("No news loaded yet.");
        } else {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(&self.state.news.text).size(15.0));

            if !self.state.news.sources.is_empty() {
                ui.add_space(12.0);
                ui.label(egui::RichText::new("VERIFIED SOURCES").small().strong());
                for source in &self.state.news.sources {
                    ui.hyperlink_to(format!("↗ {}", source.title), &source.url);
                }
            }
        }

        ui.add_space(12.0);
        if ui
            .add_enabled(
                !self.state.loading_news,
                egui::Button::new("Refresh News Feed"),
            )
            .clicked()
        {
            self.fetch_news();
        }
    }

    fn show_upload(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading("Post New Content");
        ui.label(
            egui::RichText::new(
                "Give a title and Gemini writes the bilingual synopsis and genre tags.",
            )
            .weak(),
        );
        ui.separator();
        ui.add_space(8.0);

        ui.label("Series title");
        ui.add(
            egui::TextEdit::singleline(&mut self.state.upload_title)
                .hint_text("e.g. Demon Slayer")
                .desired_width(320.0),
        );
        ui.add_space(6.0);
        ui.label("Poster URL (optional)");
        ui.add(
            egui::TextEdit::singleline(&mut self.state.upload_poster_url)
                .hint_text("https://...")
                .desired_width(320.0),
        );
        ui.add_space(12.0);

        let can_submit =
            !self.state.is_uploading && !self.state.upload_title.trim().is_empty();
        let mut submit = false;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(can_submit, egui::Button::new("Add to Catalog"))
                .clicked()
            {
                submit = true;
            }
            if self.state.is_uploading {
                ui.spinner();
                ui.label(egui::RichText::new("Generating metadata...").weak());
            }
        });
        if submit {
            self.submit_upload();
        }
    }
}

impl eframe::App for AnimeLoverApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process background task results (non-blocking)
        while let Ok(result) = self.task_receiver.try_recv() {
            let line = self.state.apply(result);
            self.status_message = line
                .splitn(2, "] ")
                .nth(1)
                .unwrap_or(&line)
                .to_string();
            self.log(&line);
        }

        // Keep spinners animating while something is in flight
        if self.state.loading_characters
            || self.state.loading_news
            || self.state.is_typing
            || self.state.is_uploading
        {
            ctx.request_repaint_after(Duration::from_millis(150));
        }

        egui::SidePanel::left("nav")
            .exact_width(170.0)
            .resizable(false)
            .show(ctx, |ui| self.show_nav(ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status_message).small());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Dashboard => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.show_dashboard(ui));
            }
            View::SeriesDetail => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.show_detail(ui));
            }
            View::Player => self.show_player(ui),
            View::Chat => self.show_chat(ui),
            View::News => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.show_news(ui));
            }
            View::Upload => self.show_upload(ui),
        });

        if self.show_settings {
            self.show_settings_window(ctx);
        }
    }
}
