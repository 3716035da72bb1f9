use std::path::Path;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::assist::chat::ChatSession;
use crate::assist::llm::ChatClient;
use crate::assist::{SummaryReview, quiz, summary};
use crate::config::Config;
use crate::pipeline::{segment, tokenize_and_blank};
use crate::session::exercise::ExerciseState;
use crate::session::result::SessionSummary;
use crate::source::{SourceText, file, samples};
use crate::ui::components::menu::Menu;
use crate::ui::components::quiz_panel::QuizPanel;
use crate::ui::line_input::LineInput;
use crate::ui::text_entry::TextEntry;
use crate::ui::theme::Theme;

/// Wrong answers stay visible briefly before the expected word is revealed.
const REVEAL_DELAY: Duration = Duration::from_millis(800);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    PasteEntry,
    FileEntry,
    UrlEntry,
    Exercise,
    Quiz,
    Summary,
    Chat,
    Results,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub exercise: Option<ExerciseState>,
    pub last_summary: Option<SessionSummary>,
    pub quiz: Option<QuizPanel>,
    pub summary_input: LineInput,
    pub summary_review: Option<SummaryReview>,
    pub chat: ChatSession,
    pub chat_input: LineInput,
    /// Shared by the file and URL entry screens; rebuilt on entry.
    pub entry: LineInput,
    pub paste: TextEntry,
    pub client: Option<ChatClient>,
    /// One-line notice (errors, fetch results) shown in the footer.
    pub status: Option<String>,
    pub should_quit: bool,
    pub settings_selected: usize,
    reveal_at: Option<Instant>,
    /// Kept so "read again" can re-blank the same text afresh.
    last_source: Option<SourceText>,
    rng: SmallRng,
}

impl App {
    pub fn new() -> Self {
        let config = Config::load().unwrap_or_default();
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);
        let client = ChatClient::from_config(&config);

        Self {
            screen: AppScreen::Menu,
            config,
            theme,
            menu,
            exercise: None,
            last_summary: None,
            quiz: None,
            summary_input: LineInput::new(""),
            summary_review: None,
            chat: ChatSession::new(),
            chat_input: LineInput::new(""),
            entry: LineInput::new(""),
            paste: TextEntry::new(),
            client,
            status: None,
            should_quit: false,
            settings_selected: 0,
            reveal_at: None,
            last_source: None,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Run the pipeline over `source` and move into the exercise screen.
    /// Failures land in the status line, not an error screen.
    pub fn start_exercise(&mut self, source: SourceText) {
        let policy = self.config.blank_policy();
        let tokens = match tokenize_and_blank(&source.body, &policy, &mut self.rng) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.status = Some(err.to_string());
                return;
            }
        };
        let chunks = segment::segment_into_paragraphs(tokens, &mut self.rng);
        if chunks.is_empty() {
            self.status = Some("that text is too short to make an exercise from".to_string());
            return;
        }

        self.exercise = Some(ExerciseState::new(chunks, source.title.clone()));
        self.last_source = Some(source);
        self.chat = ChatSession::new();
        self.quiz = None;
        self.summary_review = None;
        self.reveal_at = None;
        self.status = None;
        self.screen = AppScreen::Exercise;
    }

    pub fn load_paste(&mut self) {
        if self.paste.is_empty() {
            self.status = Some("nothing to read yet".to_string());
            return;
        }
        let body = self.paste.value().to_string();
        self.paste.clear();
        self.start_exercise(SourceText::untitled(body));
    }

    pub fn load_file(&mut self) {
        let path = self.entry.value().trim().to_string();
        match file::read_text(Path::new(&path)) {
            Ok(source) => self.start_exercise(source),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    #[cfg(feature = "network")]
    pub fn load_url(&mut self) {
        let url = self.entry.value().trim().to_string();
        match crate::source::scrape::fetch_article(&url) {
            Ok(source) => self.start_exercise(source),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    #[cfg(not(feature = "network"))]
    pub fn load_url(&mut self) {
        self.status = Some("built without network support".to_string());
    }

    #[cfg(feature = "network")]
    pub fn load_lucky(&mut self) {
        match crate::source::wikipedia::fetch_random_article() {
            Ok(source) => self.start_exercise(source),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    #[cfg(not(feature = "network"))]
    pub fn load_lucky(&mut self) {
        self.status = Some("built without network support".to_string());
    }

    pub fn load_sample(&mut self) {
        let source = samples::random_sample(&mut self.rng);
        self.start_exercise(source);
    }

    /// Re-run the pipeline over the same text; the random selection makes it
    /// a fresh exercise.
    pub fn retry_exercise(&mut self) {
        if let Some(source) = self.last_source.clone() {
            self.start_exercise(source);
        }
    }

    pub fn submit_active_chunk(&mut self) {
        if let Some(ref mut exercise) = self.exercise {
            let chunk = exercise.active_chunk_mut();
            if !chunk.submitted {
                chunk.submitted = true;
                self.reveal_at = Some(Instant::now() + REVEAL_DELAY);
            }
        }
    }

    /// Timed reveal transition, driven by the tick event.
    pub fn tick(&mut self) {
        if let Some(deadline) = self.reveal_at {
            if Instant::now() >= deadline {
                if let Some(ref mut exercise) = self.exercise {
                    for chunk in exercise.chunks.iter_mut().filter(|c| c.submitted) {
                        chunk.revealed = true;
                    }
                }
                self.reveal_at = None;
            }
        }
    }

    pub fn finish_exercise(&mut self) {
        if let Some(ref exercise) = self.exercise {
            self.last_summary = Some(exercise.summary());
            self.screen = AppScreen::Results;
        }
    }

    /// Context handed to quiz and summary prompts: the active paragraph.
    fn active_paragraph_text(&self) -> Option<String> {
        self.exercise
            .as_ref()
            .map(|exercise| exercise.active_chunk().full_text())
    }

    /// Context for chat: the whole studied text.
    fn whole_text(&self) -> Option<String> {
        self.exercise.as_ref().map(|exercise| {
            exercise
                .chunks
                .iter()
                .map(|c| c.full_text())
                .collect::<Vec<_>>()
                .join("")
        })
    }

    pub fn open_quiz(&mut self) {
        if let Some(text) = self.active_paragraph_text() {
            self.quiz = Some(QuizPanel::new(quiz::quiz_for(&text, self.client.as_ref())));
            self.screen = AppScreen::Quiz;
        }
    }

    pub fn open_summary(&mut self) {
        if self.exercise.is_some() {
            self.summary_input = LineInput::new("");
            self.summary_review = None;
            self.screen = AppScreen::Summary;
        }
    }

    pub fn grade_summary(&mut self) {
        let Some(text) = self.active_paragraph_text() else {
            return;
        };
        let written = self.summary_input.value().trim().to_string();
        if written.is_empty() {
            return;
        }
        self.summary_review = Some(summary::review_summary(
            &text,
            &written,
            self.client.as_ref(),
            &mut self.rng,
        ));
    }

    pub fn open_chat(&mut self) {
        if self.exercise.is_some() {
            self.chat_input = LineInput::new("");
            self.screen = AppScreen::Chat;
        }
    }

    pub fn ask_chat(&mut self) {
        let Some(context) = self.whole_text() else {
            return;
        };
        let question = self.chat_input.value().trim().to_string();
        if question.is_empty() {
            return;
        }
        self.chat_input.clear();
        self.chat.ask(self.client.as_ref(), &context, &question);
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        self.exercise = None;
        self.quiz = None;
        self.status = None;
        self.reveal_at = None;
    }

    pub fn back_to_exercise(&mut self) {
        if self.exercise.is_some() {
            self.screen = AppScreen::Exercise;
        } else {
            self.screen = AppScreen::Menu;
        }
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn settings_cycle_forward(&mut self) {
        match self.settings_selected {
            0 => {
                self.config.blank_frequency = (self.config.blank_frequency + 5).min(30);
            }
            1 => {
                self.config.only_important_words = !self.config.only_important_words;
            }
            2 => {
                let themes = Theme::available_themes();
                if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
                    let next = (idx + 1) % themes.len();
                    self.config.theme = themes[next].clone();
                } else if let Some(first) = themes.first() {
                    self.config.theme = first.clone();
                }
                self.reload_theme();
            }
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        match self.settings_selected {
            0 => {
                self.config.blank_frequency =
                    self.config.blank_frequency.saturating_sub(5).max(5);
            }
            1 => {
                self.config.only_important_words = !self.config.only_important_words;
            }
            2 => {
                let themes = Theme::available_themes();
                if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
                    let next = if idx == 0 { themes.len() - 1 } else { idx - 1 };
                    self.config.theme = themes[next].clone();
                } else if let Some(first) = themes.first() {
                    self.config.theme = first.clone();
                }
                self.reload_theme();
            }
            _ => {}
        }
    }

    fn reload_theme(&mut self) {
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }
}
