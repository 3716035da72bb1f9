mod app;
mod assist;
mod config;
mod event;
mod pipeline;
mod session;
mod source;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::chat_panel::ChatPanel;
use ui::components::exercise_area::ExerciseArea;
use ui::components::progress_bar::ProgressBar;
use ui::components::quiz_panel::QuizView;
use ui::components::results_panel::ResultsPanel;
use ui::components::sidebar::ExerciseSidebar;
use ui::components::summary_panel::SummaryPanel;
use ui::layout::AppLayout;
use ui::line_input::{InputResult, LineInput};

#[derive(Parser)]
#[command(name = "clozr", version, about = "Terminal active-reading trainer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short = 'F', long, help = "Percent of candidate words to blank (5-30)")]
    frequency: Option<u8>,

    #[arg(short, long, value_name = "PATH", help = "Start reading a text file")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Start by scraping an article from a URL")]
    url: Option<String>,

    #[arg(short, long, help = "Start with a random Wikipedia article")]
    lucky: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();

    if let Some(frequency) = cli.frequency {
        app.config.blank_frequency = frequency;
        app.config.validate();
    }
    if let Some(theme_name) = cli.theme {
        if let Some(theme) = ui::theme::Theme::load(&theme_name) {
            let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
            app.theme = theme;
            app.menu.theme = theme;
        }
    }
    if let Some(path) = cli.file {
        app.entry = LineInput::new(&path.display().to_string());
        app.load_file();
    } else if let Some(url) = cli.url {
        app.entry = LineInput::new(&url);
        app.load_url();
    } else if cli.lucky {
        app.load_lucky();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => {
                if app.screen == AppScreen::PasteEntry {
                    app.paste.push_paste(&text);
                }
            }
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore Release/Repeat so held keys don't double-enter answers.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::PasteEntry => handle_paste_key(app, key),
        AppScreen::FileEntry => handle_entry_key(app, key, EntryKind::File),
        AppScreen::UrlEntry => handle_entry_key(app, key, EntryKind::Url),
        AppScreen::Exercise => handle_exercise_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
        AppScreen::Chat => handle_chat_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('p') => {
            app.paste.clear();
            app.status = None;
            app.screen = AppScreen::PasteEntry;
        }
        KeyCode::Char('f') => {
            app.entry = LineInput::new("").with_path_completion();
            app.status = None;
            app.screen = AppScreen::FileEntry;
        }
        KeyCode::Char('u') => {
            app.entry = LineInput::new("https://");
            app.status = None;
            app.screen = AppScreen::UrlEntry;
        }
        KeyCode::Char('l') => app.load_lucky(),
        KeyCode::Char('b') => app.load_sample(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => {
                app.paste.clear();
                app.status = None;
                app.screen = AppScreen::PasteEntry;
            }
            1 => {
                app.entry = LineInput::new("").with_path_completion();
                app.status = None;
                app.screen = AppScreen::FileEntry;
            }
            2 => {
                app.entry = LineInput::new("https://");
                app.status = None;
                app.screen = AppScreen::UrlEntry;
            }
            3 => app.load_lucky(),
            4 => app.load_sample(),
            5 => app.go_to_settings(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_paste_key(app: &mut App, key: KeyEvent) {
    match app.paste.handle(key) {
        InputResult::Submit => app.load_paste(),
        InputResult::Cancel => app.go_to_menu(),
        InputResult::Continue => {}
    }
}

#[derive(Clone, Copy)]
enum EntryKind {
    File,
    Url,
}

fn handle_entry_key(app: &mut App, key: KeyEvent, kind: EntryKind) {
    match app.entry.handle(key) {
        InputResult::Submit => match kind {
            EntryKind::File => app.load_file(),
            EntryKind::Url => app.load_url(),
        },
        InputResult::Cancel => app.go_to_menu(),
        InputResult::Continue => {}
    }
}

fn handle_exercise_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        match key.code {
            KeyCode::Char('q') => app.open_quiz(),
            KeyCode::Char('s') => app.open_summary(),
            KeyCode::Char('t') => app.open_chat(),
            KeyCode::Char('n') => {
                if let Some(ref mut exercise) = app.exercise {
                    exercise.next_chunk();
                }
            }
            KeyCode::Char('p') => {
                if let Some(ref mut exercise) = app.exercise {
                    exercise.prev_chunk();
                }
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Enter => {
            let (submitted, complete) = match app.exercise {
                Some(ref exercise) => {
                    (exercise.active_chunk().submitted, exercise.is_complete())
                }
                None => return,
            };
            if !submitted {
                app.submit_active_chunk();
            } else if complete {
                app.finish_exercise();
            } else if let Some(ref mut exercise) = app.exercise {
                exercise.next_chunk();
            }
        }
        KeyCode::Tab | KeyCode::Right => {
            if let Some(ref mut exercise) = app.exercise {
                session::input::next_blank(exercise.active_chunk_mut());
            }
        }
        KeyCode::BackTab | KeyCode::Left => {
            if let Some(ref mut exercise) = app.exercise {
                session::input::prev_blank(exercise.active_chunk_mut());
            }
        }
        KeyCode::Backspace => {
            if let Some(ref mut exercise) = app.exercise {
                session::input::process_backspace(exercise.active_chunk_mut());
            }
        }
        KeyCode::Char(ch) => {
            if let Some(ref mut exercise) = app.exercise {
                session::input::process_char(exercise.active_chunk_mut(), ch);
            }
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let Some(ref mut quiz) = app.quiz else {
        app.back_to_exercise();
        return;
    };

    match key.code {
        KeyCode::Esc => app.back_to_exercise(),
        KeyCode::Up | KeyCode::Char('k') => quiz.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => quiz.select_next(),
        KeyCode::Char(ch @ '1'..='4') => {
            if !quiz.is_answered() {
                let index = ch as usize - '1' as usize;
                if index < quiz.question().options.len() {
                    quiz.selected_option = index;
                    quiz.confirm();
                }
            }
        }
        KeyCode::Enter => {
            if quiz.is_answered() {
                if !quiz.next_question() {
                    app.back_to_exercise();
                }
            } else {
                quiz.confirm();
            }
        }
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match app.summary_input.handle(key) {
        InputResult::Submit => {
            if app.summary_review.is_some() {
                app.summary_input.clear();
                app.summary_review = None;
            } else {
                app.grade_summary();
            }
        }
        InputResult::Cancel => app.back_to_exercise(),
        InputResult::Continue => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match app.chat_input.handle(key) {
        InputResult::Submit => app.ask_chat(),
        InputResult::Cancel => app.back_to_exercise(),
        InputResult::Continue => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry_exercise(),
        KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let _ = app.config.save();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected < 2 {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::PasteEntry => render_paste(frame, app),
        AppScreen::FileEntry => render_entry(
            frame,
            app,
            "Open File",
            "Path to a text file:",
            "[Enter] Read  [Tab] Complete path  [Esc] Back",
        ),
        AppScreen::UrlEntry => render_entry(
            frame,
            app,
            "Fetch URL",
            "Address of the article:",
            "[Enter] Fetch  [Esc] Back",
        ),
        AppScreen::Exercise => render_exercise(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Summary => render_summary(frame, app),
        AppScreen::Chat => render_chat(frame, app),
        AppScreen::Results => render_results(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header_info = format!(
        " blanks {}% | {} | theme {}",
        app.config.blank_frequency,
        if app.config.only_important_words {
            "important words only"
        } else {
            "any word"
        },
        app.config.theme,
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " clozr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer_text = match app.status {
        Some(ref status) => format!(" {status}"),
        None => " [p/f/u/l/b] Start  [c] Settings  [q] Quit".to_string(),
    };
    let footer_style = if app.status.is_some() {
        Style::default().fg(colors.warning())
    } else {
        Style::default().fg(colors.text_dim())
    };
    let footer = Paragraph::new(Line::from(Span::styled(footer_text, footer_style)));
    frame.render_widget(footer, layout[2]);
}

fn render_paste(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(80, 80, area);
    let block = Block::bordered()
        .title(" Paste Text ")
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    frame.render_widget(block, centered);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let counts = format!(
        " {} lines, {} chars \u{2014} paste with your terminal, then Ctrl+D",
        app.paste.line_count(),
        app.paste.char_count(),
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            counts,
            Style::default().fg(colors.text_dim()),
        ))),
        layout[0],
    );

    let rows = layout[1].height as usize;
    let lines: Vec<Line> = app
        .paste
        .tail_lines(rows)
        .into_iter()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(colors.fg()))))
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), layout[1]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " [Ctrl+D] Build exercise  [Ctrl+U] Clear  [Esc] Back",
            Style::default().fg(colors.accent()),
        ))),
        layout[2],
    );
}

fn render_entry(frame: &mut ratatui::Frame, app: &App, title: &str, prompt: &str, hint: &str) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(70, 30, area);
    let block = Block::bordered()
        .title(format!(" {title} "))
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    frame.render_widget(block, centered);

    let mut lines = vec![
        Line::from(Span::styled(
            prompt.to_string(),
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
    ];

    let (before, cursor, after) = app.entry.render_parts();
    let mut entry_spans = vec![
        Span::styled("> ", Style::default().fg(colors.accent())),
        Span::styled(before.to_string(), Style::default().fg(colors.fg())),
    ];
    match cursor {
        Some(ch) => {
            entry_spans.push(Span::styled(
                ch.to_string(),
                Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
            ));
            entry_spans.push(Span::styled(
                after.to_string(),
                Style::default().fg(colors.fg()),
            ));
        }
        None => entry_spans.push(Span::styled(" ", Style::default().bg(colors.cursor_bg()))),
    }
    lines.push(Line::from(entry_spans));
    lines.push(Line::from(""));

    if app.entry.completion_error {
        lines.push(Line::from(Span::styled(
            "No such directory",
            Style::default().fg(colors.error()),
        )));
    } else if let Some(ref status) = app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(colors.warning()),
        )));
    }
    lines.push(Line::from(Span::styled(
        hint.to_string(),
        Style::default().fg(colors.text_dim()),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_exercise(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(ref exercise) = app.exercise else {
        return;
    };

    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;

    let title = exercise.source_title.as_deref().unwrap_or("Active Reading");
    let progress_text = format!(
        " | paragraph {}/{} | {} submitted",
        exercise.active + 1,
        exercise.chunks.len(),
        exercise.submitted_count(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*progress_text,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    let show_progress = tier.show_progress_bar(area.height);
    let mut constraints: Vec<Constraint> = vec![Constraint::Min(5)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    let chunk = exercise.active_chunk();
    let exercise_area = ExerciseArea::new(
        chunk,
        exercise.active + 1,
        exercise.chunks.len(),
        app.theme,
    );
    frame.render_widget(exercise_area, main_layout[0]);

    if show_progress {
        let ratio = exercise.submitted_count() as f64 / exercise.chunks.len() as f64;
        let progress = ProgressBar::new("Paragraphs", ratio, app.theme);
        frame.render_widget(progress, main_layout[1]);
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        let sidebar = ExerciseSidebar::new(exercise, app.theme);
        frame.render_widget(sidebar, sidebar_area);
    }

    let footer_text = if let Some(ref status) = app.status {
        format!(" {status}")
    } else if !chunk.submitted {
        " [Type] Fill blanks  [Tab] Next blank  [Enter] Check  [Ctrl+Q/S/T] Tools  [Esc] Menu"
            .to_string()
    } else if exercise.is_complete() {
        " All paragraphs done \u{2014} [Enter] See results".to_string()
    } else {
        " [Enter] Next paragraph  [Ctrl+P] Previous  [Ctrl+Q/S/T] Tools  [Esc] Menu".to_string()
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, app_layout.footer);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    if let Some(ref quiz) = app.quiz {
        let centered = ui::layout::centered_rect(60, 60, frame.area());
        frame.render_widget(QuizView::new(quiz, app.theme), centered);
    }
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    let centered = ui::layout::centered_rect(70, 50, frame.area());
    let panel = SummaryPanel::new(&app.summary_input, app.summary_review.as_ref(), app.theme);
    frame.render_widget(panel, centered);
}

fn render_chat(frame: &mut ratatui::Frame, app: &App) {
    let centered = ui::layout::centered_rect(70, 70, frame.area());
    let panel = ChatPanel::new(&app.chat, &app.chat_input, app.theme);
    frame.render_widget(panel, centered);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    if let Some(ref summary) = app.last_summary {
        let centered = ui::layout::centered_rect(60, 70, frame.area());
        frame.render_widget(ResultsPanel::new(summary, app.theme), centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 70, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields: Vec<(String, String)> = vec![
        (
            "Blank Frequency".to_string(),
            format!("{}%", app.config.blank_frequency),
        ),
        (
            "Only Important Words".to_string(),
            if app.config.only_important_words {
                "on".to_string()
            } else {
                "off".to_string()
            },
        ),
        ("Theme".to_string(), app.config.theme.clone()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.text_dim()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            fields
                .iter()
                .map(|_| Constraint::Length(3))
                .collect::<Vec<_>>(),
        )
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected {
                colors.accent()
            } else {
                colors.fg()
            })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        let value_style = Style::default().fg(if is_selected {
            colors.reveal()
        } else {
            colors.text_dim()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
