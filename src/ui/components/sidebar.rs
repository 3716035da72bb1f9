use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::exercise::ExerciseState;
use crate::ui::theme::Theme;

/// Wide-terminal sidebar: session progress plus the tool shortcuts.
pub struct ExerciseSidebar<'a> {
    exercise: &'a ExerciseState,
    theme: &'a Theme,
}

impl<'a> ExerciseSidebar<'a> {
    pub fn new(exercise: &'a ExerciseState, theme: &'a Theme) -> Self {
        Self { exercise, theme }
    }
}

impl Widget for ExerciseSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Session ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunk = self.exercise.active_chunk();
        let scored: Vec<Line> = self
            .exercise
            .chunks
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let marker = if i == self.exercise.active { ">" } else { " " };
                let status = if c.submitted {
                    let score = c.score();
                    format!("{}/{}", score.correct, score.total)
                } else {
                    format!("{}/{} filled", c.filled_count(), c.blank_count())
                };
                let style = if c.submitted {
                    let score = c.score();
                    Style::default().fg(if score.is_perfect() {
                        colors.success()
                    } else {
                        colors.warning()
                    })
                } else {
                    Style::default().fg(colors.text_dim())
                };
                Line::from(vec![
                    Span::styled(
                        format!("{marker} Paragraph {:>2}  ", i + 1),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(status, style),
                ])
            })
            .collect();

        let mut lines = vec![
            Line::from(Span::styled(
                "Progress",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(scored);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Blanks here: {}/{}",
                chunk.filled_count(),
                chunk.blank_count()
            ),
            Style::default().fg(colors.fg()),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tools",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )));
        for hint in [
            "[Ctrl+Q] Quiz me on this paragraph",
            "[Ctrl+S] Summarize it in your words",
            "[Ctrl+T] Talk about the text",
        ] {
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(colors.text_dim()),
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
