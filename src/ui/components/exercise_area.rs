use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::exercise::ChunkState;
use crate::ui::theme::Theme;

/// The reading surface: one chunk rendered as wrapped prose with inline
/// blank fields.
pub struct ExerciseArea<'a> {
    chunk: &'a ChunkState,
    chunk_number: usize,
    chunk_total: usize,
    theme: &'a Theme,
}

impl<'a> ExerciseArea<'a> {
    pub fn new(
        chunk: &'a ChunkState,
        chunk_number: usize,
        chunk_total: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            chunk,
            chunk_number,
            chunk_total,
            theme,
        }
    }

    /// Display width of a blank: sized by the hidden word so the line layout
    /// doesn't shift as the learner types.
    fn blank_width(token_original: &str, entered: &str) -> usize {
        token_original
            .chars()
            .count()
            .max(4)
            .max(entered.chars().count())
    }

    fn blank_span(&self, token_index: usize) -> Span<'static> {
        let colors = &self.theme.colors;
        let token = &self.chunk.tokens[token_index];
        let entered = token.text.as_str();
        let expected = token.original_word.as_deref().unwrap_or_default();
        let is_active = self.chunk.active_token_id() == Some(token.id);

        let position = self
            .chunk
            .blanks
            .iter()
            .position(|&i| i == token_index)
            .unwrap_or(0);
        let correct = self.chunk.is_blank_correct(position);

        let width = Self::blank_width(expected, entered);
        let display = if self.chunk.submitted && !correct && self.chunk.revealed {
            // Reveal the expected word after the grace delay.
            format!("{expected:·<width$}")
        } else {
            let mut padded = entered.to_string();
            while padded.chars().count() < width {
                padded.push('·');
            }
            padded
        };

        let style = if self.chunk.submitted {
            if correct {
                Style::default()
                    .fg(colors.blank_correct())
                    .bg(colors.blank_correct_bg())
            } else if self.chunk.revealed {
                Style::default()
                    .fg(colors.reveal())
                    .bg(colors.blank_incorrect_bg())
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
                    .fg(colors.blank_incorrect())
                    .bg(colors.blank_incorrect_bg())
            }
        } else if is_active {
            Style::default()
                .fg(colors.cursor_fg())
                .bg(colors.cursor_bg())
        } else if entered.is_empty() {
            Style::default()
                .fg(colors.blank_empty())
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
                .fg(colors.blank_filled())
                .add_modifier(Modifier::UNDERLINED)
        };

        Span::styled(display, style)
    }
}

impl Widget for ExerciseArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        for (index, token) in self.chunk.tokens.iter().enumerate() {
            if token.is_blank {
                lines.last_mut().unwrap().push(self.blank_span(index));
                continue;
            }
            if token.is_newline() {
                // Paragraph breaks inside a chunk become a single blank line.
                let breaks = token.text.matches('\n').count().min(2);
                for _ in 0..breaks {
                    lines.push(Vec::new());
                }
                continue;
            }
            let style = Style::default().fg(colors.fg());
            lines
                .last_mut()
                .unwrap()
                .push(Span::styled(token.text.clone(), style));
        }

        let ratatui_lines: Vec<Line> = lines.into_iter().map(Line::from).collect();

        let title = format!(" Paragraph {}/{} ", self.chunk_number, self.chunk_total);
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.chunk.submitted {
                colors.border()
            } else {
                colors.border_focused()
            }))
            .style(Style::default().bg(colors.bg()));

        let paragraph = Paragraph::new(ratatui_lines)
            .block(block)
            .wrap(Wrap { trim: false });

        paragraph.render(area, buf);
    }
}
