use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::assist::Role;
use crate::assist::chat::ChatSession;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Conversation view over the studied text: history above, prompt below.
pub struct ChatPanel<'a> {
    chat: &'a ChatSession,
    input: &'a LineInput,
    theme: &'a Theme,
}

impl<'a> ChatPanel<'a> {
    pub fn new(chat: &'a ChatSession, input: &'a LineInput, theme: &'a Theme) -> Self {
        Self { chat, input, theme }
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Talk About the Text ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(inner);

        let mut history: Vec<Line> = Vec::new();
        if self.chat.messages.is_empty() {
            history.push(Line::from(Span::styled(
                "Ask anything about what you're reading.",
                Style::default().fg(colors.text_dim()),
            )));
        }
        for message in &self.chat.messages {
            let (prefix, style) = match message.role {
                Role::User => ("you: ", Style::default().fg(colors.accent())),
                Role::Assistant => ("  ai: ", Style::default().fg(colors.fg())),
                Role::System => continue,
            };
            history.push(Line::from(vec![
                Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
                Span::styled(message.content.clone(), Style::default().fg(colors.fg())),
            ]));
            history.push(Line::from(""));
        }

        // Keep the tail of the conversation in view.
        let visible = layout[0].height as usize;
        let scroll = history.len().saturating_sub(visible) as u16;
        Paragraph::new(history)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(layout[0], buf);

        let (before, cursor, after) = self.input.render_parts();
        let mut entry = vec![
            Span::styled("> ", Style::default().fg(colors.accent())),
            Span::styled(before.to_string(), Style::default().fg(colors.fg())),
        ];
        match cursor {
            Some(ch) => {
                entry.push(Span::styled(
                    ch.to_string(),
                    Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
                ));
                entry.push(Span::styled(
                    after.to_string(),
                    Style::default().fg(colors.fg()),
                ));
            }
            None => entry.push(Span::styled(" ", Style::default().bg(colors.cursor_bg()))),
        }
        Paragraph::new(vec![
            Line::from(entry),
            Line::from(Span::styled(
                "[Enter] Ask  [Esc] Back to reading",
                Style::default().fg(colors.text_dim()),
            )),
        ])
        .render(layout[1], buf);
    }
}
