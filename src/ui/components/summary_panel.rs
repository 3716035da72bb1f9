use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::assist::SummaryReview;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Summary-grading screen: a one-line summary prompt and, after submission,
/// the review verdict.
pub struct SummaryPanel<'a> {
    input: &'a LineInput,
    review: Option<&'a SummaryReview>,
    theme: &'a Theme,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(
        input: &'a LineInput,
        review: Option<&'a SummaryReview>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            input,
            review,
            theme,
        }
    }
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Summarize This Paragraph ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                "Write the paragraph's main idea in your own words:",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

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
            None => entry.push(Span::styled(
                " ",
                Style::default().bg(colors.cursor_bg()),
            )),
        }
        lines.push(Line::from(entry));
        lines.push(Line::from(""));

        match self.review {
            Some(review) => {
                let verdict_color = if review.is_valid {
                    colors.success()
                } else {
                    colors.warning()
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("Score: {}", review.score),
                        Style::default()
                            .fg(verdict_color)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        if review.is_valid {
                            "  \u{2014} solid summary"
                        } else {
                            "  \u{2014} needs another pass"
                        },
                        Style::default().fg(colors.text_dim()),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    review.feedback.clone(),
                    Style::default().fg(colors.fg()),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "[Enter] Try again  [Esc] Back to reading",
                    Style::default().fg(colors.text_dim()),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "[Enter] Grade it  [Esc] Back to reading",
                Style::default().fg(colors.text_dim()),
            ))),
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
