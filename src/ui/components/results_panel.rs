use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::SessionSummary;
use crate::ui::theme::Theme;

/// End-of-text results card.
pub struct ResultsPanel<'a> {
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Reading Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut title_spans = vec![Span::styled(
            "Score",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(ref source) = self.summary.source_title {
            title_spans.push(Span::styled(
                format!("  \u{2014} {source}"),
                Style::default().fg(colors.text_dim()),
            ));
        }
        Paragraph::new(Line::from(title_spans))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let percent = self.summary.percent();
        let score_color = if percent >= 90.0 {
            colors.success()
        } else if percent >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };
        let headline = format!("{}/{} blanks", self.summary.correct, self.summary.total);
        let percent_text = format!("  ({percent:.0}%)");
        Paragraph::new(Line::from(vec![
            Span::styled("  Words:  ", Style::default().fg(colors.fg())),
            Span::styled(
                headline,
                Style::default()
                    .fg(score_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(percent_text, Style::default().fg(colors.text_dim())),
        ]))
        .render(layout[1], buf);

        let minutes = self.summary.elapsed_secs / 60.0;
        Paragraph::new(Line::from(vec![
            Span::styled("  Time:   ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{minutes:.1} min"),
                Style::default().fg(colors.fg()),
            ),
        ]))
        .render(layout[2], buf);

        let per_chunk: Vec<Line> = self
            .summary
            .chunk_scores
            .iter()
            .enumerate()
            .map(|(i, score)| {
                let color = if score.is_perfect() {
                    colors.success()
                } else if score.percent() >= 50.0 {
                    colors.warning()
                } else {
                    colors.error()
                };
                Line::from(vec![
                    Span::styled(
                        format!("  Paragraph {:>2}  ", i + 1),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(
                        format!("{}/{}", score.correct, score.total),
                        Style::default().fg(color),
                    ),
                ])
            })
            .collect();
        Paragraph::new(per_chunk).render(layout[3], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [r] Read again  ", Style::default().fg(colors.accent())),
            Span::styled("[n] New text  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Menu", Style::default().fg(colors.accent())),
        ]))
        .render(layout[4], buf);
    }
}
