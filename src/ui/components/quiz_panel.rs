use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::assist::QuizQuestion;
use crate::ui::theme::Theme;

/// Quiz state and rendering for one paragraph's questions.
pub struct QuizPanel {
    pub questions: Vec<QuizQuestion>,
    pub current: usize,
    pub selected_option: usize,
    /// Chosen option per question once answered.
    pub answers: Vec<Option<usize>>,
}

impl QuizPanel {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            current: 0,
            selected_option: 0,
            answers,
        }
    }

    pub fn question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn is_answered(&self) -> bool {
        self.answers[self.current].is_some()
    }

    pub fn select_next(&mut self) {
        if !self.is_answered() {
            self.selected_option = (self.selected_option + 1) % self.question().options.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.is_answered() {
            let count = self.question().options.len();
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    pub fn confirm(&mut self) {
        if !self.is_answered() {
            self.answers[self.current] = Some(self.selected_option);
        }
    }

    /// Advance past an answered question; false once the quiz is exhausted.
    pub fn next_question(&mut self) -> bool {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected_option = 0;
            true
        } else {
            false
        }
    }

    pub fn score(&self) -> (usize, usize) {
        let correct = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| **a == Some(q.correct_answer))
            .count();
        (correct, self.questions.len())
    }
}

pub struct QuizView<'a> {
    quiz: &'a QuizPanel,
    theme: &'a Theme,
}

impl<'a> QuizView<'a> {
    pub fn new(quiz: &'a QuizPanel, theme: &'a Theme) -> Self {
        Self { quiz, theme }
    }
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let quiz = self.quiz;
        let question = quiz.question();

        let title = format!(
            " Quiz {}/{} ",
            quiz.current + 1,
            quiz.questions.len()
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                question.question.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        let answered = quiz.answers[quiz.current];
        for (i, option) in question.options.iter().enumerate() {
            let marker = if i == quiz.selected_option && answered.is_none() {
                ">"
            } else {
                " "
            };
            let style = match answered {
                Some(chosen) => {
                    if i == question.correct_answer {
                        Style::default()
                            .fg(colors.success())
                            .add_modifier(Modifier::BOLD)
                    } else if i == chosen {
                        Style::default().fg(colors.error())
                    } else {
                        Style::default().fg(colors.text_dim())
                    }
                }
                None => {
                    if i == quiz.selected_option {
                        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    }
                }
            };
            lines.push(Line::from(Span::styled(
                format!(" {marker} {}. {option}", i + 1),
                style,
            )));
        }

        lines.push(Line::from(""));
        let footer = match answered {
            Some(chosen) if chosen == question.correct_answer => Span::styled(
                "Correct!  [Enter] Next  [Esc] Back to reading",
                Style::default().fg(colors.success()),
            ),
            Some(_) => Span::styled(
                "Not quite.  [Enter] Next  [Esc] Back to reading",
                Style::default().fg(colors.error()),
            ),
            None => Span::styled(
                "[\u{2191}\u{2193}/1-4] Choose  [Enter] Answer  [Esc] Back",
                Style::default().fg(colors.text_dim()),
            ),
        };
        lines.push(Line::from(footer));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
