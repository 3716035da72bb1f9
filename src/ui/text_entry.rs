use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::line_input::InputResult;

/// Append-only multiline buffer for the paste-text input method. Long texts
/// arrive via bracketed paste in one event; typed edits always land at the
/// end of the buffer.
#[derive(Default)]
pub struct TextEntry {
    text: String,
}

impl TextEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn push_paste(&mut self, pasted: &str) {
        // Terminals deliver pasted newlines as \r.
        self.text.push_str(&pasted.replace('\r', "\n"));
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Ctrl+D submits (end of input), Esc cancels, Enter is a literal
    /// newline.
    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return InputResult::Submit;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.clear();
            }
            KeyCode::Enter => self.text.push('\n'),
            KeyCode::Backspace => {
                self.text.pop();
            }
            KeyCode::Tab => self.text.push('\t'),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.push(ch);
            }
            _ => {}
        }
        InputResult::Continue
    }

    /// The last `rows` lines for rendering in a viewport that tracks the end
    /// of the buffer.
    pub fn tail_lines(&self, rows: usize) -> Vec<&str> {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let start = lines.len().saturating_sub(rows);
        lines[start..].to_vec()
    }
}
