use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line editor used for URL, file path, summary, and chat entry.
/// Path tab-completion is opt-in so the URL and chat prompts don't offer
/// filesystem suggestions.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    complete_paths: bool,
    completions: Vec<String>,
    completion_index: Option<usize>,
    pub completion_error: bool,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            complete_paths: false,
            completions: Vec::new(),
            completion_index: None,
            completion_error: false,
        }
    }

    pub fn with_path_completion(mut self) -> Self {
        self.complete_paths = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.reset_completion();
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled
    /// rendering; cursor_char is None at end of line.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        if self.cursor >= self.text.chars().count() {
            (&self.text, None, "")
        } else {
            let ch = self.text[byte_offset..].chars().next().unwrap();
            let next_byte = byte_offset + ch.len_utf8();
            (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => {
                self.reset_completion();
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.reset_completion();
                self.cursor = (self.cursor + 1).min(self.text.chars().count());
            }
            KeyCode::Home => {
                self.reset_completion();
                self.cursor = 0;
            }
            KeyCode::End => {
                self.reset_completion();
                self.cursor = self.text.chars().count();
            }
            KeyCode::Backspace => {
                self.reset_completion();
                if self.cursor > 0 {
                    let byte_offset = self.char_to_byte(self.cursor - 1);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text
                        .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                self.reset_completion();
                if self.cursor < self.text.chars().count() {
                    let byte_offset = self.char_to_byte(self.cursor);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text
                        .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                }
            }
            KeyCode::Tab if self.complete_paths => self.cycle_completion(1),
            KeyCode::BackTab if self.complete_paths => self.cycle_completion(-1),
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.cursor = 0;
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.cursor = self.text.chars().count();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.delete_word_back();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Unix word-rubout: skip whitespace, then the word before it.
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }

    fn reset_completion(&mut self) {
        self.completions.clear();
        self.completion_index = None;
        self.completion_error = false;
    }

    /// Tab cycles filesystem matches for the current text; only active when
    /// the cursor sits at end of line.
    fn cycle_completion(&mut self, step: i64) {
        if self.cursor < self.text.chars().count() {
            return;
        }

        if self.completion_index.is_none() {
            self.completion_error = false;
            self.completions = self.build_completions();
            if self.completions.is_empty() {
                return;
            }
            self.completion_index = Some(0);
        } else {
            let count = self.completions.len() as i64;
            let current = self.completion_index.unwrap() as i64;
            self.completion_index = Some(((current + step).rem_euclid(count)) as usize);
        }

        let idx = self.completion_index.unwrap();
        self.text = self.completions[idx].clone();
        self.cursor = self.text.chars().count();
    }

    fn build_completions(&mut self) -> Vec<String> {
        // Split into (directory prefix, partial file name) at the last
        // separator; either kind, so hand-typed '\\' works anywhere.
        let seed = self.text.clone();
        let last_sep = seed.rfind('/').into_iter().chain(seed.rfind('\\')).max();
        let (dir_str, partial) = match last_sep {
            Some(pos) => (&seed[..=pos], &seed[pos + 1..]),
            None => ("", seed.as_str()),
        };

        // Expand ~ for read_dir but keep it in the suggestions.
        let scan_dir = if let Some(stripped) = dir_str.strip_prefix('~') {
            match dirs::home_dir() {
                Some(home) => format!("{}{stripped}", home.to_string_lossy()),
                None => dir_str.to_string(),
            }
        } else if dir_str.is_empty() {
            ".".to_string()
        } else {
            dir_str.to_string()
        };

        let entries = match std::fs::read_dir(&scan_dir) {
            Ok(rd) => rd,
            Err(_) => {
                self.completion_error = true;
                return Vec::new();
            }
        };

        let include_hidden = partial.starts_with('.');
        let sep = std::path::MAIN_SEPARATOR;
        let mut candidates: Vec<(bool, String)> = Vec::new();
        for entry in entries.take(1000).flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if (!include_hidden && name.starts_with('.')) || !name.starts_with(partial) {
                continue;
            }
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            let full = if is_dir {
                format!("{dir_str}{name}{sep}")
            } else {
                format!("{dir_str}{name}")
            };
            candidates.push((is_dir, full));
        }

        // Directories first, alphabetical within each group.
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        candidates.truncate(100);
        candidates.into_iter().map(|(_, path)| path).collect()
    }
}
