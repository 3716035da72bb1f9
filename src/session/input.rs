use crate::session::exercise::ChunkState;

/// Keystrokes longer than any reasonable answer just waste screen width.
const MAX_ANSWER_CHARS: usize = 32;

/// Append a typed character to the active blank. Space advances to the next
/// blank instead — answers are single words and can never contain one.
pub fn process_char(chunk: &mut ChunkState, ch: char) {
    if chunk.submitted || chunk.blanks.is_empty() {
        return;
    }
    if ch == ' ' {
        next_blank(chunk);
        return;
    }
    if ch.is_control() {
        return;
    }
    let token = &mut chunk.tokens[chunk.blanks[chunk.active_blank]];
    if token.text.chars().count() < MAX_ANSWER_CHARS {
        token.text.push(ch);
    }
}

/// Remove the last character of the active blank; an empty blank jumps back
/// to the previous one.
pub fn process_backspace(chunk: &mut ChunkState) {
    if chunk.submitted || chunk.blanks.is_empty() {
        return;
    }
    let token = &mut chunk.tokens[chunk.blanks[chunk.active_blank]];
    if token.text.pop().is_none() {
        prev_blank(chunk);
    }
}

pub fn next_blank(chunk: &mut ChunkState) {
    if chunk.active_blank + 1 < chunk.blanks.len() {
        chunk.active_blank += 1;
    }
}

pub fn prev_blank(chunk: &mut ChunkState) {
    chunk.active_blank = chunk.active_blank.saturating_sub(1);
}
