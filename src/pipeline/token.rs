use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// One atomic unit of scanned text: a word run, a single punctuation
/// character, or a whitespace run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Dense, increasing in scan order; the only stable identity once the
    /// learner starts overwriting `text`.
    pub id: usize,
    pub text: String,
    pub is_blank: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_word: Option<String>,
}

impl Token {
    fn new(id: usize, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            is_blank: false,
            original_word: None,
        }
    }

    /// The literal source substring this token was scanned from, regardless
    /// of blanking or learner edits. Concatenating `source_text` over a run
    /// in id order reconstructs the input exactly.
    pub fn source_text(&self) -> &str {
        match &self.original_word {
            Some(original) if self.is_blank => original,
            _ => &self.text,
        }
    }

    pub fn is_word(&self) -> bool {
        self.source_text()
            .chars()
            .next()
            .is_some_and(|ch| ch.is_alphanumeric() || ch == '\'')
    }

    pub fn is_alphabetic(&self) -> bool {
        let source = self.source_text();
        !source.is_empty() && source.chars().all(char::is_alphabetic)
    }

    pub fn is_whitespace(&self) -> bool {
        self.source_text().chars().all(char::is_whitespace)
    }

    /// Whitespace run containing at least one line break.
    pub fn is_newline(&self) -> bool {
        self.is_whitespace() && self.source_text().contains('\n')
    }

    /// Turn this token into an unfilled blank, stashing its literal text for
    /// answer checking.
    pub fn make_blank(&mut self) {
        self.original_word = Some(std::mem::take(&mut self.text));
        self.is_blank = true;
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Punct,
}

fn classify(ch: char) -> CharClass {
    if ch.is_alphanumeric() || ch == '\'' {
        CharClass::Word
    } else if ch.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Punct
    }
}

/// Split `text` into maximal word/whitespace runs and single punctuation
/// characters. Lossless: every input character lands in exactly one token.
pub fn tokenize(text: &str) -> Result<Vec<Token>, PipelineError> {
    if text.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut tokens: Vec<Token> = Vec::new();
    let mut run_start = 0;
    let mut run_class: Option<CharClass> = None;

    for (offset, ch) in text.char_indices() {
        let class = classify(ch);

        // Punctuation never joins a run; neither does a class change.
        let breaks_run = class == CharClass::Punct || run_class != Some(class);
        if breaks_run {
            if run_class.is_some() && run_start < offset {
                tokens.push(Token::new(tokens.len(), &text[run_start..offset]));
            }
            run_start = offset;
            run_class = Some(class);
        }
        if class == CharClass::Punct {
            let end = offset + ch.len_utf8();
            tokens.push(Token::new(tokens.len(), &text[offset..end]));
            run_start = end;
            run_class = None;
        }
    }
    if run_class.is_some() && run_start < text.len() {
        tokens.push(Token::new(tokens.len(), &text[run_start..]));
    }

    Ok(tokens)
}
