use std::time::Instant;

use crate::pipeline::token::Token;
use crate::session::result::{ChunkScore, SessionSummary};

/// One paragraph-sized exercise: a chunk of tokens, the positions of its
/// blanks, and the learner's progress through them.
pub struct ChunkState {
    pub tokens: Vec<Token>,
    /// Indices into `tokens` of the blank tokens, in reading order.
    pub blanks: Vec<usize>,
    /// Position in `blanks` currently receiving keystrokes.
    pub active_blank: usize,
    pub submitted: bool,
    /// Set after submission (on a short delay) to show expected words under
    /// wrong answers.
    pub revealed: bool,
}

impl ChunkState {
    pub fn new(tokens: Vec<Token>) -> Self {
        let blanks = (0..tokens.len()).filter(|&i| tokens[i].is_blank).collect();
        Self {
            tokens,
            blanks,
            active_blank: 0,
            submitted: false,
            revealed: false,
        }
    }

    pub fn blank_count(&self) -> usize {
        self.blanks.len()
    }

    pub fn filled_count(&self) -> usize {
        self.blanks
            .iter()
            .filter(|&&i| !self.tokens[i].text.is_empty())
            .count()
    }

    /// Token id of the blank under the cursor, for render highlighting.
    pub fn active_token_id(&self) -> Option<usize> {
        self.blanks.get(self.active_blank).map(|&i| self.tokens[i].id)
    }

    /// Case-insensitive answer check for the blank at `blanks[position]`.
    pub fn is_blank_correct(&self, position: usize) -> bool {
        let token = &self.tokens[self.blanks[position]];
        match &token.original_word {
            Some(expected) => token.text.to_lowercase() == expected.to_lowercase(),
            None => false,
        }
    }

    pub fn score(&self) -> ChunkScore {
        let correct = (0..self.blanks.len())
            .filter(|&pos| self.is_blank_correct(pos))
            .count();
        ChunkScore {
            correct,
            total: self.blanks.len(),
        }
    }

    /// The chunk's original text, used as context for quiz, summary, and
    /// chat prompts.
    pub fn full_text(&self) -> String {
        self.tokens.iter().map(|t| t.source_text()).collect()
    }
}

/// A whole processed text: the session object owned by the app. Discarded
/// wholesale when the learner starts over; nothing is persisted.
pub struct ExerciseState {
    pub chunks: Vec<ChunkState>,
    pub active: usize,
    pub source_title: Option<String>,
    pub started_at: Instant,
}

impl ExerciseState {
    pub fn new(chunks: Vec<Vec<Token>>, source_title: Option<String>) -> Self {
        Self {
            chunks: chunks.into_iter().map(ChunkState::new).collect(),
            active: 0,
            source_title,
            started_at: Instant::now(),
        }
    }

    pub fn active_chunk(&self) -> &ChunkState {
        &self.chunks[self.active]
    }

    pub fn active_chunk_mut(&mut self) -> &mut ChunkState {
        &mut self.chunks[self.active]
    }

    pub fn submitted_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.submitted).count()
    }

    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(|c| c.submitted)
    }

    pub fn next_chunk(&mut self) {
        if self.active + 1 < self.chunks.len() {
            self.active += 1;
        }
    }

    pub fn prev_chunk(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_chunks(
            self.chunks.iter().map(ChunkState::score).collect(),
            self.started_at.elapsed().as_secs_f64(),
            self.source_title.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::pipeline::blanks::BlankPolicy;
    use crate::pipeline::{segment, tokenize_and_blank};

    use super::*;

    fn make_chunk(text: &str) -> ChunkState {
        let mut rng = SmallRng::seed_from_u64(5);
        let tokens = tokenize_and_blank(text, &BlankPolicy::default(), &mut rng).unwrap();
        ChunkState::new(tokens)
    }

    #[test]
    fn blanks_are_indexed_in_reading_order() {
        let chunk = make_chunk("Sailors navigate oceans using constellations overhead tonight.");
        assert!(chunk.blank_count() >= 1);
        for pair in chunk.blanks.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn answer_check_ignores_case() {
        let mut chunk = make_chunk("Sailors navigate oceans using constellations overhead tonight.");
        let first = chunk.blanks[0];
        let expected = chunk.tokens[first].original_word.clone().unwrap();
        chunk.tokens[first].text = expected.to_uppercase();
        assert!(chunk.is_blank_correct(0));

        chunk.tokens[first].text = "wrong".to_string();
        assert!(!chunk.is_blank_correct(0));
    }

    #[test]
    fn score_counts_only_correct_blanks() {
        let mut chunk = make_chunk("Sailors navigate oceans using constellations overhead tonight.");
        let total = chunk.blank_count();
        let first = chunk.blanks[0];
        chunk.tokens[first].text = chunk.tokens[first].original_word.clone().unwrap();

        let score = chunk.score();
        assert_eq!(score.correct, 1);
        assert_eq!(score.total, total);
    }

    #[test]
    fn full_text_restores_the_original_paragraph() {
        let text = "Sailors navigate oceans using constellations overhead tonight.";
        let chunk = make_chunk(text);
        assert_eq!(chunk.full_text(), text);
    }

    #[test]
    fn exercise_tracks_chunk_navigation_and_completion() {
        let text = format!(
            "{}\n\n{}",
            "Curious travellers wandered ancient markets sampling unfamiliar spices while \
             merchants described distant caravan routes crossing endless deserts under \
             burning skies toward legendary harbour cities."
                .to_string(),
            "Patient scholars catalogued crumbling manuscripts describing forgotten \
             kingdoms whose rulers once commanded enormous fleets trading precious \
             silks between rival continental empires."
        );
        let mut rng = SmallRng::seed_from_u64(9);
        let tokens = tokenize_and_blank(&text, &BlankPolicy::default(), &mut rng).unwrap();
        let chunks = segment::segment_into_paragraphs(tokens, &mut rng);
        let mut exercise = ExerciseState::new(chunks, Some("markets".into()));

        assert_eq!(exercise.active, 0);
        exercise.next_chunk();
        assert_eq!(exercise.active, 1.min(exercise.chunks.len() - 1));
        exercise.prev_chunk();
        assert_eq!(exercise.active, 0);
        assert!(!exercise.is_complete());

        for chunk in &mut exercise.chunks {
            chunk.submitted = true;
        }
        assert!(exercise.is_complete());
        assert_eq!(exercise.submitted_count(), exercise.chunks.len());
    }
}
