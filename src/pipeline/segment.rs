use rand::Rng;
use rand::rngs::SmallRng;

use crate::pipeline::token::Token;

/// Minimum non-newline characters accumulated before a line break may close a
/// chunk.
pub const MIN_CHUNK_CHARS: usize = 150;

/// Window size for the fallback split of unstructured text.
pub const WINDOW_TOKENS: usize = 150;

/// A single chunk covering more tokens than this means the newline scan
/// failed to find usable paragraph structure.
const FALLBACK_TOKEN_THRESHOLD: usize = 100;

/// Chunks smaller than this are not worth presenting as exercises.
const MIN_CHUNK_TOKENS: usize = 5;

/// Group tokens into paragraph-sized chunks, each guaranteed to contain at
/// least one blank.
///
/// Paragraph breaks follow newline whitespace once enough content has
/// accumulated; inputs without usable structure fall back to fixed-size
/// windows. Chunks that end up whitespace-only, too small, or with nothing to
/// blank are dropped.
pub fn segment_into_paragraphs(tokens: Vec<Token>, rng: &mut SmallRng) -> Vec<Vec<Token>> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut ranges = newline_ranges(&tokens);
    ranges.retain(|range| has_content(&tokens[range.clone()]));

    let degenerate =
        ranges.is_empty() || (ranges.len() == 1 && tokens.len() > FALLBACK_TOKEN_THRESHOLD);
    if degenerate {
        ranges = (0..tokens.len())
            .step_by(WINDOW_TOKENS)
            .map(|start| start..(start + WINDOW_TOKENS).min(tokens.len()))
            .collect();
    }

    let mut chunks: Vec<Vec<Token>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        let mut chunk = tokens[range].to_vec();
        if chunk.len() < MIN_CHUNK_TOKENS {
            continue;
        }
        if ensure_blank(&mut chunk, rng) {
            chunks.push(chunk);
        }
    }
    chunks
}

/// Scan for chunk boundaries: a newline token closes the current chunk once
/// at least `MIN_CHUNK_CHARS` of non-newline content has accumulated. The
/// newline token stays with the chunk it closes.
fn newline_ranges(tokens: &[Token]) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut content_chars = 0;

    for (index, token) in tokens.iter().enumerate() {
        content_chars += token
            .source_text()
            .chars()
            .filter(|&ch| ch != '\n')
            .count();
        if token.is_newline() && content_chars >= MIN_CHUNK_CHARS {
            ranges.push(start..index + 1);
            start = index + 1;
            content_chars = 0;
        }
    }
    if start < tokens.len() {
        ranges.push(start..tokens.len());
    }
    ranges
}

fn has_content(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| !t.is_whitespace())
}

/// Post-condition repair: a chunk without a blank gets one forced near its
/// midpoint so every exercise has something to fill in. Returns false when
/// the chunk has no blankable word at all.
fn ensure_blank(chunk: &mut [Token], rng: &mut SmallRng) -> bool {
    if chunk.iter().any(|t| t.is_blank) {
        return true;
    }

    let mut eligible: Vec<usize> = (0..chunk.len())
        .filter(|&i| chunk[i].is_alphabetic() && chunk[i].source_text().chars().count() > 3)
        .collect();
    if eligible.is_empty() {
        eligible = (0..chunk.len()).filter(|&i| chunk[i].is_alphabetic()).collect();
    }
    if eligible.is_empty() {
        return false;
    }

    // Nearest the midpoint, jittered one position so repeated short chunks
    // don't all blank the same spot.
    let mid = eligible.len() / 2;
    let jitter = rng.gen_range(-1i64..=1);
    let pick = (mid as i64 + jitter).clamp(0, eligible.len() as i64 - 1) as usize;
    chunk[eligible[pick]].make_blank();
    true
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use crate::pipeline::blanks::{BlankPolicy, apply_blanks};
    use crate::pipeline::token::tokenize;

    use super::*;

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    fn sentence(n: usize) -> String {
        // ~190 chars of varied words, comfortably past MIN_CHUNK_CHARS.
        format!(
            "Paragraph number {n} explores curious details about migrating seabirds, \
             ancient harbours, forgotten lighthouses, and the patient keepers who \
             maintained their lamps through the longest storms of winter."
        )
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(segment_into_paragraphs(Vec::new(), &mut rng(1)).is_empty());
    }

    #[test]
    fn splits_on_blank_lines_between_paragraphs() {
        let text = format!("{}\n\n{}\n\n{}", sentence(1), sentence(2), sentence(3));
        let tokens = tokenize(&text).unwrap();
        let chunks = segment_into_paragraphs(tokens, &mut rng(2));
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn short_paragraphs_merge_until_threshold() {
        // Each line is well under 150 chars, so newlines alone never close a
        // chunk.
        let text = "short line one\nshort line two\nshort line three";
        let tokens = tokenize(text).unwrap();
        let chunks = segment_into_paragraphs(tokens, &mut rng(3));
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn chunk_coverage_preserves_every_token() {
        let text = format!("{}\n\n{}", sentence(1), sentence(2));
        let tokens = tokenize(&text).unwrap();
        let expected: Vec<usize> = tokens.iter().map(|t| t.id).collect();
        let chunks = segment_into_paragraphs(tokens, &mut rng(4));

        let flattened: Vec<usize> = chunks.iter().flatten().map(|t| t.id).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn unstructured_text_falls_back_to_windows() {
        // Single line, no newlines, far more than 100 tokens.
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let tokens = tokenize(text.trim_end()).unwrap();
        let token_count = tokens.len();
        let chunks = segment_into_paragraphs(tokens, &mut rng(5));

        assert_eq!(chunks.len(), token_count.div_ceil(WINDOW_TOKENS));
        let covered: usize = chunks.iter().map(Vec::len).sum();
        assert_eq!(covered, token_count);
    }

    #[test]
    fn every_chunk_gets_at_least_one_blank() {
        // No pre-existing blanks; the segmenter must force one per chunk.
        let text = format!("{}\n\n{}", sentence(1), sentence(2));
        let tokens = tokenize(&text).unwrap();
        let chunks = segment_into_paragraphs(tokens, &mut rng(6));
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.iter().any(|t| t.is_blank));
        }
    }

    #[test]
    fn forced_blank_lands_near_the_midpoint() {
        let text = "tiny words only here but nothing qualifies beyond these";
        for seed in 0..10 {
            let mut chunk = tokenize(text).unwrap();
            assert!(ensure_blank(&mut chunk, &mut rng(seed)));
            let blanked = chunk.iter().position(|t| t.is_blank).unwrap();
            let eligible: Vec<usize> = (0..chunk.len())
                .filter(|&i| {
                    chunk[i].is_alphabetic() || chunk[i].original_word.is_some()
                })
                .filter(|&i| chunk[i].source_text().chars().count() > 3)
                .collect();
            let rank = eligible.iter().position(|&i| i == blanked).unwrap() as i64;
            let mid = eligible.len() as i64 / 2;
            assert!((rank - mid).abs() <= 1, "blank too far from midpoint");
        }
    }

    #[test]
    fn chunk_with_only_short_words_still_gets_a_blank() {
        let mut chunk = tokenize("a an it to of us").unwrap();
        assert!(ensure_blank(&mut chunk, &mut rng(8)));
        assert_eq!(chunk.iter().filter(|t| t.is_blank).count(), 1);
    }

    #[test]
    fn chunk_without_words_is_dropped() {
        let tokens = tokenize("12 34 ... !!! 56 78").unwrap();
        let chunks = segment_into_paragraphs(tokens, &mut rng(9));
        assert!(chunks.is_empty());
    }

    #[test]
    fn trailing_whitespace_stays_with_its_chunk() {
        let text = format!("{}\n\n   \n  ", sentence(1));
        let tokens = tokenize(&text).unwrap();
        let token_count = tokens.len();
        let chunks = segment_into_paragraphs(tokens, &mut rng(10));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), token_count);
    }

    #[test]
    fn whitespace_only_input_yields_no_chunks() {
        let tokens = tokenize("\n\n  \n").unwrap();
        let chunks = segment_into_paragraphs(tokens, &mut rng(13));
        assert!(chunks.is_empty());
    }

    #[test]
    fn existing_blanks_survive_segmentation() {
        let text = format!("{}\n\n{}", sentence(1), sentence(2));
        let mut tokens = tokenize(&text).unwrap();
        apply_blanks(&mut tokens, &BlankPolicy::default(), &mut rng(11));
        let blanks_before = tokens.iter().filter(|t| t.is_blank).count();

        let chunks = segment_into_paragraphs(tokens, &mut rng(12));
        let blanks_after: usize = chunks
            .iter()
            .map(|c| c.iter().filter(|t| t.is_blank).count())
            .sum();
        assert_eq!(blanks_before, blanks_after);
    }
}
