pub mod blanks;
pub mod segment;
pub mod token;

use rand::rngs::SmallRng;
use thiserror::Error;

use blanks::BlankPolicy;
use token::Token;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("text is empty")]
    EmptyInput,
}

/// Tokenize `text` and blank out a policy-driven selection of words.
///
/// The only failure is empty input; every character of a non-empty input is
/// covered by some token. Blank selection draws from `rng`, so two calls with
/// the same input differ unless the rng is seeded.
pub fn tokenize_and_blank(
    text: &str,
    policy: &BlankPolicy,
    rng: &mut SmallRng,
) -> Result<Vec<Token>, PipelineError> {
    let mut tokens = token::tokenize(text)?;
    blanks::apply_blanks(&mut tokens, policy, rng);
    Ok(tokens)
}
