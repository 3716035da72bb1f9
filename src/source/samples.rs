use rand::Rng;
use rand::rngs::SmallRng;

use crate::source::SourceText;

/// Bundled practice texts so the trainer works offline and in
/// `--no-default-features` builds.
const SAMPLES: &[(&str, &str)] = &[
    ("The Lighthouse Keepers", include_str!("../../assets/samples/lighthouses.txt")),
    ("A Short History of Paper", include_str!("../../assets/samples/paper.txt")),
    ("Life in the Tidal Zone", include_str!("../../assets/samples/tides.txt")),
    ("The Long Road of the Monarch", include_str!("../../assets/samples/monarchs.txt")),
];

pub fn random_sample(rng: &mut SmallRng) -> SourceText {
    let (title, body) = SAMPLES[rng.gen_range(0..SAMPLES.len())];
    SourceText::titled(title, body.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use crate::pipeline::blanks::BlankPolicy;
    use crate::pipeline::{segment, tokenize_and_blank};

    use super::*;

    #[test]
    fn every_sample_has_paragraph_structure() {
        for (title, body) in SAMPLES {
            assert!(!title.is_empty());
            assert!(body.contains("\n\n"), "{title} should have paragraphs");
            assert!(body.chars().count() > 400, "{title} is too short to chunk");
        }
    }

    #[test]
    fn samples_survive_the_full_pipeline() {
        let mut rng = SmallRng::seed_from_u64(1);
        for (title, body) in SAMPLES {
            let tokens =
                tokenize_and_blank(body.trim_end(), &BlankPolicy::default(), &mut rng).unwrap();
            let chunks = segment::segment_into_paragraphs(tokens, &mut rng);
            assert!(chunks.len() >= 2, "{title} should yield multiple chunks");
        }
    }

    #[test]
    fn random_sample_is_seed_stable() {
        let pick = |seed| random_sample(&mut SmallRng::seed_from_u64(seed)).title;
        assert_eq!(pick(3), pick(3));
    }
}
