use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ChunkScore {
    pub correct: usize,
    pub total: usize,
}

impl ChunkScore {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }

    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

/// Aggregate result for one completed text, shown on the results screen.
/// Display-only; nothing is written to disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub chunk_scores: Vec<ChunkScore>,
    pub correct: usize,
    pub total: usize,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
    pub source_title: Option<String>,
}

impl SessionSummary {
    pub fn from_chunks(
        chunk_scores: Vec<ChunkScore>,
        elapsed_secs: f64,
        source_title: Option<String>,
    ) -> Self {
        let correct = chunk_scores.iter().map(|s| s.correct).sum();
        let total = chunk_scores.iter().map(|s| s.total).sum();
        Self {
            chunk_scores,
            correct,
            total,
            elapsed_secs,
            timestamp: Utc::now(),
            source_title,
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_totals_sum_over_chunks() {
        let summary = SessionSummary::from_chunks(
            vec![
                ChunkScore { correct: 3, total: 5 },
                ChunkScore { correct: 2, total: 2 },
            ],
            42.0,
            Some("test".into()),
        );
        assert_eq!(summary.correct, 5);
        assert_eq!(summary.total, 7);
        assert!((summary.percent() - 5.0 / 7.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_score_counts_as_perfect() {
        let score = ChunkScore { correct: 0, total: 0 };
        assert_eq!(score.percent(), 100.0);
        assert!(score.is_perfect());
    }

    #[test]
    fn perfect_chunk_is_flagged() {
        assert!(ChunkScore { correct: 4, total: 4 }.is_perfect());
        assert!(!ChunkScore { correct: 3, total: 4 }.is_perfect());
    }
}
