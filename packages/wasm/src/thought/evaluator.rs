//! Thought evaluation and ranking.
//!
//! Ranking rule: sort by descending score, rank = 1-based position in that
//! order. Ties keep generation order and NaN scores sort last, so ranks are
//! always a dense permutation of `1..=n`.
//!
//! The sequence an evaluator returns is NOT required to be in rank order.
//! [`MockEvaluator`] shuffles it on purpose; find the best thought by its
//! rank, never by position.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::generator::Candidate;
use crate::error::{ExplorerError, Result};

/// A candidate annotated with its score and rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredThought {
    /// Label copied from the candidate.
    pub label: String,
    /// Text copied from the candidate.
    pub text: String,
    /// Evaluator score; the placeholder uses [0, 1].
    pub score: f64,
    /// Dense rank, 1 = best.
    pub rank: u32,
}

/// Scores and ranks a generation of candidates.
pub trait ThoughtEvaluator {
    /// Return every candidate annotated with score and rank.
    fn evaluate(&mut self, candidates: Vec<Candidate>) -> Result<Vec<ScoredThought>>;
}

/// Assign dense ranks by descending score. Output is in rank order.
pub fn rank_by_score(scored: Vec<(Candidate, f64)>) -> Vec<ScoredThought> {
    let key = |score: f64| if score.is_nan() { f64::NEG_INFINITY } else { score };
    let mut scored = scored;
    scored.sort_by(|a, b| key(b.1).total_cmp(&key(a.1)));
    scored
        .into_iter()
        .zip(1u32..)
        .map(|((candidate, score), rank)| ScoredThought {
            label: candidate.label,
            text: candidate.text,
            score,
            rank,
        })
        .collect()
}

/// Verify an evaluator's output: `expected` items, ranks a permutation of
/// `1..=expected`.
pub fn check_ranks(thoughts: &[ScoredThought], expected: usize) -> Result<()> {
    if thoughts.len() != expected {
        return Err(ExplorerError::EvaluatorContract(format!(
            "expected {expected} thoughts, got {}",
            thoughts.len()
        )));
    }
    let mut seen = vec![false; expected];
    for thought in thoughts {
        let slot = (thought.rank as usize)
            .checked_sub(1)
            .and_then(|i| seen.get_mut(i));
        match slot {
            Some(flag) if !*flag => *flag = true,
            _ => {
                return Err(ExplorerError::EvaluatorContract(format!(
                    "rank {} of {} is out of range or repeated",
                    thought.rank, thought.label
                )));
            }
        }
    }
    Ok(())
}

/// Placeholder evaluator: uniform random scores rounded to two decimals.
///
/// The returned sequence is shuffled after ranking.
pub struct MockEvaluator {
    rng: SmallRng,
}

impl MockEvaluator {
    /// Create an evaluator with a reproducible score stream.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl ThoughtEvaluator for MockEvaluator {
    fn evaluate(&mut self, candidates: Vec<Candidate>) -> Result<Vec<ScoredThought>> {
        let scored = candidates
            .into_iter()
            .map(|candidate| {
                let score = (self.rng.random::<f64>() * 100.0).round() / 100.0;
                (candidate, score)
            })
            .collect();
        let mut ranked = rank_by_score(scored);
        ranked.shuffle(&mut self.rng);
        Ok(ranked)
    }
}
