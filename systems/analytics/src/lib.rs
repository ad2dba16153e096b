#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round score ledger and summary statistics.

use mouse_forage_core::{Event, RoundOutcome};

/// Append-only record of finished rounds.
///
/// The ledger outlives individual rounds: it only ever grows, one entry per
/// [`Event::RoundEnded`].
#[derive(Debug, Default)]
pub struct Analytics {
    rounds: Vec<RoundRecord>,
}

/// One finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    /// Zero-based index of the round.
    pub round: u32,
    /// How the round finished.
    pub outcome: RoundOutcome,
    /// Score recorded for the round.
    pub score: u64,
}

/// Summary statistics over every recorded round.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreReport {
    /// Number of rounds played.
    pub rounds: usize,
    /// Rounds that ended with the food target reached.
    pub successes: usize,
    /// Rounds that ended with the agent starving.
    pub starvations: usize,
    /// Highest round score.
    pub best: u64,
    /// Lowest round score.
    pub worst: u64,
    /// Mean round score.
    pub mean: f64,
    /// Highest score a round could theoretically reach.
    pub max_possible: u64,
}

impl Analytics {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every round end found in `events`.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if let Event::RoundEnded {
                round,
                outcome,
                score,
            } = event
            {
                self.rounds.push(RoundRecord {
                    round: *round,
                    outcome: *outcome,
                    score: *score,
                });
            }
        }
    }

    /// Every recorded round in the order they finished.
    #[must_use]
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Scores of every recorded round in the order they finished.
    #[must_use]
    pub fn scores(&self) -> Vec<u64> {
        self.rounds.iter().map(|record| record.score).collect()
    }

    /// Summarises the ledger, or `None` before the first round ends.
    #[must_use]
    pub fn report(&self, max_possible: u64) -> Option<ScoreReport> {
        let best = self.rounds.iter().map(|record| record.score).max()?;
        let worst = self.rounds.iter().map(|record| record.score).min()?;
        let total: u64 = self.rounds.iter().map(|record| record.score).sum();
        let successes = self
            .rounds
            .iter()
            .filter(|record| record.outcome == RoundOutcome::Success)
            .count();

        Some(ScoreReport {
            rounds: self.rounds.len(),
            successes,
            starvations: self.rounds.len() - successes,
            best,
            worst,
            mean: total as f64 / self.rounds.len() as f64,
            max_possible,
        })
    }
}
