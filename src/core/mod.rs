// Core algorithm exports
pub mod history;
pub mod matcher;
pub mod patterns;
pub mod rotation;
pub mod scoring;
pub mod shuffle;
pub mod verifier;

pub use history::PairHistory;
pub use matcher::{HistoryAwareMatcher, MatchedRound};
pub use patterns::{parse_line, LinePattern, ParsedLine, LINE_PATTERNS};
pub use rotation::RoundRobinScheduler;
pub use scoring::code_similarity;
pub use shuffle::RunRng;
pub use verifier::{DuplicatePair, DuplicateReport, DuplicateVerifier, PairIndex, PairOccurrence, ScanStats, VerifyError};

use std::collections::HashSet;

use crate::error::ScheduleError;
use crate::models::{MatchRun, Participant, Strategy};

/// A strategy that turns an ordered participant list into a run of rounds
pub trait RoundGenerator {
    fn generate(&self, participants: &[Participant], num_rounds: usize) -> Result<MatchRun, ScheduleError>;
}

/// Reject id lists that name the same participant twice
pub(crate) fn ensure_unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<(), ScheduleError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ScheduleError::DuplicateParticipant(id.to_string()));
        }
    }
    Ok(())
}

impl Strategy {
    pub fn generator(&self) -> Box<dyn RoundGenerator> {
        match self {
            Strategy::Rotation => Box::new(RoundRobinScheduler::new()),
            Strategy::Similarity => Box::new(HistoryAwareMatcher::new()),
        }
    }
}
