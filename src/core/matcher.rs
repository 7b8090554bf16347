use crate::error::ScheduleError;
use crate::models::{MatchRun, Pair, Participant, Round, RunNotice};
use crate::core::{history::PairHistory, scoring::code_similarity};

use super::{ensure_unique_ids, RoundGenerator};

/// A candidate pair with its similarity score, by roster position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    score: u32,
    a: usize,
    b: usize,
}

/// One matcher invocation: the round plus everyone it could not seat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRound {
    pub round: Round,
    pub leftovers: Vec<Participant>,
}

/// Similarity-biased greedy matcher constrained by pair history
///
/// # Pipeline Stages
/// 1. Enumerate pairs (i < j) not already in the history
/// 2. Score each pair by category-code similarity
/// 3. Stable sort by score, descending, so ties keep enumeration order
/// 4. Accept each pair whose participants are both still free
///
/// This is a greedy maximal matching, not a maximum-weight one. Total
/// similarity may be below the optimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryAwareMatcher;

impl HistoryAwareMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Build a single round without repeating any pair in `history`
    ///
    /// Fails with `DuplicateParticipant` if an id appears more than once.
    pub fn build_round(&self, people: &[Participant], history: &PairHistory) -> Result<MatchedRound, ScheduleError> {
        ensure_unique_ids(people.iter().map(|p| p.id.as_str()))?;

        if people.len() < 2 {
            return Ok(MatchedRound {
                round: Round::from_parts(Vec::new(), people.iter().map(|p| p.id.clone()).collect()),
                leftovers: people.to_vec(),
            });
        }

        let candidates = generate_candidates(people, history);

        let mut used = vec![false; people.len()];
        let mut pairs = Vec::with_capacity(people.len() / 2);

        for Candidate { a, b, .. } in candidates {
            if used[a] || used[b] {
                continue;
            }
            used[a] = true;
            used[b] = true;
            pairs.push(Pair::new(people[a].id.as_str(), people[b].id.as_str()));
        }

        let leftovers: Vec<Participant> = people
            .iter()
            .zip(&used)
            .filter(|(_, &u)| !u)
            .map(|(p, _)| p.clone())
            .collect();

        Ok(MatchedRound {
            round: Round::from_parts(pairs, leftovers.iter().map(|p| p.id.clone()).collect()),
            leftovers,
        })
    }

    /// Build up to `num_rounds` rounds, folding each into a fresh history
    ///
    /// Stops early when a round yields no pairs, recording a
    /// `HistoryExhausted` notice on the returned run.
    pub fn generate_rounds(&self, people: &[Participant], num_rounds: usize) -> Result<MatchRun, ScheduleError> {
        let mut history = PairHistory::new();
        self.generate_rounds_with_history(people, num_rounds, &mut history)
    }

    /// Same as [`generate_rounds`](Self::generate_rounds) but continues from an existing history
    pub fn generate_rounds_with_history(
        &self,
        people: &[Participant],
        num_rounds: usize,
        history: &mut PairHistory,
    ) -> Result<MatchRun, ScheduleError> {
        if num_rounds == 0 {
            return Err(ScheduleError::NonPositiveRounds);
        }

        let mut run = MatchRun::new(num_rounds);

        while run.rounds.len() < num_rounds {
            let MatchedRound { round, leftovers } = self.build_round(people, history)?;

            if round.is_empty() {
                tracing::warn!(
                    "No new pairs available after {} of {} requested rounds",
                    run.rounds.len(),
                    num_rounds
                );
                run.notices.push(RunNotice::HistoryExhausted {
                    requested: num_rounds,
                    produced: run.rounds.len(),
                });
                break;
            }

            if !leftovers.is_empty() {
                tracing::debug!(
                    "Round {} leaves {} participant(s) unmatched",
                    run.rounds.len() + 1,
                    leftovers.len()
                );
            }

            history.record(&round);
            run.rounds.push(round);
        }

        Ok(run)
    }
}

impl RoundGenerator for HistoryAwareMatcher {
    fn generate(&self, participants: &[Participant], num_rounds: usize) -> Result<MatchRun, ScheduleError> {
        self.generate_rounds(participants, num_rounds)
    }
}

/// All pairs absent from `history`, best similarity first
fn generate_candidates(people: &[Participant], history: &PairHistory) -> Vec<Candidate> {
    let n = people.len();
    let mut candidates = Vec::with_capacity(n * (n - 1) / 2);

    for a in 0..n {
        for b in (a + 1)..n {
            if history.contains(&people[a].id, &people[b].id) {
                continue;
            }
            let score = code_similarity(people[a].code(), people[b].code());
            candidates.push(Candidate { score, a, b });
        }
    }

    // `sort_by` is stable: equal scores keep enumeration order
    candidates.sort_by(|x, y| y.score.cmp(&x.score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PairKey;
    use std::collections::HashSet;

    fn person(id: &str, code: &str) -> Participant {
        Participant::new(id, format!("Person {}", id)).with_code(code)
    }

    #[test]
    fn test_same_type_pairs_first() {
        let people = vec![
            person("1", "INTJ"),
            person("2", "ENFP"),
            person("3", "INTJ"),
            person("4", "ENFP"),
        ];

        let matched = HistoryAwareMatcher::new().build_round(&people, &PairHistory::new()).unwrap();
        let keys: HashSet<PairKey> = matched.round.keys().collect();

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&PairKey::new("1", "3")));
        assert!(keys.contains(&PairKey::new("2", "4")));
        assert!(matched.leftovers.is_empty());
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let people: Vec<Participant> = ["a", "b", "c", "d"].iter().map(|id| person(id, "ISTP")).collect();
        let matched = HistoryAwareMatcher::new().build_round(&people, &PairHistory::new()).unwrap();

        assert_eq!(matched.round.pairs(), &[Pair::new("a", "b"), Pair::new("c", "d")]);
    }

    #[test]
    fn test_history_pairs_never_reused() {
        let people: Vec<Participant> = ["a", "b", "c", "d"].iter().map(|id| person(id, "ISTP")).collect();
        let history: PairHistory = [PairKey::new("a", "b"), PairKey::new("c", "d")].into_iter().collect();

        let matched = HistoryAwareMatcher::new().build_round(&people, &history).unwrap();

        assert_eq!(matched.round.pairs(), &[Pair::new("a", "c"), Pair::new("b", "d")]);
    }

    #[test]
    fn test_odd_count_reports_leftover() {
        let people = vec![person("1", "INTJ"), person("2", "INTJ"), person("3", "ESFP")];
        let matched = HistoryAwareMatcher::new().build_round(&people, &PairHistory::new()).unwrap();

        assert_eq!(matched.round.pairs(), &[Pair::new("1", "2")]);
        assert_eq!(matched.leftovers, vec![person("3", "ESFP")]);
        assert_eq!(matched.round.leftovers(), &["3".to_string()]);
    }

    #[test]
    fn test_single_participant_is_leftover() {
        let people = vec![person("solo", "INTJ")];
        let matched = HistoryAwareMatcher::new().build_round(&people, &PairHistory::new()).unwrap();
        assert!(matched.round.is_empty());
        assert_eq!(matched.leftovers.len(), 1);
    }

    #[test]
    fn test_driver_stops_on_exhaustion() {
        let people: Vec<Participant> = ["a", "b", "c", "d"].iter().map(|id| person(id, "ENTP")).collect();
        let run = HistoryAwareMatcher::new().generate_rounds(&people, 10).unwrap();

        assert_eq!(run.rounds.len(), 3);
        assert_eq!(
            run.notices,
            vec![RunNotice::HistoryExhausted { requested: 10, produced: 3 }]
        );

        let mut seen = HashSet::new();
        for round in &run.rounds {
            for key in round.keys() {
                assert!(seen.insert(key));
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_driver_honours_requested_count() {
        let people: Vec<Participant> = (0..8).map(|i| person(&i.to_string(), "INFJ")).collect();
        let run = HistoryAwareMatcher::new().generate_rounds(&people, 2).unwrap();
        assert_eq!(run.rounds.len(), 2);
        assert!(run.notices.is_empty());
    }

    #[test]
    fn test_existing_history_is_extended() {
        let people: Vec<Participant> = ["a", "b", "c", "d"].iter().map(|id| person(id, "ENTP")).collect();
        let mut history: PairHistory = [PairKey::new("a", "b")].into_iter().collect();
        let before = history.snapshot();

        let run = HistoryAwareMatcher::new()
            .generate_rounds_with_history(&people, 1, &mut history)
            .unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(history.len(), 1 + run.rounds[0].len());
        assert!(!run.rounds[0].keys().any(|k| k == PairKey::new("a", "b")));
    }

    #[test]
    fn test_repeated_id_rejected() {
        let people = vec![person("a", "INTJ"), person("a", "INTJ"), person("b", "ESFP")];
        let matcher = HistoryAwareMatcher::new();

        assert_eq!(
            matcher.build_round(&people, &PairHistory::new()).unwrap_err(),
            ScheduleError::DuplicateParticipant("a".to_string())
        );
        assert_eq!(
            matcher.generate_rounds(&people, 2).unwrap_err(),
            ScheduleError::DuplicateParticipant("a".to_string())
        );
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let people = vec![person("1", "INTJ"), person("2", "INTJ")];
        assert_eq!(
            HistoryAwareMatcher::new().generate_rounds(&people, 0).unwrap_err(),
            ScheduleError::NonPositiveRounds
        );
    }
}
