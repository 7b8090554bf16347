use crate::error::ScheduleError;
use crate::models::{MatchRun, Pair, Participant, Round, RunNotice};

use super::{ensure_unique_ids, RoundGenerator};

/// Round-robin scheduler using the circle method
///
/// The first id stays fixed while the other n-1 rotate, giving n-1 perfect
/// matchings in which every unordered pair occurs exactly once. Output depends
/// only on input order, so asking for fewer rounds yields a prefix of the full
/// sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinScheduler;

impl RoundRobinScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Maximum number of distinct rounds for `n` participants
    pub fn max_rounds(n: usize) -> usize {
        n.saturating_sub(1)
    }

    /// Generate up to `num_rounds` rounds from `ids`
    ///
    /// # Errors
    /// * `NonPositiveRounds` if `num_rounds` is zero
    /// * `DuplicateParticipant` if an id appears more than once
    /// * `OddParticipantCount` if there are two or more ids and the count is odd
    pub fn schedule(&self, ids: &[String], num_rounds: usize) -> Result<MatchRun, ScheduleError> {
        if num_rounds == 0 {
            return Err(ScheduleError::NonPositiveRounds);
        }

        ensure_unique_ids(ids.iter().map(String::as_str))?;

        let mut run = MatchRun::new(num_rounds);
        let n = ids.len();
        if n < 2 {
            run.notices.push(RunNotice::Reduced {
                requested: num_rounds,
                maximum: 0,
            });
            return Ok(run);
        }
        if n % 2 != 0 {
            return Err(ScheduleError::OddParticipantCount(n));
        }

        let max_rounds = Self::max_rounds(n);
        let num_rounds = if num_rounds > max_rounds {
            tracing::warn!(
                "Requested {} rounds, but maximum with {} participants is {}",
                num_rounds,
                n,
                max_rounds
            );
            run.notices.push(RunNotice::Reduced {
                requested: num_rounds,
                maximum: max_rounds,
            });
            max_rounds
        } else {
            num_rounds
        };

        let fixed = &ids[0];
        let mut ring: Vec<&String> = ids[1..].iter().collect();

        for _ in 0..num_rounds {
            let current: Vec<&String> = std::iter::once(fixed).chain(ring.iter().copied()).collect();
            let pairs = (0..n / 2)
                .map(|i| Pair::new(current[i].as_str(), current[n - 1 - i].as_str()))
                .collect();
            run.rounds.push(Round::from_parts(pairs, Vec::new()));

            // Last element of the ring moves to the front
            ring.rotate_right(1);
        }

        tracing::debug!("Rotation produced {} rounds for {} participants", run.rounds.len(), n);
        Ok(run)
    }
}

impl RoundGenerator for RoundRobinScheduler {
    fn generate(&self, participants: &[Participant], num_rounds: usize) -> Result<MatchRun, ScheduleError> {
        let ids: Vec<String> = participants.iter().map(|p| p.id.clone()).collect();
        self.schedule(&ids, num_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PairKey;
    use std::collections::HashSet;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{:02}", i)).collect()
    }

    fn as_tuples(round: &Round) -> Vec<(&str, &str)> {
        round
            .pairs()
            .iter()
            .map(|p| (p.first.as_str(), p.second.as_str()))
            .collect()
    }

    #[test]
    fn test_four_participants_example() {
        let ids: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let run = RoundRobinScheduler::new().schedule(&ids, 3).unwrap();

        assert_eq!(run.rounds.len(), 3);
        assert_eq!(as_tuples(&run.rounds[0]), vec![("A", "D"), ("B", "C")]);
        assert_eq!(as_tuples(&run.rounds[1]), vec![("A", "C"), ("D", "B")]);
        assert_eq!(as_tuples(&run.rounds[2]), vec![("A", "B"), ("C", "D")]);
        assert!(run.notices.is_empty());
    }

    #[test]
    fn test_full_schedule_covers_every_pair_once() {
        for n in [2, 4, 6, 10, 16] {
            let ids = ids(n);
            let run = RoundRobinScheduler::new().schedule(&ids, n - 1).unwrap();
            assert_eq!(run.rounds.len(), n - 1);

            let mut seen = HashSet::new();
            for round in &run.rounds {
                assert_eq!(round.len(), n / 2);
                for key in round.keys() {
                    assert!(seen.insert(key), "pair repeated for n={}", n);
                }
            }
            assert_eq!(seen.len(), n * (n - 1) / 2);
        }
    }

    #[test]
    fn test_each_round_is_a_perfect_matching() {
        let ids = ids(8);
        let run = RoundRobinScheduler::new().schedule(&ids, 7).unwrap();
        for round in &run.rounds {
            for id in &ids {
                assert!(round.is_seated(id));
            }
        }
    }

    #[test]
    fn test_requested_rounds_are_clamped() {
        let ids = ids(6);
        let run = RoundRobinScheduler::new().schedule(&ids, 20).unwrap();

        assert_eq!(run.rounds.len(), 5);
        assert_eq!(
            run.notices,
            vec![RunNotice::Reduced { requested: 20, maximum: 5 }]
        );
        assert_eq!(run.shortfall(), 15);
    }

    #[test]
    fn test_fewer_rounds_is_prefix() {
        let ids = ids(10);
        let full = RoundRobinScheduler::new().schedule(&ids, 9).unwrap();
        for r in 1..9 {
            let partial = RoundRobinScheduler::new().schedule(&ids, r).unwrap();
            assert_eq!(partial.rounds[..], full.rounds[..r]);
        }
    }

    #[test]
    fn test_odd_count_rejected() {
        let err = RoundRobinScheduler::new().schedule(&ids(5), 2).unwrap_err();
        assert_eq!(err, ScheduleError::OddParticipantCount(5));
    }

    #[test]
    fn test_too_few_participants() {
        let run = RoundRobinScheduler::new().schedule(&ids(1), 3).unwrap();
        assert!(run.rounds.is_empty());
        assert_eq!(run.notices, vec![RunNotice::Reduced { requested: 3, maximum: 0 }]);
        let run = RoundRobinScheduler::new().schedule(&[], 3).unwrap();
        assert!(run.rounds.is_empty());
        assert_eq!(run.shortfall(), 3);
    }

    #[test]
    fn test_repeated_id_rejected() {
        let ids = vec!["a".to_string(), "a".to_string()];
        let err = RoundRobinScheduler::new().schedule(&ids, 1).unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateParticipant("a".to_string()));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = RoundRobinScheduler::new().schedule(&ids(4), 0).unwrap_err();
        assert_eq!(err, ScheduleError::NonPositiveRounds);
    }

    #[test]
    fn test_two_participants() {
        let ids = ids(2);
        let run = RoundRobinScheduler::new().schedule(&ids, 1).unwrap();
        assert_eq!(run.rounds[0].keys().collect::<Vec<_>>(), vec![PairKey::new("p00", "p01")]);
    }
}
