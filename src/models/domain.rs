use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// A roster entry with identity, display name and optional category code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    /// Fixed-length category code (e.g. "INTJ"), used only for similarity scoring
    #[serde(default)]
    pub code: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Helper to get the category code, empty when absent
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }
}

/// Identity of an unordered pair: the two ids in lexicographic order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(&self) -> &str {
        &self.0
    }

    pub fn second(&self) -> &str {
        &self.1
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  ↔  {}", self.0, self.1)
    }
}

/// Two participant ids seated together, in the order the generator emitted them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub first: String,
    pub second: String,
}

impl Pair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(self.first.as_str(), self.second.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.first == id || self.second == id
    }
}

impl From<(&str, &str)> for Pair {
    fn from((first, second): (&str, &str)) -> Self {
        Self::new(first, second)
    }
}

/// One round of disjoint pairs
///
/// Rounds are immutable once built. Participants the generator could not seat
/// are listed in `leftovers`, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pairs: Vec<Pair>,
    #[serde(default)]
    leftovers: Vec<String>,
}

impl Round {
    /// Build a round, rejecting any id that is seated twice
    pub fn new(pairs: Vec<Pair>, leftovers: Vec<String>) -> Result<Self, ScheduleError> {
        let mut seen = HashSet::new();
        for id in pairs
            .iter()
            .flat_map(|p| [p.first.as_str(), p.second.as_str()])
            .chain(leftovers.iter().map(String::as_str))
        {
            if !seen.insert(id) {
                return Err(ScheduleError::ParticipantReused(id.to_string()));
            }
        }
        Ok(Self { pairs, leftovers })
    }

    /// Build a round whose disjointness the caller already guarantees
    pub(crate) fn from_parts(pairs: Vec<Pair>, leftovers: Vec<String>) -> Self {
        debug_assert!(Self::new(pairs.clone(), leftovers.clone()).is_ok());
        Self { pairs, leftovers }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn leftovers(&self) -> &[String] {
        &self.leftovers
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = PairKey> + '_ {
        self.pairs.iter().map(Pair::key)
    }

    pub fn is_seated(&self, id: &str) -> bool {
        self.pairs.iter().any(|p| p.contains(id))
    }
}

/// Recovered condition raised while generating a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunNotice {
    /// More rounds were requested than the roster can supply; clamped
    Reduced { requested: usize, maximum: usize },
    /// Every remaining candidate pair was already used; stopped early
    HistoryExhausted { requested: usize, produced: usize },
}

impl fmt::Display for RunNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunNotice::Reduced { requested, maximum } => write!(
                f,
                "Requested {} rounds, but the maximum for this roster is {}.",
                requested, maximum
            ),
            RunNotice::HistoryExhausted { requested, produced } => write!(
                f,
                "Requested {} rounds, but only {} could be built without repeating a pair.",
                requested, produced
            ),
        }
    }
}

/// Ordered rounds produced by one generation invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRun {
    pub rounds: Vec<Round>,
    pub requested: usize,
    pub notices: Vec<RunNotice>,
}

impl MatchRun {
    pub fn new(requested: usize) -> Self {
        Self {
            rounds: Vec::new(),
            requested,
            notices: Vec::new(),
        }
    }

    /// Requested rounds that were not produced
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.rounds.len())
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Validated, ordered participant list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Result<Self, ScheduleError> {
        if participants.is_empty() {
            return Err(ScheduleError::EmptyRoster);
        }

        let mut index = HashMap::with_capacity(participants.len());
        for (pos, p) in participants.iter().enumerate() {
            if index.insert(p.id.clone(), pos).is_some() {
                return Err(ScheduleError::DuplicateParticipant(p.id.clone()));
            }
        }

        Ok(Self { participants, index })
    }

    /// Rebuild from a permutation of an already validated roster
    pub(crate) fn from_validated(participants: Vec<Participant>) -> Self {
        let index = participants
            .iter()
            .enumerate()
            .map(|(pos, p)| (p.id.clone(), pos))
            .collect();
        Self { participants, index }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn ids(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.index.get(id).map(|&pos| &self.participants[pos])
    }

    /// Display name for an id, falling back to the id itself
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|p| p.name.as_str()).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn has_codes(&self) -> bool {
        self.participants.iter().any(|p| !p.code().trim().is_empty())
    }
}

/// Round generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Round-robin circle method
    #[default]
    Rotation,
    /// Greedy category-code similarity with no repeated pairs
    Similarity,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rotation" | "round-robin" => Ok(Strategy::Rotation),
            "similarity" | "mbti" => Ok(Strategy::Similarity),
            other => Err(format!(
                "unknown strategy '{}', expected 'rotation' or 'similarity'",
                other
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Rotation => f.write_str("rotation"),
            Strategy::Similarity => f.write_str("similarity"),
        }
    }
}
