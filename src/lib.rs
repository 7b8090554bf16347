//! Pair Rounds - round-based pair scheduling
//!
//! This library schedules pairwise matchings across rounds without repeating
//! a pair, using either round-robin rotation or greedy similarity matching,
//! and re-verifies rendered output for duplicate pairs.

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{DuplicateVerifier, HistoryAwareMatcher, PairHistory, RoundGenerator, RoundRobinScheduler, RunRng};
pub use error::ScheduleError;
pub use models::{MatchRun, Pair, PairKey, Participant, Roster, Round, RunNotice, Strategy};
