use thiserror::Error;

/// Invalid input rejected by a round generator or by roster construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Number of participants must be even, got {0}")]
    OddParticipantCount(usize),

    #[error("Roster contains no participants")]
    EmptyRoster,

    #[error("Duplicate participant id: {0}")]
    DuplicateParticipant(String),

    #[error("Participant {0} appears more than once in a round")]
    ParticipantReused(String),

    #[error("Requested round count must be positive")]
    NonPositiveRounds,
}
