// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchRun, Pair, PairKey, Participant, Roster, Round, RunNotice, Strategy};
pub use requests::{GenerateRequest, VerifyRequest};
pub use responses::{ErrorResponse, GenerateResponse, RenderedRound, TableAssignment};
