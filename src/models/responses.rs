use serde::{Deserialize, Serialize};

use crate::models::domain::{RunNotice, Strategy};

/// Result of a generation run, as emitted by `generate --json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub strategy: Strategy,
    pub total_participants: usize,
    pub requested_rounds: usize,
    pub rounds: Vec<RenderedRound>,
    pub notices: Vec<RunNotice>,
    pub markdown_files: Vec<String>,
}

/// A round in display order with names resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedRound {
    pub round: usize,
    pub tables: Vec<TableAssignment>,
    pub sitting_out: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAssignment {
    pub table: usize,
    pub name_1: String,
    pub name_2: String,
}

/// Error response for `--json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
