use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::error::ScheduleError;
use crate::models::{Participant, Roster};

/// Required CSV columns, matched case-insensitively
const REQUIRED_COLUMNS: [&str; 2] = ["id", "name"];

/// Optional columns carrying the category code, first match wins
const CODE_COLUMNS: [&str; 2] = ["code", "mbti"];

/// Errors that can occur while reading a roster
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("{0} has no header row")]
    MissingHeader(String),

    #[error("CSV file must contain columns {required:?}, missing: {missing:?}")]
    MissingColumns {
        required: Vec<String>,
        missing: Vec<String>,
    },

    #[error("{source_name} contains no valid participants")]
    NoParticipants { source_name: String },

    #[error("Invalid roster: {0}")]
    Invalid(#[from] ScheduleError),
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    name: usize,
    code: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, RosterError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |col: &str| lowered.iter().position(|h| h == col);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&col| find(col).is_none())
            .map(|col| col.to_string())
            .collect();

        match (find("id"), find("name")) {
            (Some(id), Some(name)) => Ok(Self {
                id,
                name,
                code: CODE_COLUMNS.iter().find_map(|&col| find(col)),
            }),
            _ => Err(RosterError::MissingColumns {
                required: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                missing,
            }),
        }
    }
}

/// Read a roster from a CSV file with `id`, `name` and optional `code`/`mbti` columns
pub fn read_roster<P: AsRef<Path>>(path: P) -> Result<Roster, RosterError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    parse_roster(reader, &path.display().to_string())
}

/// Read a roster from any CSV source; `source_name` is used in error messages
pub fn read_roster_from<R: Read>(source: R, source_name: &str) -> Result<Roster, RosterError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    parse_roster(reader, source_name)
}

fn parse_roster<R: Read>(mut reader: csv::Reader<R>, source_name: &str) -> Result<Roster, RosterError> {
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(RosterError::MissingHeader(source_name.to_string()));
    }
    let columns = Columns::resolve(&headers)?;

    let mut participants = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let id = record.get(columns.id).unwrap_or("").trim();
        let name = record.get(columns.name).unwrap_or("").trim();

        // Incomplete rows are skipped
        if id.is_empty() || name.is_empty() {
            skipped += 1;
            continue;
        }

        let mut participant = Participant::new(id, name);
        if let Some(code) = columns.code.and_then(|idx| record.get(idx)).map(str::trim) {
            if !code.is_empty() {
                participant = participant.with_code(code);
            }
        }
        participants.push(participant);
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} incomplete row(s) in {}", skipped, source_name);
    }

    if participants.is_empty() {
        return Err(RosterError::NoParticipants {
            source_name: source_name.to_string(),
        });
    }

    tracing::info!("Loaded {} participants from {}", participants.len(), source_name);
    Ok(Roster::new(participants)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let csv = "ID,Name,MBTI\n1,Ann,INTJ\n2,Bob,enfp\n";
        let roster = read_roster_from(csv.as_bytes(), "test.csv").unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("1").unwrap().code(), "INTJ");
        assert_eq!(roster.display_name("2"), "Bob");
        assert!(roster.has_codes());
    }

    #[test]
    fn test_incomplete_rows_skipped() {
        let csv = "id,name\n1,Ann\n2,\n,Ghost\n3, Cy \n";
        let roster = read_roster_from(csv.as_bytes(), "test.csv").unwrap();

        assert_eq!(roster.ids(), vec!["1", "3"]);
        assert_eq!(roster.display_name("3"), "Cy");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "name,team,id\nAnn,red,a\nBob,blue,b\n";
        let roster = read_roster_from(csv.as_bytes(), "test.csv").unwrap();
        assert_eq!(roster.ids(), vec!["a", "b"]);
        assert!(!roster.has_codes());
    }

    #[test]
    fn test_missing_column() {
        let csv = "id,full_name\n1,Ann\n";
        let err = read_roster_from(csv.as_bytes(), "test.csv").unwrap_err();
        match err {
            RosterError::MissingColumns { missing, .. } => assert_eq!(missing, vec!["name"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_no_valid_rows() {
        let csv = "id,name\n,\n";
        let err = read_roster_from(csv.as_bytes(), "empty.csv").unwrap_err();
        assert!(matches!(err, RosterError::NoParticipants { .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let csv = "id,name\n1,Ann\n1,Bob\n";
        let err = read_roster_from(csv.as_bytes(), "dup.csv").unwrap_err();
        assert!(matches!(err, RosterError::Invalid(ScheduleError::DuplicateParticipant(_))));
    }

    #[test]
    fn test_odd_rosters_are_accepted() {
        let csv = "id,name\n1,Ann\n2,Bob\n3,Cy\n";
        assert_eq!(read_roster_from(csv.as_bytes(), "odd.csv").unwrap().len(), 3);
    }
}
