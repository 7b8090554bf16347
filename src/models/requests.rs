use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Strategy;

/// Parameters for one generation run, after settings and CLI overrides merge
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(range(min = 1))]
    pub rounds: usize,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_true")]
    pub shuffle_roster: bool,
    #[serde(default = "default_true")]
    pub shuffle_tables: bool,
}

fn default_true() -> bool { true }

/// Parameters for a verification scan
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(length(min = 1))]
    pub root: String,
    #[validate(length(min = 1))]
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub quiet: bool,
}

fn default_extension() -> String {
    ".md".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rounds_rejected() {
        let req = GenerateRequest {
            rounds: 0,
            strategy: Strategy::Rotation,
            seed: None,
            shuffle_roster: true,
            shuffle_tables: true,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_defaults() {
        let req: VerifyRequest = serde_json::from_str(r#"{"root": "out"}"#).unwrap();
        assert_eq!(req.extension, ".md");
        assert!(!req.quiet);
        assert!(req.validate().is_ok());
    }
}
