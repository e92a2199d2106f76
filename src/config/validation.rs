//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the staff board is one of the configured boards
//! - Check board names are non-empty and unique
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ServerConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate semantic constraints on a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.boards.is_empty() {
        errors.push(ValidationError {
            field: "boards".to_string(),
            message: "at least one board must be configured".to_string(),
        });
    }

    for board in &config.boards {
        if board.is_empty() {
            errors.push(ValidationError {
                field: "boards".to_string(),
                message: "board names must be non-empty".to_string(),
            });
            break;
        }
    }

    let mut seen = std::collections::HashSet::new();
    for board in &config.boards {
        if !seen.insert(board) {
            errors.push(ValidationError {
                field: "boards".to_string(),
                message: format!("duplicate board '{}'", board),
            });
        }
    }

    if !config.staff_board.is_empty() && !config.boards.contains(&config.staff_board) {
        errors.push(ValidationError {
            field: "staff_board".to_string(),
            message: format!("'{}' is not a configured board", config.staff_board),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ServerConfig {
        ServerConfig {
            boards: vec!["a".into(), "b".into(), "staff".into()],
            staff_board: "staff".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&base()).is_ok());
    }

    #[test]
    fn empty_boards_rejected() {
        let mut config = base();
        config.boards.clear();
        config.staff_board.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_staff_board_rejected() {
        let mut config = base();
        config.staff_board = "mod".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "staff_board");
    }

    #[test]
    fn duplicate_boards_rejected() {
        let mut config = base();
        config.boards.push("a".into());
        assert!(validate_config(&config).is_err());
    }
}
