//! Error types for the kringle-csv codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("input has no header row")]
  MissingHeader,

  #[error("missing required columns: {}", .0.join(", "))]
  MissingColumns(Vec<String>),

  #[error("line {line}: NAME field cannot be empty")]
  EmptyName { line: usize },

  #[error("line {line}: unterminated quoted field")]
  UnterminatedQuote { line: usize },

  #[error("need at least 2 participants, got {count}")]
  InsufficientParticipants { count: usize },

  #[error("invalid roster: {0}")]
  Core(#[from] kringle_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
