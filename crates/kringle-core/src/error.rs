//! Error types for `kringle-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("participant #{index} has an empty name")]
  EmptyName { index: usize },

  #[error("duplicate participant name: {0:?}")]
  DuplicateName(String),

  #[error("need at least 2 participants, got {count}")]
  InsufficientParticipants { count: usize },

  #[error(
    "no valid assignment found after {attempts} attempts{}",
    .most_blocked
      .as_deref()
      .map(|name| format!(" (most often blocked giver: {name})"))
      .unwrap_or_default()
  )]
  GenerationExhausted {
    attempts:     u32,
    /// The giver whose pairing was rejected most often, if any attempt ran.
    most_blocked: Option<String>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
