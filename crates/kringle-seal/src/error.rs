//! Error types for `kringle-seal`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("word bank is empty")]
  EmptyWordBank,

  #[error("could not mint a unique passphrase for {owner:?} after {attempts} attempts")]
  PassphraseMintExhausted { owner: String, attempts: u32 },

  #[error("no passphrase was minted for giver {giver:?}")]
  MissingPassphrase { giver: String },

  #[error("no sealed record for participant {participant:?}")]
  IncompleteAssignmentSet { participant: String },

  #[error("inconsistent sealed records: {0}")]
  InconsistentRecordSet(String),

  #[error("authentication failed: wrong passphrase or tampered record")]
  Authentication,

  #[error("sealed record too short ({len} bytes)")]
  MalformedBlob { len: usize },

  #[error("encryption failed")]
  Encryption,

  #[error("no record matches this passphrase")]
  UnknownPassphrase,

  #[error("a name is required to read a shared-passphrase artifact")]
  NameRequired,

  #[error("no assignment for giver {0:?}")]
  UnknownGiver(String),

  #[error("base64 error: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
