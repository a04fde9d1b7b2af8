//! Participant-file codec for Kringle.
//!
//! Reads the participant roster from delimited text and writes the
//! organizer-only distribution list. Pure synchronous; no filesystem access.
//!
//! # Quick start
//!
//! ```no_run
//! let roster = kringle_csv::parse_participants(
//!   "NAME,BIO,SO\nAlice,Loves tea,Bob\nBob,Plays chess,\nCarol,,\n",
//! ).unwrap();
//! assert_eq!(roster.len(), 3);
//! ```
//!
//! # Input format
//!
//! A header row is required; headers match case-insensitively. `NAME` is
//! required, `BIO` and `SO` (significant other) default to empty. Quoted
//! fields follow RFC 4180.

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
use kringle_core::participant::Participants;
pub use parse::REQUIRED_COLUMNS;
pub use serialize::DISTRIBUTION_HEADER;

/// Parse a participant file into a validated roster.
///
/// Fails on a missing `NAME` column, an empty name, an unterminated quote,
/// duplicate names, or fewer than two participants.
pub fn parse_participants(input: &str) -> Result<Participants> {
  parse::parse_participants(input)
}

/// Render `(name, passphrase)` rows as the organizer's distribution list.
pub fn serialize_distribution<I, A, B>(rows: I) -> String
where
  I: IntoIterator<Item = (A, B)>,
  A: AsRef<str>,
  B: AsRef<str>,
{
  serialize::serialize_distribution(rows)
}
