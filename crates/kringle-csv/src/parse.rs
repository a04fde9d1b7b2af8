//! Delimited participant-record parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_records()     → Vec<Record>   (RFC 4180 quoting)
//!          └─ Columns::locate() on the header row
//!               └─ one Participant per data row
//!                    └─ Participants::new() validation

use kringle_core::participant::{Participant, Participants};

use crate::error::{Error, Result};

/// Columns a participant file must have.
pub const REQUIRED_COLUMNS: [&str; 1] = ["NAME"];

// ─── Record splitting ────────────────────────────────────────────────────────

/// One logical row; `line` is where the row starts (1-based).
pub(crate) struct Record {
  pub(crate) line:   usize,
  pub(crate) fields: Vec<String>,
}

impl Record {
  fn field(&self, index: usize) -> &str {
    self.fields.get(index).map(String::as_str).unwrap_or("")
  }

  /// A line with no delimiters and nothing but whitespace. A row such as
  /// `,,` has fields, just empty ones, and is not blank.
  fn is_blank(&self) -> bool {
    match self.fields.as_slice() {
      [only] => only.trim().is_empty(),
      _ => false,
    }
  }
}

/// Split `input` into records, honouring double-quoted fields that may hold
/// commas, doubled quotes and line breaks. Accepts LF and CRLF endings.
pub(crate) fn split_records(input: &str) -> Result<Vec<Record>> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);

  let mut records = Vec::new();
  let mut fields = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut line = 1usize;
  let mut record_line = 1usize;

  let mut chars = input.chars().peekable();
  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' if chars.peek() == Some(&'"') => {
          chars.next();
          field.push('"');
        }
        '"' => in_quotes = false,
        '\r' if chars.peek() == Some(&'\n') => {}
        '\n' => {
          line += 1;
          field.push('\n');
        }
        _ => field.push(c),
      }
      continue;
    }

    match c {
      '"' if field.is_empty() => in_quotes = true,
      ',' => fields.push(std::mem::take(&mut field)),
      '\r' => {}
      '\n' => {
        fields.push(std::mem::take(&mut field));
        let record = Record {
          line:   record_line,
          fields: std::mem::take(&mut fields),
        };
        if !record.is_blank() {
          records.push(record);
        }
        line += 1;
        record_line = line;
      }
      _ => field.push(c),
    }
  }

  if in_quotes {
    return Err(Error::UnterminatedQuote { line: record_line });
  }

  fields.push(field);
  let record = Record { line: record_line, fields };
  if !record.is_blank() {
    records.push(record);
  }

  Ok(records)
}

// ─── Header mapping ──────────────────────────────────────────────────────────

struct Columns {
  name:    usize,
  bio:     Option<usize>,
  partner: Option<usize>,
}

impl Columns {
  fn locate(header: &Record) -> Result<Self> {
    let find = |wanted: &str| {
      header
        .fields
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };

    let missing: Vec<String> = REQUIRED_COLUMNS
      .iter()
      .filter(|&&c| find(c).is_none())
      .map(|c| c.to_string())
      .collect();

    match find("NAME") {
      Some(name) if missing.is_empty() => Ok(Self {
        name,
        bio: find("BIO"),
        partner: find("SO"),
      }),
      _ => Err(Error::MissingColumns(missing)),
    }
  }
}

// ─── Participants ────────────────────────────────────────────────────────────

pub(crate) fn parse_participants(input: &str) -> Result<Participants> {
  let mut records = split_records(input)?.into_iter();
  let header = records.next().ok_or(Error::MissingHeader)?;
  let columns = Columns::locate(&header)?;

  let mut members = Vec::new();
  for record in records {
    let name = record.field(columns.name).trim();
    if name.is_empty() {
      return Err(Error::EmptyName { line: record.line });
    }
    let bio = columns.bio.map(|i| record.field(i).trim()).unwrap_or("");
    let partner = columns
      .partner
      .map(|i| record.field(i).trim())
      .unwrap_or("");

    let participant = Participant::new(name, bio);
    members.push(if partner.is_empty() {
      participant
    } else {
      participant.with_partner(partner)
    });
  }

  if members.len() < 2 {
    return Err(Error::InsufficientParticipants { count: members.len() });
  }

  Ok(Participants::new(members)?)
}
