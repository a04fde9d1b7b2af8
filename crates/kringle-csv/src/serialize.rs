//! Distribution-list writer.
//!
//! Produces the organizer-only `NAME,PASSPHRASE` file. Fields are quoted
//! only when they contain a comma, quote, line break or edge whitespace.

/// Header row of the distribution list.
pub const DISTRIBUTION_HEADER: &str = "NAME,PASSPHRASE";

pub(crate) fn serialize_distribution<I, A, B>(rows: I) -> String
where
  I: IntoIterator<Item = (A, B)>,
  A: AsRef<str>,
  B: AsRef<str>,
{
  let mut out = String::from(DISTRIBUTION_HEADER);
  out.push('\n');
  for (name, passphrase) in rows {
    out.push_str(&escape_field(name.as_ref()));
    out.push(',');
    out.push_str(&escape_field(passphrase.as_ref()));
    out.push('\n');
  }
  out
}

/// Quote `s` per RFC 4180 if it would not survive a plain round trip.
pub(crate) fn escape_field(s: &str) -> String {
  let needs_quotes = s.contains([',', '"', '\n', '\r'])
    || s.starts_with(char::is_whitespace)
    || s.ends_with(char::is_whitespace);
  if needs_quotes {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_string()
  }
}
