//! One giver paired with one recipient.

use serde::{Deserialize, Serialize};

/// A single giver → recipient pairing.
///
/// The serialised form (`giver`, `recipient`, `recipientBio`) is the payload
/// sealed for each participant, so field names are part of the published
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
  pub giver:         String,
  pub recipient:     String,
  /// Copied verbatim from the recipient's participant record.
  pub recipient_bio: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serializes_with_camel_case_bio() {
    let a = Assignment {
      giver:         "Alice".into(),
      recipient:     "Bob".into(),
      recipient_bio: "Likes tea".into(),
    };
    let json = serde_json::to_string(&a).unwrap();
    assert_eq!(
      json,
      r#"{"giver":"Alice","recipient":"Bob","recipientBio":"Likes tea"}"#
    );
  }
}
