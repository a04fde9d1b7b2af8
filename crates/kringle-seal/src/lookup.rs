//! Lookup keys: the published, one-way name of a sealed record.
//!
//! A lookup key is the lowercase hex SHA-256 of the passphrase text. Only a
//! passphrase holder can compute it, so the published map carries no
//! participant names.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LookupKey(String);

impl LookupKey {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for LookupKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Hash `passphrase` into its lookup key. Deterministic.
pub fn lookup_key(passphrase: &str) -> LookupKey {
  LookupKey(hex::encode(Sha256::digest(passphrase.as_bytes())))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn matches_sha256_reference() {
    assert_eq!(
      lookup_key("abc").as_str(),
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }

  #[test]
  fn deterministic_and_distinct() {
    let a = lookup_key("holly-ivy-star-gift-1234");
    assert_eq!(a, lookup_key("holly-ivy-star-gift-1234"));
    assert_ne!(a, lookup_key("holly-ivy-star-gift-1235"));
  }

  #[test]
  fn exact_text_matters() {
    assert_ne!(lookup_key("Holly"), lookup_key("holly"));
    assert_ne!(lookup_key("holly"), lookup_key("holly "));
  }

  #[test]
  fn serializes_as_plain_string() {
    let key = lookup_key("x");
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, format!("\"{key}\""));
  }
}
