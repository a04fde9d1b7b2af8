//! Participant records and the order-preserving roster that holds them.
//!
//! A roster is built once from external input and never mutated. Names are
//! trimmed on the way in; partner names are trimmed and blank partners become
//! `None`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One member of the gift exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub name:    String,
  pub bio:     String,
  /// Name of a partner this participant must not be paired with. Need not
  /// refer to anyone on the roster.
  pub partner: Option<String>,
}

impl Participant {
  pub fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
    Self {
      name:    name.into(),
      bio:     bio.into(),
      partner: None,
    }
  }

  pub fn with_partner(mut self, partner: impl Into<String>) -> Self {
    self.partner = Some(partner.into());
    self
  }
}

/// Case-folded form of a name, used for every name comparison.
pub(crate) fn fold(name: &str) -> String { name.trim().to_lowercase() }

/// A validated, order-preserving participant roster.
///
/// Names are unique under case-insensitive comparison, since exclusion
/// matching is case-insensitive too.
#[derive(Debug, Clone, Default)]
pub struct Participants {
  members: Vec<Participant>,
}

impl Participants {
  pub fn new(members: Vec<Participant>) -> Result<Self> {
    let mut seen = HashSet::with_capacity(members.len());
    let mut normalized = Vec::with_capacity(members.len());

    for (index, mut p) in members.into_iter().enumerate() {
      p.name = p.name.trim().to_string();
      if p.name.is_empty() {
        return Err(Error::EmptyName { index });
      }
      if !seen.insert(fold(&p.name)) {
        return Err(Error::DuplicateName(p.name));
      }
      p.partner = p
        .partner
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
      normalized.push(p);
    }

    Ok(Self { members: normalized })
  }

  pub fn len(&self) -> usize { self.members.len() }

  pub fn is_empty(&self) -> bool { self.members.is_empty() }

  pub fn as_slice(&self) -> &[Participant] { &self.members }

  pub fn iter(&self) -> std::slice::Iter<'_, Participant> { self.members.iter() }

  /// Look a participant up by name, ignoring case and surrounding whitespace.
  pub fn find(&self, name: &str) -> Option<&Participant> {
    let needle = fold(name);
    self.members.iter().find(|p| fold(&p.name) == needle)
  }
}

impl<'a> IntoIterator for &'a Participants {
  type Item = &'a Participant;
  type IntoIter = std::slice::Iter<'a, Participant>;

  fn into_iter(self) -> Self::IntoIter { self.members.iter() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn preserves_order_and_trims() {
    let roster = Participants::new(vec![
      Participant::new("  Carol ", "bio c"),
      Participant::new("Alice", "bio a").with_partner("  Bob  "),
      Participant::new("Bob", "bio b").with_partner("   "),
    ])
    .unwrap();

    let names: Vec<_> = roster.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Carol", "Alice", "Bob"]);
    assert_eq!(roster.as_slice()[1].partner.as_deref(), Some("Bob"));
    assert_eq!(roster.as_slice()[2].partner, None);
  }

  #[test]
  fn rejects_blank_name() {
    let err = Participants::new(vec![
      Participant::new("Alice", ""),
      Participant::new("   ", ""),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::EmptyName { index: 1 }));
  }

  #[test]
  fn rejects_case_insensitive_duplicate() {
    let err = Participants::new(vec![
      Participant::new("Alice", ""),
      Participant::new("ALICE", ""),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateName(ref n) if n == "ALICE"));
  }

  #[test]
  fn find_ignores_case() {
    let roster =
      Participants::new(vec![Participant::new("Dana Scully", "")]).unwrap();
    assert!(roster.find("dana scully").is_some());
    assert!(roster.find("Fox").is_none());
  }
}
