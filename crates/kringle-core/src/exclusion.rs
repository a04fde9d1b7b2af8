//! Symmetric partner exclusions.
//!
//! Built once from a finalised roster. Each declared partner link becomes an
//! unordered, case-folded pair, so a one-sided declaration still excludes the
//! pairing in both directions.

use std::collections::HashSet;

use crate::participant::{Participants, fold};

/// Set of unordered name pairs that must never be paired with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRelation {
  pairs: HashSet<(String, String)>,
}

impl ExclusionRelation {
  /// Collect every declared partner link in `participants`.
  ///
  /// A partner name that matches nobody on the roster is kept but can never
  /// exclude a real pairing.
  pub fn build(participants: &Participants) -> Self {
    let mut relation = Self::default();
    for p in participants {
      if let Some(partner) = p.partner.as_deref() {
        relation.insert(&p.name, partner);
      }
    }
    relation
  }

  /// Add the unordered pair {a, b}. Returns `false` if it was already present.
  pub fn insert(&mut self, a: &str, b: &str) -> bool {
    self.pairs.insert(unordered(fold(a), fold(b)))
  }

  /// True iff {a, b} is an excluded pair, in either order and any case.
  pub fn excluded(&self, a: &str, b: &str) -> bool {
    self.pairs.contains(&unordered(fold(a), fold(b)))
  }

  /// Number of distinct excluded pairs.
  pub fn len(&self) -> usize { self.pairs.len() }

  pub fn is_empty(&self) -> bool { self.pairs.is_empty() }
}

fn unordered(a: String, b: String) -> (String, String) {
  if a <= b { (a, b) } else { (b, a) }
}
