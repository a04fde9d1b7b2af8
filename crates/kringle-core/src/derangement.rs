//! Constrained derangement by bounded rejection sampling.
//!
//! Each attempt shuffles the recipient order (Fisher–Yates) and pairs it
//! position-for-position with the roster. A candidate survives only if nobody
//! draws themselves and no pair is excluded. Absent exclusions roughly 1/e of
//! all permutations are derangements, so realistic rosters converge within a
//! handful of attempts; unsatisfiable rosters hit the attempt cap and fail.
//!
//! Randomness must come from a cryptographically secure generator: anyone
//! able to predict the shuffle could reconstruct every assignment. The
//! [`CryptoRng`] bound on [`generate_with_rng`] enforces this.

use rand::seq::SliceRandom;
use rand_core::{CryptoRng, OsRng, RngCore};

use crate::{
  Error, Result,
  assignment::Assignment,
  exclusion::ExclusionRelation,
  participant::{Participant, Participants},
  sample::{Outcome, sample_bounded},
};

/// Attempt cap used when the caller has no opinion.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Generate assignments using the operating system's CSPRNG.
pub fn generate(
  participants: &Participants,
  exclusions: &ExclusionRelation,
  max_attempts: u32,
) -> Result<Vec<Assignment>> {
  generate_with_rng(participants, exclusions, max_attempts, &mut OsRng)
}

/// Generate assignments, drawing permutations from `rng`.
///
/// On success the result holds one assignment per participant, in roster
/// order. Fails with [`Error::InsufficientParticipants`] below two
/// participants and [`Error::GenerationExhausted`] once `max_attempts`
/// candidates have been rejected.
pub fn generate_with_rng<R>(
  participants: &Participants,
  exclusions: &ExclusionRelation,
  max_attempts: u32,
  rng: &mut R,
) -> Result<Vec<Assignment>>
where
  R: RngCore + CryptoRng + ?Sized,
{
  let members = participants.as_slice();
  let count = members.len();
  if count < 2 {
    return Err(Error::InsufficientParticipants { count });
  }

  let forbidden = forbidden_matrix(members, exclusions);
  let mut blocked = vec![0u32; count];
  let mut order: Vec<usize> = (0..count).collect();

  let outcome = sample_bounded(max_attempts, |_| {
    order.shuffle(&mut *rng);
    match first_conflict(&order, &forbidden) {
      Some(giver) => {
        blocked[giver] += 1;
        None
      }
      None => Some(order.clone()),
    }
  });

  match outcome {
    Outcome::Accepted { value, attempt } => {
      tracing::debug!(attempt, participants = count, "accepted derangement");
      Ok(pair_up(members, &value))
    }
    Outcome::Exhausted { attempts } => {
      let blocker = most_blocked(members, &blocked);
      tracing::warn!(
        attempts,
        participants = count,
        exclusions = exclusions.len(),
        most_blocked = blocker.as_deref().unwrap_or("-"),
        "derangement search exhausted"
      );
      Err(Error::GenerationExhausted { attempts, most_blocked: blocker })
    }
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `forbidden[g][r]` is true when giver `g` may not give to recipient `r`.
fn forbidden_matrix(
  members: &[Participant],
  exclusions: &ExclusionRelation,
) -> Vec<Vec<bool>> {
  members
    .iter()
    .enumerate()
    .map(|(g, giver)| {
      members
        .iter()
        .enumerate()
        .map(|(r, recipient)| {
          g == r || exclusions.excluded(&giver.name, &recipient.name)
        })
        .collect()
    })
    .collect()
}

/// Index of the first giver whose drawn recipient is forbidden.
fn first_conflict(order: &[usize], forbidden: &[Vec<bool>]) -> Option<usize> {
  order
    .iter()
    .enumerate()
    .find(|&(giver, &recipient)| forbidden[giver][recipient])
    .map(|(giver, _)| giver)
}

fn pair_up(members: &[Participant], order: &[usize]) -> Vec<Assignment> {
  members
    .iter()
    .zip(order)
    .map(|(giver, &r)| {
      let recipient = &members[r];
      Assignment {
        giver:         giver.name.clone(),
        recipient:     recipient.name.clone(),
        recipient_bio: recipient.bio.clone(),
      }
    })
    .collect()
}

fn most_blocked(members: &[Participant], blocked: &[u32]) -> Option<String> {
  blocked
    .iter()
    .enumerate()
    .filter(|&(_, &n)| n > 0)
    .max_by_key(|&(i, &n)| (n, std::cmp::Reverse(i)))
    .map(|(i, _)| members[i].name.clone())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn roster(names: &[&str]) -> Participants {
    Participants::new(
      names
        .iter()
        .map(|n| Participant::new(*n, format!("{n}'s bio")))
        .collect(),
    )
    .unwrap()
  }

  #[test]
  fn single_participant_is_rejected() {
    let r = roster(&["Solo"]);
    let err = generate(&r, &ExclusionRelation::build(&r), 10).unwrap_err();
    assert!(matches!(err, Error::InsufficientParticipants { count: 1 }));
  }

  #[test]
  fn empty_roster_is_rejected() {
    let r = Participants::default();
    let err = generate(&r, &ExclusionRelation::default(), 10).unwrap_err();
    assert!(matches!(err, Error::InsufficientParticipants { count: 0 }));
  }

  #[test]
  fn two_strangers_swap() {
    let r = roster(&["Ann", "Ben"]);
    let out =
      generate(&r, &ExclusionRelation::default(), DEFAULT_MAX_ATTEMPTS)
        .unwrap();
    assert_eq!(out[0].recipient, "Ben");
    assert_eq!(out[1].recipient, "Ann");
    assert_eq!(out[0].recipient_bio, "Ben's bio");
  }

  #[test]
  fn zero_attempts_exhausts_without_blocker() {
    let r = roster(&["Ann", "Ben"]);
    let err = generate(&r, &ExclusionRelation::default(), 0).unwrap_err();
    assert!(matches!(
      err,
      Error::GenerationExhausted { attempts: 0, most_blocked: None }
    ));
  }

  #[test]
  fn most_blocked_prefers_higher_count_then_earlier_giver() {
    let members = roster(&["A", "B", "C"]).as_slice().to_vec();
    assert_eq!(most_blocked(&members, &[2, 5, 5]).as_deref(), Some("B"));
    assert_eq!(most_blocked(&members, &[0, 0, 0]), None);
  }
}
