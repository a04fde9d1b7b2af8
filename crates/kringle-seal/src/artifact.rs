//! The published artifact.
//!
//! Two shapes, told apart by the `version` field:
//!
//! * `"2.0"` maps each lookup key to one participant's sealed record.
//! * `"1.0"` carries the whole assignment list in a single blob under one
//!   shared passphrase. Anyone holding that passphrase sees every pairing.

use std::collections::{BTreeMap, HashMap};

use kringle_core::{assignment::Assignment, participant::Participants};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  lookup::{LookupKey, lookup_key},
  passphrase::Passphrase,
  seal::{self, KdfParams, SealedBlob, SealedRecord},
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Display,
  EnumString,
  Deserialize,
)]
pub enum ArtifactVersion {
  /// One blob, one shared passphrase.
  #[strum(serialize = "1.0")]
  #[serde(rename = "1.0")]
  V1,
  /// One blob per participant, keyed by lookup key.
  #[default]
  #[strum(serialize = "2.0")]
  #[serde(rename = "2.0")]
  V2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum Artifact {
  #[serde(rename = "1.0")]
  Shared {
    /// Base64 blob of the JSON assignment array.
    data:      String,
    /// Milliseconds since the Unix epoch.
    timestamp: i64,
  },
  #[serde(rename = "2.0")]
  PerParticipant {
    assignments: BTreeMap<LookupKey, String>,
    timestamp:   i64,
  },
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 { chrono::Utc::now().timestamp_millis() }

// ─── Assembly ────────────────────────────────────────────────────────────────

/// Build a `"2.0"` artifact holding exactly one record per participant.
pub fn assemble(
  participants: &Participants,
  records: Vec<SealedRecord>,
  timestamp: i64,
) -> Result<Artifact> {
  let mut by_giver: HashMap<String, SealedRecord> =
    HashMap::with_capacity(records.len());

  for record in records {
    let giver = participants
      .find(&record.giver)
      .ok_or_else(|| {
        Error::InconsistentRecordSet(format!(
          "record for unknown giver {:?}",
          record.giver
        ))
      })?
      .name
      .clone();
    if by_giver.insert(giver.clone(), record).is_some() {
      return Err(Error::InconsistentRecordSet(format!(
        "more than one record for {giver:?}"
      )));
    }
  }

  let mut assignments = BTreeMap::new();
  for p in participants {
    let record = by_giver.remove(&p.name).ok_or_else(|| {
      Error::IncompleteAssignmentSet { participant: p.name.clone() }
    })?;
    if assignments
      .insert(record.lookup_key, record.blob.to_base64())
      .is_some()
    {
      return Err(Error::InconsistentRecordSet(
        "two participants share a lookup key".to_string(),
      ));
    }
  }

  tracing::info!(records = assignments.len(), "assembled per-participant artifact");
  Ok(Artifact::PerParticipant { assignments, timestamp })
}

/// Build a `"1.0"` artifact: the full list sealed under `passphrase`.
pub fn assemble_shared(
  assignments: &[Assignment],
  participants: &Participants,
  passphrase: &Passphrase,
  params: &KdfParams,
  timestamp: i64,
) -> Result<Artifact> {
  for p in participants {
    let given = assignments.iter().filter(|a| a.giver == p.name).count();
    if given == 0 {
      return Err(Error::IncompleteAssignmentSet { participant: p.name.clone() });
    }
    if given > 1 {
      return Err(Error::InconsistentRecordSet(format!(
        "{:?} appears as giver {given} times",
        p.name
      )));
    }
  }
  if assignments.len() != participants.len() {
    return Err(Error::InconsistentRecordSet(
      "assignment for a giver outside the roster".to_string(),
    ));
  }

  let blob = seal::seal_shared(assignments, passphrase, params)?;
  tracing::info!(records = assignments.len(), "assembled shared artifact");
  Ok(Artifact::Shared { data: blob.to_base64(), timestamp })
}

// ─── Reading ─────────────────────────────────────────────────────────────────

impl Artifact {
  pub fn version(&self) -> ArtifactVersion {
    match self {
      Self::Shared { .. } => ArtifactVersion::V1,
      Self::PerParticipant { .. } => ArtifactVersion::V2,
    }
  }

  pub fn timestamp(&self) -> i64 {
    match self {
      Self::Shared { timestamp, .. } | Self::PerParticipant { timestamp, .. } => {
        *timestamp
      }
    }
  }

  /// Number of published entries: participants for `"2.0"`, 1 for `"1.0"`.
  pub fn len(&self) -> usize {
    match self {
      Self::Shared { .. } => 1,
      Self::PerParticipant { assignments, .. } => assignments.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn to_json_pretty(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn from_json(text: &str) -> Result<Self> { Ok(serde_json::from_str(text)?) }

  /// Find and decrypt the assignment a passphrase unlocks.
  ///
  /// `"2.0"` artifacts locate the record by lookup key and ignore `name`.
  /// `"1.0"` artifacts decrypt the whole list and need `name` to pick the
  /// caller's own entry.
  pub fn reveal(
    &self,
    passphrase: &str,
    name: Option<&str>,
    params: &KdfParams,
  ) -> Result<Assignment> {
    match self {
      Self::PerParticipant { assignments, .. } => {
        let encoded = assignments
          .get(&lookup_key(passphrase))
          .ok_or(Error::UnknownPassphrase)?;
        let blob = SealedBlob::from_base64(encoded)?;
        seal::open(&blob, passphrase, params)
      }
      Self::Shared { data, .. } => {
        let name = name.ok_or(Error::NameRequired)?;
        let blob = SealedBlob::from_base64(data)?;
        let needle = name.trim().to_lowercase();
        seal::open_shared(&blob, passphrase, params)?
          .into_iter()
          .find(|a| a.giver.to_lowercase() == needle)
          .ok_or_else(|| Error::UnknownGiver(name.to_string()))
      }
    }
  }
}
