//! The generate pipeline: roster → assignments → passphrases → sealed
//! records → artifact.
//!
//! Every stage takes the previous stage's complete output. Only sealing fans
//! out: each record is an independent PBKDF2 + AES-GCM job, so they run on
//! tokio's blocking pool.

use anyhow::{Context as _, bail, ensure};
use kringle_core::{
  assignment::Assignment, derangement, exclusion::ExclusionRelation,
  participant::Participants,
};
use kringle_seal::{
  artifact::{self, Artifact, ArtifactVersion},
  passphrase::{self, Passphrase, SHARED_OWNER, WordBank},
  seal::{self, KdfParams, SealedRecord},
};
use tokio::task::JoinSet;

use crate::settings::Settings;

/// Inputs gathered by the I/O layer.
pub struct GenerateRequest {
  pub participants:      Participants,
  pub word_bank:         WordBank,
  pub format:            ArtifactVersion,
  /// Organizer-chosen passphrase for a `"1.0"` artifact.
  pub shared_passphrase: Option<String>,
}

/// Everything the organizer walks away with.
#[derive(Debug)]
pub struct Bundle {
  pub artifact:     Artifact,
  pub assignments:  Vec<Assignment>,
  /// One passphrase per participant, in roster order.
  pub distribution: Vec<Passphrase>,
}

pub async fn generate(
  settings: &Settings,
  request: GenerateRequest,
) -> anyhow::Result<Bundle> {
  let GenerateRequest {
    participants,
    word_bank,
    format,
    shared_passphrase,
  } = request;

  if format == ArtifactVersion::V2 && shared_passphrase.is_some() {
    bail!("a shared passphrase only applies to format 1.0 artifacts");
  }

  let exclusions = ExclusionRelation::build(&participants);
  tracing::info!(
    participants = participants.len(),
    exclusions = exclusions.len(),
    "generating assignments"
  );
  let assignments =
    derangement::generate(&participants, &exclusions, settings.max_attempts)
      .context("failed to generate assignments")?;

  let params = settings.kdf_params();
  let timestamp = artifact::now_millis();

  let (artifact, distribution) = match format {
    ArtifactVersion::V2 => {
      let passphrases =
        passphrase::mint(&participants, &word_bank, &settings.mint_config())
          .context("failed to mint passphrases")?;
      let records = seal_parallel(&assignments, &passphrases, params).await?;
      let artifact = artifact::assemble(&participants, records, timestamp)?;
      (artifact, passphrases)
    }
    ArtifactVersion::V1 => {
      let shared = match shared_passphrase {
        Some(secret) => {
          ensure!(!secret.trim().is_empty(), "shared passphrase cannot be empty");
          Passphrase::new(SHARED_OWNER, secret)
        }
        None => passphrase::mint_shared(&word_bank, &settings.mint_config())
          .context("failed to mint shared passphrase")?,
      };
      let artifact = artifact::assemble_shared(
        &assignments,
        &participants,
        &shared,
        &params,
        timestamp,
      )?;
      let distribution = participants
        .iter()
        .map(|p| Passphrase::new(p.name.clone(), shared.secret()))
        .collect();
      (artifact, distribution)
    }
  };

  Ok(Bundle { artifact, assignments, distribution })
}

/// Seal every assignment under its giver's passphrase, one blocking task per
/// record. Output order matches `assignments`.
pub async fn seal_parallel(
  assignments: &[Assignment],
  passphrases: &[Passphrase],
  params: KdfParams,
) -> anyhow::Result<Vec<SealedRecord>> {
  let pairs = seal::pair_passphrases(assignments, passphrases)?;
  let mut slots: Vec<Option<SealedRecord>> = vec![None; pairs.len()];

  let mut tasks = JoinSet::new();
  for (index, (assignment, phrase)) in pairs.into_iter().enumerate() {
    let assignment = assignment.clone();
    let phrase = phrase.clone();
    tasks.spawn_blocking(move || {
      (index, seal::seal_record(&assignment, &phrase, &params))
    });
  }

  while let Some(joined) = tasks.join_next().await {
    let (index, record) = joined.context("sealing task failed")?;
    slots[index] = Some(record.context("failed to seal assignment")?);
  }

  tracing::info!(records = slots.len(), "sealed assignments");
  Ok(slots.into_iter().flatten().collect())
}
