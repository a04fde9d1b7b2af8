//! Passphrase-sealed records.
//!
//! Pipeline:
//!   passphrase + fresh salt(16)
//!     └─ PBKDF2-HMAC-SHA256 (100 000 rounds) → 256-bit key
//!          └─ AES-256-GCM with fresh nonce(12) → ciphertext ∥ tag(16)
//!               └─ salt ∥ nonce ∥ ciphertext ∥ tag → base64
//!
//! Salt and nonce are drawn from the OS CSPRNG on every call, so sealing the
//! same payload twice never produces the same blob.

use std::{collections::HashMap, fmt};

use aes_gcm::{
  Aes256Gcm, Key, Nonce,
  aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use kringle_core::assignment::Assignment;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::{
  Error, Result,
  lookup::LookupKey,
  passphrase::Passphrase,
};

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
pub const DEFAULT_KDF_ROUNDS: u32 = 100_000;

// ─── Types ───────────────────────────────────────────────────────────────────

/// Key-stretching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
  pub rounds: u32,
}

impl Default for KdfParams {
  fn default() -> Self { Self { rounds: DEFAULT_KDF_ROUNDS } }
}

/// Raw sealed bytes: `salt ∥ nonce ∥ ciphertext ∥ tag`.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedBlob(Vec<u8>);

impl SealedBlob {
  pub fn from_bytes(bytes: Vec<u8>) -> Self { Self(bytes) }

  pub fn as_bytes(&self) -> &[u8] { &self.0 }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Standard (padded) base64, the published form.
  pub fn to_base64(&self) -> String { B64.encode(&self.0) }

  pub fn from_base64(text: &str) -> Result<Self> {
    Ok(Self(B64.decode(text.trim())?))
  }
}

impl fmt::Debug for SealedBlob {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SealedBlob({} bytes)", self.0.len())
  }
}

/// A sealed assignment ready for publication.
///
/// `giver` never leaves the process; only `lookup_key` and `blob` are
/// published.
#[derive(Debug, Clone)]
pub struct SealedRecord {
  pub giver:      String,
  pub lookup_key: LookupKey,
  pub blob:       SealedBlob,
}

// ─── Primitive ───────────────────────────────────────────────────────────────

/// Seal arbitrary bytes under `passphrase`.
pub fn seal_bytes(
  plaintext: &[u8],
  passphrase: &str,
  params: &KdfParams,
) -> Result<SealedBlob> {
  let mut salt = [0u8; SALT_LEN];
  let mut nonce = [0u8; NONCE_LEN];
  OsRng.fill_bytes(&mut salt);
  OsRng.fill_bytes(&mut nonce);

  let key = derive_key(passphrase, &salt, params);
  let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
  let sealed = cipher
    .encrypt(Nonce::from_slice(&nonce), plaintext)
    .map_err(|_| Error::Encryption)?;

  let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
  out.extend_from_slice(&salt);
  out.extend_from_slice(&nonce);
  out.extend_from_slice(&sealed);
  Ok(SealedBlob(out))
}

/// Open a blob produced by [`seal_bytes`].
///
/// Any wrong passphrase or altered byte fails with [`Error::Authentication`].
pub fn open_bytes(
  blob: &SealedBlob,
  passphrase: &str,
  params: &KdfParams,
) -> Result<Zeroizing<Vec<u8>>> {
  let bytes = blob.as_bytes();
  if bytes.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
    return Err(Error::MalformedBlob { len: bytes.len() });
  }
  let (salt, rest) = bytes.split_at(SALT_LEN);
  let (nonce, sealed) = rest.split_at(NONCE_LEN);

  let key = derive_key(passphrase, salt, params);
  let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
  cipher
    .decrypt(Nonce::from_slice(nonce), sealed)
    .map(Zeroizing::new)
    .map_err(|_| Error::Authentication)
}

pub(crate) fn derive_key(
  passphrase: &str,
  salt: &[u8],
  params: &KdfParams,
) -> Zeroizing<[u8; KEY_LEN]> {
  let mut key = Zeroizing::new([0u8; KEY_LEN]);
  pbkdf2::pbkdf2_hmac::<Sha256>(
    passphrase.as_bytes(),
    salt,
    params.rounds.max(1),
    key.as_mut_slice(),
  );
  key
}

// ─── Assignments ─────────────────────────────────────────────────────────────

/// Seal one assignment as compact JSON.
pub fn seal(
  assignment: &Assignment,
  passphrase: &Passphrase,
  params: &KdfParams,
) -> Result<SealedBlob> {
  let mut payload = serde_json::to_vec(assignment)?;
  let blob = seal_bytes(&payload, passphrase.secret(), params);
  payload.zeroize();
  blob
}

/// Inverse of [`seal`].
pub fn open(
  blob: &SealedBlob,
  passphrase: &str,
  params: &KdfParams,
) -> Result<Assignment> {
  let payload = open_bytes(blob, passphrase, params)?;
  Ok(serde_json::from_slice(&payload)?)
}

/// Seal one assignment and pair it with its lookup key.
pub fn seal_record(
  assignment: &Assignment,
  passphrase: &Passphrase,
  params: &KdfParams,
) -> Result<SealedRecord> {
  Ok(SealedRecord {
    giver:      assignment.giver.clone(),
    lookup_key: passphrase.lookup_key(),
    blob:       seal(assignment, passphrase, params)?,
  })
}

/// Match each assignment with the passphrase minted for its giver.
pub fn pair_passphrases<'a>(
  assignments: &'a [Assignment],
  passphrases: &'a [Passphrase],
) -> Result<Vec<(&'a Assignment, &'a Passphrase)>> {
  let by_owner: HashMap<&str, &Passphrase> =
    passphrases.iter().map(|p| (p.owner(), p)).collect();

  assignments
    .iter()
    .map(|a| {
      by_owner
        .get(a.giver.as_str())
        .map(|p| (a, *p))
        .ok_or_else(|| Error::MissingPassphrase { giver: a.giver.clone() })
    })
    .collect()
}

/// Seal every assignment under its giver's passphrase, sequentially.
pub fn seal_all(
  assignments: &[Assignment],
  passphrases: &[Passphrase],
  params: &KdfParams,
) -> Result<Vec<SealedRecord>> {
  pair_passphrases(assignments, passphrases)?
    .into_iter()
    .map(|(a, p)| seal_record(a, p, params))
    .collect()
}

/// Seal a whole assignment list under one shared passphrase.
pub fn seal_shared(
  assignments: &[Assignment],
  passphrase: &Passphrase,
  params: &KdfParams,
) -> Result<SealedBlob> {
  let mut payload = serde_json::to_vec(assignments)?;
  let blob = seal_bytes(&payload, passphrase.secret(), params);
  payload.zeroize();
  blob
}

/// Inverse of [`seal_shared`].
pub fn open_shared(
  blob: &SealedBlob,
  passphrase: &str,
  params: &KdfParams,
) -> Result<Vec<Assignment>> {
  let payload = open_bytes(blob, passphrase, params)?;
  Ok(serde_json::from_slice(&payload)?)
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  const FAST: KdfParams = KdfParams { rounds: 1_000 };

  fn sample() -> Assignment {
    Assignment {
      giver:         "Alice".into(),
      recipient:     "Carol".into(),
      recipient_bio: "Loves \"mystery\" novels, knits; ☃".into(),
    }
  }

  fn phrase(secret: &str) -> Passphrase { Passphrase::new("Alice", secret) }

  #[test]
  fn pbkdf2_matches_reference_vector() {
    let key = derive_key("password", b"salt", &KdfParams { rounds: 1 });
    assert_eq!(
      hex::encode(*key),
      "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
    );
  }

  #[test]
  fn round_trip_with_default_rounds() {
    let p = phrase("snowflake-ivy-gift-star-4242");
    let blob = seal(&sample(), &p, &KdfParams::default()).unwrap();
    let opened = open(&blob, p.secret(), &KdfParams::default()).unwrap();
    assert_eq!(opened, sample());
  }

  #[test]
  fn layout_is_salt_nonce_ciphertext_tag() {
    let payload = serde_json::to_vec(&sample()).unwrap();
    let blob = seal(&sample(), &phrase("x"), &FAST).unwrap();
    assert_eq!(blob.len(), SALT_LEN + NONCE_LEN + payload.len() + TAG_LEN);
  }

  #[test]
  fn wrong_passphrase_fails_authentication() {
    let blob = seal(&sample(), &phrase("right"), &FAST).unwrap();
    assert!(matches!(
      open(&blob, "wrong", &FAST),
      Err(Error::Authentication)
    ));
  }

  #[test]
  fn wrong_round_count_fails_authentication() {
    let blob = seal(&sample(), &phrase("right"), &FAST).unwrap();
    let other = KdfParams { rounds: FAST.rounds + 1 };
    assert!(matches!(open(&blob, "right", &other), Err(Error::Authentication)));
  }

  #[test]
  fn every_flipped_byte_is_detected() {
    let blob = seal(&sample(), &phrase("right"), &FAST).unwrap();
    for i in 0..blob.len() {
      let mut bytes = blob.as_bytes().to_vec();
      bytes[i] ^= 0x01;
      let tampered = SealedBlob::from_bytes(bytes);
      assert!(
        matches!(open(&tampered, "right", &FAST), Err(Error::Authentication)),
        "flip at byte {i} went unnoticed"
      );
    }
  }

  #[test]
  fn salt_and_nonce_are_fresh_every_call() {
    let p = phrase("same");
    let a = seal(&sample(), &p, &FAST).unwrap();
    let b = seal(&sample(), &p, &FAST).unwrap();
    assert_ne!(a.as_bytes()[..SALT_LEN], b.as_bytes()[..SALT_LEN]);
    assert_ne!(
      a.as_bytes()[SALT_LEN..SALT_LEN + NONCE_LEN],
      b.as_bytes()[SALT_LEN..SALT_LEN + NONCE_LEN]
    );
  }

  #[test]
  fn short_blob_is_malformed() {
    let blob = SealedBlob::from_bytes(vec![0; SALT_LEN + NONCE_LEN + TAG_LEN - 1]);
    assert!(matches!(
      open(&blob, "x", &FAST),
      Err(Error::MalformedBlob { len: 43 })
    ));
  }

  #[test]
  fn base64_round_trip_and_garbage() {
    let blob = seal(&sample(), &phrase("b64"), &FAST).unwrap();
    let text = blob.to_base64();
    assert_eq!(SealedBlob::from_base64(&text).unwrap(), blob);
    assert!(matches!(
      SealedBlob::from_base64("!!!not-base64!!!"),
      Err(Error::Base64(_))
    ));
  }

  #[test]
  fn seal_all_pairs_by_giver() {
    let assignments = vec![
      sample(),
      Assignment {
        giver:         "Carol".into(),
        recipient:     "Alice".into(),
        recipient_bio: String::new(),
      },
    ];
    let phrases = vec![
      Passphrase::new("Carol", "carol-secret"),
      Passphrase::new("Alice", "alice-secret"),
    ];
    let records = seal_all(&assignments, &phrases, &FAST).unwrap();
    assert_eq!(records[0].giver, "Alice");
    assert_eq!(records[0].lookup_key, phrases[1].lookup_key());
    let opened = open(&records[1].blob, "carol-secret", &FAST).unwrap();
    assert_eq!(opened.recipient, "Alice");
  }

  #[test]
  fn seal_all_reports_missing_passphrase() {
    let phrases = vec![Passphrase::new("Bob", "bob-secret")];
    let err = seal_all(&[sample()], &phrases, &FAST).unwrap_err();
    assert!(matches!(err, Error::MissingPassphrase { ref giver } if giver == "Alice"));
  }

  #[test]
  fn shared_round_trip() {
    let list = vec![sample(), sample()];
    let p = Passphrase::new("*", "shared");
    let blob = seal_shared(&list, &p, &FAST).unwrap();
    assert_eq!(open_shared(&blob, "shared", &FAST).unwrap(), list);
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn open_inverts_seal(
      giver in ".{1,24}",
      recipient in ".{1,24}",
      bio in ".{0,200}",
      secret in ".{1,40}",
    ) {
      let a = Assignment { giver, recipient, recipient_bio: bio };
      let blob = seal(&a, &Passphrase::new("owner", secret.clone()), &FAST).unwrap();
      prop_assert_eq!(open(&blob, &secret, &FAST).unwrap(), a);
    }
  }
}
