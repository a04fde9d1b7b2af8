//! Passphrase minting.
//!
//! A passphrase is `words` tokens drawn with replacement from a word bank,
//! followed by a four-digit suffix, all joined by a separator:
//! `tinsel-holly-star-sleigh-4821`. Every passphrase in a batch is distinct.

use std::{collections::HashSet, fmt};

use kringle_core::{
  participant::Participants,
  sample::{Outcome, sample_bounded},
};
use rand::Rng;
use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::{
  Error, Result,
  lookup::{LookupKey, lookup_key},
};

/// Owner recorded on a batch-wide shared passphrase.
pub const SHARED_OWNER: &str = "*";

/// The built-in holiday word list.
pub const HOLIDAY_WORDS: [&str; 24] = [
  "snowflake", "mistletoe", "eggnog", "tinsel", "garland", "ornament",
  "wreath", "sleigh", "reindeer", "chimney", "stockings", "fireplace",
  "gingerbread", "peppermint", "holly", "ivy", "pine", "spruce", "angel",
  "star", "candle", "ribbon", "gift", "present",
];

// ─── Word bank ───────────────────────────────────────────────────────────────

/// Deduplicated list of words to draw passphrase tokens from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBank {
  words: Vec<String>,
}

impl WordBank {
  /// Build a bank from `words`, trimming each and dropping blanks and repeats.
  pub fn new<I, S>(words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut seen = HashSet::new();
    let words = words
      .into_iter()
      .map(|w| w.as_ref().trim().to_string())
      .filter(|w| !w.is_empty() && seen.insert(w.clone()))
      .collect();
    Self { words }
  }

  /// Parse a word-list file: one word per line, `#` starts a comment line.
  pub fn from_lines(text: &str) -> Self {
    Self::new(text.lines().filter(|l| !l.trim_start().starts_with('#')))
  }

  pub fn holiday() -> Self { Self::new(HOLIDAY_WORDS) }

  pub fn len(&self) -> usize { self.words.len() }

  pub fn is_empty(&self) -> bool { self.words.is_empty() }

  pub fn words(&self) -> &[String] { &self.words }
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintConfig {
  /// Word tokens per passphrase.
  pub words:        usize,
  pub separator:    String,
  /// Banks smaller than this still work but trigger a warning.
  pub min_words:    usize,
  /// Candidates drawn per participant before giving up.
  pub max_attempts: u32,
}

impl Default for MintConfig {
  fn default() -> Self {
    Self {
      words:        4,
      separator:    "-".to_string(),
      min_words:    20,
      max_attempts: 2000,
    }
  }
}

// ─── Passphrase ──────────────────────────────────────────────────────────────

/// A secret passphrase and the participant it belongs to.
///
/// The secret is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase {
  owner:  String,
  secret: Zeroizing<String>,
}

impl Passphrase {
  pub fn new(owner: impl Into<String>, secret: impl Into<String>) -> Self {
    Self {
      owner:  owner.into(),
      secret: Zeroizing::new(secret.into()),
    }
  }

  pub fn owner(&self) -> &str { &self.owner }

  pub fn secret(&self) -> &str { &self.secret }

  pub fn lookup_key(&self) -> LookupKey { lookup_key(&self.secret) }
}

impl fmt::Debug for Passphrase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Passphrase")
      .field("owner", &self.owner)
      .field("secret", &"<redacted>")
      .finish()
  }
}

// ─── Minting ─────────────────────────────────────────────────────────────────

/// Mint one distinct passphrase per participant using the OS CSPRNG.
pub fn mint(
  participants: &Participants,
  bank: &WordBank,
  config: &MintConfig,
) -> Result<Vec<Passphrase>> {
  mint_with_rng(participants, bank, config, &mut OsRng)
}

/// Mint one distinct passphrase per participant, in roster order.
pub fn mint_with_rng<R>(
  participants: &Participants,
  bank: &WordBank,
  config: &MintConfig,
  rng: &mut R,
) -> Result<Vec<Passphrase>>
where
  R: RngCore + CryptoRng,
{
  check_bank(bank, config)?;

  let mut issued: HashSet<String> = HashSet::with_capacity(participants.len());
  let mut minted = Vec::with_capacity(participants.len());

  for p in participants {
    let outcome = sample_bounded(config.max_attempts, |_| {
      let candidate = draw_candidate(bank, config, &mut *rng);
      (!issued.contains(&candidate)).then_some(candidate)
    });

    match outcome {
      Outcome::Accepted { value, attempt } => {
        if attempt > 1 {
          tracing::debug!(attempt, "passphrase collision resolved");
        }
        issued.insert(value.clone());
        minted.push(Passphrase::new(p.name.clone(), value));
      }
      Outcome::Exhausted { attempts } => {
        wipe(issued);
        return Err(Error::PassphraseMintExhausted {
          owner: p.name.clone(),
          attempts,
        });
      }
    }
  }

  wipe(issued);
  tracing::info!(count = minted.len(), bank = bank.len(), "minted passphrases");
  Ok(minted)
}

/// Mint the single passphrase shared by a whole batch.
pub fn mint_shared(bank: &WordBank, config: &MintConfig) -> Result<Passphrase> {
  check_bank(bank, config)?;
  Ok(Passphrase::new(SHARED_OWNER, draw_candidate(bank, config, &mut OsRng)))
}

/// Reject an empty bank and warn about a small one. Returns `true` when the
/// warning fired.
fn check_bank(bank: &WordBank, config: &MintConfig) -> Result<bool> {
  if bank.is_empty() {
    return Err(Error::EmptyWordBank);
  }
  let small = bank.len() < config.min_words;
  if small {
    tracing::warn!(
      words = bank.len(),
      recommended = config.min_words,
      "word bank is small; passphrases will be easier to guess"
    );
  }
  Ok(small)
}

fn draw_candidate<R>(bank: &WordBank, config: &MintConfig, rng: &mut R) -> String
where
  R: RngCore + CryptoRng,
{
  let words = bank.words();
  let mut parts: Vec<&str> = (0..config.words)
    .map(|_| words[rng.gen_range(0..words.len())].as_str())
    .collect();
  let suffix = rng.gen_range(1000..=9999u32).to_string();
  parts.push(&suffix);
  parts.join(&config.separator)
}

fn wipe(issued: HashSet<String>) {
  for mut secret in issued {
    secret.zeroize();
  }
}

#[cfg(test)]
mod tests {
  use kringle_core::participant::Participant;

  use super::*;

  fn roster(n: usize) -> Participants {
    Participants::new(
      (0..n).map(|i| Participant::new(format!("P{i}"), "")).collect(),
    )
    .unwrap()
  }

  #[test]
  fn empty_bank_is_an_error() {
    let err = mint(&roster(2), &WordBank::default(), &MintConfig::default())
      .unwrap_err();
    assert!(matches!(err, Error::EmptyWordBank));
  }

  #[test]
  fn shape_is_words_then_suffix() {
    let phrases =
      mint(&roster(3), &WordBank::holiday(), &MintConfig::default()).unwrap();
    assert_eq!(phrases.len(), 3);
    for (p, expected_owner) in phrases.iter().zip(["P0", "P1", "P2"]) {
      assert_eq!(p.owner(), expected_owner);
      let parts: Vec<&str> = p.secret().split('-').collect();
      assert_eq!(parts.len(), 5);
      for w in &parts[..4] {
        assert!(HOLIDAY_WORDS.contains(w), "unexpected word {w}");
      }
      let n: u32 = parts[4].parse().unwrap();
      assert!((1000..=9999).contains(&n));
    }
  }

  #[test]
  fn small_bank_warns_but_still_mints() {
    let bank = WordBank::new(["fir", "pine", "yew"]);
    let config = MintConfig::default();
    assert!(check_bank(&bank, &config).unwrap());
    assert!(!check_bank(&WordBank::holiday(), &config).unwrap());

    let phrases = mint(&roster(4), &bank, &config).unwrap();
    assert_eq!(phrases.len(), 4);
    let distinct: HashSet<&str> = phrases.iter().map(|p| p.secret()).collect();
    assert_eq!(distinct.len(), 4);
  }

  #[test]
  fn one_word_bank_still_yields_distinct_phrases() {
    let bank = WordBank::new(["fir"]);
    let phrases = mint(&roster(200), &bank, &MintConfig::default()).unwrap();
    let distinct: HashSet<&str> = phrases.iter().map(|p| p.secret()).collect();
    assert_eq!(distinct.len(), 200);
  }

  #[test]
  fn zero_budget_names_first_participant() {
    let config = MintConfig { max_attempts: 0, ..MintConfig::default() };
    let err = mint(&roster(2), &WordBank::holiday(), &config).unwrap_err();
    assert!(matches!(
      err,
      Error::PassphraseMintExhausted { ref owner, attempts: 0 } if owner == "P0"
    ));
  }

  #[test]
  fn custom_separator_and_word_count() {
    let config = MintConfig {
      words: 2,
      separator: " ".to_string(),
      ..MintConfig::default()
    };
    let phrase = mint_shared(&WordBank::holiday(), &config).unwrap();
    assert_eq!(phrase.owner(), SHARED_OWNER);
    assert_eq!(phrase.secret().split(' ').count(), 3);
  }

  #[test]
  fn bank_parsing_skips_comments_blanks_and_repeats() {
    let bank = WordBank::from_lines("# words\nholly\n\n  ivy \nholly\n");
    assert_eq!(bank.words(), ["holly", "ivy"]);
  }

  #[test]
  fn debug_redacts_secret() {
    let p = Passphrase::new("Alice", "top-secret-1234");
    let shown = format!("{p:?}");
    assert!(shown.contains("Alice"));
    assert!(!shown.contains("top-secret"));
  }
}
