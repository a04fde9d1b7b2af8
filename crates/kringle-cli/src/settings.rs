//! Tunable settings, read from an optional TOML file and `KRINGLE_*`
//! environment variables (environment wins).

use std::path::Path;

use anyhow::Context as _;
use kringle_core::derangement::DEFAULT_MAX_ATTEMPTS;
use kringle_seal::{
  artifact::ArtifactVersion,
  passphrase::MintConfig,
  seal::{DEFAULT_KDF_ROUNDS, KdfParams},
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Derangement candidates drawn before giving up.
  pub max_attempts:         u32,
  /// Passphrase candidates drawn per participant before giving up.
  pub mint_attempts:        u32,
  pub words_per_passphrase: usize,
  /// Word banks below this size trigger a warning.
  pub min_word_bank:        usize,
  pub separator:            String,
  pub kdf_rounds:           u32,
  pub format:               ArtifactVersion,
}

impl Default for Settings {
  fn default() -> Self {
    let mint = MintConfig::default();
    Self {
      max_attempts:         DEFAULT_MAX_ATTEMPTS,
      mint_attempts:        mint.max_attempts,
      words_per_passphrase: mint.words,
      min_word_bank:        mint.min_words,
      separator:            mint.separator,
      kdf_rounds:           DEFAULT_KDF_ROUNDS,
      format:               ArtifactVersion::default(),
    }
  }
}

impl Settings {
  /// Layer `path` (if it exists) and `KRINGLE_*` variables over the defaults.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("KRINGLE"))
      .build()
      .with_context(|| format!("failed to read settings from {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  pub fn mint_config(&self) -> MintConfig {
    MintConfig {
      words:        self.words_per_passphrase,
      separator:    self.separator.clone(),
      min_words:    self.min_word_bank,
      max_attempts: self.mint_attempts,
    }
  }

  pub fn kdf_params(&self) -> KdfParams { KdfParams { rounds: self.kdf_rounds } }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn defaults_match_reference_parameters() {
    let s = Settings::default();
    assert_eq!(s.max_attempts, 1000);
    assert_eq!(s.mint_attempts, 2000);
    assert_eq!(s.words_per_passphrase, 4);
    assert_eq!(s.min_word_bank, 20);
    assert_eq!(s.separator, "-");
    assert_eq!(s.kdf_params().rounds, 100_000);
    assert_eq!(s.format, ArtifactVersion::V2);
  }

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(s, Settings::default());
  }

  #[test]
  fn file_overrides_selected_fields() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "max_attempts = 50\nseparator = \".\"\nformat = \"1.0\"").unwrap();

    let s = Settings::load(file.path()).unwrap();
    assert_eq!(s.max_attempts, 50);
    assert_eq!(s.separator, ".");
    assert_eq!(s.format, ArtifactVersion::V1);
    assert_eq!(s.kdf_rounds, 100_000);

    let mint = s.mint_config();
    assert_eq!(mint.separator, ".");
    assert_eq!(mint.words, 4);
  }
}
