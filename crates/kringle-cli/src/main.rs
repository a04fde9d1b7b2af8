//! `kringle`: draw Secret Santa assignments and seal them per participant.
//!
//! # Usage
//!
//! ```text
//! kringle generate participants.csv --output public/secret-santa-data.json
//! kringle generate participants.csv --format 1.0 --passphrase "our-secret"
//! kringle lookup public/secret-santa-data.json --passphrase holly-ivy-star-gift-4821
//! ```
//!
//! Settings are read from `kringle.toml` (or `--config`) and `KRINGLE_*`
//! environment variables; see [`kringle_cli::Settings`].

use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use kringle_cli::{
  Settings, output,
  pipeline::{self, GenerateRequest},
};
use kringle_seal::{
  artifact::{Artifact, ArtifactVersion},
  passphrase::WordBank,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Secret Santa assignments, sealed per participant")]
struct Cli {
  /// Path to the TOML settings file.
  #[arg(short, long, global = true, default_value = "kringle.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Draw assignments and write the sealed artifact and distribution list.
  Generate(GenerateArgs),
  /// Decrypt your own assignment from a published artifact.
  Lookup(LookupArgs),
}

#[derive(Args)]
struct GenerateArgs {
  /// Participant file with NAME, BIO and SO columns.
  #[arg(default_value = "participants.csv")]
  csv: PathBuf,

  /// Where to write the published artifact.
  #[arg(short, long, default_value = "secret-santa-data.json")]
  output: PathBuf,

  /// Where to write the organizer-only passphrase list
  /// (default: `<output stem>-passphrases.csv`).
  #[arg(short, long)]
  distribution: Option<PathBuf>,

  /// Artifact format: 2.0 (per participant) or 1.0 (one shared passphrase).
  #[arg(long)]
  format: Option<ArtifactVersion>,

  /// Shared passphrase for a 1.0 artifact (minted if omitted).
  #[arg(short, long)]
  passphrase: Option<String>,

  /// Word list, one word per line (default: built-in holiday words).
  #[arg(short, long, value_name = "FILE")]
  word_bank: Option<PathBuf>,

  /// Print every pairing to stdout. Spoils the surprise for the organizer.
  #[arg(long)]
  show_assignments: bool,
}

#[derive(Args)]
struct LookupArgs {
  /// Published artifact to read.
  artifact: PathBuf,

  /// Your passphrase.
  #[arg(short, long, env = "KRINGLE_PASSPHRASE")]
  passphrase: String,

  /// Your name; only needed for 1.0 artifacts.
  #[arg(short, long)]
  name: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  match cli.command {
    Command::Generate(args) => run_generate(&settings, args).await,
    Command::Lookup(args) => run_lookup(&settings, &args),
  }
}

async fn run_generate(settings: &Settings, args: GenerateArgs) -> anyhow::Result<()> {
  let csv_text = fs::read_to_string(&args.csv)
    .with_context(|| format!("failed to read participants from {}", args.csv.display()))?;
  let participants = kringle_csv::parse_participants(&csv_text)
    .with_context(|| format!("invalid participant file {}", args.csv.display()))?;
  tracing::info!(count = participants.len(), "loaded participants");

  let word_bank = match &args.word_bank {
    Some(path) => {
      let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read word bank {}", path.display()))?;
      WordBank::from_lines(&text)
    }
    None => WordBank::holiday(),
  };

  let format = args.format.unwrap_or(settings.format);
  let bundle = pipeline::generate(settings, GenerateRequest {
    participants,
    word_bank,
    format,
    shared_passphrase: args.passphrase,
  })
  .await?;

  if args.show_assignments {
    println!("Assignments:");
    for (i, a) in bundle.assignments.iter().enumerate() {
      println!("  {}. {} → {}", i + 1, a.giver, a.recipient);
    }
  }

  let distribution = args
    .distribution
    .unwrap_or_else(|| output::distribution_path_for(&args.output));
  output::write_outputs(&bundle, &args.output, &distribution)?;

  println!("Artifact:          {} (format {})", args.output.display(), format);
  println!("Distribution list: {}", distribution.display());
  println!("Participants:      {}", bundle.distribution.len());
  if format == ArtifactVersion::V1
    && let Some(shared) = bundle.distribution.first()
  {
    println!("Shared passphrase: {}", shared.secret());
  }
  println!("Send each participant their own passphrase; keep the list private.");
  Ok(())
}

fn run_lookup(settings: &Settings, args: &LookupArgs) -> anyhow::Result<()> {
  let text = fs::read_to_string(&args.artifact)
    .with_context(|| format!("failed to read {}", args.artifact.display()))?;
  let artifact = Artifact::from_json(&text).context("not a kringle artifact")?;
  let assignment = artifact
    .reveal(&args.passphrase, args.name.as_deref(), &settings.kdf_params())
    .context("could not reveal an assignment for that passphrase")?;

  println!("{}, you are buying for {}.", assignment.giver, assignment.recipient);
  if !assignment.recipient_bio.is_empty() {
    println!("About them: {}", assignment.recipient_bio);
  }
  Ok(())
}
