//! Writing the artifact and the distribution list to disk.

use std::{
  fs,
  io::Write as _,
  path::{Path, PathBuf},
};

use anyhow::{Context as _, ensure};
use tempfile::NamedTempFile;

use crate::pipeline::Bundle;

/// Default distribution-list path: `<output stem>-passphrases.csv` next to
/// the artifact.
pub fn distribution_path_for(output: &Path) -> PathBuf {
  let stem = output
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_else(|| "kringle".to_string());
  output.with_file_name(format!("{stem}-passphrases.csv"))
}

/// Write both outputs. Either both files land or neither does.
///
/// Each file is staged as a temporary sibling of its target, then renamed
/// into place once both have been written in full.
pub fn write_outputs(
  bundle: &Bundle,
  artifact_path: &Path,
  distribution_path: &Path,
) -> anyhow::Result<()> {
  ensure!(
    artifact_path != distribution_path,
    "artifact and distribution list must go to different files"
  );

  let json = bundle
    .artifact
    .to_json_pretty()
    .context("failed to serialise artifact")?;
  let list = kringle_csv::serialize_distribution(
    bundle.distribution.iter().map(|p| (p.owner(), p.secret())),
  );

  let staged_artifact = stage(artifact_path, &json)?;
  let staged_list = stage(distribution_path, &list)?;

  staged_list
    .persist(distribution_path)
    .with_context(|| format!("failed to write {}", distribution_path.display()))?;
  if let Err(err) = staged_artifact.persist(artifact_path) {
    let _ = fs::remove_file(distribution_path);
    return Err(err)
      .with_context(|| format!("failed to write {}", artifact_path.display()));
  }

  tracing::info!(
    artifact = %artifact_path.display(),
    distribution = %distribution_path.display(),
    "wrote outputs"
  );
  Ok(())
}

/// Write `contents` to a temporary file in `path`'s directory.
fn stage(path: &Path, contents: &str) -> anyhow::Result<NamedTempFile> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir)
    .with_context(|| format!("failed to create {}", dir.display()))?;

  let mut file = NamedTempFile::new_in(dir)
    .with_context(|| format!("failed to stage {}", path.display()))?;
  file
    .write_all(contents.as_bytes())
    .and_then(|()| file.as_file().sync_all())
    .with_context(|| format!("failed to write {}", path.display()))?;
  Ok(file)
}
