// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Writes one preprocessing run to disk as plain JSON files.
//
// What gets written per run:
//   target_dir/
//     mode2idxs.json       ← split → {start, end} example range
//     metadata.json        ← size summary
//     shared.json          ← { "X": passages as word ids }
//     batched.json         ← { "*X", "Q", "Y", "ids" } columns
//     word2idx.json        ← word → id
//     param.json           ← { "emb_mat": [[f32]] }
//     char2idx.json        ← char → id
//     char_idxs.json       ← id → padded char-id row
//     prepro_config.json   ← the configuration of the run
//
// All files are first serialised into `target_dir/.staging` and
// only moved into place once every one of them was written. A run
// that fails halfway leaves the previous artifact set untouched.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json docs (to_writer, from_reader)

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::dataset::PreprocessedDataset;

pub const MODE2IDXS:     &str = "mode2idxs.json";
pub const METADATA:      &str = "metadata.json";
pub const SHARED:        &str = "shared.json";
pub const BATCHED:       &str = "batched.json";
pub const WORD2IDX:      &str = "word2idx.json";
pub const PARAM:         &str = "param.json";
pub const CHAR2IDX:      &str = "char2idx.json";
pub const CHAR_IDXS:     &str = "char_idxs.json";
pub const PREPRO_CONFIG: &str = "prepro_config.json";

const STAGING_DIR: &str = ".staging";

/// Owns the target directory of a run.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write every artifact of `dataset` plus `config`, all or nothing.
    pub fn save(&self, dataset: &PreprocessedDataset, config: &impl Serialize) -> Result<()> {
        let staging = self.dir.join(STAGING_DIR);
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .with_context(|| format!("Cannot clear stale staging dir '{}'", staging.display()))?;
        }
        fs::create_dir_all(&staging)
            .with_context(|| format!("Cannot create staging dir '{}'", staging.display()))?;

        let written = Self::write_all(&staging, dataset, config);
        if let Err(e) = written {
            // best effort: the original error is the one worth reporting
            fs::remove_dir_all(&staging).ok();
            return Err(e);
        }

        for name in ARTIFACTS {
            let from = staging.join(name);
            let to   = self.dir.join(name);
            fs::rename(&from, &to)
                .with_context(|| format!("Cannot move '{}' into '{}'", from.display(), to.display()))?;
        }
        fs::remove_dir(&staging)
            .with_context(|| format!("Cannot remove staging dir '{}'", staging.display()))?;

        tracing::info!("Wrote {} artifacts to '{}'", ARTIFACTS.len(), self.dir.display());
        Ok(())
    }

    fn write_all(dir: &Path, d: &PreprocessedDataset, config: &impl Serialize) -> Result<()> {
        write_json(&dir.join(MODE2IDXS), &d.ranges)?;
        write_json(&dir.join(METADATA), &d.metadata)?;
        write_json(&dir.join(SHARED), &d.passages)?;
        write_json(&dir.join(BATCHED), &d.batched)?;
        write_json(&dir.join(WORD2IDX), &d.word2idx)?;
        write_json(&dir.join(PARAM), &d.emb_mat)?;
        write_json(&dir.join(CHAR2IDX), &d.char2idx)?;
        write_json(&dir.join(CHAR_IDXS), &d.char_idxs)?;
        write_json(&dir.join(PREPRO_CONFIG), config)?;
        Ok(())
    }

    /// Read one artifact back.
    #[cfg(test)]
    pub fn load<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let file = File::open(&path)
            .with_context(|| format!("Cannot open artifact '{}'", path.display()))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("Cannot parse artifact '{}'", path.display()))
    }
}

const ARTIFACTS: [&str; 9] = [
    MODE2IDXS, METADATA, SHARED, BATCHED, WORD2IDX, PARAM, CHAR2IDX, CHAR_IDXS, PREPRO_CONFIG,
];

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, value)
        .with_context(|| format!("Cannot serialise '{}'", path.display()))?;
    out.flush()
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}
