// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads one SQuAD-style JSON split from disk.
//
// Split files follow the usual naming convention:
//
//   <source_dir>/train-v1.1.json
//   <source_dir>/dev-v1.1.json
//
// The whole document is parsed in one forward pass through a
// buffered reader. A missing or malformed file is fatal: unlike a
// single bad paragraph, there is nothing sensible to continue with.
//
// Reference: serde_json documentation (from_reader)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::domain::corpus::SquadDocument;
use crate::domain::dataset::Split;
use crate::domain::traits::CorpusSource;

/// Loads one corpus split from a JSON file.
pub struct SquadLoader {
    path: PathBuf,
}

impl SquadLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loader for `<dir>/<split>-v<version>.json`.
    pub fn for_split(dir: impl AsRef<Path>, split: Split, version: &str) -> Self {
        Self::new(split_path(dir, split, version))
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<dir>/<split>-v<version>.json`
pub fn split_path(dir: impl AsRef<Path>, split: Split, version: &str) -> PathBuf {
    dir.as_ref().join(format!("{}-v{}.json", split.name(), version))
}

impl CorpusSource for SquadLoader {
    fn load(&self) -> Result<SquadDocument> {
        tracing::info!("Reading {} ...", self.path.display());

        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open corpus file '{}'", self.path.display()))?;

        let doc: SquadDocument = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Malformed corpus JSON in '{}'", self.path.display()))?;

        tracing::debug!("Parsed {} articles from '{}'", doc.data.len(), self.path.display());
        Ok(doc)
    }
}
