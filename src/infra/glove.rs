// ============================================================
// Layer 6 — Pretrained Embedding Reader (GloVe text format)
// ============================================================
// Streams a GloVe-style text file in one forward pass:
//
//   the 0.418 0.24968 -0.41242 ...
//   ,   0.013441 0.23682 -0.16899 ...
//
// one word followed by `dim` space-separated floats per line.
//
// A few releases contain "words" with spaces in them, so a line is
// read from the right: the last `dim` fields are the vector and
// everything before them is the word. The first non-empty line must
// have exactly `dim + 1` fields; anything else means the file does
// not hold `dim`-sized vectors and the scan stops. Later lines with
// fewer fields are logged and skipped. A wanted vector field that is
// not a float is fatal.
//
// Vectors are only parsed for lines whose word the caller asks for,
// which keeps the scan of a multi-GB file cheap.
//
// File naming: <glove_dir>/glove.<corpus>.<dim>d.txt
//
// Reference: GloVe project file format
//            Rust Book §9 (Error Handling), §12 (I/O)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};

/// How often the scan reports progress, in lines.
const PROGRESS_EVERY: usize = 100_000;

// ─── GloveCorpus ──────────────────────────────────────────────────────────────
/// The published corpus tiers. Each one has a known line count
/// that is used to report scan progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GloveCorpus {
    #[serde(rename = "6B")]
    Wiki6B,
    #[serde(rename = "42B")]
    CommonCrawl42B,
    #[serde(rename = "840B")]
    CommonCrawl840B,
    #[serde(rename = "2B")]
    Twitter2B,
}

impl GloveCorpus {
    pub fn name(self) -> &'static str {
        match self {
            GloveCorpus::Wiki6B          => "6B",
            GloveCorpus::CommonCrawl42B  => "42B",
            GloveCorpus::CommonCrawl840B => "840B",
            GloveCorpus::Twitter2B       => "2B",
        }
    }

    /// Approximate number of lines in the file.
    pub fn expected_lines(self) -> usize {
        match self {
            GloveCorpus::Wiki6B          => 400_000,
            GloveCorpus::CommonCrawl42B  => 1_900_000,
            GloveCorpus::CommonCrawl840B => 2_200_000,
            GloveCorpus::Twitter2B       => 1_200_000,
        }
    }
}

impl fmt::Display for GloveCorpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GloveCorpus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "6B"   => Ok(GloveCorpus::Wiki6B),
            "42B"  => Ok(GloveCorpus::CommonCrawl42B),
            "840B" => Ok(GloveCorpus::CommonCrawl840B),
            "2B"   => Ok(GloveCorpus::Twitter2B),
            other  => anyhow::bail!(
                "unsupported embedding corpus '{other}' (expected one of 6B, 42B, 840B, 2B)"
            ),
        }
    }
}

/// `<dir>/glove.<corpus>.<dim>d.txt`
pub fn glove_path(dir: impl AsRef<Path>, corpus: GloveCorpus, dim: usize) -> PathBuf {
    dir.as_ref().join(format!("glove.{}.{}d.txt", corpus.name(), dim))
}

// ─── GloveReader ──────────────────────────────────────────────────────────────
/// Counters from one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub lines:     usize,
    pub kept:      usize,
    pub malformed: usize,
}

pub struct GloveReader<R> {
    reader:         R,
    dim:            usize,
    expected_lines: Option<usize>,
    source:         String,
}

impl GloveReader<BufReader<File>> {
    /// Open the embedding file for `corpus`/`dim` under `dir`.
    pub fn open(dir: impl AsRef<Path>, corpus: GloveCorpus, dim: usize) -> Result<Self> {
        let path = glove_path(dir, corpus, dim);
        let file = File::open(&path)
            .with_context(|| format!("Cannot open embedding file '{}'", path.display()))?;

        Ok(Self {
            expected_lines: Some(corpus.expected_lines()),
            source:         path.display().to_string(),
            ..Self::from_reader(BufReader::new(file), dim)
        })
    }
}

impl<R: BufRead> GloveReader<R> {
    /// Wrap any buffered reader (used by tests and in-memory tables).
    pub fn from_reader(reader: R, dim: usize) -> Self {
        Self { reader, dim, expected_lines: None, source: "<reader>".to_string() }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Read every line; for each word `wanted` accepts, parse its
    /// vector and hand both to `sink`.
    pub fn scan(
        mut self,
        mut wanted: impl FnMut(&str) -> bool,
        mut sink:   impl FnMut(String, Vec<f32>),
    ) -> Result<ScanSummary> {
        tracing::info!("Reading {} ...", self.source);

        let mut summary     = ScanSummary::default();
        let mut line        = String::new();
        let mut checked_dim = false;

        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("Cannot read '{}'", self.source))?;
            if read == 0 {
                break;
            }
            summary.lines += 1;
            self.report_progress(summary.lines);

            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.trim().split(' ').collect();
            if !checked_dim {
                if fields.len() != self.dim + 1 {
                    anyhow::bail!(
                        "'{}' has {} values per word on line {}, expected {} (check --glove-word-size)",
                        self.source,
                        fields.len().saturating_sub(1),
                        summary.lines,
                        self.dim
                    );
                }
                checked_dim = true;
            }
            if fields.len() < self.dim + 1 {
                tracing::warn!(
                    "Skipping malformed line {} of '{}' ({} fields)",
                    summary.lines,
                    self.source,
                    fields.len()
                );
                summary.malformed += 1;
                continue;
            }

            let split_at = fields.len() - self.dim;
            let word     = fields[..split_at].join(" ");
            if !wanted(&word) {
                continue;
            }

            let vector = fields[split_at..]
                .iter()
                .map(|f| f.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .with_context(|| {
                    format!("Bad vector for '{}' on line {} of '{}'", word, summary.lines, self.source)
                })?;

            summary.kept += 1;
            sink(word, vector);
        }

        tracing::debug!(
            "Scanned {} lines, kept {}, skipped {} malformed",
            summary.lines,
            summary.kept,
            summary.malformed
        );
        Ok(summary)
    }

    fn report_progress(&self, lines: usize) {
        if lines % PROGRESS_EVERY != 0 {
            return;
        }
        match self.expected_lines {
            Some(total) => tracing::info!(
                "  {} / ~{} lines ({}%)",
                lines,
                total,
                (lines * 100 / total.max(1)).min(100)
            ),
            None => tracing::info!("  {} lines", lines),
        }
    }
}
