use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analyzer::vectorspace::document_cosine_similarity;
use crate::analyzer::DocumentCollection;
use crate::error::{Result, SimilarityError};

/// Score stored when a single comparison fails.
///
/// Legitimate cosine scores over count vectors are always in [0, 1], so the
/// value is unambiguous. A failed comparison degrades one cell instead of
/// aborting the whole build.
pub const SCORE_ERROR: f64 = -1.0;

/// One entry of the flattened upper triangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub doc1: String,
    pub doc2: String,
    pub score: f64,
}

impl std::fmt::Display for SimilarityPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}: {:.4}", self.doc1, self.doc2, self.score)
    }
}

/// Pairwise cosine similarity grid over a document collection.
///
/// Built once from a snapshot of the collection: N filenames plus an N×N
/// row-major grid with a unit diagonal, symmetric by construction. Later
/// mutation of the source collection does not affect an existing matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    filenames: Vec<String>,
    grid: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build the matrix, computing every unordered pair once and mirroring.
    ///
    /// Fails with `InvalidInput` on an empty collection. A comparison error
    /// stores [`SCORE_ERROR`] in both mirrored cells.
    pub fn build(collection: &DocumentCollection) -> Result<Self> {
        Self::build_inner(collection, false)
    }

    /// Same as [`build`](Self::build) but computes the pair loop on the rayon
    /// thread pool. Documents are read-only during the build, so the pairs
    /// are independent.
    pub fn build_parallel(collection: &DocumentCollection) -> Result<Self> {
        Self::build_inner(collection, true)
    }

    fn build_inner(collection: &DocumentCollection, parallel: bool) -> Result<Self> {
        if collection.is_empty() {
            return Err(SimilarityError::InvalidInput("empty document collection"));
        }

        let documents = collection.documents();
        let n = documents.len();
        let filenames: Vec<String> = documents
            .iter()
            .map(|doc| doc.filename().to_string())
            .collect();

        let mut grid = vec![0.0; n * n];
        for i in 0..n {
            grid[i * n + i] = 1.0;
        }

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        let score_of = |&(i, j): &(usize, usize)| {
            document_cosine_similarity(&documents[i], &documents[j]).unwrap_or(SCORE_ERROR)
        };
        let scores: Vec<f64> = if parallel {
            pairs.par_iter().map(score_of).collect()
        } else {
            pairs.iter().map(score_of).collect()
        };

        for (&(i, j), score) in pairs.iter().zip(scores) {
            grid[i * n + j] = score;
            grid[j * n + i] = score;
        }

        Ok(SimilarityMatrix { filenames, grid })
    }

    /// Number of documents covered.
    #[inline]
    pub fn size(&self) -> usize {
        self.filenames.len()
    }

    /// Document labels, in collection order.
    #[inline]
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    /// Score at `(row, col)`, if in range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let n = self.size();
        if row >= n || col >= n {
            return None;
        }
        Some(self.grid[row * n + col])
    }

    /// Flatten the strict upper triangle into pairs, row-major.
    fn all_pairs(&self) -> Vec<SimilarityPair> {
        let n = self.size();
        let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push(SimilarityPair {
                    doc1: self.filenames[i].clone(),
                    doc2: self.filenames[j].clone(),
                    score: self.grid[i * n + j],
                });
            }
        }
        pairs
    }

    fn require_rankable(&self) -> Result<()> {
        if self.size() < 2 {
            return Err(SimilarityError::InvalidInput(
                "matrix covers fewer than 2 documents",
            ));
        }
        Ok(())
    }

    /// Top pairs by descending score, truncated to `min(top_n, pair_count)`.
    ///
    /// Equal scores are broken lexicographically by `(doc1, doc2)` so the
    /// ranking is deterministic across runs.
    pub fn top_similarities(&self, top_n: usize) -> Result<Vec<SimilarityPair>> {
        self.require_rankable()?;
        let mut pairs = self.all_pairs();
        pairs.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.doc1.cmp(&b.doc1))
                .then_with(|| a.doc2.cmp(&b.doc2))
        });
        pairs.truncate(top_n);
        Ok(pairs)
    }

    /// Pairs with `score >= threshold`, in upper-triangle row-major order.
    pub fn filter_by_threshold(&self, threshold: f64) -> Result<Vec<SimilarityPair>> {
        self.require_rankable()?;
        let mut pairs = self.all_pairs();
        pairs.retain(|pair| pair.score >= threshold);
        Ok(pairs)
    }

    /// Write the matrix as CSV: a `Filename,...` header row, then one row per
    /// document with scores at 4 decimal places. This layout is the
    /// interchange contract; do not change field order or precision.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let n = self.size();

        write!(writer, "Filename")?;
        for name in &self.filenames {
            write!(writer, ",{name}")?;
        }
        writeln!(writer)?;

        for i in 0..n {
            write!(writer, "{}", self.filenames[i])?;
            for j in 0..n {
                write!(writer, ",{:.4}", self.grid[i * n + j])?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the CSV to a file at `path`.
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_csv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Document;

    const TOLERANCE: f64 = 1e-4;

    fn collection(docs: &[(&str, &str)]) -> DocumentCollection {
        let mut col = DocumentCollection::new();
        for (name, text) in docs {
            let mut doc = Document::new(*name, *text);
            doc.process(None).unwrap();
            col.push(doc);
        }
        col
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let col = collection(&[
            ("a.txt", "rust is fast and safe"),
            ("b.txt", "rust is fast"),
            ("c.txt", "completely different words"),
        ]);
        let matrix = SimilarityMatrix::build(&col).unwrap();

        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), Some(1.0));
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn empty_collection_is_invalid_input() {
        let col = DocumentCollection::new();
        assert!(matches!(
            SimilarityMatrix::build(&col),
            Err(SimilarityError::InvalidInput(_))
        ));
    }

    #[test]
    fn single_document_builds_but_cannot_rank() {
        let col = collection(&[("only.txt", "just one document")]);
        let matrix = SimilarityMatrix::build(&col).unwrap();
        assert_eq!(matrix.size(), 1);
        assert_eq!(matrix.get(0, 0), Some(1.0));

        assert!(matrix.top_similarities(5).is_err());
        assert!(matrix.filter_by_threshold(0.0).is_err());
    }

    #[test]
    fn parallel_build_matches_serial() {
        let col = collection(&[
            ("a.txt", "one two three four"),
            ("b.txt", "two three four five"),
            ("c.txt", "three four five six"),
            ("d.txt", "totally unrelated content"),
        ]);
        let serial = SimilarityMatrix::build(&col).unwrap();
        let parallel = SimilarityMatrix::build_parallel(&col).unwrap();

        assert_eq!(serial.size(), parallel.size());
        for i in 0..serial.size() {
            for j in 0..serial.size() {
                assert_eq!(serial.get(i, j), parallel.get(i, j));
            }
        }
    }

    #[test]
    fn top_similarities_descending_and_truncated() {
        let col = collection(&[
            ("a.txt", "shared words everywhere"),
            ("b.txt", "shared words everywhere"),
            ("c.txt", "nothing alike"),
        ]);
        let matrix = SimilarityMatrix::build(&col).unwrap();

        let top = matrix.top_similarities(10).unwrap();
        // 3 documents -> 3 pairs, requested 10
        assert_eq!(top.len(), 3);
        for window in top.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        assert_eq!(top[0].doc1, "a.txt");
        assert_eq!(top[0].doc2, "b.txt");
        assert!((top[0].score - 1.0).abs() < TOLERANCE);

        let top_one = matrix.top_similarities(1).unwrap();
        assert_eq!(top_one.len(), 1);
    }

    #[test]
    fn equal_scores_break_ties_lexicographically() {
        // three identical documents: every pair scores 1.0
        let col = collection(&[
            ("c.txt", "same text"),
            ("a.txt", "same text"),
            ("b.txt", "same text"),
        ]);
        let matrix = SimilarityMatrix::build(&col).unwrap();
        let top = matrix.top_similarities(3).unwrap();

        let labels: Vec<(&str, &str)> = top
            .iter()
            .map(|p| (p.doc1.as_str(), p.doc2.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("a.txt", "b.txt"), ("c.txt", "a.txt"), ("c.txt", "b.txt")]
        );
    }

    #[test]
    fn threshold_filter_keeps_row_major_order() {
        let col = collection(&[
            ("a.txt", "alpha beta gamma"),
            ("b.txt", "alpha beta gamma"),
            ("c.txt", "delta epsilon"),
        ]);
        let matrix = SimilarityMatrix::build(&col).unwrap();

        let kept = matrix.filter_by_threshold(0.5).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].doc1, "a.txt");
        assert_eq!(kept[0].doc2, "b.txt");

        let all = matrix.filter_by_threshold(-2.0).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].doc2, "b.txt");
        assert_eq!(all[1].doc2, "c.txt");
    }

    #[test]
    fn csv_layout_is_exact() {
        let col = collection(&[("a.txt", "x"), ("b.txt", "y")]);
        let matrix = SimilarityMatrix::build(&col).unwrap();

        let mut out = Vec::new();
        matrix.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(
            csv,
            "Filename,a.txt,b.txt\n\
             a.txt,1.0000,0.0000\n\
             b.txt,0.0000,1.0000\n"
        );
    }
}
