/// This crate is a Document Similarity Analysis Engine using a bag-of-words
/// vector-space model.
pub mod analyzer;
pub mod error;
pub mod utils;

/// Frequency Table structure
/// A string-keyed counter built on chained hashing (djb2) with dynamic
/// growth. It manages:
/// - The count of occurrences of each word
/// - The number of distinct keys ever inserted
/// - Collision and load-factor statistics
///
/// One table is built per document and read-only afterwards; comparisons
/// never mutate it.
///
/// # Serialization
/// Supported, as a sequence of `(key, count)` pairs. Bucket layout is
/// rebuilt on deserialization.
pub use analyzer::table::FrequencyTable;

/// Result of a single insert: new key, accumulated count, or completed at
/// old capacity after a failed grow.
pub use analyzer::table::InsertOutcome;

/// Document structure
/// Owns a filename label, the raw content, the word-frequency table and the
/// total non-stopword token count. `process` tokenizes the content and
/// builds the table; the byte-oriented word splitter lives in
/// `analyzer::token`.
pub use analyzer::document::Document;

/// Stop Word Set
/// An ordered set of lowercase words consulted during tokenization. The
/// default set is the built-in English function-word list; more words can be
/// added directly or loaded from a file (one word per line).
pub use analyzer::stopwords::StopWordSet;

/// Document Collection
/// An append-only sequence of documents; growth never invalidates previously
/// assigned indices. Can be populated from a directory of `.txt` files.
pub use analyzer::DocumentCollection;

/// Similarity Matrix
/// The N×N pairwise cosine-similarity grid over a document collection:
/// unit diagonal, symmetric by construction, each unordered pair computed
/// exactly once (optionally on the rayon thread pool). Provides top-N
/// ranking, threshold filtering and the CSV interchange writer.
pub use analyzer::matrix::{SimilarityMatrix, SimilarityPair};

/// Dense vector over a shared vocabulary ordering, generic over the
/// component type (e.g. f64, f32, u32). Provides dot product, magnitude,
/// normalization, cosine similarity and the L1/L2 distances.
pub use utils::math::vector::DenseVector;

/// Errors of the analysis core. Key absence is not an error; allocation
/// failures, invalid input and vector length mismatches are.
pub use error::{Result, SimilarityError};
