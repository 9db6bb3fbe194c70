//! Vocabulary unification and document-level metrics.
//!
//! A vocabulary is the ordered deduplicated union of the keys of one or more
//! frequency tables; every dense vector built against it shares the same
//! component ordering. Vocabularies are rebuilt per comparison, never cached.

use indexmap::IndexSet;

use crate::analyzer::document::Document;
use crate::analyzer::table::FrequencyTable;
use crate::error::Result;
use crate::utils::math::vector::DenseVector;

/// 複数ドキュメントの語彙 (順序付き・重複なしのキー和集合) を構築します
///
/// # Arguments
/// * `documents` - ドキュメントのスライス
///
/// # Returns
/// * `IndexSet<String>` - 出現順の語彙
pub fn build_vocabulary(documents: &[Document]) -> IndexSet<String> {
    let mut vocabulary = IndexSet::new();
    for document in documents {
        for key in document.word_freq().keys() {
            vocabulary.insert(key.to_string());
        }
    }
    vocabulary
}

/// 2つの頻度テーブルのペア語彙を構築します
/// 全体語彙ではなく、この2つのキーの和集合だけを使います
fn pairwise_vocabulary<'a>(a: &'a FrequencyTable, b: &'a FrequencyTable) -> IndexSet<&'a str> {
    let mut vocabulary = IndexSet::new();
    for key in a.keys() {
        vocabulary.insert(key);
    }
    for key in b.keys() {
        vocabulary.insert(key);
    }
    vocabulary
}

/// ドキュメントを語彙に沿った密ベクトルに変換します
/// 成分iは`vocabulary[i]`のカウント (存在しなければ0)
///
/// # Arguments
/// * `document` - ドキュメント
/// * `vocabulary` - 共有語彙
pub fn to_vector(document: &Document, vocabulary: &IndexSet<String>) -> DenseVector<f64> {
    let mut vector = DenseVector::with_capacity(vocabulary.len());
    for key in vocabulary {
        let count = document.word_freq().get(key).unwrap_or(0);
        vector.push(count as f64);
    }
    vector
}

/// Jaccard類似度
/// J(A, B) = |A ∩ B| / |A ∪ B|
/// テーブルをキー集合として扱います (カウントは無視)
/// 和集合が空なら0.0
pub fn jaccard_similarity(a: &FrequencyTable, b: &FrequencyTable) -> f64 {
    let mut intersection = 0usize;
    let mut union = 0usize;

    for (key, _) in a.iter() {
        if b.contains_key(key) {
            intersection += 1;
        }
        union += 1;
    }
    for (key, _) in b.iter() {
        if !a.contains_key(key) {
            union += 1;
        }
    }

    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// ドキュメント間のコサイン類似度
/// 2つのドキュメントのペア語彙でベクトル化して計算します
/// これが類似度行列を埋める指標です
///
/// # Arguments
/// * `a` - ドキュメントA
/// * `b` - ドキュメントB
pub fn document_cosine_similarity(a: &Document, b: &Document) -> Result<f64> {
    let vocabulary = pairwise_vocabulary(a.word_freq(), b.word_freq());

    let mut vec_a = DenseVector::with_capacity(vocabulary.len());
    let mut vec_b = DenseVector::with_capacity(vocabulary.len());
    for key in &vocabulary {
        vec_a.push(a.word_freq().get(key).unwrap_or(0) as f64);
        vec_b.push(b.word_freq().get(key).unwrap_or(0) as f64);
    }

    vec_a.cosine_similarity(&vec_b)
}
