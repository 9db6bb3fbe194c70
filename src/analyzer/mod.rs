pub mod document;
pub mod matrix;
pub mod stopwords;
pub mod table;
pub mod token;
pub mod vectorspace;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use document::Document;
pub use matrix::{SimilarityMatrix, SimilarityPair};
pub use stopwords::StopWordSet;
pub use table::FrequencyTable;

use crate::error::Result;

/// DocumentCollection 構造体
/// 追記専用のドキュメント列です
/// 追加しても既存の添字は変わりません
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentCollection {
    documents: Vec<Document>,
}

impl DocumentCollection {
    /// 空の集合を作成するメソッド
    pub fn new() -> Self {
        DocumentCollection {
            documents: Vec::new(),
        }
    }

    /// ディレクトリ内の`.txt`ファイルをすべて読み込んで作成するメソッド
    /// ファイル名順に処理するため、行列の並びは決定的になります
    /// 読めないファイルは警告を出してスキップします
    ///
    /// # Arguments
    /// * `dir` - ディレクトリパス
    /// * `stop_words` - ストップワード集合
    pub fn load_from_dir<P: AsRef<Path>>(
        dir: P,
        stop_words: Option<&StopWordSet>,
    ) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().map_or(false, |ext| ext == "txt")
            })
            .collect();
        paths.sort();

        let mut collection = DocumentCollection::new();
        for path in paths {
            let mut doc = match Document::from_file(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    eprintln!("[warn] skipping {}: {e}", path.display());
                    continue;
                }
            };
            if let Err(e) = doc.process(stop_words) {
                eprintln!("[warn] skipping {}: {e}", path.display());
                continue;
            }
            collection.push(doc);
        }
        Ok(collection)
    }

    /// ドキュメントを追加する
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// ドキュメント数を取得します
    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// 添字でドキュメントを取得します
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// ドキュメントのスライスを取得します
    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// ドキュメントを追加順にイテレートします
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_never_invalidates_indices() {
        let mut col = DocumentCollection::new();
        col.push(Document::new("first.txt", "one"));
        let name_before = col.get(0).unwrap().filename().to_string();

        for i in 0..100 {
            col.push(Document::new(format!("doc{i}.txt"), "text"));
        }
        assert_eq!(col.len(), 101);
        assert_eq!(col.get(0).unwrap().filename(), name_before);
    }

    #[test]
    fn load_from_dir_reads_sorted_txt_files() {
        let dir = std::env::temp_dir().join(format!(
            "doc-similarity-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.txt"), "beta words").unwrap();
        std::fs::write(dir.join("a.txt"), "alpha words").unwrap();
        std::fs::write(dir.join("ignored.md"), "not a txt").unwrap();

        let col = DocumentCollection::load_from_dir(&dir, None).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(col.len(), 2);
        assert_eq!(col.get(0).unwrap().filename(), "a.txt");
        assert_eq!(col.get(1).unwrap().filename(), "b.txt");
        assert_eq!(col.get(0).unwrap().word_freq().get("alpha"), Some(1));
    }

    #[test]
    fn load_from_missing_dir_is_an_error() {
        let missing = std::env::temp_dir().join("doc-similarity-no-such-dir");
        assert!(DocumentCollection::load_from_dir(&missing, None).is_err());
    }
}
