use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 既定のストップワード (英語の機能語)
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to",
    "for", "of", "with", "by", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "do", "does", "did",
    "will", "would", "shall", "should", "may", "might", "must",
    "can", "could", "i", "you", "he", "she", "it", "we", "they",
    "me", "him", "her", "us", "them", "my", "your", "his", "its",
    "our", "their", "mine", "yours", "hers", "ours", "theirs",
    "this", "that", "these", "those", "am", "if", "then", "else",
    "when", "where", "why", "how", "all", "any", "both", "each",
    "few", "more", "most", "other", "some", "such", "no", "nor",
    "not", "only", "own", "same", "so", "than", "too", "very",
];

/// StopWordSet 構造体
/// 小文字の単語の順序付き集合です
/// トークン化の際の読み取り専用の判定にのみ使われます
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopWordSet {
    words: IndexSet<String>,
}

impl StopWordSet {
    /// 空の集合を作成するメソッド
    pub fn empty() -> Self {
        StopWordSet {
            words: IndexSet::new(),
        }
    }

    /// 単語を追加する
    /// 追加時に小文字化されます
    ///
    /// # Arguments
    /// * `word` - 追加する単語
    pub fn add(&mut self, word: &str) -> &mut Self {
        self.words.insert(word.to_ascii_lowercase());
        self
    }

    /// ファイルから読み込んで追加する (1行1単語)
    ///
    /// # Arguments
    /// * `path` - ファイルパス
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let file = File::open(path)?;
        let mut added = 0;
        for line in BufReader::new(file).lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            self.add(word);
            added += 1;
        }
        Ok(added)
    }

    /// 単語が含まれるかどうかを確認します
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// 登録されている単語数を取得します
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// 単語を登録順にイテレートします
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|word| word.as_str())
    }
}

impl Default for StopWordSet {
    /// 既定のストップワード一覧で作成します
    fn default() -> Self {
        let mut set = StopWordSet::empty();
        for word in DEFAULT_STOP_WORDS {
            set.add(word);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_contains_the_constant_list() {
        let set = StopWordSet::default();
        assert_eq!(set.len(), DEFAULT_STOP_WORDS.len());
        assert!(set.contains("the"));
        assert!(set.contains("very"));
        assert!(!set.contains("similarity"));
    }

    #[test]
    fn add_lowercases() {
        let mut set = StopWordSet::empty();
        set.add("The").add("AND");
        assert!(set.contains("the"));
        assert!(set.contains("and"));
        assert!(!set.contains("The"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut set = StopWordSet::empty();
        set.add("zebra").add("apple").add("mango");
        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
    }
}
