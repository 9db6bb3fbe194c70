use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::stopwords::StopWordSet;
use crate::analyzer::table::FrequencyTable;
use crate::analyzer::token;
use crate::error::Result;

/// Document 構造体
/// ファイル名、本文、単語頻度テーブル、総単語数を所有します
/// 頻度テーブルは`process`で構築され、以降は読み取り専用です
///
/// # Examples
/// ```
/// use doc_similarity::Document;
/// let mut doc = Document::new("note.txt", "An apple a day");
/// doc.process(None).unwrap();
/// assert_eq!(doc.word_freq().get("apple"), Some(1));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    filename: String,
    content: String,
    word_freq: FrequencyTable,
    word_count: u64,
}

impl Document {
    /// 名前と本文から作成するメソッド
    /// `process`を呼ぶまで頻度テーブルは空です
    ///
    /// # Arguments
    /// * `filename` - ドキュメント名 (ラベルとして使われる)
    /// * `content` - 本文
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Document {
            filename: filename.into(),
            content: content.into(),
            word_freq: FrequencyTable::new(),
            word_count: 0,
        }
    }

    /// ファイルから本文を読み込んで作成するメソッド
    /// ドキュメント名はファイル名部分になります
    ///
    /// # Arguments
    /// * `path` - ファイルパス
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Document::new(filename, content))
    }

    /// 本文をトークン化して頻度テーブルを構築する
    /// ストップワードはカウントされません
    /// 再実行すると頻度テーブルと総単語数は作り直されます
    ///
    /// # Arguments
    /// * `stop_words` - ストップワード集合 (Noneならすべてカウント)
    pub fn process(&mut self, stop_words: Option<&StopWordSet>) -> Result<()> {
        let mut word_freq = FrequencyTable::new();
        let mut word_count = 0u64;

        for word in token::words(&self.content) {
            if let Some(stop_words) = stop_words {
                if stop_words.contains(&word) {
                    continue;
                }
            }
            word_freq.insert(&word, 1)?;
            word_count += 1;
        }

        self.word_freq = word_freq;
        self.word_count = word_count;
        Ok(())
    }

    /// ドキュメント名を取得します
    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 本文を取得します
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// 単語頻度テーブルを取得します
    #[inline]
    pub fn word_freq(&self) -> &FrequencyTable {
        &self.word_freq
    }

    /// ストップワードを除いた総単語数を取得します
    /// 重複を含むため、テーブルのノード数以上になりえます
    #[inline]
    pub fn word_count(&self) -> u64 {
        self.word_count
    }
}
