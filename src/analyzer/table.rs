use std::fmt;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SimilarityError};

/// リサイズを起動する負荷係数のしきい値
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.75;
/// デフォルトのバケット数
pub const INITIAL_CAPACITY: usize = 101;

/// チェーンの1ノード
/// keyとカウント、次ノードへのリンクを所有します
#[derive(Debug, Clone)]
struct Entry {
    key: Box<str>,
    count: u32,
    next: Option<Box<Entry>>,
}

/// insertの結果
/// リサイズ失敗は挿入自体を妨げない (旧容量のまま完了する)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 新しいキーが挿入された
    Inserted,
    /// 既存キーのカウントに加算された
    Accumulated,
    /// リサイズに失敗したが、旧容量のまま挿入は完了した
    Degraded,
}

/// FrequencyTable 構造体
/// 単語の出現回数を管理するためのチェーン法ハッシュテーブルです
/// djb2ハッシュと動的リサイズ (2n+1) で実装しています
///
/// # Examples
/// ```
/// use doc_similarity::FrequencyTable;
/// let mut table = FrequencyTable::new();
/// table.insert("word", 2).unwrap();
/// table.insert("word", 1).unwrap();
/// assert_eq!(table.get("word"), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    buckets: Vec<Option<Box<Entry>>>,
    size: usize,
    unique_keys: usize,
    collisions: usize,
}

/// テーブル統計情報
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    pub capacity: usize,
    pub size: usize,
    pub unique_keys: usize,
    pub collisions: usize,
    pub load_factor: f64,
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "capacity: {}", self.capacity)?;
        writeln!(f, "size: {}", self.size)?;
        writeln!(f, "unique keys: {}", self.unique_keys)?;
        writeln!(f, "collisions: {}", self.collisions)?;
        write!(f, "load factor: {:.3}", self.load_factor)
    }
}

/// 作成、挿入、削除の実装
impl FrequencyTable {
    /// デフォルト容量 (101バケット) で作成するメソッド
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// 指定容量で作成するメソッド
    /// 0を指定した場合はデフォルト容量になります
    ///
    /// # Arguments
    /// * `capacity` - バケット数
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity > 0 { capacity } else { INITIAL_CAPACITY };
        let mut buckets = Vec::new();
        buckets.resize_with(capacity, || None);
        FrequencyTable {
            buckets,
            size: 0,
            unique_keys: 0,
            collisions: 0,
        }
    }

    /// djb2ハッシュ関数
    /// seed 5381、`hash = hash * 33 + byte` を生のバイト列に適用します
    /// 実装間のパリティのためバイト単位で計算します (コードポイント単位ではない)
    ///
    /// # Arguments
    /// * `key` - キー
    /// * `capacity` - バケット数 (0より大きいこと)
    ///
    /// # Returns
    /// * `usize` - バケット添字 (`< capacity`)
    #[inline]
    pub fn hash(key: &str, capacity: usize) -> usize {
        let mut hash: u64 = 5381;
        for byte in key.bytes() {
            // hash * 33 + byte
            hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(byte as u64);
        }
        (hash % capacity as u64) as usize
    }

    /// キーとカウントの差分を挿入する
    /// 既存キーなら加算 (上書きしない)、なければチェーン先頭に新ノードを挿入します
    /// 挿入前に負荷係数が0.75を超えていればリサイズします
    ///
    /// # Arguments
    /// * `key` - キー
    /// * `delta` - 加算するカウント
    pub fn insert(&mut self, key: &str, delta: u32) -> Result<InsertOutcome> {
        let mut degraded = false;
        if self.load_factor() > LOAD_FACTOR_THRESHOLD {
            // リサイズ失敗は旧容量のまま挿入を続行する
            if self.resize().is_err() {
                degraded = true;
            }
        }

        let index = Self::hash(key, self.buckets.len());

        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key.as_ref() == key {
                entry.count += delta;
                return Ok(if degraded {
                    InsertOutcome::Degraded
                } else {
                    InsertOutcome::Accumulated
                });
            }
            cursor = entry.next.as_deref_mut();
        }

        let next = self.buckets[index].take();
        if next.is_some() {
            self.collisions += 1;
        }
        self.buckets[index] = Some(Box::new(Entry {
            key: key.into(),
            count: delta,
            next,
        }));
        self.size += 1;
        self.unique_keys += 1;

        Ok(if degraded {
            InsertOutcome::Degraded
        } else {
            InsertOutcome::Inserted
        })
    }

    /// キーを削除する
    /// チェーン内の最初に一致したノードを外し、`size`を1減らします
    /// `unique_keys` は「これまでに挿入された異なるキーの数」のため減りません
    ///
    /// # Arguments
    /// * `key` - 削除するキー
    ///
    /// # Returns
    /// * `bool` - キーが存在した場合はtrue
    pub fn remove(&mut self, key: &str) -> bool {
        let index = Self::hash(key, self.buckets.len());
        let mut cursor = &mut self.buckets[index];
        // advance until the cursor rests on the matching node or the chain end
        while cursor.as_ref().is_some_and(|entry| entry.key.as_ref() != key) {
            if let Some(entry) = cursor {
                cursor = &mut entry.next;
            }
        }
        match cursor.take() {
            Some(mut hit) => {
                *cursor = hit.next.take();
                self.size -= 1;
                true
            }
            None => false,
        }
    }

    /// 容量を `2 * capacity + 1` に拡張し、全ノードを再ハッシュする
    /// ノードは新チェーンの先頭へ移されるため、チェーン内の順序は反転します
    /// 衝突カウンタは0にリセットされます
    fn resize(&mut self) -> Result<()> {
        let new_capacity = self.buckets.len() * 2 + 1;

        let mut new_buckets: Vec<Option<Box<Entry>>> = Vec::new();
        new_buckets
            .try_reserve_exact(new_capacity)
            .map_err(|_| SimilarityError::Allocation(new_capacity))?;
        new_buckets.resize_with(new_capacity, || None);

        for slot in self.buckets.iter_mut() {
            let mut chain = slot.take();
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let index = Self::hash(&entry.key, new_capacity);
                entry.next = new_buckets[index].take();
                new_buckets[index] = Some(entry);
            }
        }

        self.buckets = new_buckets;
        self.collisions = 0;
        Ok(())
    }
}

/// 参照系の実装
impl FrequencyTable {
    /// キーのカウントを取得します
    ///
    /// # Arguments
    /// * `key` - キー
    ///
    /// # Returns
    /// * `Option<u32>` - 存在すればカウント
    #[inline]
    pub fn get(&self, key: &str) -> Option<u32> {
        let index = Self::hash(key, self.buckets.len());
        let mut cursor = self.buckets[index].as_deref();
        while let Some(entry) = cursor {
            if entry.key.as_ref() == key {
                return Some(entry.count);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    /// キーが存在するかどうかを確認します
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 現在のノード数を取得します
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// これまでに挿入された異なるキーの数を取得します
    /// removeでは減りません
    #[inline]
    pub fn unique_keys(&self) -> usize {
        self.unique_keys
    }

    /// 空でないチェーンへ新ノードが入った回数を取得します
    /// リサイズで0にリセットされます
    #[inline]
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// バケット数を取得します
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// 負荷係数 `size / capacity` を計算します
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// 全ノードを `(key, count)` でバケット順にイテレートします
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: &self.buckets,
            bucket_index: 0,
            chain: None,
        }
    }

    /// キーのみをバケット順にイテレートします
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    /// 統計情報のスナップショットを取得します
    pub fn stats(&self) -> TableStats {
        TableStats {
            capacity: self.capacity(),
            size: self.size,
            unique_keys: self.unique_keys,
            collisions: self.collisions,
            load_factor: self.load_factor(),
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `(key, count)` のイテレータ
/// バケット順、チェーンは先頭から末尾へ辿ります
pub struct Iter<'a> {
    buckets: &'a [Option<Box<Entry>>],
    bucket_index: usize,
    chain: Option<&'a Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, u32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                return Some((&entry.key, entry.count));
            }
            if self.bucket_index >= self.buckets.len() {
                return None;
            }
            self.chain = self.buckets[self.bucket_index].as_deref();
            self.bucket_index += 1;
        }
    }
}

impl<'a> IntoIterator for &'a FrequencyTable {
    type Item = (&'a str, u32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// serdeの実装
/// `(key, count)` ペアの列として書き出します
/// バケット配置は復元時にinsertで再構築されるため持ち越しません
impl Serialize for FrequencyTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.size))?;
        for (key, count) in self.iter() {
            seq.serialize_element(&(key, count))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for FrequencyTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = FrequencyTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of (key, count) pairs")
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                use serde::de::Error as DeError;

                let mut table = FrequencyTable::new();
                while let Some((key, count)) = seq.next_element::<(String, u32)>()? {
                    table
                        .insert(&key, count)
                        .map_err(|e| DeError::custom(format!("rebuild failed: {e}")))?;
                }
                Ok(table)
            }
        }

        deserializer.deserialize_seq(TableVisitor)
    }
}
