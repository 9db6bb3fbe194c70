use num::Num;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimilarityError};

/// Dense vector over a shared vocabulary ordering.
///
/// `N` is the component type (e.g. f64, f32, u32); all arithmetic is carried
/// out in f64. Vectors are transient: one is built per comparison and dropped
/// afterwards, so growth is plain amortized `Vec` push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseVector<N = f64>
where
    N: Num + Copy,
{
    data: Vec<N>,
}

impl<N> DenseVector<N>
where
    N: Num + Copy,
{
    pub fn new() -> Self {
        DenseVector { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        DenseVector {
            data: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, value: N) {
        self.data.push(value);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[N] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = N> + '_ {
        self.data.iter().copied()
    }

    fn check_len(&self, other: &Self) -> Result<()> {
        if self.len() != other.len() {
            return Err(SimilarityError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }
}

impl<N> DenseVector<N>
where
    N: Num + Copy + Into<f64>,
{
    /// dot積
    /// d(a, b) = Σ(a_i * b_i)
    /// 長さが異なる場合はエラー
    pub fn dot(&self, other: &Self) -> Result<f64> {
        self.check_len(other)?;
        Ok(self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| {
                let a: f64 = a.into();
                let b: f64 = b.into();
                a * b
            })
            .sum())
    }

    /// ユークリッドノルム
    /// ||a|| = sqrt(Σ(a_i^2))、空ベクトルは0
    pub fn magnitude(&self) -> f64 {
        self.iter()
            .map(|a| {
                let a: f64 = a.into();
                a * a
            })
            .sum::<f64>()
            .sqrt()
    }

    /// コサイン類似度
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// どちらかのノルムが0なら0.0 (エラーではない)
    pub fn cosine_similarity(&self, other: &Self) -> Result<f64> {
        self.check_len(other)?;
        let dot = self.dot(other)?;
        let mag_a = self.magnitude();
        let mag_b = other.magnitude();
        if mag_a == 0.0 || mag_b == 0.0 {
            return Ok(0.0);
        }
        Ok(dot / (mag_a * mag_b))
    }

    /// ユークリッド距離
    /// d(a, b) = sqrt(Σ((a_i - b_i)^2))
    pub fn euclidean_distance(&self, other: &Self) -> Result<f64> {
        self.check_len(other)?;
        Ok(self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| {
                let a: f64 = a.into();
                let b: f64 = b.into();
                let diff = a - b;
                diff * diff
            })
            .sum::<f64>()
            .sqrt())
    }

    /// マンハッタン距離
    /// d(a, b) = Σ(|a_i - b_i|)
    pub fn manhattan_distance(&self, other: &Self) -> Result<f64> {
        self.check_len(other)?;
        Ok(self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| {
                let a: f64 = a.into();
                let b: f64 = b.into();
                (a - b).abs()
            })
            .sum())
    }
}

impl DenseVector<f64> {
    /// その場で正規化する
    /// ノルムが0なら何もしません
    pub fn normalize(&mut self) {
        let mag = self.magnitude();
        if mag == 0.0 {
            return;
        }
        for value in self.data.iter_mut() {
            *value /= mag;
        }
    }
}

impl<N> Default for DenseVector<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> From<Vec<N>> for DenseVector<N>
where
    N: Num + Copy,
{
    fn from(data: Vec<N>) -> Self {
        DenseVector { data }
    }
}
