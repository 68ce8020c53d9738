use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use firmsearch_core::outcome::Outcome;
use firmsearch_core::traits::Embedder;
use twox_hash::XxHash64;

/// Deterministic offline embedder: hashed bag of tokens, L2-normalised.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn dim(&self) -> usize { self.dim }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.to_lowercase().split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn embedder_id(&self) -> &str { "fake-xxhash" }

    async fn embed(&self, text: &str) -> Outcome<Vec<f32>> {
        if text.trim().is_empty() {
            return Outcome::Empty;
        }
        Outcome::Success(self.vector(text))
    }
}
